use std::ops::Deref;

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// A single cast vote, linking a student to a candidate within an election.
///
/// Immutable once created, except for bulk deletion during the admin reset.
/// The unique index on `(student_id, election_id)` makes the insert of this
/// document the single source of truth for voting eligibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCore {
    pub student_id: Id,
    pub candidate_id: Id,
    pub election_id: Id,
    pub cast_at: DateTime,
}

impl VoteCore {
    /// Create a vote cast at the current instant.
    pub fn new(student_id: Id, candidate_id: Id, election_id: Id) -> Self {
        Self {
            student_id,
            candidate_id,
            election_id,
            cast_at: DateTime::now(),
        }
    }
}

/// A vote without an ID.
pub type NewVote = VoteCore;

/// A vote from the database, with its unique ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub vote: VoteCore,
}

impl Deref for Vote {
    type Target = VoteCore;

    fn deref(&self) -> &Self::Target {
        &self.vote
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mongodb::bson;

    #[test]
    fn vote_references_its_parties() {
        let student = Id::new();
        let candidate = Id::new();
        let election = Id::new();
        let vote = VoteCore::new(student, candidate, election);
        assert_eq!(student, vote.student_id);
        assert_eq!(candidate, vote.candidate_id);
        assert_eq!(election, vote.election_id);
    }

    #[test]
    fn vote_serialises_to_bson() {
        let vote = VoteCore::new(Id::new(), Id::new(), Id::new());
        let doc = bson::to_document(&vote).unwrap();
        assert!(doc.get_object_id("student_id").is_ok());
        assert!(doc.get_object_id("candidate_id").is_ok());
        assert!(doc.get_object_id("election_id").is_ok());
        assert!(doc.get_datetime("cast_at").is_ok());
        let back: VoteCore = bson::from_document(doc).unwrap();
        assert_eq!(vote, back);
    }
}
