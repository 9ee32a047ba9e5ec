use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// Core candidate data: the public profile plus the denormalised vote
/// counter.
///
/// The counter caches the number of vote documents referencing this
/// candidate. It is bumped by the store-side atomic `$inc` during vote
/// casting and zeroed by the admin reset; it never goes negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateCore {
    pub name: String,
    pub position: String,
    pub department: String,
    pub year: String,
    pub manifesto: String,
    pub image_url: Option<String>,
    pub votes: i64,
}

/// A candidate without an ID.
pub type NewCandidate = CandidateCore;

/// A candidate from the database, with its unique ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub candidate: CandidateCore,
}

impl Deref for Candidate {
    type Target = CandidateCore;

    fn deref(&self) -> &Self::Target {
        &self.candidate
    }
}

impl DerefMut for Candidate {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.candidate
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl CandidateCore {
        pub fn example(name: &str, votes: i64) -> Self {
            Self {
                name: name.to_string(),
                position: "President".to_string(),
                department: "Computer Science".to_string(),
                year: "3rd Year".to_string(),
                manifesto: "Longer library hours and cheaper coffee.".to_string(),
                image_url: None,
                votes,
            }
        }
    }

    impl Candidate {
        pub fn example(name: &str, votes: i64) -> Self {
            Self {
                id: Id::new(),
                candidate: CandidateCore::example(name, votes),
            }
        }
    }
}
