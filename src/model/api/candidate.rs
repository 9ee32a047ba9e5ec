use serde::{Deserialize, Serialize};

use crate::model::db::candidate::{Candidate, NewCandidate};

/// API-friendly representation of a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDesc {
    pub id: String,
    pub name: String,
    pub position: String,
    pub department: String,
    pub year: String,
    pub manifesto: String,
    pub image_url: Option<String>,
    pub votes: i64,
}

impl From<Candidate> for CandidateDesc {
    fn from(candidate: Candidate) -> Self {
        Self {
            id: candidate.id.to_string(),
            name: candidate.candidate.name,
            position: candidate.candidate.position,
            department: candidate.candidate.department,
            year: candidate.candidate.year,
            manifesto: candidate.candidate.manifesto,
            image_url: candidate.candidate.image_url,
            votes: candidate.candidate.votes,
        }
    }
}

/// A candidate profile as submitted by an admin; the vote counter is never
/// client-supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    pub position: String,
    pub department: String,
    pub year: String,
    pub manifesto: String,
    pub image_url: Option<String>,
}

impl From<CandidateProfile> for NewCandidate {
    fn from(profile: CandidateProfile) -> Self {
        Self {
            name: profile.name,
            position: profile.position,
            department: profile.department,
            year: profile.year,
            manifesto: profile.manifesto,
            image_url: profile.image_url,
            votes: 0,
        }
    }
}
