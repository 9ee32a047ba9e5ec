use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::db::student::Student;

/// The acting student's own view, including a fresh participation flag for
/// gating the vote action client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterDesc {
    pub id: String,
    pub name: String,
    pub email: String,
    pub has_voted: bool,
}

impl From<Student> for VoterDesc {
    fn from(student: Student) -> Self {
        Self {
            id: student.id.to_string(),
            name: student.student.name,
            email: student.student.email,
            has_voted: student.student.has_voted,
        }
    }
}

/// A vote the student wishes to cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotSpec {
    pub candidate_id: String,
}

/// Confirmation of a recorded vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub candidate_id: String,
    pub cast_at: DateTime<Utc>,
}
