use serde::{Deserialize, Serialize};

/// Dashboard counts for the admin overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    pub candidates: u64,
    pub students: u64,
    pub votes_cast: u64,
    pub election_active: bool,
}

/// Outcome of a fully successful global vote reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetReport {
    /// Number of vote documents deleted.
    pub votes_deleted: u64,
    /// Number of candidates whose counters were zeroed.
    pub candidates_reset: u64,
    /// Number of students whose participation flags were cleared.
    pub students_reset: u64,
}
