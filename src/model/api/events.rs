use serde::{Deserialize, Serialize};

/// A tally-change notification, broadcast to results subscribers whenever a
/// mutation may have changed the displayed tallies. Receiving one is a hint
/// to re-fetch; the payload deliberately carries no counts, so a missed event
/// only delays a refresh rather than corrupting state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TallyEvent {
    /// A vote was cast for the given candidate.
    VoteCast { candidate_id: String },
    /// The candidate list itself changed (created/updated/deleted).
    CandidatesChanged,
    /// All votes were reset by an admin.
    VotesReset,
}
