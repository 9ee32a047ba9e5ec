use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::model::db::candidate::Candidate;

/// A candidate's place in the live tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateStanding {
    pub id: String,
    pub name: String,
    pub position: String,
    pub votes: i64,
    /// Share of the total vote, rounded to one decimal place. `0.0` when no
    /// votes have been cast at all.
    pub percentage: f64,
    pub rank: usize,
}

/// The derived results view: total votes plus the ranked candidate list.
///
/// Purely derived from the current counters; recomputed on every read, so it
/// is safe to refresh redundantly or concurrently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionResults {
    pub total_votes: i64,
    pub rankings: Vec<CandidateStanding>,
}

impl ElectionResults {
    /// Rank the given candidates by descending vote count. Ties keep the
    /// order the candidates were fetched in (the sort is stable).
    pub fn compute(candidates: Vec<Candidate>) -> Self {
        let total_votes: i64 = candidates.iter().map(|c| c.votes).sum();

        let mut ranked = candidates;
        ranked.sort_by_key(|c| Reverse(c.votes));

        let rankings = ranked
            .into_iter()
            .enumerate()
            .map(|(index, candidate)| {
                let votes = candidate.votes;
                CandidateStanding {
                    id: candidate.id.to_string(),
                    name: candidate.candidate.name,
                    position: candidate.candidate.position,
                    votes,
                    percentage: percentage(votes, total_votes),
                    rank: index + 1,
                }
            })
            .collect();

        Self {
            total_votes,
            rankings,
        }
    }
}

/// Percentage share of `votes` out of `total`, rounded to one decimal place.
/// A zero total yields `0.0` rather than a division error.
fn percentage(votes: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let share = votes as f64 * 100.0 / total as f64;
    (share * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_by_descending_votes() {
        let candidates = vec![
            Candidate::example("Amara", 3),
            Candidate::example("Boris", 7),
        ];
        let results = ElectionResults::compute(candidates);

        assert_eq!(10, results.total_votes);
        assert_eq!("Boris", results.rankings[0].name);
        assert_eq!(1, results.rankings[0].rank);
        assert_eq!(70.0, results.rankings[0].percentage);
        assert_eq!("Amara", results.rankings[1].name);
        assert_eq!(2, results.rankings[1].rank);
        assert_eq!(30.0, results.rankings[1].percentage);
    }

    #[test]
    fn zero_total_yields_zero_percentages() {
        let candidates = vec![
            Candidate::example("Amara", 0),
            Candidate::example("Boris", 0),
        ];
        let results = ElectionResults::compute(candidates);

        assert_eq!(0, results.total_votes);
        for standing in &results.rankings {
            assert_eq!(0.0, standing.percentage);
        }
    }

    #[test]
    fn ties_keep_fetch_order() {
        let candidates = vec![
            Candidate::example("Amara", 4),
            Candidate::example("Boris", 4),
            Candidate::example("Chen", 4),
        ];
        let results = ElectionResults::compute(candidates);

        let names: Vec<_> = results.rankings.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(vec!["Amara", "Boris", "Chen"], names);
    }

    #[test]
    fn single_candidate_takes_the_whole_share() {
        let results = ElectionResults::compute(vec![Candidate::example("Amara", 5)]);
        assert_eq!(100.0, results.rankings[0].percentage);
    }

    #[test]
    fn percentages_round_to_one_decimal() {
        let candidates = vec![
            Candidate::example("Amara", 1),
            Candidate::example("Boris", 2),
        ];
        let results = ElectionResults::compute(candidates);

        assert_eq!(66.7, results.rankings[0].percentage);
        assert_eq!(33.3, results.rankings[1].percentage);
    }

    #[test]
    fn huge_tallies_do_not_overflow() {
        // Counts large enough that multiplying by 100 in i64 would wrap.
        let candidates = vec![
            Candidate::example("Amara", 3 << 60),
            Candidate::example("Boris", 1 << 60),
        ];
        let results = ElectionResults::compute(candidates);

        assert_eq!(4 << 60, results.total_votes);
        assert_eq!(75.0, results.rankings[0].percentage);
        assert_eq!(25.0, results.rankings[1].percentage);
    }

    #[test]
    fn empty_candidate_list() {
        let results = ElectionResults::compute(Vec::new());
        assert_eq!(0, results.total_votes);
        assert!(results.rankings.is_empty());
    }
}
