use mongodb::{bson::doc, error::Error as DbError};
use rocket::{
    http::Status, serde::json::Json, tokio::sync::broadcast::Sender, Route, State,
};

use crate::error::{Error, Result};
use crate::model::{
    api::{
        auth::AuthToken,
        events::TallyEvent,
        voter::{BallotSpec, VoteReceipt, VoterDesc},
    },
    db::{candidate::Candidate, election::Election, student::Student, vote::NewVote},
    mongodb::{is_duplicate_key_error, Coll, Id},
};

use super::common::{current_election, student_by_token};

pub fn routes() -> Vec<Route> {
    routes![get_voter, cast_vote]
}

/// The acting student's own record, including a fresh participation flag.
#[get("/voter")]
async fn get_voter(token: AuthToken<Student>, students: Coll<Student>) -> Result<Json<VoterDesc>> {
    let student = student_by_token(&token, &students).await?;
    Ok(Json(student.into()))
}

/// Cast the student's single vote.
///
/// The sequence is deliberately not transactional: each step is an
/// independent call to the store. The unique `(student_id, election_id)`
/// index makes the vote insert the authoritative eligibility check, so a
/// failure in the later steps can leave the counter or the participation
/// flag stale, but can never permit a second vote.
#[post("/voter/votes", data = "<ballot>", format = "json")]
async fn cast_vote(
    token: AuthToken<Student>,
    ballot: Json<BallotSpec>,
    students: Coll<Student>,
    elections: Coll<Election>,
    candidates: Coll<Candidate>,
    votes: Coll<NewVote>,
    events: &State<Sender<TallyEvent>>,
) -> Result<Json<VoteReceipt>> {
    // Resolve the current election and fetch the voter fresh, then check
    // the gates. Refused attempts must not mutate anything.
    let election = current_election(&elections).await?;
    let student = student_by_token(&token, &students).await?;
    check_ballot(&election, &student)?;

    // The chosen candidate must exist.
    let candidate_id: Id = ballot.candidate_id.parse()?;
    candidates
        .find_one(candidate_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Candidate with ID {}", candidate_id)))?;

    // Record the vote. A duplicate-key rejection means we lost a race with
    // another request for the same voter; any other write error aborts with
    // the flag still clear, so the voter can retry.
    let vote = NewVote::new(student.id, candidate_id, election.id);
    votes
        .insert_one(&vote, None)
        .await
        .map_err(map_insert_error)?;

    // Bump the candidate's counter via the store-side atomic increment, the
    // only increment path. The vote is already durable; a failure here
    // leaves a stale counter, which the next reset corrects, so log and
    // carry on.
    let bump = doc! {
        "$inc": { "votes": 1 },
    };
    if let Err(err) = candidates.update_one(candidate_id.as_doc(), bump, None).await {
        error!(
            "Failed to increment tally for candidate {}: {}",
            candidate_id, err
        );
    }

    // Mark participation. Also non-fatal: eligibility is enforced by the
    // unique vote index, the flag only drives presentation.
    let mark = doc! {
        "$set": { "has_voted": true },
    };
    if let Err(err) = students.update_one(student.id.as_doc(), mark, None).await {
        error!("Failed to set has_voted for student {}: {}", student.id, err);
    }

    // Nudge subscribed results views. Nobody listening is fine.
    let _ = events.send(TallyEvent::VoteCast {
        candidate_id: candidate_id.to_string(),
    });

    Ok(Json(VoteReceipt {
        candidate_id: candidate_id.to_string(),
        cast_at: vote.cast_at.to_chrono(),
    }))
}

/// Check the gates that must pass before any store mutation: the election
/// must be active and the student must not have voted already.
fn check_ballot(election: &Election, student: &Student) -> Result<()> {
    if !election.is_active {
        return Err(Error::Status(
            Status::Forbidden,
            "The election is not currently active".to_string(),
        ));
    }
    if student.has_voted {
        return Err(already_voted());
    }
    Ok(())
}

/// The 409 for a spent ballot, returned both by the fast-path flag check and
/// when the unique vote index rejects the insert.
fn already_voted() -> Error {
    Error::Status(
        Status::Conflict,
        "You have already voted in this election".to_string(),
    )
}

/// Map a failed vote insert. A duplicate-key rejection means a vote for this
/// student already exists (a lost race with another request); anything else
/// is a store error.
fn map_insert_error(err: DbError) -> Error {
    if is_duplicate_key_error(&err) {
        already_voted()
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mongodb::{
        bson,
        error::{ErrorKind, WriteError, WriteFailure},
    };

    use crate::model::{db::student::StudentCore, mongodb::DUPLICATE_KEY};

    fn student(has_voted: bool) -> Student {
        let mut student = Student {
            id: Id::new(),
            student: StudentCore::example(),
        };
        student.has_voted = has_voted;
        student
    }

    fn write_error(code: i32) -> DbError {
        // WriteError is non-exhaustive, so build it the way the driver does:
        // from a server reply document.
        let write_error: WriteError = bson::from_document(bson::doc! {
            "code": code,
            "errmsg": "simulated write failure",
        })
        .unwrap();
        ErrorKind::Write(WriteFailure::WriteError(write_error)).into()
    }

    #[test]
    fn inactive_election_refuses_the_ballot() {
        let err = check_ballot(&Election::example(false), &student(false)).unwrap_err();
        assert!(matches!(err, Error::Status(status, _) if status == Status::Forbidden));
    }

    #[test]
    fn active_election_admits_a_first_ballot() {
        assert!(check_ballot(&Election::example(true), &student(false)).is_ok());
    }

    #[test]
    fn spent_ballot_is_refused() {
        let err = check_ballot(&Election::example(true), &student(true)).unwrap_err();
        assert!(matches!(err, Error::Status(status, _) if status == Status::Conflict));
    }

    #[test]
    fn inactive_election_refuses_even_a_spent_ballot() {
        let err = check_ballot(&Election::example(false), &student(true)).unwrap_err();
        assert!(matches!(err, Error::Status(status, _) if status == Status::Forbidden));
    }

    #[test]
    fn duplicate_vote_insert_maps_to_conflict() {
        let err = map_insert_error(write_error(DUPLICATE_KEY));
        assert!(matches!(err, Error::Status(status, _) if status == Status::Conflict));
    }

    #[test]
    fn other_insert_failures_stay_store_errors() {
        let err = map_insert_error(write_error(121));
        assert!(matches!(err, Error::Db(_)));
    }
}
