use mongodb::bson::{doc, to_bson};
use rocket::{
    http::Status, serde::json::Json, tokio::sync::broadcast::Sender, Route, State,
};

use crate::error::{Error, Result};
use crate::model::{
    api::{
        admin::{AdminStats, ResetReport},
        auth::AuthToken,
        candidate::{CandidateDesc, CandidateProfile},
        events::TallyEvent,
    },
    db::{
        admin::Admin,
        candidate::{Candidate, NewCandidate},
        election::Election,
        student::Student,
        vote::Vote,
    },
    mongodb::{Coll, Id},
};

use super::common::current_election;

pub fn routes() -> Vec<Route> {
    routes![
        get_stats,
        create_candidate,
        update_candidate,
        delete_candidate,
        toggle_election,
        reset_votes,
    ]
}

/// Dashboard counts for the admin overview.
#[get("/admin/stats")]
async fn get_stats(
    _token: AuthToken<Admin>,
    candidates: Coll<Candidate>,
    students: Coll<Student>,
    votes: Coll<Vote>,
    elections: Coll<Election>,
) -> Result<Json<AdminStats>> {
    let election = current_election(&elections).await?;
    Ok(Json(AdminStats {
        candidates: candidates.count_documents(None, None).await?,
        students: students.count_documents(None, None).await?,
        votes_cast: votes.count_documents(None, None).await?,
        election_active: election.is_active,
    }))
}

/// Add a candidate. The vote counter always starts at zero.
#[post("/admin/candidates", data = "<profile>", format = "json")]
async fn create_candidate(
    _token: AuthToken<Admin>,
    profile: Json<CandidateProfile>,
    new_candidates: Coll<NewCandidate>,
    candidates: Coll<Candidate>,
    events: &State<Sender<TallyEvent>>,
) -> Result<Json<CandidateDesc>> {
    let new_id: Id = new_candidates
        .insert_one(NewCandidate::from(profile.0), None)
        .await?
        .inserted_id
        .as_object_id()
        .unwrap() // Safe because the ID comes directly from the database.
        .into();
    let candidate = candidates.find_one(new_id.as_doc(), None).await?.unwrap();

    let _ = events.send(TallyEvent::CandidatesChanged);

    Ok(Json(candidate.into()))
}

/// Update a candidate's profile. The vote counter is not client-writable.
#[put("/admin/candidates/<candidate_id>", data = "<profile>", format = "json")]
async fn update_candidate(
    _token: AuthToken<Admin>,
    candidate_id: Id,
    profile: Json<CandidateProfile>,
    candidates: Coll<Candidate>,
    events: &State<Sender<TallyEvent>>,
) -> Result<()> {
    let profile = profile.0;
    let update = doc! {
        "$set": {
            "name": &profile.name,
            "position": &profile.position,
            "department": &profile.department,
            "year": &profile.year,
            "manifesto": &profile.manifesto,
            "image_url": to_bson(&profile.image_url)?,
        },
    };

    let result = candidates
        .update_one(candidate_id.as_doc(), update, None)
        .await?;
    if result.matched_count == 0 {
        return Err(Error::not_found(format!(
            "Candidate with ID {}",
            candidate_id
        )));
    }

    let _ = events.send(TallyEvent::CandidatesChanged);

    Ok(())
}

/// Delete a candidate. The client asks the admin for confirmation before
/// calling this; the endpoint itself is a plain delete.
#[delete("/admin/candidates/<candidate_id>")]
async fn delete_candidate(
    _token: AuthToken<Admin>,
    candidate_id: Id,
    candidates: Coll<Candidate>,
    events: &State<Sender<TallyEvent>>,
) -> Result<()> {
    let result = candidates.delete_one(candidate_id.as_doc(), None).await?;
    if result.deleted_count == 0 {
        return Err(Error::not_found(format!(
            "Candidate with ID {}",
            candidate_id
        )));
    }

    let _ = events.send(TallyEvent::CandidatesChanged);

    Ok(())
}

/// Flip the election's active flag and return the new value.
/// Last-write-wins; no transition history is kept.
#[post("/admin/election/toggle")]
async fn toggle_election(
    _token: AuthToken<Admin>,
    elections: Coll<Election>,
) -> Result<Json<bool>> {
    let election = current_election(&elections).await?;
    let new_state = !election.is_active;

    let update = doc! {
        "$set": { "is_active": new_state },
    };
    elections
        .update_one(election.id.as_doc(), update, None)
        .await?;

    info!(
        "Election \"{}\" is now {}",
        election.title,
        if new_state { "active" } else { "inactive" }
    );
    Ok(Json(new_state))
}

/// Global vote reset: delete all votes, zero every candidate counter, clear
/// every participation flag.
///
/// Three independent mutations with no atomicity across them. A failed step
/// is logged and reported by name; completed steps are not rolled back, and
/// nothing is retried. Re-running the reset after a partial failure is the
/// recovery path.
#[post("/admin/reset")]
async fn reset_votes(
    _token: AuthToken<Admin>,
    votes: Coll<Vote>,
    candidates: Coll<Candidate>,
    students: Coll<Student>,
    events: &State<Sender<TallyEvent>>,
) -> Result<Json<ResetReport>> {
    let mut report = ResetReport {
        votes_deleted: 0,
        candidates_reset: 0,
        students_reset: 0,
    };
    let mut failed_steps = Vec::new();

    match votes.delete_many(doc! {}, None).await {
        Ok(result) => report.votes_deleted = result.deleted_count,
        Err(err) => {
            error!("Vote reset: failed to delete votes: {err}");
            failed_steps.push("delete votes");
        }
    }

    let zero_counters = doc! {
        "$set": { "votes": 0 },
    };
    match candidates.update_many(doc! {}, zero_counters, None).await {
        Ok(result) => report.candidates_reset = result.modified_count,
        Err(err) => {
            error!("Vote reset: failed to zero candidate counters: {err}");
            failed_steps.push("zero candidate counters");
        }
    }

    let clear_flags = doc! {
        "$set": { "has_voted": false },
    };
    match students.update_many(doc! {}, clear_flags, None).await {
        Ok(result) => report.students_reset = result.modified_count,
        Err(err) => {
            error!("Vote reset: failed to clear participation flags: {err}");
            failed_steps.push("clear participation flags");
        }
    }

    if failed_steps.is_empty() {
        info!(
            "Vote reset complete: {} votes deleted, {} candidates zeroed, {} flags cleared",
            report.votes_deleted, report.candidates_reset, report.students_reset
        );
    }

    // Subscribers only need to refetch if the store actually changed.
    if reset_touched_store(&failed_steps) {
        let _ = events.send(TallyEvent::VotesReset);
    }

    reset_response(report, failed_steps).map(Json)
}

/// Number of independent mutations in a reset.
const RESET_STEPS: usize = 3;

/// Whether any reset step changed the store.
fn reset_touched_store(failed_steps: &[&str]) -> bool {
    failed_steps.len() < RESET_STEPS
}

/// Shape the reset response: the report on full success, otherwise a 500
/// naming the failed steps so the admin knows what a re-run must repair.
fn reset_response(report: ResetReport, failed_steps: Vec<&'static str>) -> Result<ResetReport> {
    if failed_steps.is_empty() {
        Ok(report)
    } else {
        Err(Error::Status(
            Status::InternalServerError,
            format!(
                "Vote reset incomplete; failed steps: {}",
                failed_steps.join(", ")
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ResetReport {
        ResetReport {
            votes_deleted: 12,
            candidates_reset: 3,
            students_reset: 12,
        }
    }

    #[test]
    fn full_reset_passes_the_counts_through() {
        let result = reset_response(report(), Vec::new()).unwrap();
        assert_eq!(report(), result);
    }

    #[test]
    fn partial_reset_is_an_error_naming_the_failed_steps() {
        let err = reset_response(report(), vec!["zero candidate counters"]).unwrap_err();
        match err {
            Error::Status(status, message) => {
                assert_eq!(Status::InternalServerError, status);
                assert!(message.contains("zero candidate counters"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn partial_reset_still_notifies_subscribers() {
        assert!(reset_touched_store(&[]));
        assert!(reset_touched_store(&["delete votes"]));
    }

    #[test]
    fn fully_failed_reset_stays_silent() {
        assert!(!reset_touched_store(&[
            "delete votes",
            "zero candidate counters",
            "clear participation flags",
        ]));
    }
}
