use mongodb::{bson::doc, options::FindOptions};
use rocket::{
    futures::TryStreamExt,
    response::stream::{Event, EventStream},
    serde::json::Json,
    tokio::select,
    tokio::sync::broadcast::{error::RecvError, Sender},
    Route, Shutdown, State,
};

use crate::error::Result;
use crate::model::{
    api::{
        candidate::CandidateDesc, election::ElectionDesc, events::TallyEvent,
        results::ElectionResults,
    },
    db::{candidate::Candidate, election::Election},
    mongodb::Coll,
};

use super::common::current_election;

pub fn routes() -> Vec<Route> {
    routes![get_candidates, get_election, get_results, results_events]
}

/// Fetch all candidates, ordered by name.
async fn candidates_by_name(candidates: &Coll<Candidate>) -> Result<Vec<Candidate>> {
    let options = FindOptions::builder().sort(doc! {"name": 1}).build();
    let candidates = candidates.find(None, options).await?.try_collect().await?;
    Ok(candidates)
}

#[get("/candidates")]
async fn get_candidates(candidates: Coll<Candidate>) -> Result<Json<Vec<CandidateDesc>>> {
    let candidates = candidates_by_name(&candidates)
        .await?
        .into_iter()
        .map(CandidateDesc::from)
        .collect();
    Ok(Json(candidates))
}

#[get("/election")]
async fn get_election(elections: Coll<Election>) -> Result<Json<ElectionDesc>> {
    let election = current_election(&elections).await?;
    Ok(Json(election.into()))
}

/// The live tally, recomputed from the current counters on every read.
#[get("/results")]
async fn get_results(candidates: Coll<Candidate>) -> Result<Json<ElectionResults>> {
    let candidates = candidates_by_name(&candidates).await?;
    Ok(Json(ElectionResults::compute(candidates)))
}

/// Server-sent stream of tally-change notifications. Clients re-fetch
/// `/results` whenever an event arrives; a lagged subscriber just skips
/// ahead, since events carry no state of their own.
#[get("/results/events")]
fn results_events(events: &State<Sender<TallyEvent>>, mut end: Shutdown) -> EventStream![] {
    let mut rx = events.subscribe();
    EventStream! {
        loop {
            let event = select! {
                event = rx.recv() => match event {
                    Ok(event) => event,
                    Err(RecvError::Closed) => break,
                    Err(RecvError::Lagged(_)) => continue,
                },
                _ = &mut end => break,
            };
            yield Event::json(&event);
        }
    }
}
