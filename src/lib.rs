#[macro_use]
extern crate rocket;

#[macro_use]
extern crate log;

use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::Config;

use model::api::events::TallyEvent;

/// Capacity of the tally-change broadcast channel. Slow subscribers that lag
/// behind by more than this many events will skip ahead.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Construct the rocket instance: all routes mounted, fairings attached, and
/// the tally-change broadcast channel in managed state.
pub fn build() -> Rocket<Build> {
    let (events, _) = rocket::tokio::sync::broadcast::channel::<TallyEvent>(EVENT_CHANNEL_CAPACITY);
    rocket::build()
        .mount("/", api::routes())
        .attach(config::ConfigFairing)
        .attach(config::DatabaseFairing)
        .attach(logging::LoggerFairing)
        .manage(events)
}
