use chrono::Duration;
use mongodb::Client as MongoClient;
use rocket::futures::TryFutureExt;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::{
    db::{admin::ensure_admin_exists, election::ensure_election_exists},
    mongodb::{ensure_indexes_exist, Coll},
};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Deserialize)]
pub struct Config {
    // non-secrets
    auth_ttl: u32,
    election_title: String,
    admin_name: String,
    admin_email: String,
    // secrets
    jwt_secret: String,
    admin_password: String,
}

impl Config {
    /// Valid lifetime of auth token cookies in seconds.
    pub fn auth_ttl(&self) -> Duration {
        Duration::seconds(self.auth_ttl.into())
    }

    /// Title of the seeded election.
    pub fn election_title(&self) -> &str {
        &self.election_title
    }

    /// Display name of the bootstrap admin.
    pub fn admin_name(&self) -> &str {
        &self.admin_name
    }

    /// Email of the bootstrap admin.
    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }

    /// Password of the bootstrap admin; only used when seeding an empty
    /// admin collection.
    pub fn admin_password(&self) -> &str {
        &self.admin_password
    }

    /// Secret key used to sign JWTs.
    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

/// A fairing that loads the application config and puts it in managed state.
/// This could easily be achieved using `AdHoc::config`, but is written out
/// explicitly for symmetry with the other fairings and control over error
/// messages.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Configuration for the database.
#[derive(Deserialize)]
struct DbConfig {
    // secrets
    db_uri: String,
}

/// A fairing that loads the MongoDB config, connects to the database,
/// performs any setup necessary, and places both a `Client` and a `Database`
/// into managed state.
pub struct DatabaseFairing;

#[rocket::async_trait]
impl Fairing for DatabaseFairing {
    fn info(&self) -> Info {
        Info {
            name: "MongoDB",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // The application config is needed for the bootstrap admin; the
        // `ConfigFairing` has already validated it.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(_) => return Err(rocket),
        };

        // Load the database config.
        let db_config = match rocket.figment().extract::<DbConfig>() {
            Ok(db_config) => db_config,
            Err(e) => {
                error!("Failed to load database config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        info!("Loaded database config, connecting...");

        // Construct the connection.
        let client = match MongoClient::with_uri_str(db_config.db_uri).await {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to connect to database: {e}");
                return Err(rocket);
            }
        };
        let db = client.database(&get_database_name());

        // Ensure the required indexes exist.
        if let Err(e) = ensure_indexes_exist(&db).await {
            error!("Failed to create database indexes: {e}");
            return Err(rocket);
        }

        // Ensure there is at least one admin user and the election document
        // exists.
        let admins = Coll::from_db(&db);
        let elections = Coll::from_db(&db);
        if let Err(e) = ensure_admin_exists(&admins, &config)
            .and_then(|_| ensure_election_exists(&elections, &config))
            .await
        {
            error!("Failed to bootstrap database contents: {e}");
            return Err(rocket);
        }
        info!("...database connection online!");

        // Manage the state.
        rocket = rocket.manage(client).manage(db);
        Ok(rocket)
    }
}

/// Get the name of the database to use (production version).
#[cfg(not(test))]
fn get_database_name() -> String {
    "council".to_string()
}

/// Get the name of the database to use (test version).
/// Use a random name to avoid collisions between tests.
#[cfg(test)]
fn get_database_name() -> String {
    let random: u32 = rand::random();
    let db = format!("test{random}");
    info!("Using database {db}");
    db
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Config {
        pub fn example() -> Self {
            Self {
                auth_ttl: 3600,
                election_title: "Student Council Election".to_string(),
                admin_name: "Election Officer".to_string(),
                admin_email: "officer@example.edu".to_string(),
                jwt_secret: "league of extraordinary electors".to_string(),
                admin_password: "correct horse battery staple".to_string(),
            }
        }
    }
}
