use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    model::mongodb::{Coll, Id},
    Config,
};

/// Core election data. A single document acts as the current election; its
/// `is_active` flag gates vote casting. The title and description are purely
/// informational.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionCore {
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
}

/// An election without an ID.
pub type NewElection = ElectionCore;

/// An election from the database, with its unique ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct Election {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub election: ElectionCore,
}

impl Deref for Election {
    type Target = ElectionCore;

    fn deref(&self) -> &Self::Target {
        &self.election
    }
}

impl DerefMut for Election {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.election
    }
}

/// Seed the single election document if none exists yet. The election starts
/// inactive; an admin opens it explicitly.
pub async fn ensure_election_exists(elections: &Coll<NewElection>, config: &Config) -> Result<()> {
    let count = elections.count_documents(None, None).await?;
    if count == 0 {
        let election = NewElection {
            title: config.election_title().to_string(),
            description: None,
            is_active: false,
        };
        elections.insert_one(election, None).await?;
        info!("Created election document \"{}\"", config.election_title());
    }
    Ok(())
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Election {
        pub fn example(is_active: bool) -> Self {
            Self {
                id: Id::new(),
                election: ElectionCore {
                    title: "Student Council Election".to_string(),
                    description: None,
                    is_active,
                },
            }
        }
    }
}
