use serde::{Deserialize, Serialize};

use crate::model::db::election::Election;

/// API-friendly representation of the current election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionDesc {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl From<Election> for ElectionDesc {
    fn from(election: Election) -> Self {
        Self {
            id: election.id.to_string(),
            title: election.election.title,
            description: election.election.description,
            is_active: election.election.is_active,
        }
    }
}
