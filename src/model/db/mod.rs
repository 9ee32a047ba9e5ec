//! DB-compatible (e.g. de/serialisable) types.
//!
//! The types in this module are serialised in a DB-friendly way, e.g. IDs and
//! datetimes are serialised in MongoDB's own format.

pub mod admin;
pub mod candidate;
pub mod election;
pub mod student;
pub mod vote;

pub use admin::{Admin, NewAdmin};
pub use candidate::{Candidate, NewCandidate};
pub use election::{Election, NewElection};
pub use student::{NewStudent, Student};
pub use vote::{NewVote, Vote};

use crate::error::Result;

/// Hash a password into an encoded argon2 string with a random salt.
pub(crate) fn hash_password(password: &str) -> Result<String> {
    let salt: [u8; 16] = rand::random();
    let hash = argon2::hash_encoded(password.as_bytes(), &salt, &argon2::Config::default())?;
    Ok(hash)
}
