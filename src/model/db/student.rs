use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::{error::Result, model::mongodb::Id};

use super::hash_password;

/// Core student user data, as stored in the database.
///
/// `has_voted` is a denormalised participation flag used to gate the vote
/// button in the UI. The authoritative one-vote-per-student guarantee is the
/// unique index on the vote collection, not this flag.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentCore {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub has_voted: bool,
}

impl StudentCore {
    /// Create a new student who has not yet voted, hashing the given password.
    pub fn new(name: String, email: String, password: &str) -> Result<Self> {
        Ok(Self {
            name,
            email,
            password_hash: hash_password(password)?,
            has_voted: false,
        })
    }

    /// Check whether the given password is correct.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> bool {
        // Unwrap safe because the only way to create a StudentCore is via
        // `StudentCore::new`, so the hash is always well-formed.
        argon2::verify_encoded(&self.password_hash, password.as_ref()).unwrap()
    }
}

/// A student without an ID.
pub type NewStudent = StudentCore;

/// A student user from the database, with its unique ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub student: StudentCore,
}

impl Deref for Student {
    type Target = StudentCore;

    fn deref(&self) -> &Self::Target {
        &self.student
    }
}

impl DerefMut for Student {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.student
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl StudentCore {
        pub fn example() -> Self {
            Self::new(
                "Jordan Okafor".to_string(),
                "jokafor@example.edu".to_string(),
                "hunter2hunter2",
            )
            .unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_student_has_not_voted() {
        let student = StudentCore::example();
        assert!(!student.has_voted);
    }

    #[test]
    fn verify_password() {
        let student = StudentCore::example();
        assert!(student.verify_password("hunter2hunter2"));
        assert!(!student.verify_password("hunter3hunter3"));
    }
}
