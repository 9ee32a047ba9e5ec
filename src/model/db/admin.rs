use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    model::mongodb::{Coll, Id},
    Config,
};

use super::hash_password;

/// Core admin user data. Admins are a privileged principal distinct from
/// students; their credentials live in their own collection but are checked
/// the same way (argon2 hash comparison), never by plaintext equality.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCore {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl AdminCore {
    /// Create a new admin, hashing the given password.
    pub fn new(name: String, email: String, password: &str) -> Result<Self> {
        Ok(Self {
            name,
            email,
            password_hash: hash_password(password)?,
        })
    }

    /// Check whether the given password is correct.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> bool {
        // Unwrap safe because the only way to create an AdminCore is via
        // `AdminCore::new`, so the hash is always well-formed.
        argon2::verify_encoded(&self.password_hash, password.as_ref()).unwrap()
    }
}

/// An admin without an ID.
pub type NewAdmin = AdminCore;

/// An admin user from the database, with its unique ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct Admin {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub admin: AdminCore,
}

impl Deref for Admin {
    type Target = AdminCore;

    fn deref(&self) -> &Self::Target {
        &self.admin
    }
}

impl DerefMut for Admin {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.admin
    }
}

/// Seed the bootstrap admin from the config if no admin exists yet.
pub async fn ensure_admin_exists(admins: &Coll<NewAdmin>, config: &Config) -> Result<()> {
    let count = admins.count_documents(None, None).await?;
    if count == 0 {
        let admin = NewAdmin::new(
            config.admin_name().to_string(),
            config.admin_email().to_string(),
            config.admin_password(),
        )?;
        admins.insert_one(admin, None).await?;
        info!("Created bootstrap admin {}", config.admin_email());
    }
    Ok(())
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl AdminCore {
        pub fn example() -> Self {
            Self::new(
                "Election Officer".to_string(),
                "officer@example.edu".to_string(),
                "correct horse battery staple",
            )
            .unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_correct_password() {
        let admin = AdminCore::example();
        assert!(admin.verify_password("correct horse battery staple"));
    }

    #[test]
    fn reject_wrong_password() {
        let admin = AdminCore::example();
        assert!(!admin.verify_password("incorrect horse battery staple"));
        assert!(!admin.verify_password(""));
    }

    #[test]
    fn hashes_are_salted() {
        let first = AdminCore::example();
        let second = AdminCore::example();
        assert_ne!(first.password_hash, second.password_hash);
    }
}
