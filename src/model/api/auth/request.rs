use serde::{Deserialize, Serialize};

/// Student registration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSignup {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Student login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentCredentials {
    pub email: String,
    pub password: String,
}

/// Admin login request. Same shape as the student one, but checked against
/// the admin collection and granted admin rights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}
