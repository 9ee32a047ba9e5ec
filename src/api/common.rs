use crate::error::{Error, Result};
use crate::model::{
    api::auth::AuthToken,
    db::{election::Election, student::Student},
    mongodb::Coll,
};

/// Resolve the current election: the single (first) election document.
pub async fn current_election(elections: &Coll<Election>) -> Result<Election> {
    elections
        .find_one(None, None)
        .await?
        .ok_or(Error::NoActiveElection)
}

/// Return a Student from the database via looking up their token ID.
///
/// Always a fresh read; eligibility decisions must never come from a stale
/// copy of the participation flag.
pub async fn student_by_token(
    token: &AuthToken<Student>,
    students: &Coll<Student>,
) -> Result<Student> {
    students
        .find_one(token.id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Student with ID {}", token.id)))
}
