use mongodb::bson::doc;
use rocket::{
    http::{Cookie, CookieJar, Status},
    serde::json::Json,
    Route, State,
};

use crate::{
    error::{Error, Result},
    model::{
        api::auth::{
            AdminCredentials, AuthToken, StudentCredentials, StudentSignup, AUTH_TOKEN_COOKIE,
        },
        db::{
            admin::Admin,
            student::{NewStudent, Student},
        },
        mongodb::{is_duplicate_key_error, Coll, Id},
    },
    Config,
};

pub fn routes() -> Vec<Route> {
    routes![signup, login, authenticate_admin, logout]
}

/// Register a new student and sign them in.
#[post("/auth/signup", data = "<signup>", format = "json")]
async fn signup(
    cookies: &CookieJar<'_>,
    signup: Json<StudentSignup>,
    students: Coll<Student>,
    new_students: Coll<NewStudent>,
    config: &State<Config>,
) -> Result<()> {
    let signup = signup.0;
    if signup.email.trim().is_empty() || signup.password.is_empty() {
        return Err(Error::Status(
            Status::BadRequest,
            "Email and password must not be empty".to_string(),
        ));
    }

    let student = NewStudent::new(signup.name, signup.email, &signup.password)?;

    // The unique email index makes the insert itself the duplicate check;
    // a racing signup for the same address loses cleanly.
    let new_id: Id = match new_students.insert_one(&student, None).await {
        Ok(result) => result
            .inserted_id
            .as_object_id()
            .unwrap() // Safe because the ID comes directly from the database.
            .into(),
        Err(err) if is_duplicate_key_error(&err) => {
            return Err(Error::Status(
                Status::BadRequest,
                format!("Email already registered: {}", student.email),
            ));
        }
        Err(err) => return Err(err.into()),
    };
    let db_student = students.find_one(new_id.as_doc(), None).await?.unwrap();

    let token = AuthToken::new(&db_student);
    cookies.add(token.into_cookie(config));

    Ok(())
}

/// Sign in an existing student.
#[post("/auth/login", data = "<credentials>", format = "json")]
async fn login(
    cookies: &CookieJar<'_>,
    credentials: Json<StudentCredentials>,
    students: Coll<Student>,
    config: &State<Config>,
) -> Result<()> {
    let with_email = doc! {
        "email": &credentials.email,
    };

    let student = students
        .find_one(with_email, None)
        .await?
        .filter(|student| student.verify_password(&credentials.password))
        .ok_or_else(|| {
            Error::unauthorized("No student found with the provided email and password combination")
        })?;

    let token = AuthToken::new(&student);
    cookies.add(token.into_cookie(config));

    Ok(())
}

/// Sign in an admin. Same capability shape as the student login, but checked
/// against the admin collection and granted admin rights.
#[post("/auth/admin", data = "<credentials>", format = "json")]
async fn authenticate_admin(
    cookies: &CookieJar<'_>,
    credentials: Json<AdminCredentials>,
    admins: Coll<Admin>,
    config: &State<Config>,
) -> Result<()> {
    let with_email = doc! {
        "email": &credentials.email,
    };

    let admin = admins
        .find_one(with_email, None)
        .await?
        .filter(|admin| admin.verify_password(&credentials.password))
        .ok_or_else(|| {
            Error::unauthorized("No admin found with the provided email and password combination")
        })?;

    let token = AuthToken::new(&admin);
    cookies.add(token.into_cookie(config));

    Ok(())
}

/// Sign out: session teardown is simply dropping the cookie.
#[delete("/auth")]
fn logout(cookies: &CookieJar) -> Status {
    cookies.remove(Cookie::named(AUTH_TOKEN_COOKIE));
    Status::Ok
}
