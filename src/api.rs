use rocket::Route;

mod admin;
mod auth;
mod common;
mod public;
mod voter;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(auth::routes());
    routes.extend(public::routes());
    routes.extend(voter::routes());
    routes.extend(admin::routes());
    routes
}
