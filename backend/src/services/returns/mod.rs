//! Store-return submissions.
//!
//! The provided route is:
//! - `POST /api/returns/submit`: accepts a JSON `Submission`, validates it
//!   again on the server, writes the return and damage CSV files under the
//!   export directory and runs the enabled upload adapters. The body of every
//!   answer is a `SubmitResponse`: `200` when the files were written, `422`
//!   with the full error list when validation failed, `500` when the files
//!   could not be stored.

use actix_web::web::{post, scope};
use actix_web::Scope;

mod submit;

const API_PATH: &str = "/api/returns";

/// Configures and returns the Actix scope for store-return routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/submit", post().to(submit::process))
}
