//! Types and rules shared by the store-return server and the browser form.
//!
//! Both sides compile this crate, so a submission rejected by the form is
//! rejected by the server for exactly the same reasons.

pub mod model;
pub mod requests;
pub mod validation;
