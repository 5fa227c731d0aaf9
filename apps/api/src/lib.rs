//! Job-application portal: the submission pipeline behind `POST /application/`,
//! its read endpoints, and the client-side form and HTTP client that feed it.

pub mod application;
pub mod auth;
pub mod catalogue;
pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod form;
pub mod language;
pub mod models;
pub mod persistence;
pub mod response;
pub mod routes;
pub mod state;
#[cfg(test)]
pub mod test_support;
pub mod validation;
