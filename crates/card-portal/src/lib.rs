//! Client library for the credit-card application portal: the application
//! wizard, field validation and display formatting, the HTTP API client, the
//! signed-in session with its route guard, and admin review helpers.

pub mod admin;
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod format;
pub mod notify;
pub mod session;
pub mod telemetry;
pub mod validation;
pub mod wizard;
