//! HTTP server for upload analysis.

pub mod app;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod state;
