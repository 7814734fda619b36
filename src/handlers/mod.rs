//! HTTP handlers for contacts and the health check.

pub mod contacts;
pub mod health;
