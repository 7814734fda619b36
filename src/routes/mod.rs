//! Route tables.

pub mod common;
pub mod contacts;

pub use common::common_routes;
pub use contacts::contacts_router;
