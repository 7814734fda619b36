//! Request extractors that reject with the crate's error type.

mod contact_id;
mod json;

pub use contact_id::ContactId;
pub use json::ValidJson;
