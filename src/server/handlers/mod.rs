//! HTTP handlers for the server.

pub mod bind;
pub mod compose;
pub mod slots;
pub mod status;
