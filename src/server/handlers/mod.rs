//! HTTP handlers for the server.

pub mod preview;
pub mod submit;
