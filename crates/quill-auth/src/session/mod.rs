//! Session lifecycle.

pub mod manager;

pub use manager::{Resolution, SessionManager};
