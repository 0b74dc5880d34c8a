//! User services.

pub mod service;

pub use service::{Profile, UserService};
