//! Tag services.

pub mod service;

pub use service::TagService;
