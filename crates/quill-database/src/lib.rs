//! # quill-database
//!
//! PostgreSQL access for Quill: pool construction, migrations, and the
//! repository layer. Repositories are the only place SQL lives; services
//! never touch the pool directly.

pub mod connection;
pub mod migration;
pub mod repositories;
