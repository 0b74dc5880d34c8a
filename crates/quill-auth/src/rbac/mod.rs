//! Role-based authorization.

pub mod gate;

pub use gate::RoleGate;
