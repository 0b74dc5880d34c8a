//! Ordered role checks.

use quill_core::error::AppError;
use quill_entity::user::UserRole;

/// Role-based capability checks over the ordered role enum.
///
/// Roles order `user < moderator < admin`, so "at least moderator" is a
/// single comparison. Authorization failures state which privilege was
/// required; authentication failures never explain themselves, but by
/// the time a gate runs the caller is already authenticated.
#[derive(Debug, Clone, Default)]
pub struct RoleGate;

impl RoleGate {
    /// Creates a new role gate.
    pub fn new() -> Self {
        Self
    }

    /// Require that `role` is at least `minimum`.
    pub fn require_at_least(&self, role: UserRole, minimum: UserRole) -> Result<(), AppError> {
        if role.has_at_least(&minimum) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "{minimum} privileges required"
            )))
        }
    }

    /// Require moderator or above.
    pub fn require_moderator(&self, role: UserRole) -> Result<(), AppError> {
        self.require_at_least(role, UserRole::Moderator)
    }

    /// Require admin.
    pub fn require_admin(&self, role: UserRole) -> Result<(), AppError> {
        self.require_at_least(role, UserRole::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::error::ErrorKind;

    #[test]
    fn test_moderator_gate_admits_moderator_and_admin() {
        let gate = RoleGate::new();
        assert!(gate.require_moderator(UserRole::Moderator).is_ok());
        assert!(gate.require_moderator(UserRole::Admin).is_ok());

        let err = gate.require_moderator(UserRole::User).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert!(err.message.contains("moderator"));
    }

    #[test]
    fn test_admin_gate_rejects_moderator() {
        let gate = RoleGate::new();
        assert!(gate.require_admin(UserRole::Admin).is_ok());
        assert!(gate.require_admin(UserRole::Moderator).is_err());
        assert!(gate.require_admin(UserRole::User).is_err());
    }
}
