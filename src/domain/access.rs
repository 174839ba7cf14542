//! Authorization decisions for every privileged operation.
//!
//! Role checks go through a capability table instead of comparing role
//! strings in handlers. Ownership is checked separately from role: a
//! `User` may only touch loan applications it owns, staff bypass the
//! ownership check for reads, and status writes are never owner-scoped.

use serde::Serialize;
use thiserror::Error;

use super::role::Role;

/// The authenticated principal making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Caller {
    pub user_id: i32,
    pub role: Role,
}

impl Caller {
    #[must_use]
    pub const fn new(user_id: i32, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// Operations that require more than a valid session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    SubmitLoan,
    ViewOwnLoans,
    ViewAllLoans,
    ChangeLoanStatus,
    ListUsers,
    ChangeUserRole,
    UpdateSettings,
    ViewMetrics,
}

impl Capability {
    #[must_use]
    pub fn permits(self, role: Role) -> bool {
        role.at_least(self.minimum_role())
    }

    /// Least privileged role holding this capability.
    #[must_use]
    pub const fn minimum_role(self) -> Role {
        match self {
            Self::SubmitLoan | Self::ViewOwnLoans => Role::User,
            Self::ViewAllLoans | Self::ChangeLoanStatus | Self::ListUsers | Self::ViewMetrics => {
                Role::Admin
            }
            Self::ChangeUserRole | Self::UpdateSettings => Role::SuperAdmin,
        }
    }

    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::SubmitLoan => "submit loan applications",
            Self::ViewOwnLoans => "view loan applications",
            Self::ViewAllLoans => "view all loan applications",
            Self::ChangeLoanStatus => "change loan status",
            Self::ListUsers => "list users",
            Self::ChangeUserRole => "change user roles",
            Self::UpdateSettings => "update settings",
            Self::ViewMetrics => "view metrics",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("Not authorized to {action} (requires {required})")]
    MissingRole {
        action: &'static str,
        required: Role,
    },

    #[error("Not authorized to access this loan application")]
    NotOwner,
}

/// Allow the call if the caller's role is at least the capability's minimum.
pub fn authorize(caller: &Caller, capability: Capability) -> Result<(), AccessDenied> {
    let required = capability.minimum_role();
    if capability.permits(caller.role) {
        Ok(())
    } else {
        tracing::debug!(
            user_id = caller.user_id,
            role = %caller.role,
            action = capability.describe(),
            "Access denied"
        );
        Err(AccessDenied::MissingRole {
            action: capability.describe(),
            required,
        })
    }
}

/// Read access to a single loan application.
pub fn authorize_loan_read(caller: &Caller, owner_id: i32) -> Result<(), AccessDenied> {
    if Capability::ViewAllLoans.permits(caller.role) || caller.user_id == owner_id {
        Ok(())
    } else {
        Err(AccessDenied::NotOwner)
    }
}

/// Owner filter to force onto a listing. `None` means the caller sees all.
///
/// A `User` is always pinned to itself whatever filter it asked for; staff
/// keep the filter they requested.
#[must_use]
pub fn loan_list_scope(caller: &Caller, requested_owner: Option<i32>) -> Option<i32> {
    if Capability::ViewAllLoans.permits(caller.role) {
        requested_owner
    } else {
        Some(caller.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: Caller = Caller::new(1, Role::User);
    const ADMIN: Caller = Caller::new(2, Role::Admin);
    const SUPER: Caller = Caller::new(3, Role::SuperAdmin);

    #[test]
    fn test_role_change_is_super_admin_only() {
        assert!(authorize(&USER, Capability::ChangeUserRole).is_err());
        assert!(authorize(&ADMIN, Capability::ChangeUserRole).is_err());
        assert!(authorize(&SUPER, Capability::ChangeUserRole).is_ok());
    }

    #[test]
    fn test_settings_are_super_admin_only() {
        assert!(authorize(&ADMIN, Capability::UpdateSettings).is_err());
        assert!(authorize(&SUPER, Capability::UpdateSettings).is_ok());
    }

    #[test]
    fn test_staff_capabilities() {
        for cap in [
            Capability::ViewAllLoans,
            Capability::ChangeLoanStatus,
            Capability::ListUsers,
        ] {
            assert!(authorize(&USER, cap).is_err());
            assert!(authorize(&ADMIN, cap).is_ok());
            assert!(authorize(&SUPER, cap).is_ok());
        }
        assert!(authorize(&USER, Capability::SubmitLoan).is_ok());
    }

    #[test]
    fn test_denial_names_required_role() {
        let err = authorize(&ADMIN, Capability::UpdateSettings).unwrap_err();
        assert_eq!(
            err,
            AccessDenied::MissingRole {
                action: "update settings",
                required: Role::SuperAdmin,
            }
        );
        assert!(err.to_string().starts_with("Not authorized"));
    }

    #[test]
    fn test_loan_read_ownership() {
        assert!(authorize_loan_read(&USER, 1).is_ok());
        assert_eq!(authorize_loan_read(&USER, 9), Err(AccessDenied::NotOwner));
        assert!(authorize_loan_read(&ADMIN, 9).is_ok());
        assert!(authorize_loan_read(&SUPER, 9).is_ok());
    }

    #[test]
    fn test_list_scope() {
        assert_eq!(loan_list_scope(&USER, None), Some(1));
        assert_eq!(loan_list_scope(&USER, Some(9)), Some(1));
        assert_eq!(loan_list_scope(&ADMIN, None), None);
        assert_eq!(loan_list_scope(&ADMIN, Some(9)), Some(9));
        assert_eq!(loan_list_scope(&SUPER, Some(9)), Some(9));
    }

    #[test]
    fn test_loan_visibility_follows_view_all_capability() {
        for caller in [USER, ADMIN, SUPER] {
            let sees_all = Capability::ViewAllLoans.permits(caller.role);
            assert_eq!(loan_list_scope(&caller, None).is_none(), sees_all);
            assert_eq!(authorize_loan_read(&caller, 99).is_ok(), sees_all);
        }
    }
}
