//! Account role name constants.
//!
//! Each role corresponds to its own account table; the role name travels in
//! JWT claims and in the `account_role` column of `user_sessions` and
//! `payments`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_FUNERAL_HOME: &str = "funeral_home";
pub const ROLE_FAMILY_USER: &str = "family_user";

/// All known account roles.
pub const ALL_ROLES: [&str; 3] = [ROLE_ADMIN, ROLE_FUNERAL_HOME, ROLE_FAMILY_USER];

/// Returns `true` if `role` is one of [`ALL_ROLES`].
pub fn is_known_role(role: &str) -> bool {
    ALL_ROLES.contains(&role)
}
