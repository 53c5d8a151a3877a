//! Role-based permission derivation. Pure lookups, no I/O.

use std::collections::BTreeSet;

use crate::auth::Role;

const ADMIN_PERMISSIONS: &[&str] = &[
    "manage_users",
    "manage_vehicles",
    "manage_drivers",
    "manage_trips",
    "manage_fuel",
    "manage_maintenance",
    "manage_alerts",
    "view_reports",
    "system_settings",
];

const USER_PERMISSIONS: &[&str] = &[
    "view_vehicles",
    "view_drivers",
    "manage_trips",
    "log_fuel",
    "view_maintenance",
    "view_alerts",
];

const WAREHOUSE_PERMISSIONS: &[&str] = &[
    "view_vehicles",
    "manage_inventory",
    "manage_maintenance",
    "approve_fuel",
    "view_reports",
];

/// Static role table
pub struct Permissions;

impl Permissions {
    /// The fixed permission list of `role`
    pub fn of(role: Role) -> &'static [&'static str] {
        match role {
            Role::Admin => ADMIN_PERMISSIONS,
            Role::User => USER_PERMISSIONS,
            Role::Warehouse => WAREHOUSE_PERMISSIONS,
        }
    }

    /// Permissions for a raw role string; unknown or absent roles get none
    pub fn for_role(role: Option<&str>) -> PermissionSet {
        let role = role.and_then(|r| r.parse::<Role>().ok());
        PermissionSet {
            role,
            granted: role
                .map(|r| Self::of(r).iter().copied().collect())
                .unwrap_or_default(),
        }
    }
}

/// Permissions derived from one role. Roles do not inherit from each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    role: Option<Role>,
    granted: BTreeSet<&'static str>,
}

impl PermissionSet {
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Exact membership test, no wildcards
    pub fn has_permission(&self, name: &str) -> bool {
        self.granted.contains(name)
    }

    pub fn has_any(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.has_permission(n))
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.granted.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_role_gets_exactly_its_list() {
        for role in [Role::Admin, Role::User, Role::Warehouse] {
            let set = Permissions::for_role(Some(role.as_str()));
            assert_eq!(set.role(), Some(role));
            for permission in Permissions::of(role) {
                assert!(set.has_permission(permission));
            }
            assert_eq!(set.iter().count(), Permissions::of(role).len());
        }
    }

    #[test]
    fn roles_do_not_inherit() {
        let admin = Permissions::for_role(Some("admin"));
        assert!(!admin.has_permission("log_fuel"));
        assert!(!admin.has_permission("manage_inventory"));

        let warehouse = Permissions::for_role(Some("warehouse"));
        assert!(!warehouse.has_permission("manage_users"));
    }

    #[test]
    fn unknown_role_has_nothing() {
        for role in [Some("guest"), Some("Admin"), Some(""), None] {
            let set = Permissions::for_role(role);
            assert!(set.is_empty());
            assert!(set.role().is_none());
            for permission in ADMIN_PERMISSIONS.iter().chain(USER_PERMISSIONS) {
                assert!(!set.has_permission(permission));
            }
            assert!(!set.has_permission("*"));
        }
    }
}
