//! Claims and capability checks
//!
//! [`Capabilities::can`] is the only place role and permission strings are
//! interpreted. Everything else asks it.

use farmdesk_api::CurrentUser;
use farmdesk_core::Resource;

pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
pub const ROLE_SUPER_ADMIN: &str = "ROLE_SUPER_ADMIN";

/// The signed-in user's roles and permissions, trimmed and upper-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Claims {
    pub username: String,
    pub display_name: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

fn normalize(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = values
        .iter()
        .map(|v| v.trim().to_uppercase())
        .filter(|v| !v.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}

impl Claims {
    pub fn new(username: impl Into<String>, roles: &[String], permissions: &[String]) -> Self {
        let username = username.into();
        Self {
            display_name: username.clone(),
            username,
            roles: normalize(roles),
            permissions: normalize(permissions),
        }
    }

    /// No roles or permissions; only unrestricted menu entries are shown.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn has_role(&self, role: &str) -> bool {
        let role = role.trim().to_uppercase();
        self.roles.iter().any(|r| *r == role)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        let permission = permission.trim().to_uppercase();
        self.permissions.iter().any(|p| *p == permission)
    }

    /// Whether any of `roles` is held (case-insensitive).
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|r| self.has_role(r))
    }

    pub fn has_any_permission(&self, permissions: &[&str]) -> bool {
        permissions.iter().any(|p| self.has_permission(p))
    }

    pub fn is_authenticated(&self) -> bool {
        !self.username.is_empty()
    }
}

impl From<&CurrentUser> for Claims {
    fn from(user: &CurrentUser) -> Self {
        let mut claims = Claims::new(user.username.clone(), &user.roles, &user.permissions);
        claims.display_name = user.label().to_string();
        claims
    }
}

/// Operations gated per resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Export,
}

impl Action {
    /// Permission suffix, e.g. `CREATE` in `FARMERS_CREATE`.
    pub fn suffix(self) -> &'static str {
        match self {
            Action::View => "VIEW",
            Action::Create => "CREATE",
            Action::Edit => "EDIT",
            Action::Delete => "DELETE",
            Action::Export => "EXPORT",
        }
    }
}

/// Capability checks over a claim set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    claims: Claims,
}

impl Capabilities {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Admins and super admins can do everything.
    pub fn is_admin(&self) -> bool {
        self.claims.has_any_role(&[ROLE_ADMIN, ROLE_SUPER_ADMIN])
    }

    /// Whether the user may perform `action` on `resource`.
    ///
    /// `View` is granted by `<PREFIX>_VIEW` or any other `<PREFIX>_*`
    /// permission; mutations need the exact `<PREFIX>_<ACTION>` permission.
    pub fn can(&self, action: Action, resource: Resource) -> bool {
        if self.is_admin() {
            return true;
        }
        let prefix = resource.permission_prefix();
        match action {
            Action::View => {
                let family = format!("{prefix}_");
                self.claims
                    .permissions
                    .iter()
                    .any(|p| p.strip_prefix(&family).is_some_and(|rest| !rest.is_empty()))
            }
            other => self
                .claims
                .has_permission(&format!("{prefix}_{}", other.suffix())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(roles: &[&str], permissions: &[&str]) -> Claims {
        let roles: Vec<String> = roles.iter().map(|s| s.to_string()).collect();
        let permissions: Vec<String> = permissions.iter().map(|s| s.to_string()).collect();
        Claims::new("ana", &roles, &permissions)
    }

    #[test]
    fn test_claims_are_normalised() {
        let c = claims(&[" role_admin ", ""], &["farmers_view", "FARMERS_VIEW"]);
        assert_eq!(c.roles, ["ROLE_ADMIN"]);
        assert_eq!(c.permissions, ["FARMERS_VIEW"]);
        assert!(c.has_role("Role_Admin"));
    }

    #[test]
    fn test_admin_and_super_admin_are_both_admins() {
        assert!(Capabilities::new(claims(&["ROLE_ADMIN"], &[])).is_admin());
        assert!(Capabilities::new(claims(&["ROLE_SUPER_ADMIN"], &[])).is_admin());
        assert!(!Capabilities::new(claims(&["ROLE_VIEWER"], &[])).is_admin());
    }

    #[test]
    fn test_admin_can_everything() {
        let caps = Capabilities::new(claims(&["ROLE_SUPER_ADMIN"], &[]));
        for resource in Resource::ALL {
            assert!(caps.can(Action::Delete, resource));
        }
    }

    #[test]
    fn test_view_granted_by_any_permission_in_family() {
        let caps = Capabilities::new(claims(&[], &["FARMERS_EXPORT"]));
        assert!(caps.can(Action::View, Resource::Farmers));
        assert!(caps.can(Action::Export, Resource::Farmers));
        assert!(!caps.can(Action::Edit, Resource::Farmers));
        assert!(!caps.can(Action::View, Resource::Users));
    }

    #[test]
    fn test_mutations_need_exact_permission() {
        let caps = Capabilities::new(claims(&[], &["EMPLOYEES_VIEW", "EMPLOYEES_EDIT"]));
        assert!(caps.can(Action::Edit, Resource::Advisors));
        assert!(!caps.can(Action::Create, Resource::Advisors));
        assert!(!caps.can(Action::Delete, Resource::Advisors));
    }

    #[test]
    fn test_prefix_does_not_leak_across_resources() {
        // GROUP_ROLES_VIEW must not grant GROUPS or ROLES
        let caps = Capabilities::new(claims(&[], &["GROUP_ROLES_VIEW"]));
        assert!(caps.can(Action::View, Resource::GroupRoles));
        assert!(!caps.can(Action::View, Resource::Groups));
        assert!(!caps.can(Action::View, Resource::Roles));
    }

    #[test]
    fn test_anonymous_has_nothing() {
        let caps = Capabilities::default();
        assert!(!caps.can(Action::View, Resource::Farmers));
        assert!(!caps.claims().is_authenticated());
    }

    #[test]
    fn test_from_current_user() {
        let user = CurrentUser::new("bo", ["role_admin"], ["users_view"]);
        let c = Claims::from(&user);
        assert_eq!(c.roles, ["ROLE_ADMIN"]);
        assert_eq!(c.display_name, "bo");
    }
}
