//! Catalogue of backend resources and their screen schemas
//!
//! Each [`Resource`] knows its API path, id field, default table columns and
//! form fields. The backend remains the authority on the data itself.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A table column: record key plus header label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub key: &'static str,
    pub label: &'static str,
}

impl ColumnDef {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// Input kind of a form field, drives validation and editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    /// Login name: letters, digits, `.`, `_`, `-`
    Username,
    Number,
    Bool,
    Select(&'static [&'static str]),
}

/// A form field definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Whether edits trigger a debounced server-side uniqueness check
    pub unique_check: bool,
}

impl FieldSpec {
    const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: false,
            unique_check: false,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn unique(mut self) -> Self {
        self.unique_check = true;
        self
    }
}

/// HTTP verb used for updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateVerb {
    Patch,
    Put,
}

/// How a record is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStyle {
    /// `POST /{resource}/{id}/delete` with a `DeletedBy` audit field
    Soft,
    /// Plain `DELETE /{resource}/{id}` (link tables)
    Hard,
}

const STATUS_OPTIONS: &[&str] = &["Active", "Inactive"];

/// Backend collections managed by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    /// The Employees screen (field advisors)
    Advisors,
    Farmers,
    Roles,
    Permissions,
    Groups,
    GroupRoles,
    GroupUsers,
    UserRoles,
    Forms,
    FormPermissions,
    LookupTypes,
    Lookups,
    Users,
}

impl Resource {
    pub const ALL: [Resource; 13] = [
        Resource::Advisors,
        Resource::Farmers,
        Resource::Roles,
        Resource::Permissions,
        Resource::Groups,
        Resource::GroupRoles,
        Resource::GroupUsers,
        Resource::UserRoles,
        Resource::Forms,
        Resource::FormPermissions,
        Resource::LookupTypes,
        Resource::Lookups,
        Resource::Users,
    ];

    /// API path relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Advisors => "/advisor",
            Resource::Farmers => "/farmers",
            Resource::Roles => "/roles",
            Resource::Permissions => "/permissions",
            Resource::Groups => "/groups",
            Resource::GroupRoles => "/group-roles",
            Resource::GroupUsers => "/group-users",
            Resource::UserRoles => "/user-roles",
            Resource::Forms => "/forms",
            Resource::FormPermissions => "/form-permissions",
            Resource::LookupTypes => "/lookup-types",
            Resource::Lookups => "/lookups",
            Resource::Users => "/users",
        }
    }

    /// Short identifier used on the command line and as storage key suffix.
    pub fn slug(self) -> &'static str {
        match self {
            Resource::Advisors => "employees",
            Resource::Farmers => "farmers",
            Resource::Roles => "roles",
            Resource::Permissions => "permissions",
            Resource::Groups => "groups",
            Resource::GroupRoles => "group-roles",
            Resource::GroupUsers => "group-users",
            Resource::UserRoles => "user-roles",
            Resource::Forms => "forms",
            Resource::FormPermissions => "form-permissions",
            Resource::LookupTypes => "lookup-types",
            Resource::Lookups => "lookups",
            Resource::Users => "users",
        }
    }

    /// Screen title.
    pub fn title(self) -> &'static str {
        match self {
            Resource::Advisors => "Employees",
            Resource::Farmers => "Farmers",
            Resource::Roles => "Roles",
            Resource::Permissions => "Permissions",
            Resource::Groups => "Groups",
            Resource::GroupRoles => "Group Roles",
            Resource::GroupUsers => "Group Users",
            Resource::UserRoles => "User Roles",
            Resource::Forms => "Forms",
            Resource::FormPermissions => "Form Permissions",
            Resource::LookupTypes => "Lookup Types",
            Resource::Lookups => "Lookups",
            Resource::Users => "Users",
        }
    }

    /// Upper-case prefix of the permission strings guarding this resource,
    /// e.g. `FARMERS` for `FARMERS_VIEW`.
    pub fn permission_prefix(self) -> &'static str {
        match self {
            Resource::Advisors => "EMPLOYEES",
            Resource::Farmers => "FARMERS",
            Resource::Roles => "ROLES",
            Resource::Permissions => "PERMISSIONS",
            Resource::Groups => "GROUPS",
            Resource::GroupRoles => "GROUP_ROLES",
            Resource::GroupUsers => "GROUP_USERS",
            Resource::UserRoles => "USER_ROLES",
            Resource::Forms => "FORMS",
            Resource::FormPermissions => "FORM_PERMISSIONS",
            Resource::LookupTypes => "LOOKUP_TYPES",
            Resource::Lookups => "LOOKUPS",
            Resource::Users => "USERS",
        }
    }

    pub fn id_field(self) -> &'static str {
        match self {
            Resource::Advisors => "AdvisorId",
            Resource::Farmers => "FarmerId",
            Resource::Roles => "RoleId",
            Resource::Permissions => "PermissionId",
            Resource::Groups => "GroupId",
            Resource::GroupRoles => "GroupRoleId",
            Resource::GroupUsers => "GroupUserId",
            Resource::UserRoles => "UserRoleId",
            Resource::Forms => "FormId",
            Resource::FormPermissions => "FormPermissionId",
            Resource::LookupTypes => "LookupTypeId",
            Resource::Lookups => "LookupId",
            Resource::Users => "UserId",
        }
    }

    pub fn update_verb(self) -> UpdateVerb {
        match self {
            Resource::Lookups | Resource::LookupTypes => UpdateVerb::Put,
            _ => UpdateVerb::Patch,
        }
    }

    pub fn delete_style(self) -> DeleteStyle {
        match self {
            Resource::GroupRoles
            | Resource::GroupUsers
            | Resource::UserRoles
            | Resource::FormPermissions => DeleteStyle::Hard,
            _ => DeleteStyle::Soft,
        }
    }

    /// Default table columns, in display order.
    pub fn columns(self) -> &'static [ColumnDef] {
        const ADVISORS: &[ColumnDef] = &[
            ColumnDef::new("AdvisorCode", "Code"),
            ColumnDef::new("FullName", "Full name"),
            ColumnDef::new("Username", "Username"),
            ColumnDef::new("Email", "Email"),
            ColumnDef::new("Phone", "Phone"),
            ColumnDef::new("Region", "Region"),
            ColumnDef::new("Status", "Status"),
        ];
        const FARMERS: &[ColumnDef] = &[
            ColumnDef::new("FarmerCode", "Code"),
            ColumnDef::new("FullName", "Full name"),
            ColumnDef::new("Phone", "Phone"),
            ColumnDef::new("Village", "Village"),
            ColumnDef::new("District", "District"),
            ColumnDef::new("FarmSizeHa", "Farm size (ha)"),
            ColumnDef::new("AdvisorName", "Advisor"),
        ];
        const ROLES: &[ColumnDef] = &[
            ColumnDef::new("RoleName", "Role"),
            ColumnDef::new("Description", "Description"),
            ColumnDef::new("IsActive", "Active"),
        ];
        const PERMISSIONS: &[ColumnDef] = &[
            ColumnDef::new("PermissionName", "Permission"),
            ColumnDef::new("Module", "Module"),
            ColumnDef::new("Description", "Description"),
        ];
        const GROUPS: &[ColumnDef] = &[
            ColumnDef::new("GroupName", "Group"),
            ColumnDef::new("Description", "Description"),
        ];
        const GROUP_ROLES: &[ColumnDef] = &[
            ColumnDef::new("GroupName", "Group"),
            ColumnDef::new("RoleName", "Role"),
        ];
        const GROUP_USERS: &[ColumnDef] = &[
            ColumnDef::new("GroupName", "Group"),
            ColumnDef::new("Username", "User"),
        ];
        const USER_ROLES: &[ColumnDef] = &[
            ColumnDef::new("Username", "User"),
            ColumnDef::new("RoleName", "Role"),
        ];
        const FORMS: &[ColumnDef] = &[
            ColumnDef::new("FormName", "Form"),
            ColumnDef::new("Route", "Route"),
            ColumnDef::new("Description", "Description"),
            ColumnDef::new("IsActive", "Active"),
        ];
        const FORM_PERMISSIONS: &[ColumnDef] = &[
            ColumnDef::new("FormName", "Form"),
            ColumnDef::new("PermissionName", "Permission"),
        ];
        const LOOKUP_TYPES: &[ColumnDef] = &[
            ColumnDef::new("TypeName", "Type"),
            ColumnDef::new("Description", "Description"),
        ];
        const LOOKUPS: &[ColumnDef] = &[
            ColumnDef::new("TypeName", "Type"),
            ColumnDef::new("Code", "Code"),
            ColumnDef::new("Value", "Value"),
            ColumnDef::new("SortOrder", "Order"),
        ];
        const USERS: &[ColumnDef] = &[
            ColumnDef::new("Username", "Username"),
            ColumnDef::new("FullName", "Full name"),
            ColumnDef::new("Email", "Email"),
            ColumnDef::new("Phone", "Phone"),
            ColumnDef::new("IsActive", "Active"),
        ];

        match self {
            Resource::Advisors => ADVISORS,
            Resource::Farmers => FARMERS,
            Resource::Roles => ROLES,
            Resource::Permissions => PERMISSIONS,
            Resource::Groups => GROUPS,
            Resource::GroupRoles => GROUP_ROLES,
            Resource::GroupUsers => GROUP_USERS,
            Resource::UserRoles => USER_ROLES,
            Resource::Forms => FORMS,
            Resource::FormPermissions => FORM_PERMISSIONS,
            Resource::LookupTypes => LOOKUP_TYPES,
            Resource::Lookups => LOOKUPS,
            Resource::Users => USERS,
        }
    }

    /// Form fields for create/edit, in tab order.
    pub fn fields(self) -> &'static [FieldSpec] {
        use FieldKind::*;

        const ADVISORS: &[FieldSpec] = &[
            FieldSpec::new("AdvisorCode", "Code", Text).required(),
            FieldSpec::new("FullName", "Full name", Text).required(),
            FieldSpec::new("Username", "Username", Username)
                .required()
                .unique(),
            FieldSpec::new("Email", "Email", Email).unique(),
            FieldSpec::new("Phone", "Phone", Phone).required().unique(),
            FieldSpec::new("Region", "Region", Text),
            FieldSpec::new("Status", "Status", Select(STATUS_OPTIONS)).required(),
        ];
        const FARMERS: &[FieldSpec] = &[
            FieldSpec::new("FarmerCode", "Code", Text).required(),
            FieldSpec::new("FullName", "Full name", Text).required(),
            FieldSpec::new("Phone", "Phone", Phone),
            FieldSpec::new("Village", "Village", Text).required(),
            FieldSpec::new("District", "District", Text),
            FieldSpec::new("FarmSizeHa", "Farm size (ha)", Number),
            FieldSpec::new("AdvisorId", "Advisor id", Number),
        ];
        const ROLES: &[FieldSpec] = &[
            FieldSpec::new("RoleName", "Role", Text).required(),
            FieldSpec::new("Description", "Description", Text),
            FieldSpec::new("IsActive", "Active", Bool),
        ];
        const PERMISSIONS: &[FieldSpec] = &[
            FieldSpec::new("PermissionName", "Permission", Text).required(),
            FieldSpec::new("Module", "Module", Text),
            FieldSpec::new("Description", "Description", Text),
        ];
        const GROUPS: &[FieldSpec] = &[
            FieldSpec::new("GroupName", "Group", Text).required(),
            FieldSpec::new("Description", "Description", Text),
        ];
        const GROUP_ROLES: &[FieldSpec] = &[
            FieldSpec::new("GroupId", "Group id", Number).required(),
            FieldSpec::new("RoleId", "Role id", Number).required(),
        ];
        const GROUP_USERS: &[FieldSpec] = &[
            FieldSpec::new("GroupId", "Group id", Number).required(),
            FieldSpec::new("UserId", "User id", Number).required(),
        ];
        const USER_ROLES: &[FieldSpec] = &[
            FieldSpec::new("UserId", "User id", Number).required(),
            FieldSpec::new("RoleId", "Role id", Number).required(),
        ];
        const FORMS: &[FieldSpec] = &[
            FieldSpec::new("FormName", "Form", Text).required(),
            FieldSpec::new("Route", "Route", Text).required(),
            FieldSpec::new("Description", "Description", Text),
            FieldSpec::new("IsActive", "Active", Bool),
        ];
        const FORM_PERMISSIONS: &[FieldSpec] = &[
            FieldSpec::new("FormId", "Form id", Number).required(),
            FieldSpec::new("PermissionId", "Permission id", Number).required(),
        ];
        const LOOKUP_TYPES: &[FieldSpec] = &[
            FieldSpec::new("TypeName", "Type", Text).required(),
            FieldSpec::new("Description", "Description", Text),
        ];
        const LOOKUPS: &[FieldSpec] = &[
            FieldSpec::new("LookupTypeId", "Type id", Number).required(),
            FieldSpec::new("Code", "Code", Text).required(),
            FieldSpec::new("Value", "Value", Text).required(),
            FieldSpec::new("SortOrder", "Order", Number),
        ];
        const USERS: &[FieldSpec] = &[
            FieldSpec::new("Username", "Username", Username)
                .required()
                .unique(),
            FieldSpec::new("FullName", "Full name", Text).required(),
            FieldSpec::new("Email", "Email", Email).required().unique(),
            FieldSpec::new("Phone", "Phone", Phone).unique(),
            FieldSpec::new("IsActive", "Active", Bool),
        ];

        match self {
            Resource::Advisors => ADVISORS,
            Resource::Farmers => FARMERS,
            Resource::Roles => ROLES,
            Resource::Permissions => PERMISSIONS,
            Resource::Groups => GROUPS,
            Resource::GroupRoles => GROUP_ROLES,
            Resource::GroupUsers => GROUP_USERS,
            Resource::UserRoles => USER_ROLES,
            Resource::Forms => FORMS,
            Resource::FormPermissions => FORM_PERMISSIONS,
            Resource::LookupTypes => LOOKUP_TYPES,
            Resource::Lookups => LOOKUPS,
            Resource::Users => USERS,
        }
    }

    /// Label for a record key, looked up in fields then columns.
    pub fn label_for(self, key: &str) -> Option<&'static str> {
        self.fields()
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.label)
            .or_else(|| self.columns().iter().find(|c| c.key == key).map(|c| c.label))
    }

    /// Storage key for this screen's column visibility preference.
    pub fn columns_storage_key(self) -> String {
        format!("columns.{}", self.slug())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Resource {
    type Err = Error;

    /// Accepts the slug, the API path (with or without `/`) or the title.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().trim_start_matches('/').to_ascii_lowercase();
        Resource::ALL
            .into_iter()
            .find(|r| {
                r.slug() == needle
                    || r.path().trim_start_matches('/') == needle
                    || r.title().to_ascii_lowercase() == needle
            })
            .ok_or_else(|| Error::unknown_resource(s))
    }
}
