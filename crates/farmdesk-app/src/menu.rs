//! Sidebar menu: role/permission gating, search and accordion expansion
//!
//! A node with neither `roles_allowed` nor `perms_allowed` is unrestricted.
//! Otherwise it is shown only when the user holds one of the listed roles or
//! permissions (case-insensitive). Search filters inside the permitted tree
//! and can never reveal a restricted node.

use farmdesk_core::Resource;

use crate::auth::{Claims, ROLE_ADMIN, ROLE_SUPER_ADMIN};

const ADMINS: &[&str] = &[ROLE_ADMIN, ROLE_SUPER_ADMIN];

/// A menu entry. Leaves open a resource screen; inner nodes group leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuNode {
    pub id: &'static str,
    pub label: &'static str,
    pub resource: Option<Resource>,
    pub roles_allowed: &'static [&'static str],
    pub perms_allowed: &'static [&'static str],
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    pub fn group(id: &'static str, label: &'static str, children: Vec<MenuNode>) -> Self {
        Self {
            id,
            label,
            resource: None,
            roles_allowed: &[],
            perms_allowed: &[],
            children,
        }
    }

    pub fn screen(id: &'static str, label: &'static str, resource: Resource) -> Self {
        Self {
            id,
            label,
            resource: Some(resource),
            roles_allowed: &[],
            perms_allowed: &[],
            children: Vec::new(),
        }
    }

    pub fn roles(mut self, roles: &'static [&'static str]) -> Self {
        self.roles_allowed = roles;
        self
    }

    pub fn perms(mut self, perms: &'static [&'static str]) -> Self {
        self.perms_allowed = perms;
        self
    }

    pub fn is_restricted(&self) -> bool {
        !self.roles_allowed.is_empty() || !self.perms_allowed.is_empty()
    }

    pub fn is_permitted(&self, claims: &Claims) -> bool {
        !self.is_restricted()
            || claims.has_any_role(self.roles_allowed)
            || claims.has_any_permission(self.perms_allowed)
    }

    fn label_matches(&self, needle: &str) -> bool {
        self.label.to_lowercase().contains(needle)
    }
}

/// The dashboard's menu tree.
pub fn default_menu() -> Vec<MenuNode> {
    vec![
        MenuNode::group(
            "people",
            "People",
            vec![
                MenuNode::screen("employees", "Employees", Resource::Advisors)
                    .roles(ADMINS)
                    .perms(&["EMPLOYEES_VIEW"]),
                MenuNode::screen("farmers", "Farmers", Resource::Farmers)
                    .roles(ADMINS)
                    .perms(&["FARMERS_VIEW"]),
            ],
        ),
        MenuNode::group(
            "access",
            "Access Control",
            vec![
                MenuNode::screen("users", "Users", Resource::Users),
                MenuNode::screen("roles", "Roles", Resource::Roles),
                MenuNode::screen("permissions", "Permissions", Resource::Permissions),
                MenuNode::screen("groups", "Groups", Resource::Groups),
                MenuNode::screen("group-roles", "Group Roles", Resource::GroupRoles),
                MenuNode::screen("group-users", "Group Users", Resource::GroupUsers),
                MenuNode::screen("user-roles", "User Roles", Resource::UserRoles),
            ],
        )
        .roles(ADMINS),
        MenuNode::group(
            "forms",
            "Forms",
            vec![
                MenuNode::screen("form-list", "Form List", Resource::Forms),
                MenuNode::screen(
                    "form-permissions",
                    "Form Permissions",
                    Resource::FormPermissions,
                ),
            ],
        )
        .roles(ADMINS)
        .perms(&["FORMS_VIEW"]),
        MenuNode::group(
            "reference",
            "Reference Data",
            vec![
                MenuNode::screen("lookup-types", "Lookup Types", Resource::LookupTypes)
                    .roles(ADMINS)
                    .perms(&["LOOKUP_TYPES_VIEW"]),
                MenuNode::screen("lookups", "Lookups", Resource::Lookups)
                    .roles(ADMINS)
                    .perms(&["LOOKUPS_VIEW"]),
            ],
        ),
    ]
}

/// The visible subtree for `claims`, optionally narrowed by `query`.
///
/// Groups left with no permitted children are dropped.
pub fn filter_menu(nodes: &[MenuNode], claims: &Claims, query: &str) -> Vec<MenuNode> {
    let needle = query.trim().to_lowercase();
    filter_nodes(nodes, claims, &needle)
}

fn filter_nodes(nodes: &[MenuNode], claims: &Claims, needle: &str) -> Vec<MenuNode> {
    let mut out = Vec::new();
    for node in nodes {
        if !node.is_permitted(claims) {
            continue;
        }
        let permitted_children = filter_nodes(&node.children, claims, "");
        if !node.children.is_empty() && permitted_children.is_empty() {
            continue;
        }

        if needle.is_empty() || node.label_matches(needle) {
            out.push(MenuNode {
                children: permitted_children,
                ..node.clone()
            });
            continue;
        }

        let matching = filter_nodes(&node.children, claims, needle);
        if !matching.is_empty() {
            out.push(MenuNode {
                children: matching,
                ..node.clone()
            });
        }
    }
    out
}

/// Every resource reachable from the visible menu, in menu order.
pub fn visible_resources(nodes: &[MenuNode], claims: &Claims) -> Vec<Resource> {
    fn collect(nodes: &[MenuNode], out: &mut Vec<Resource>) {
        for node in nodes {
            if let Some(resource) = node.resource {
                out.push(resource);
            }
            collect(&node.children, out);
        }
    }
    let mut out = Vec::new();
    collect(&filter_menu(nodes, claims, ""), &mut out);
    out
}

/// One line of the rendered sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRow {
    pub id: &'static str,
    pub label: &'static str,
    pub depth: usize,
    pub resource: Option<Resource>,
    pub has_children: bool,
    pub expanded: bool,
}

/// What activating a row did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuActivation {
    /// A group was expanded or collapsed
    Toggled,
    /// A screen should open
    Open(Resource),
    None,
}

/// Sidebar state: tree, accordion, search and selection.
#[derive(Debug, Clone)]
pub struct MenuState {
    tree: Vec<MenuNode>,
    /// Id of the one expanded top-level node
    pub expanded: Option<String>,
    pub query: String,
    /// Whether the search box captures keystrokes
    pub searching: bool,
    pub selected: usize,
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new(default_menu())
    }
}

impl MenuState {
    pub fn new(tree: Vec<MenuNode>) -> Self {
        Self {
            tree,
            expanded: None,
            query: String::new(),
            searching: false,
            selected: 0,
        }
    }

    pub fn tree(&self) -> &[MenuNode] {
        &self.tree
    }

    /// Accordion toggle: opening one top-level node closes the other;
    /// toggling the open node collapses it.
    pub fn toggle(&mut self, id: &str) {
        if self.expanded.as_deref() == Some(id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id.to_string());
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.as_deref() == Some(id)
    }

    /// Flattened visible rows. While searching, every matching group renders
    /// expanded.
    pub fn rows(&self, claims: &Claims) -> Vec<MenuRow> {
        let filtered = filter_menu(&self.tree, claims, &self.query);
        let force_open = !self.query.trim().is_empty();
        let mut rows = Vec::new();
        for node in &filtered {
            self.push_rows(node, 0, force_open, &mut rows);
        }
        rows
    }

    fn push_rows(&self, node: &MenuNode, depth: usize, force_open: bool, rows: &mut Vec<MenuRow>) {
        let expanded = !node.children.is_empty()
            && (force_open || depth > 0 || self.is_expanded(node.id));
        rows.push(MenuRow {
            id: node.id,
            label: node.label,
            depth,
            resource: node.resource,
            has_children: !node.children.is_empty(),
            expanded,
        });
        if expanded {
            for child in &node.children {
                self.push_rows(child, depth + 1, force_open, rows);
            }
        }
    }

    pub fn select_next(&mut self, claims: &Claims) {
        let count = self.rows(claims).len();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    pub fn select_prev(&mut self, claims: &Claims) {
        let count = self.rows(claims).len();
        if count > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(count - 1);
        }
    }

    /// Keep the selection inside the visible rows after filtering.
    pub fn clamp_selection(&mut self, claims: &Claims) {
        let count = self.rows(claims).len();
        self.selected = self.selected.min(count.saturating_sub(1));
    }

    /// Activate the selected row.
    pub fn activate(&mut self, claims: &Claims) -> MenuActivation {
        let Some(row) = self.rows(claims).into_iter().nth(self.selected) else {
            return MenuActivation::None;
        };
        if let Some(resource) = row.resource {
            return MenuActivation::Open(resource);
        }
        if row.has_children && row.depth == 0 {
            self.toggle(row.id);
            return MenuActivation::Toggled;
        }
        MenuActivation::None
    }

    /// Expand the top-level group containing `resource` and select its row.
    pub fn reveal(&mut self, resource: Resource, claims: &Claims) {
        let parent = self
            .tree
            .iter()
            .find(|n| n.children.iter().any(|c| c.resource == Some(resource)));
        if let Some(parent) = parent {
            self.expanded = Some(parent.id.to_string());
        }
        if let Some(index) = self
            .rows(claims)
            .iter()
            .position(|r| r.resource == Some(resource))
        {
            self.selected = index;
        }
    }

    pub fn push_query_char(&mut self, c: char, claims: &Claims) {
        self.query.push(c);
        self.selected = 0;
        self.clamp_selection(claims);
    }

    pub fn pop_query_char(&mut self, claims: &Claims) {
        self.query.pop();
        self.clamp_selection(claims);
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.searching = false;
        self.selected = 0;
    }
}
