//! # Permission Model
//!
//! Typed permissions for every directory resource and the caller-based policy
//! that decides them. Reads are open to any active employee; every mutation
//! needs a superuser, except the profile edits an employee may make on their
//! own record.

use serde::{Deserialize, Serialize};
use error::{AppError, Result};
use tracing::{debug, warn};

/// Represents a single permission
///
/// Permissions follow a `resource:action` naming convention, e.g.
/// `departments:create`, `teams:members_add`, `attachments:read`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    Departments(DepartmentAction),
    Products(ProductAction),
    Teams(TeamAction),
    Components(ComponentAction),
    Employees(EmployeeAction),
    Skills(SkillAction),
    /// Additional fields and metrics on any entity
    Attachments(AttachmentAction),
}

/// Actions available for department resources
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepartmentAction {
    Create,
    Read,
    Update,
    Delete,
    EmployeesRead,
    EmployeesAdd,
    EmployeesRemove,
}

/// Actions available for product resources
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductAction {
    Create,
    Read,
    Update,
    Delete,
    ComponentsRead,
    ComponentsAdd,
    ComponentsRemove,
}

/// Actions available for team resources
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamAction {
    Create,
    Read,
    Update,
    Delete,
    /// Read team members
    MembersRead,
    /// Add team members
    MembersAdd,
    /// Update team member roles
    MembersUpdate,
    /// Remove team members
    MembersRemove,
}

/// Actions available for component resources
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentAction {
    Create,
    Read,
    Update,
    Delete,
}

/// Actions available for employee resources
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeAction {
    Create,
    Read,
    /// Profile update; allowed on one's own record for the self-service fields
    Update,
    /// Soft delete (status becomes fired)
    Delete,
    /// Set or remove the avatar; allowed on one's own record
    AvatarUpdate,
}

/// Actions available for the skill catalogue
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillAction {
    Create,
    Read,
    Delete,
    /// Replace the skill set of an employee; allowed on one's own record
    Assign,
}

/// Actions available for additional fields and metrics
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttachmentAction {
    Create,
    Read,
}

macro_rules! action_strings {
    ($action:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl std::fmt::Display for $action {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($action::$variant => write!(f, $name)),+
                }
            }
        }

        impl $action {
            #[must_use]
            pub fn from_string(s: &str) -> Option<Self> {
                match s {
                    $($name => Some($action::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

action_strings!(DepartmentAction {
    Create => "create",
    Read => "read",
    Update => "update",
    Delete => "delete",
    EmployeesRead => "employees_read",
    EmployeesAdd => "employees_add",
    EmployeesRemove => "employees_remove",
});

action_strings!(ProductAction {
    Create => "create",
    Read => "read",
    Update => "update",
    Delete => "delete",
    ComponentsRead => "components_read",
    ComponentsAdd => "components_add",
    ComponentsRemove => "components_remove",
});

action_strings!(TeamAction {
    Create => "create",
    Read => "read",
    Update => "update",
    Delete => "delete",
    MembersRead => "members_read",
    MembersAdd => "members_add",
    MembersUpdate => "members_update",
    MembersRemove => "members_remove",
});

action_strings!(ComponentAction {
    Create => "create",
    Read => "read",
    Update => "update",
    Delete => "delete",
});

action_strings!(EmployeeAction {
    Create => "create",
    Read => "read",
    Update => "update",
    Delete => "delete",
    AvatarUpdate => "avatar_update",
});

action_strings!(SkillAction {
    Create => "create",
    Read => "read",
    Delete => "delete",
    Assign => "assign",
});

action_strings!(AttachmentAction {
    Create => "create",
    Read => "read",
});

impl Permission {
    /// Parse a permission string into a Permission enum
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        let (resource, action) = s.split_once(':')?;
        match resource {
            "departments" => DepartmentAction::from_string(action).map(Permission::Departments),
            "products" => ProductAction::from_string(action).map(Permission::Products),
            "teams" => TeamAction::from_string(action).map(Permission::Teams),
            "components" => ComponentAction::from_string(action).map(Permission::Components),
            "employees" => EmployeeAction::from_string(action).map(Permission::Employees),
            "skills" => SkillAction::from_string(action).map(Permission::Skills),
            "attachments" => AttachmentAction::from_string(action).map(Permission::Attachments),
            _ => None,
        }
    }

    /// Whether the permission only reads data
    #[must_use]
    pub fn is_read(&self) -> bool {
        matches!(
            self,
            Permission::Departments(DepartmentAction::Read | DepartmentAction::EmployeesRead)
                | Permission::Products(ProductAction::Read | ProductAction::ComponentsRead)
                | Permission::Teams(TeamAction::Read | TeamAction::MembersRead)
                | Permission::Components(ComponentAction::Read)
                | Permission::Employees(EmployeeAction::Read)
                | Permission::Skills(SkillAction::Read)
                | Permission::Attachments(AttachmentAction::Read)
        )
    }

    /// Whether an employee may exercise the permission on their own record
    #[must_use]
    pub fn allows_self_service(&self) -> bool {
        matches!(
            self,
            Permission::Employees(EmployeeAction::Update | EmployeeAction::AvatarUpdate)
                | Permission::Skills(SkillAction::Assign)
        )
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::Departments(action) => write!(f, "departments:{}", action),
            Permission::Products(action) => write!(f, "products:{}", action),
            Permission::Teams(action) => write!(f, "teams:{}", action),
            Permission::Components(action) => write!(f, "components:{}", action),
            Permission::Employees(action) => write!(f, "employees:{}", action),
            Permission::Skills(action) => write!(f, "skills:{}", action),
            Permission::Attachments(action) => write!(f, "attachments:{}", action),
        }
    }
}

/// Permission check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionCheckResult {
    /// Caller has the permission
    Allowed,
    /// Caller doesn't have the permission
    Denied,
    /// Allowed only on the caller's own record; use [`Caller::check_on`]
    RequiresOwnership,
}

/// The employee on whose behalf an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub employee_id:  i32,
    pub is_superuser: bool,
}

impl Caller {
    #[must_use]
    pub fn new(employee_id: i32, is_superuser: bool) -> Self {
        Self {
            employee_id,
            is_superuser,
        }
    }

    /// Check a permission that is not tied to a particular employee record
    #[must_use]
    pub fn check(&self, permission: &Permission) -> PermissionCheckResult {
        let result = if self.is_superuser || permission.is_read() {
            PermissionCheckResult::Allowed
        }
        else if permission.allows_self_service() {
            PermissionCheckResult::RequiresOwnership
        }
        else {
            PermissionCheckResult::Denied
        };

        debug!(
            caller_id = self.employee_id,
            permission = %permission,
            result = ?result,
            "Checked permission"
        );
        result
    }

    /// Check a permission against the employee record it targets
    #[must_use]
    pub fn check_on(&self, permission: &Permission, employee_id: i32) -> PermissionCheckResult {
        match self.check(permission) {
            PermissionCheckResult::RequiresOwnership if self.is_self(employee_id) => PermissionCheckResult::Allowed,
            PermissionCheckResult::RequiresOwnership => PermissionCheckResult::Denied,
            other => other,
        }
    }

    /// Whether the caller is the given employee
    #[must_use]
    pub fn is_self(&self, employee_id: i32) -> bool { self.employee_id == employee_id }

    /// Fail with Forbidden unless every permission is granted
    pub fn require_all(&self, permissions: &[Permission]) -> Result<()> {
        match permissions
            .iter()
            .find(|p| self.check(p) != PermissionCheckResult::Allowed)
        {
            Some(missing) => Err(self.deny(&missing.to_string())),
            None => Ok(()),
        }
    }

    /// Fail with Forbidden unless at least one permission is granted
    pub fn require_any(&self, permissions: &[Permission]) -> Result<()> {
        if permissions
            .iter()
            .any(|p| self.check(p) == PermissionCheckResult::Allowed)
        {
            return Ok(());
        }

        let names: Vec<String> = permissions.iter().map(Permission::to_string).collect();
        Err(self.deny(&names.join(" | ")))
    }

    /// Like [`Caller::require_all`] for one permission, with self-service
    /// actions allowed on the caller's own record
    pub fn require_on(&self, permission: &Permission, employee_id: i32) -> Result<()> {
        match self.check_on(permission, employee_id) {
            PermissionCheckResult::Allowed => Ok(()),
            _ => Err(self.deny(&permission.to_string())),
        }
    }

    fn deny(&self, required: &str) -> AppError {
        warn!(
            target: "security",
            event = "permission_denied",
            caller_id = self.employee_id,
            required,
            "Security event"
        );
        AppError::forbidden(format!("Missing required permission: {}", required))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse_agree() {
        let perms = [
            Permission::Departments(DepartmentAction::EmployeesAdd),
            Permission::Products(ProductAction::ComponentsRemove),
            Permission::Teams(TeamAction::MembersUpdate),
            Permission::Components(ComponentAction::Delete),
            Permission::Employees(EmployeeAction::AvatarUpdate),
            Permission::Skills(SkillAction::Assign),
            Permission::Attachments(AttachmentAction::Create),
        ];
        for perm in perms {
            assert_eq!(Permission::from_string(&perm.to_string()), Some(perm));
        }
    }

    #[test]
    fn test_superuser_allowed_everything() {
        let admin = Caller::new(1, true);
        assert_eq!(
            admin.check(&Permission::Departments(DepartmentAction::Delete)),
            PermissionCheckResult::Allowed
        );
        assert_eq!(
            admin.check_on(&Permission::Employees(EmployeeAction::Update), 99),
            PermissionCheckResult::Allowed
        );
    }
}
