//! # Permission Policy Tests
//!
//! Unit tests for permission parsing and the caller policy.

#[cfg(test)]
mod parsing_tests {
    use auth::permissions::{DepartmentAction, Permission, SkillAction, TeamAction};

    #[test]
    fn test_permission_string_parsing_departments() {
        let perm = Permission::from_string("departments:create");
        assert_eq!(perm.unwrap(), Permission::Departments(DepartmentAction::Create));

        let perm = Permission::from_string("departments:employees_remove");
        assert_eq!(perm.unwrap(), Permission::Departments(DepartmentAction::EmployeesRemove));
    }

    #[test]
    fn test_permission_string_parsing_teams() {
        let perm = Permission::from_string("teams:members_read");
        assert_eq!(perm.unwrap(), Permission::Teams(TeamAction::MembersRead));

        let perm = Permission::from_string("teams:members_add");
        assert_eq!(perm.unwrap(), Permission::Teams(TeamAction::MembersAdd));

        let perm = Permission::from_string("teams:members_update");
        assert_eq!(perm.unwrap(), Permission::Teams(TeamAction::MembersUpdate));

        let perm = Permission::from_string("teams:members_remove");
        assert_eq!(perm.unwrap(), Permission::Teams(TeamAction::MembersRemove));
    }

    #[test]
    fn test_permission_string_parsing_skills() {
        let perm = Permission::from_string("skills:assign");
        assert_eq!(perm.unwrap(), Permission::Skills(SkillAction::Assign));
    }

    #[test]
    fn test_permission_invalid_strings() {
        assert!(Permission::from_string("").is_none());
        assert!(Permission::from_string("invalid").is_none());
        assert!(Permission::from_string("invalid:action").is_none());
        assert!(Permission::from_string("teams:invalid_action").is_none());
        assert!(Permission::from_string("teams:create:extra").is_none());
    }

    #[test]
    fn test_permission_display() {
        assert_eq!(
            Permission::Teams(TeamAction::MembersAdd).to_string(),
            "teams:members_add"
        );
        assert_eq!(
            Permission::Departments(DepartmentAction::Read).to_string(),
            "departments:read"
        );
    }
}

#[cfg(test)]
mod policy_tests {
    use auth::{
        permissions::PermissionCheckResult,
        AttachmentAction,
        Caller,
        ComponentAction,
        EmployeeAction,
        Permission,
        ProductAction,
        SkillAction,
        TeamAction,
    };

    #[test]
    fn test_reads_allowed_for_everyone() {
        let caller = Caller::new(5, false);
        for perm in [
            Permission::Teams(TeamAction::Read),
            Permission::Teams(TeamAction::MembersRead),
            Permission::Products(ProductAction::ComponentsRead),
            Permission::Attachments(AttachmentAction::Read),
            Permission::Employees(EmployeeAction::Read),
        ] {
            assert_eq!(caller.check(&perm), PermissionCheckResult::Allowed, "{perm}");
        }
    }

    #[test]
    fn test_writes_denied_for_regular_employee() {
        let caller = Caller::new(5, false);
        for perm in [
            Permission::Teams(TeamAction::MembersAdd),
            Permission::Components(ComponentAction::Create),
            Permission::Employees(EmployeeAction::Delete),
            Permission::Skills(SkillAction::Create),
            Permission::Attachments(AttachmentAction::Create),
        ] {
            assert_eq!(caller.check(&perm), PermissionCheckResult::Denied, "{perm}");
        }
    }

    #[test]
    fn test_self_service_requires_ownership() {
        let caller = Caller::new(5, false);
        let update = Permission::Employees(EmployeeAction::Update);

        assert_eq!(caller.check(&update), PermissionCheckResult::RequiresOwnership);
        assert_eq!(caller.check_on(&update, 5), PermissionCheckResult::Allowed);
        assert_eq!(caller.check_on(&update, 6), PermissionCheckResult::Denied);
        assert_eq!(
            caller.check_on(&Permission::Employees(EmployeeAction::AvatarUpdate), 5),
            PermissionCheckResult::Allowed
        );
    }

    #[test]
    fn test_ownership_does_not_unlock_admin_actions() {
        let caller = Caller::new(5, false);
        assert_eq!(
            caller.check_on(&Permission::Employees(EmployeeAction::Delete), 5),
            PermissionCheckResult::Denied
        );
    }
}

#[cfg(test)]
mod require_tests {
    use auth::{Caller, EmployeeAction, Permission, ProductAction, TeamAction};

    #[test]
    fn test_require_all_names_first_missing_permission() {
        let caller = Caller::new(5, false);
        let err = caller
            .require_all(&[
                Permission::Teams(TeamAction::Read),
                Permission::Teams(TeamAction::Delete),
            ])
            .unwrap_err();

        assert_eq!(err.code(), "FORBIDDEN");
        assert_eq!(err.message(), "Missing required permission: teams:delete");
        assert!(Caller::new(1, true)
            .require_all(&[Permission::Teams(TeamAction::Delete)])
            .is_ok());
    }

    #[test]
    fn test_require_any_accepts_one_grant() {
        let caller = Caller::new(5, false);
        assert!(caller
            .require_any(&[
                Permission::Products(ProductAction::Delete),
                Permission::Teams(TeamAction::Read),
            ])
            .is_ok());

        let err = caller
            .require_any(&[
                Permission::Products(ProductAction::Delete),
                Permission::Teams(TeamAction::Delete),
            ])
            .unwrap_err();
        assert!(err.message().contains("products:delete | teams:delete"));
    }

    #[test]
    fn test_require_on_own_record() {
        let caller = Caller::new(5, false);
        let update = Permission::Employees(EmployeeAction::Update);

        assert!(caller.require_on(&update, 5).is_ok());
        assert_eq!(caller.require_on(&update, 6).unwrap_err().code(), "FORBIDDEN");
    }
}
