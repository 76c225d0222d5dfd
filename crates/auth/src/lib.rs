//! # Directory Authorization
//!
//! Caller identity, the permission policy and password utilities shared by the
//! directory services and the CLI.

pub mod password;
pub mod permissions;

pub use password::{
    generate_password,
    hash_password,
    verify_password,
    PasswordConfig,
    PasswordError,
    RESET_PASSWORD_LENGTH,
};
pub use permissions::{
    AttachmentAction,
    Caller,
    ComponentAction,
    DepartmentAction,
    EmployeeAction,
    Permission,
    PermissionCheckResult,
    ProductAction,
    SkillAction,
    TeamAction,
};
pub use secrecy;
