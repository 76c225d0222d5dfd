//! Entity definitions for the company directory
//!
//! This crate contains Sea-ORM entity definitions for the database models.
//! Every table created by the `migration` crate has a module here.

pub mod sea_orm_active_enums;

pub mod additional_fields;
pub use additional_fields::Entity as AdditionalFields;
pub mod components;
pub use components::Entity as Components;
pub mod departments;
pub use departments::Entity as Departments;
pub mod employee_skills;
pub use employee_skills::Entity as EmployeeSkills;
pub mod employees;
pub use employees::Entity as Employees;
pub mod metrics;
pub use metrics::Entity as Metrics;
pub mod notification_outbox;
pub use notification_outbox::Entity as NotificationOutbox;
pub mod product_components;
pub use product_components::Entity as ProductComponents;
pub mod products;
pub use products::Entity as Products;
pub mod skills;
pub use skills::Entity as Skills;
pub mod team_members;
pub use team_members::Entity as TeamMembers;
pub mod teams;
pub use teams::Entity as Teams;
