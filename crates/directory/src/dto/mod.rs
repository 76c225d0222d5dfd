//! # Data Transfer Objects
//!
//! Request and response types for the directory operations.

pub mod attachments;
pub mod common;
pub mod components;
pub mod departments;
pub mod employees;
pub mod products;
pub mod skills;
pub mod teams;

pub use common::{ListQuery, Page, PaginationInfo};
