//! # Directory Services
//!
//! Every operation is a method on [`Directory`](crate::Directory) taking the
//! acting [`Caller`](auth::Caller). Writes run in one transaction; validation
//! finishes before the first write.

pub mod attachments;
pub mod components;
pub mod departments;
pub mod employees;
pub mod hierarchy;
pub mod memberships;
pub mod password_reset;
pub mod products;
pub mod skills;
pub mod teams;

use error::{AppError, FieldError, Result};
use logging::log_db_query;
use sea_orm::{ConnectionTrait, DbBackend, EntityName, EntityTrait, PaginatorTrait, Select};
use validator::Validate;

use crate::dto::{ListQuery, Page, PaginationInfo};

/// Accumulates field errors from validator and from hand-written checks
#[derive(Debug, Default)]
pub(crate) struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Start from the derive-based validation of a request
    pub(crate) fn validate(request: &impl Validate) -> Self {
        match request.validate() {
            Ok(()) => Self::default(),
            Err(errors) => Self(AppError::from(errors).field_errors().to_vec()),
        }
    }

    pub(crate) fn push(&mut self, field: &str, message: impl ToString) { self.0.push(FieldError::new(field, message)); }

    pub(crate) fn has(&self, field: &str) -> bool { self.0.iter().any(|f| f.field == field) }

    pub(crate) fn into_result(self) -> Result<()> {
        if self.0.is_empty() {
            Ok(())
        }
        else {
            Err(AppError::fields(self.0))
        }
    }
}

/// Row locks are only taken where the backend supports `SELECT ... FOR UPDATE`
pub(crate) fn supports_row_locks<C: ConnectionTrait>(db: &C) -> bool { db.get_database_backend() == DbBackend::Postgres }

/// Fetch one page of `select`
pub(crate) async fn fetch_page<E, C>(select: Select<E>, db: &C, query: &ListQuery) -> Result<Page<E::Model>>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let page = query.page();
    let per_page = query.per_page();

    let start = std::time::Instant::now();
    let paginator = select.paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;
    log_db_query!(
        "paginate",
        E::default().table_name(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(Page {
        items,
        pagination: PaginationInfo::new(page, per_page, total),
    })
}
