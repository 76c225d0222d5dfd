//! # Additional Fields and Metrics
//!
//! Name/description records that hang off any directory entity. Storage keeps
//! an `(owner_kind, owner_id)` pair without a foreign key, so the owner is
//! checked here and the records are removed by the owner's delete operation.

use auth::{AttachmentAction, Caller, Permission};
use entity::{
    additional_fields,
    metrics,
    sea_orm_active_enums::OwnerKind,
    AdditionalFields,
    Components,
    Departments,
    Employees,
    Metrics,
    Products,
    Teams,
};
use error::{AppError, Result};
use permissions_macro::with_permission;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{fetch_page, FieldErrors};
use crate::{
    dto::{attachments::{AttachRequest, AttachmentResponse}, ListQuery, Page},
    Directory,
};

/// The entity an attachment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AttachmentOwner {
    Department(i32),
    Product(i32),
    Team(i32),
    Component(i32),
    Employee(i32),
}

impl AttachmentOwner {
    pub fn new(kind: OwnerKind, id: i32) -> Self {
        match kind {
            OwnerKind::Department => Self::Department(id),
            OwnerKind::Product => Self::Product(id),
            OwnerKind::Team => Self::Team(id),
            OwnerKind::Component => Self::Component(id),
            OwnerKind::Employee => Self::Employee(id),
        }
    }

    pub fn kind(&self) -> OwnerKind {
        match self {
            Self::Department(_) => OwnerKind::Department,
            Self::Product(_) => OwnerKind::Product,
            Self::Team(_) => OwnerKind::Team,
            Self::Component(_) => OwnerKind::Component,
            Self::Employee(_) => OwnerKind::Employee,
        }
    }

    pub fn id(&self) -> i32 {
        match *self {
            Self::Department(id) | Self::Product(id) | Self::Team(id) | Self::Component(id) | Self::Employee(id) => id,
        }
    }

    /// Fail with NotFound unless the owner row exists
    pub async fn ensure_exists<C: ConnectionTrait>(&self, db: &C) -> Result<()> {
        let exists = match *self {
            Self::Department(id) => Departments::find_by_id(id).one(db).await?.is_some(),
            Self::Product(id) => Products::find_by_id(id).one(db).await?.is_some(),
            Self::Team(id) => Teams::find_by_id(id).one(db).await?.is_some(),
            Self::Component(id) => Components::find_by_id(id).one(db).await?.is_some(),
            Self::Employee(id) => Employees::find_by_id(id).one(db).await?.is_some(),
        };

        if exists {
            Ok(())
        }
        else {
            Err(AppError::not_found(format!("{} {} not found", self.kind(), self.id())))
        }
    }
}

impl std::fmt::Display for AttachmentOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}:{}", self.kind(), self.id()) }
}

/// Which attachment table to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    AdditionalField,
    Metric,
}

/// Remove every attachment of `owner`. Called inside the owner's delete transaction.
pub(crate) async fn delete_for_owner<C: ConnectionTrait>(db: &C, owner: AttachmentOwner) -> Result<u64> {
    let fields = AdditionalFields::delete_many()
        .filter(additional_fields::Column::OwnerKind.eq(owner.kind()))
        .filter(additional_fields::Column::OwnerId.eq(owner.id()))
        .exec(db)
        .await?;
    let metrics = Metrics::delete_many()
        .filter(metrics::Column::OwnerKind.eq(owner.kind()))
        .filter(metrics::Column::OwnerId.eq(owner.id()))
        .exec(db)
        .await?;

    Ok(fields.rows_affected + metrics.rows_affected)
}

impl Directory {
    /// Attach a field or metric to `owner`
    #[with_permission(Permission::Attachments(AttachmentAction::Create))]
    pub async fn attach(
        &self,
        caller: &Caller,
        kind: AttachmentKind,
        owner: AttachmentOwner,
        req: AttachRequest,
    ) -> Result<AttachmentResponse> {
        FieldErrors::validate(&req).into_result()?;
        owner.ensure_exists(&self.db).await?;

        let response: AttachmentResponse = match kind {
            AttachmentKind::AdditionalField => {
                additional_fields::ActiveModel {
                    owner_kind: Set(owner.kind()),
                    owner_id: Set(owner.id()),
                    name: Set(req.name),
                    description: Set(req.description),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?
                .into()
            },
            AttachmentKind::Metric => {
                metrics::ActiveModel {
                    owner_kind: Set(owner.kind()),
                    owner_id: Set(owner.id()),
                    name: Set(req.name),
                    description: Set(req.description),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?
                .into()
            },
        };

        info!(
            attachment_id = response.id,
            kind = ?kind,
            owner = %owner,
            caller_id = caller.employee_id,
            "Attachment created"
        );
        Ok(response)
    }

    /// Attachments of `owner` in insertion order
    #[with_permission(Permission::Attachments(AttachmentAction::Read))]
    pub async fn list_attachments(
        &self,
        caller: &Caller,
        kind: AttachmentKind,
        owner: AttachmentOwner,
        query: &ListQuery,
    ) -> Result<Page<AttachmentResponse>> {
        owner.ensure_exists(&self.db).await?;

        let page = match kind {
            AttachmentKind::AdditionalField => {
                let select = AdditionalFields::find()
                    .filter(additional_fields::Column::OwnerKind.eq(owner.kind()))
                    .filter(additional_fields::Column::OwnerId.eq(owner.id()))
                    .order_by_asc(additional_fields::Column::Id);
                fetch_page(select, &self.db, query).await?.map(AttachmentResponse::from)
            },
            AttachmentKind::Metric => {
                let select = Metrics::find()
                    .filter(metrics::Column::OwnerKind.eq(owner.kind()))
                    .filter(metrics::Column::OwnerId.eq(owner.id()))
                    .order_by_asc(metrics::Column::Id);
                fetch_page(select, &self.db, query).await?.map(AttachmentResponse::from)
            },
        };

        Ok(page)
    }

    pub async fn add_additional_field(
        &self,
        caller: &Caller,
        owner: AttachmentOwner,
        req: AttachRequest,
    ) -> Result<AttachmentResponse> {
        self.attach(caller, AttachmentKind::AdditionalField, owner, req)
            .await
    }

    pub async fn list_additional_fields(
        &self,
        caller: &Caller,
        owner: AttachmentOwner,
        query: &ListQuery,
    ) -> Result<Page<AttachmentResponse>> {
        self.list_attachments(caller, AttachmentKind::AdditionalField, owner, query)
            .await
    }

    pub async fn add_metric(&self, caller: &Caller, owner: AttachmentOwner, req: AttachRequest) -> Result<AttachmentResponse> {
        self.attach(caller, AttachmentKind::Metric, owner, req).await
    }

    pub async fn list_metrics(
        &self,
        caller: &Caller,
        owner: AttachmentOwner,
        query: &ListQuery,
    ) -> Result<Page<AttachmentResponse>> {
        self.list_attachments(caller, AttachmentKind::Metric, owner, query)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_kind_round_trip() {
        let owner = AttachmentOwner::new(OwnerKind::Team, 12);
        assert_eq!(owner, AttachmentOwner::Team(12));
        assert_eq!(owner.kind(), OwnerKind::Team);
        assert_eq!(owner.id(), 12);
        assert_eq!(owner.to_string(), "team:12");
    }

    #[test]
    fn test_owner_serde_tag() {
        let json = serde_json::to_value(AttachmentOwner::Component(3)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "component", "id": 3}));
    }
}
