//! # Attachment Data Transfer Objects
//!
//! Additional fields and metrics share the same shape.

use entity::{additional_fields, metrics, sea_orm_active_enums::OwnerKind};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to attach a field or metric
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct AttachRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name:        String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: String,
}

/// An additional field or metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentResponse {
    pub id:          i32,
    pub owner_kind:  OwnerKind,
    pub owner_id:    i32,
    pub name:        String,
    pub description: String,
}

impl From<additional_fields::Model> for AttachmentResponse {
    fn from(model: additional_fields::Model) -> Self {
        Self {
            id:          model.id,
            owner_kind:  model.owner_kind,
            owner_id:    model.owner_id,
            name:        model.name,
            description: model.description,
        }
    }
}

impl From<metrics::Model> for AttachmentResponse {
    fn from(model: metrics::Model) -> Self {
        Self {
            id:          model.id,
            owner_kind:  model.owner_kind,
            owner_id:    model.owner_id,
            name:        model.name,
            description: model.description,
        }
    }
}
