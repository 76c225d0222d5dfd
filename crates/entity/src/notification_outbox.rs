//! Notification Outbox Entity
//!
//! Emails written in the same transaction as the change that triggers them.
//! The dispatcher delivers `pending` rows once the transaction has committed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sea_orm_active_enums::OutboxStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification_outbox")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:         i32,
    pub subject:    String,
    #[sea_orm(column_type = "Text")]
    pub body:       String,
    /// JSON array of recipient addresses
    pub recipients: Json,
    pub status:     OutboxStatus,
    pub attempts:   i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub last_error: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub sent_at:    Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Recipient addresses decoded from the JSON column
    pub fn recipient_list(&self) -> Vec<String> {
        serde_json::from_value(self.recipients.clone()).unwrap_or_default()
    }
}
