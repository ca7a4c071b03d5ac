//! Dedup bookkeeping for bank statement imports.

use sea_orm::{ActiveValue, PaginatorTrait, QueryFilter, prelude::*};

use crate::{ResultEngine, imported};

use super::Engine;

impl Engine {
    /// Whether this external statement entry was already imported for the user.
    pub async fn already_imported(&self, user_id: i32, external_id: &str) -> ResultEngine<bool> {
        let count = imported::Entity::find()
            .filter(imported::Column::UserId.eq(user_id))
            .filter(imported::Column::ExternalId.eq(external_id))
            .count(&self.database)
            .await?;
        Ok(count > 0)
    }

    /// Remember an external statement entry as imported.
    pub async fn mark_imported(&self, user_id: i32, external_id: &str) -> ResultEngine<()> {
        imported::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            external_id: ActiveValue::Set(external_id.to_string()),
            ..Default::default()
        }
        .insert(&self.database)
        .await?;
        Ok(())
    }
}
