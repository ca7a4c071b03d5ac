//! Cost shortcut operations.
//!
//! `ui_position_index` stays dense (1..N per user): appending takes N+1,
//! deleting compacts the tail, reordering shifts the affected window. The
//! shifts are relative SQL updates, same discipline as the equity ledger.

use sea_orm::{
    ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, Statement,
    TransactionTrait, prelude::*,
};

use crate::{
    Cost, CostDraft, CostShortcut, CostShortcutDraft, EngineError, ResultEngine, money, shortcuts,
};

use super::{Engine, ensure_positive, normalize_required_name, with_tx};

impl Engine {
    /// Create a shortcut, appended at the end of the user's list.
    pub async fn add_cost_shortcut(
        &self,
        draft: CostShortcutDraft,
    ) -> ResultEngine<CostShortcut> {
        let name = normalize_required_name(&draft.name, "cost shortcut")?;
        if let Some(value) = draft.value {
            ensure_positive(value, "cost shortcut value")?;
        }

        with_tx!(self, |db_tx| {
            let currency = self.require_currency(&db_tx, draft.currency_id).await?;
            let category = self.require_category(&db_tx, draft.category_id).await?;

            let position = shortcuts::Entity::find()
                .filter(shortcuts::Column::UserId.eq(draft.user_id))
                .count(&db_tx)
                .await? as i32
                + 1;

            let model = shortcuts::ActiveModel {
                name: ActiveValue::Set(name),
                value: ActiveValue::Set(draft.value),
                user_id: ActiveValue::Set(draft.user_id),
                currency_id: ActiveValue::Set(draft.currency_id),
                category_id: ActiveValue::Set(draft.category_id),
                ui_position_index: ActiveValue::Set(position),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            Ok(CostShortcut::from((model, currency, category)))
        })
    }

    /// The user's shortcuts in UI order.
    pub async fn cost_shortcuts(&self, user_id: i32) -> ResultEngine<Vec<CostShortcut>> {
        let models = shortcuts::Entity::find()
            .filter(shortcuts::Column::UserId.eq(user_id))
            .order_by_asc(shortcuts::Column::UiPositionIndex)
            .all(&self.database)
            .await?;
        let currencies = self.currency_map(&self.database).await?;
        let categories = self.category_map(&self.database).await?;

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            let currency = currencies
                .get(&model.currency_id)
                .cloned()
                .ok_or_else(|| EngineError::KeyNotFound("currency not exists".to_string()))?;
            let category = categories
                .get(&model.category_id)
                .cloned()
                .ok_or_else(|| EngineError::KeyNotFound("cost category not exists".to_string()))?;
            out.push(CostShortcut::from((model, currency, category)));
        }
        Ok(out)
    }

    /// Delete a shortcut and close the gap in the position sequence.
    pub async fn delete_cost_shortcut(&self, user_id: i32, shortcut_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_shortcut(&db_tx, user_id, shortcut_id).await?;
            shortcuts::Entity::delete_by_id(model.id).exec(&db_tx).await?;

            let stmt = Statement::from_sql_and_values(
                db_tx.get_database_backend(),
                "UPDATE cost_shortcuts \
                 SET ui_position_index = ui_position_index - 1 \
                 WHERE user_id = ? AND ui_position_index > ?",
                [user_id.into(), model.ui_position_index.into()],
            );
            db_tx.execute(stmt).await?;
            Ok(())
        })
    }

    /// Move a shortcut to `position`, shifting the rows in between.
    pub async fn reorder_cost_shortcut(
        &self,
        user_id: i32,
        shortcut_id: i32,
        position: i32,
    ) -> ResultEngine<CostShortcut> {
        with_tx!(self, |db_tx| {
            let model = self.require_shortcut(&db_tx, user_id, shortcut_id).await?;
            let total = shortcuts::Entity::find()
                .filter(shortcuts::Column::UserId.eq(user_id))
                .count(&db_tx)
                .await? as i32;
            if position < 1 || position > total {
                return Err(EngineError::BadRequest(format!(
                    "position must be between 1 and {total}"
                )));
            }

            let old_position = model.ui_position_index;
            if position != old_position {
                let backend = db_tx.get_database_backend();
                let stmt = if position < old_position {
                    Statement::from_sql_and_values(
                        backend,
                        "UPDATE cost_shortcuts \
                         SET ui_position_index = ui_position_index + 1 \
                         WHERE user_id = ? AND ui_position_index >= ? AND ui_position_index < ?",
                        [user_id.into(), position.into(), old_position.into()],
                    )
                } else {
                    Statement::from_sql_and_values(
                        backend,
                        "UPDATE cost_shortcuts \
                         SET ui_position_index = ui_position_index - 1 \
                         WHERE user_id = ? AND ui_position_index > ? AND ui_position_index <= ?",
                        [user_id.into(), old_position.into(), position.into()],
                    )
                };
                db_tx.execute(stmt).await?;

                shortcuts::ActiveModel {
                    id: ActiveValue::Set(model.id),
                    ui_position_index: ActiveValue::Set(position),
                    ..Default::default()
                }
                .update(&db_tx)
                .await?;
            }

            let model = self.require_shortcut(&db_tx, user_id, shortcut_id).await?;
            let currency = self.require_currency(&db_tx, model.currency_id).await?;
            let category = self.require_category(&db_tx, model.category_id).await?;
            Ok(CostShortcut::from((model, currency, category)))
        })
    }

    /// Turn a shortcut into a real cost dated today.
    ///
    /// `value` overrides the preset; a shortcut with neither is unusable.
    pub async fn apply_cost_shortcut(
        &self,
        user_id: i32,
        shortcut_id: i32,
        value: Option<i64>,
    ) -> ResultEngine<Cost> {
        let model = self
            .require_shortcut(&self.database, user_id, shortcut_id)
            .await?;
        let value = value.or(model.value).ok_or_else(|| {
            EngineError::BadRequest("the shortcut has no predefined value".to_string())
        })?;

        self.add_cost(CostDraft {
            name: model.name,
            value,
            timestamp: money::today(),
            user_id,
            currency_id: model.currency_id,
            category_id: model.category_id,
        })
        .await
    }

    async fn require_shortcut<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
        shortcut_id: i32,
    ) -> ResultEngine<shortcuts::Model> {
        shortcuts::Entity::find_by_id(shortcut_id)
            .one(conn)
            .await?
            .filter(|model| model.user_id == user_id)
            .ok_or_else(|| EngineError::KeyNotFound("cost shortcut not exists".to_string()))
    }
}
