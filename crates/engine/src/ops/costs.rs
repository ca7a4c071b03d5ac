//! Cost operations: each mutator pairs the row change with its compensating
//! equity mutation inside one DB transaction.

use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};

use crate::{Cost, CostDraft, CostPatch, EngineError, ResultEngine, costs};

use super::reconcile::{EquityShift, plan_equity_shift};
use super::{Engine, ensure_positive, normalize_required_name, with_tx};

impl Engine {
    /// Add a cost and decrease the equity of its currency.
    pub async fn add_cost(&self, draft: CostDraft) -> ResultEngine<Cost> {
        let name = normalize_required_name(&draft.name, "cost")?;
        ensure_positive(draft.value, "cost value")?;

        with_tx!(self, |db_tx| {
            let category = self.require_category(&db_tx, draft.category_id).await?;
            self.decrease_equity(&db_tx, draft.currency_id, draft.value)
                .await?;

            let model = costs::ActiveModel {
                name: ActiveValue::Set(name),
                value: ActiveValue::Set(draft.value),
                timestamp: ActiveValue::Set(draft.timestamp),
                user_id: ActiveValue::Set(draft.user_id),
                currency_id: ActiveValue::Set(draft.currency_id),
                category_id: ActiveValue::Set(draft.category_id),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            let currency = self.require_currency(&db_tx, draft.currency_id).await?;
            Ok(Cost::from((model, currency, category)))
        })
    }

    /// Retrieve a single cost with currency and category resolved.
    pub async fn cost(&self, cost_id: i32) -> ResultEngine<Cost> {
        let model = costs::Entity::find_by_id(cost_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("cost not exists".to_string()))?;
        let currency = self.require_currency(&self.database, model.currency_id).await?;
        let category = self.require_category(&self.database, model.category_id).await?;
        Ok(Cost::from((model, currency, category)))
    }

    /// List costs, newest first.
    pub async fn costs(
        &self,
        user_id: Option<i32>,
        offset: u64,
        limit: u64,
    ) -> ResultEngine<Vec<Cost>> {
        let mut query = costs::Entity::find()
            .order_by_desc(costs::Column::Timestamp)
            .order_by_desc(costs::Column::Id)
            .offset(offset)
            .limit(limit);
        if let Some(user_id) = user_id {
            query = query.filter(costs::Column::UserId.eq(user_id));
        }

        let models = query.all(&self.database).await?;
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
            out.push(Cost::from((model, currency, category)));
        }
        Ok(out)
    }

    /// Total number of cost rows, regardless of the list filter.
    pub async fn count_costs(&self) -> ResultEngine<u64> {
        Ok(costs::Entity::find().count(&self.database).await?)
    }

    /// Partially update a cost, reconciling equity per the changed fields.
    pub async fn update_cost(&self, cost_id: i32, patch: CostPatch) -> ResultEngine<Cost> {
        with_tx!(self, |db_tx| {
            let model = costs::Entity::find_by_id(cost_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("cost not exists".to_string()))?;

            let patch = patch.effective_against(&model);
            if patch.is_empty() {
                return Err(EngineError::BadRequest("nothing to update".to_string()));
            }
            if let Some(value) = patch.value {
                ensure_positive(value, "cost value")?;
            }
            if let Some(category_id) = patch.category_id {
                self.require_category(&db_tx, category_id).await?;
            }
            if let Some(currency_id) = patch.currency_id {
                self.require_currency(&db_tx, currency_id).await?;
            }

            let shift = plan_equity_shift(
                model.value,
                model.currency_id,
                patch.value,
                patch.currency_id,
            );

            let mut active = costs::ActiveModel {
                id: ActiveValue::Set(cost_id),
                ..Default::default()
            };
            if let Some(name) = patch.name {
                active.name = ActiveValue::Set(normalize_required_name(&name, "cost")?);
            }
            if let Some(value) = patch.value {
                active.value = ActiveValue::Set(value);
            }
            if let Some(timestamp) = patch.timestamp {
                active.timestamp = ActiveValue::Set(timestamp);
            }
            if let Some(currency_id) = patch.currency_id {
                active.currency_id = ActiveValue::Set(currency_id);
            }
            if let Some(category_id) = patch.category_id {
                active.category_id = ActiveValue::Set(category_id);
            }
            let updated = active.update(&db_tx).await?;

            match shift {
                EquityShift::Unchanged => {}
                // a cost books against equity with a minus sign
                EquityShift::Delta { currency_id, delta } => {
                    self.decrease_equity(&db_tx, currency_id, delta).await?;
                }
                EquityShift::Rebook { reverse, apply } => {
                    self.increase_equity(&db_tx, reverse.0, reverse.1).await?;
                    self.decrease_equity(&db_tx, apply.0, apply.1).await?;
                }
            }

            let currency = self.require_currency(&db_tx, updated.currency_id).await?;
            let category = self.require_category(&db_tx, updated.category_id).await?;
            Ok(Cost::from((updated, currency, category)))
        })
    }

    /// Delete a cost and give its value back to the currency equity.
    pub async fn delete_cost(&self, cost_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = costs::Entity::find_by_id(cost_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("cost not exists".to_string()))?;

            self.increase_equity(&db_tx, model.currency_id, model.value)
                .await?;
            costs::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
