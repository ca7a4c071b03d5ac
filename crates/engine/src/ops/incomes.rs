//! Income operations: the mirror image of costs on the equity ledger.

use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};

use crate::{EngineError, Income, IncomeDraft, IncomePatch, ResultEngine, incomes};

use super::reconcile::{EquityShift, plan_equity_shift};
use super::{Engine, ensure_positive, normalize_required_name, with_tx};

impl Engine {
    /// Add an income and increase the equity of its currency.
    pub async fn add_income(&self, draft: IncomeDraft) -> ResultEngine<Income> {
        let name = normalize_required_name(&draft.name, "income")?;
        ensure_positive(draft.value, "income value")?;

        with_tx!(self, |db_tx| {
            self.increase_equity(&db_tx, draft.currency_id, draft.value)
                .await?;

            let model = incomes::ActiveModel {
                name: ActiveValue::Set(name),
                value: ActiveValue::Set(draft.value),
                timestamp: ActiveValue::Set(draft.timestamp),
                source: ActiveValue::Set(draft.source.as_str().to_string()),
                user_id: ActiveValue::Set(draft.user_id),
                currency_id: ActiveValue::Set(draft.currency_id),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            let currency = self.require_currency(&db_tx, draft.currency_id).await?;
            Income::try_from((model, currency))
        })
    }

    /// Retrieve a single income with its currency resolved.
    pub async fn income(&self, income_id: i32) -> ResultEngine<Income> {
        let model = incomes::Entity::find_by_id(income_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("income not exists".to_string()))?;
        let currency = self.require_currency(&self.database, model.currency_id).await?;
        Income::try_from((model, currency))
    }

    /// List incomes, newest first.
    pub async fn incomes(
        &self,
        user_id: Option<i32>,
        offset: u64,
        limit: u64,
    ) -> ResultEngine<Vec<Income>> {
        let mut query = incomes::Entity::find()
            .order_by_desc(incomes::Column::Timestamp)
            .order_by_desc(incomes::Column::Id)
            .offset(offset)
            .limit(limit);
        if let Some(user_id) = user_id {
            query = query.filter(incomes::Column::UserId.eq(user_id));
        }

        let models = query.all(&self.database).await?;
        let currencies = self.currency_map(&self.database).await?;

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            let currency = currencies
                .get(&model.currency_id)
                .cloned()
                .ok_or_else(|| EngineError::KeyNotFound("currency not exists".to_string()))?;
            out.push(Income::try_from((model, currency))?);
        }
        Ok(out)
    }

    /// Total number of income rows, regardless of the list filter.
    pub async fn count_incomes(&self) -> ResultEngine<u64> {
        Ok(incomes::Entity::find().count(&self.database).await?)
    }

    /// Partially update an income, reconciling equity per the changed fields.
    pub async fn update_income(
        &self,
        income_id: i32,
        patch: IncomePatch,
    ) -> ResultEngine<Income> {
        with_tx!(self, |db_tx| {
            let model = incomes::Entity::find_by_id(income_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("income not exists".to_string()))?;

            let patch = patch.effective_against(&model);
            if patch.is_empty() {
                return Err(EngineError::BadRequest("nothing to update".to_string()));
            }
            if let Some(value) = patch.value {
                ensure_positive(value, "income value")?;
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

            let mut active = incomes::ActiveModel {
                id: ActiveValue::Set(income_id),
                ..Default::default()
            };
            if let Some(name) = patch.name {
                active.name = ActiveValue::Set(normalize_required_name(&name, "income")?);
            }
            if let Some(value) = patch.value {
                active.value = ActiveValue::Set(value);
            }
            if let Some(timestamp) = patch.timestamp {
                active.timestamp = ActiveValue::Set(timestamp);
            }
            if let Some(source) = patch.source {
                active.source = ActiveValue::Set(source.as_str().to_string());
            }
            if let Some(currency_id) = patch.currency_id {
                active.currency_id = ActiveValue::Set(currency_id);
            }
            let updated = active.update(&db_tx).await?;

            match shift {
                EquityShift::Unchanged => {}
                // an income books against equity with a plus sign
                EquityShift::Delta { currency_id, delta } => {
                    self.increase_equity(&db_tx, currency_id, delta).await?;
                }
                EquityShift::Rebook { reverse, apply } => {
                    self.decrease_equity(&db_tx, reverse.0, reverse.1).await?;
                    self.increase_equity(&db_tx, apply.0, apply.1).await?;
                }
            }

            let currency = self.require_currency(&db_tx, updated.currency_id).await?;
            Income::try_from((updated, currency))
        })
    }

    /// Delete an income and take its value back out of the currency equity.
    pub async fn delete_income(&self, income_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = incomes::Entity::find_by_id(income_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("income not exists".to_string()))?;

            self.decrease_equity(&db_tx, model.currency_id, model.value)
                .await?;
            incomes::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
