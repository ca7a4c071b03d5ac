//! Currency exchange operations: one ledger decrease and one increase per
//! exchange, both inside the same DB transaction.

use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};

use crate::{EngineError, Exchange, ExchangeDraft, ResultEngine, exchanges};

use super::{Engine, ensure_positive, with_tx};

impl Engine {
    /// Move value between two currencies.
    pub async fn add_exchange(&self, draft: ExchangeDraft) -> ResultEngine<Exchange> {
        ensure_positive(draft.from_value, "exchange from value")?;
        ensure_positive(draft.to_value, "exchange to value")?;
        if draft.from_currency_id == draft.to_currency_id {
            return Err(EngineError::BadRequest(
                "exchange requires two different currencies".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            self.decrease_equity(&db_tx, draft.from_currency_id, draft.from_value)
                .await?;
            self.increase_equity(&db_tx, draft.to_currency_id, draft.to_value)
                .await?;

            let model = exchanges::ActiveModel {
                from_value: ActiveValue::Set(draft.from_value),
                to_value: ActiveValue::Set(draft.to_value),
                timestamp: ActiveValue::Set(draft.timestamp),
                user_id: ActiveValue::Set(draft.user_id),
                from_currency_id: ActiveValue::Set(draft.from_currency_id),
                to_currency_id: ActiveValue::Set(draft.to_currency_id),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            let from = self.require_currency(&db_tx, draft.from_currency_id).await?;
            let to = self.require_currency(&db_tx, draft.to_currency_id).await?;
            Ok(Exchange::from((model, from, to)))
        })
    }

    /// Retrieve a single exchange with both currencies resolved.
    pub async fn exchange(&self, exchange_id: i32) -> ResultEngine<Exchange> {
        let model = exchanges::Entity::find_by_id(exchange_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("exchange not exists".to_string()))?;
        let from = self
            .require_currency(&self.database, model.from_currency_id)
            .await?;
        let to = self
            .require_currency(&self.database, model.to_currency_id)
            .await?;
        Ok(Exchange::from((model, from, to)))
    }

    /// List exchanges, newest first.
    pub async fn exchanges(
        &self,
        user_id: Option<i32>,
        offset: u64,
        limit: u64,
    ) -> ResultEngine<Vec<Exchange>> {
        let mut query = exchanges::Entity::find()
            .order_by_desc(exchanges::Column::Timestamp)
            .order_by_desc(exchanges::Column::Id)
            .offset(offset)
            .limit(limit);
        if let Some(user_id) = user_id {
            query = query.filter(exchanges::Column::UserId.eq(user_id));
        }

        let models = query.all(&self.database).await?;
        let currencies = self.currency_map(&self.database).await?;

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            let from = currencies
                .get(&model.from_currency_id)
                .cloned()
                .ok_or_else(|| EngineError::KeyNotFound("currency not exists".to_string()))?;
            let to = currencies
                .get(&model.to_currency_id)
                .cloned()
                .ok_or_else(|| EngineError::KeyNotFound("currency not exists".to_string()))?;
            out.push(Exchange::from((model, from, to)));
        }
        Ok(out)
    }

    /// Total number of exchange rows.
    pub async fn count_exchanges(&self) -> ResultEngine<u64> {
        Ok(exchanges::Entity::find().count(&self.database).await?)
    }

    /// Delete an exchange, reversing both ledger legs.
    pub async fn delete_exchange(&self, exchange_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = exchanges::Entity::find_by_id(exchange_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("exchange not exists".to_string()))?;

            self.increase_equity(&db_tx, model.from_currency_id, model.from_value)
                .await?;
            self.decrease_equity(&db_tx, model.to_currency_id, model.to_value)
                .await?;
            exchanges::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
