//! Currency ledger operations.
//!
//! Equity is mutated only through relative `UPDATE currencies SET equity =
//! equity ± ?` statements so concurrent writers never clobber each other
//! with stale reads.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*};

use crate::{Currency, EngineError, ResultEngine, currencies};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Register a new currency with zero equity.
    pub async fn create_currency(&self, name: &str, sign: &str) -> ResultEngine<Currency> {
        let name = normalize_required_name(name, "currency")?;
        let sign = sign.trim();
        if sign.chars().count() != 1 {
            return Err(EngineError::BadRequest(
                "currency sign must be a single character".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let existing = currencies::Entity::find()
                .filter(
                    currencies::Column::Name
                        .eq(name.clone())
                        .or(currencies::Column::Sign.eq(sign)),
                )
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(name));
            }

            let model = currencies::ActiveModel {
                name: ActiveValue::Set(name),
                sign: ActiveValue::Set(sign.to_string()),
                equity: ActiveValue::Set(0),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            Ok(model.into())
        })
    }

    /// All currencies with their current equity, newest first.
    pub async fn currencies(&self) -> ResultEngine<Vec<Currency>> {
        let models = currencies::Entity::find()
            .order_by_desc(currencies::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Currency::from).collect())
    }

    /// Add `amount` to a currency's equity. `amount` may be a signed delta.
    pub(crate) async fn increase_equity<C: ConnectionTrait>(
        &self,
        conn: &C,
        currency_id: i32,
        amount: i64,
    ) -> ResultEngine<()> {
        self.shift_equity(conn, currency_id, "+", amount).await
    }

    /// Subtract `amount` from a currency's equity. `amount` may be a signed delta.
    pub(crate) async fn decrease_equity<C: ConnectionTrait>(
        &self,
        conn: &C,
        currency_id: i32,
        amount: i64,
    ) -> ResultEngine<()> {
        self.shift_equity(conn, currency_id, "-", amount).await
    }

    async fn shift_equity<C: ConnectionTrait>(
        &self,
        conn: &C,
        currency_id: i32,
        operator: &str,
        amount: i64,
    ) -> ResultEngine<()> {
        let stmt = Statement::from_sql_and_values(
            conn.get_database_backend(),
            format!("UPDATE currencies SET equity = equity {operator} ? WHERE id = ?"),
            [amount.into(), currency_id.into()],
        );
        let result = conn.execute(stmt).await?;
        if result.rows_affected() == 0 {
            return Err(EngineError::KeyNotFound("currency not exists".to_string()));
        }
        Ok(())
    }
}
