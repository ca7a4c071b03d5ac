use std::collections::HashMap;

use sea_orm::{ConnectionTrait, DatabaseConnection, entity::prelude::*};

use crate::{EngineError, ResultEngine, currencies};

pub(crate) mod analytics;
mod categories;
mod costs;
mod equity;
mod exchanges;
mod imported;
mod incomes;
mod reconcile;
mod shortcuts;
pub(crate) mod transactions;
mod users;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub(crate) async fn require_currency<C: ConnectionTrait>(
        &self,
        conn: &C,
        currency_id: i32,
    ) -> ResultEngine<currencies::Model> {
        currencies::Entity::find_by_id(currency_id)
            .one(conn)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("currency not exists".to_string()))
    }

    pub(crate) async fn require_category<C: ConnectionTrait>(
        &self,
        conn: &C,
        category_id: i32,
    ) -> ResultEngine<crate::categories::Model> {
        crate::categories::Entity::find_by_id(category_id)
            .one(conn)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("cost category not exists".to_string()))
    }

    /// Small lookup tables loaded whole for list hydration.
    pub(crate) async fn currency_map<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> ResultEngine<HashMap<i32, currencies::Model>> {
        let models = currencies::Entity::find().all(conn).await?;
        Ok(models.into_iter().map(|model| (model.id, model)).collect())
    }

    pub(crate) async fn category_map<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> ResultEngine<HashMap<i32, crate::categories::Model>> {
        let models = crate::categories::Entity::find().all(conn).await?;
        Ok(models.into_iter().map(|model| (model.id, model)).collect())
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn ensure_positive(value: i64, label: &str) -> ResultEngine<()> {
    if value <= 0 {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be > 0"
        )));
    }
    Ok(())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
