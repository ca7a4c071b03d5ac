use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{CostCategory, EngineError, ResultEngine, categories};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    pub async fn create_cost_category(&self, name: &str) -> ResultEngine<CostCategory> {
        let name = normalize_required_name(name, "category")?;

        with_tx!(self, |db_tx| {
            let existing = categories::Entity::find()
                .filter(categories::Column::Name.eq(name.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(name));
            }

            let model = categories::ActiveModel {
                name: ActiveValue::Set(name),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            Ok(model.into())
        })
    }

    pub async fn cost_categories(&self) -> ResultEngine<Vec<CostCategory>> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(CostCategory::from).collect())
    }
}
