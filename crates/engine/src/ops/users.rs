use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, users};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    pub async fn create_user(&self, name: &str, token: &str) -> ResultEngine<users::Model> {
        let name = normalize_required_name(name, "user")?;

        with_tx!(self, |db_tx| {
            let existing = users::Entity::find()
                .filter(users::Column::Name.eq(name.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(name));
            }

            let model = users::ActiveModel {
                name: ActiveValue::Set(name),
                token: ActiveValue::Set(token.to_string()),
                big_cost_threshold: ActiveValue::Set(None),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;
            Ok(model)
        })
    }

    /// Resolve the auth token presented by a client.
    pub async fn user_by_token(&self, token: &str) -> ResultEngine<users::Model> {
        users::Entity::find()
            .filter(users::Column::Token.eq(token))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    pub async fn user(&self, user_id: i32) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    /// Update the notification threshold; `None` turns the alerts off.
    pub async fn update_big_cost_threshold(
        &self,
        user_id: i32,
        threshold: Option<i64>,
    ) -> ResultEngine<users::Model> {
        self.user(user_id).await?;
        let model = users::ActiveModel {
            id: ActiveValue::Set(user_id),
            big_cost_threshold: ActiveValue::Set(threshold),
            ..Default::default()
        }
        .update(&self.database)
        .await?;
        Ok(model)
    }

    /// Users who asked to hear about costs at least this big, author excluded.
    pub async fn users_for_big_cost(
        &self,
        value: i64,
        author_id: i32,
    ) -> ResultEngine<Vec<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::BigCostThreshold.is_not_null())
            .filter(users::Column::BigCostThreshold.lte(value))
            .filter(users::Column::Id.ne(author_id))
            .all(&self.database)
            .await?)
    }

    /// Everyone but the author; income notifications fan out to the family.
    pub async fn users_excluding(&self, author_id: i32) -> ResultEngine<Vec<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::Id.ne(author_id))
            .all(&self.database)
            .await?)
    }
}
