//! Currency exchange primitives.
//!
//! An `Exchange` moves value between two currencies: the source currency
//! equity drops by `from_value`, the destination equity grows by `to_value`.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{Currency, currencies};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "exchanges")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub from_value: i64,
    pub to_value: i64,
    pub timestamp: Date,
    pub user_id: i32,
    pub from_currency_id: i32,
    pub to_currency_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// An exchange with both currencies resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub id: i32,
    pub from_value: i64,
    pub to_value: i64,
    pub timestamp: NaiveDate,
    pub user_id: i32,
    pub from_currency: Currency,
    pub to_currency: Currency,
}

impl From<(Model, currencies::Model, currencies::Model)> for Exchange {
    fn from((model, from, to): (Model, currencies::Model, currencies::Model)) -> Self {
        Self {
            id: model.id,
            from_value: model.from_value,
            to_value: model.to_value,
            timestamp: model.timestamp,
            user_id: model.user_id,
            from_currency: from.into(),
            to_currency: to.into(),
        }
    }
}

/// Validated input for a new exchange.
#[derive(Clone, Debug)]
pub struct ExchangeDraft {
    pub from_value: i64,
    pub to_value: i64,
    pub timestamp: NaiveDate,
    pub user_id: i32,
    pub from_currency_id: i32,
    pub to_currency_id: i32,
}
