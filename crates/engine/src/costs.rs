//! Cost primitives.
//!
//! A `Cost` is money leaving the family budget: adding one decreases the
//! equity of its currency by the same amount.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{CostCategory, Currency, categories, currencies};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "costs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub value: i64,
    pub timestamp: Date,
    pub user_id: i32,
    pub currency_id: i32,
    pub category_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A cost with its currency and category resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub id: i32,
    pub name: String,
    pub value: i64,
    pub timestamp: NaiveDate,
    pub user_id: i32,
    pub currency: Currency,
    pub category: CostCategory,
}

impl From<(Model, currencies::Model, categories::Model)> for Cost {
    fn from((model, currency, category): (Model, currencies::Model, categories::Model)) -> Self {
        Self {
            id: model.id,
            name: model.name,
            value: model.value,
            timestamp: model.timestamp,
            user_id: model.user_id,
            currency: currency.into(),
            category: category.into(),
        }
    }
}

/// Validated input for a new cost.
#[derive(Clone, Debug)]
pub struct CostDraft {
    pub name: String,
    pub value: i64,
    pub timestamp: NaiveDate,
    pub user_id: i32,
    pub currency_id: i32,
    pub category_id: i32,
}

/// Partial update payload. `None` fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct CostPatch {
    pub name: Option<String>,
    pub value: Option<i64>,
    pub timestamp: Option<NaiveDate>,
    pub currency_id: Option<i32>,
    pub category_id: Option<i32>,
}

impl CostPatch {
    /// Drop fields that match the stored row, leaving only effective changes.
    pub(crate) fn effective_against(self, model: &Model) -> Self {
        Self {
            name: self.name.filter(|name| *name != model.name),
            value: self.value.filter(|value| *value != model.value),
            timestamp: self.timestamp.filter(|ts| *ts != model.timestamp),
            currency_id: self.currency_id.filter(|id| *id != model.currency_id),
            category_id: self.category_id.filter(|id| *id != model.category_id),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.value.is_none()
            && self.timestamp.is_none()
            && self.currency_id.is_none()
            && self.category_id.is_none()
    }
}
