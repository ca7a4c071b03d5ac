//! Income primitives.
//!
//! An `Income` is money entering the family budget: adding one increases the
//! equity of its currency by the same amount.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError, currencies};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeSource {
    Revenue,
    Gift,
    Debt,
    Other,
}

impl IncomeSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Gift => "gift",
            Self::Debt => "debt",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for IncomeSource {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "revenue" => Ok(Self::Revenue),
            "gift" => Ok(Self::Gift),
            "debt" => Ok(Self::Debt),
            "other" => Ok(Self::Other),
            other => Err(EngineError::BadRequest(format!(
                "invalid income source: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub value: i64,
    pub timestamp: Date,
    pub source: String,
    pub user_id: i32,
    pub currency_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// An income with its currency resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    pub id: i32,
    pub name: String,
    pub value: i64,
    pub timestamp: NaiveDate,
    pub source: IncomeSource,
    pub user_id: i32,
    pub currency: Currency,
}

impl TryFrom<(Model, currencies::Model)> for Income {
    type Error = EngineError;

    fn try_from((model, currency): (Model, currencies::Model)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            name: model.name,
            value: model.value,
            timestamp: model.timestamp,
            source: IncomeSource::try_from(model.source.as_str())?,
            user_id: model.user_id,
            currency: currency.into(),
        })
    }
}

/// Validated input for a new income.
#[derive(Clone, Debug)]
pub struct IncomeDraft {
    pub name: String,
    pub value: i64,
    pub timestamp: NaiveDate,
    pub source: IncomeSource,
    pub user_id: i32,
    pub currency_id: i32,
}

/// Partial update payload. `None` fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct IncomePatch {
    pub name: Option<String>,
    pub value: Option<i64>,
    pub timestamp: Option<NaiveDate>,
    pub source: Option<IncomeSource>,
    pub currency_id: Option<i32>,
}

impl IncomePatch {
    /// Drop fields that match the stored row, leaving only effective changes.
    pub(crate) fn effective_against(self, model: &Model) -> Self {
        Self {
            name: self.name.filter(|name| *name != model.name),
            value: self.value.filter(|value| *value != model.value),
            timestamp: self.timestamp.filter(|ts| *ts != model.timestamp),
            source: self.source.filter(|source| source.as_str() != model.source),
            currency_id: self.currency_id.filter(|id| *id != model.currency_id),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.value.is_none()
            && self.timestamp.is_none()
            && self.source.is_none()
            && self.currency_id.is_none()
    }
}
