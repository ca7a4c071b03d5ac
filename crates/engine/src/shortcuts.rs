//! Cost shortcuts: one-tap templates for recurring costs.
//!
//! `ui_position_index` is kept dense (1..N per user) by the shortcut
//! operations; clients rely on it for stable ordering.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{CostCategory, Currency, categories, currencies};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cost_shortcuts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub value: Option<i64>,
    pub user_id: i32,
    pub currency_id: i32,
    pub category_id: i32,
    pub ui_position_index: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A shortcut with its currency and category resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostShortcut {
    pub id: i32,
    pub name: String,
    pub value: Option<i64>,
    pub user_id: i32,
    pub currency: Currency,
    pub category: CostCategory,
    pub ui_position_index: i32,
}

impl From<(Model, currencies::Model, categories::Model)> for CostShortcut {
    fn from((model, currency, category): (Model, currencies::Model, categories::Model)) -> Self {
        Self {
            id: model.id,
            name: model.name,
            value: model.value,
            user_id: model.user_id,
            currency: currency.into(),
            category: category.into(),
            ui_position_index: model.ui_position_index,
        }
    }
}

/// Validated input for a new shortcut.
#[derive(Clone, Debug)]
pub struct CostShortcutDraft {
    pub name: String,
    pub value: Option<i64>,
    pub user_id: i32,
    pub currency_id: i32,
    pub category_id: i32,
}
