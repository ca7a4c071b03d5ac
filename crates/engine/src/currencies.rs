//! Currency rows double as the equity ledger: `equity` is the denormalized
//! per-currency balance, mutated only through relative SQL updates.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "currencies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub sign: String,
    pub equity: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A currency with its current equity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub id: i32,
    pub name: String,
    pub sign: String,
    pub equity: i64,
}

impl From<Model> for Currency {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            sign: model.sign,
            equity: model.equity,
        }
    }
}
