//! Wire contracts shared by the server and its clients.
//!
//! JSON field names are camelCase at this layer. Monetary values arrive as
//! raw JSON (string / integer / float, decoded by the engine's money codec)
//! and leave as major-unit floats.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Single-item response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct Response<T> {
    pub result: T,
}

/// Multi-item response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseMulti<T> {
    pub result: Vec<T>,
}

/// Paginated envelope: `context` is the absolute offset after this page,
/// `left` is how many items remain past it. Both are zero on an empty page.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseMultiPaginated<T> {
    pub result: Vec<T>,
    pub context: u64,
    pub left: i64,
}

/// Offset pagination query parameters.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PaginationQuery {
    pub context: Option<u64>,
    pub limit: Option<u64>,
}

pub mod currency {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CurrencyCreateBody {
        pub name: String,
        pub sign: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CurrencyView {
        pub id: i32,
        pub name: String,
        pub sign: String,
    }

    /// A currency with its equity rendered in major units.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EquityView {
        pub currency: CurrencyView,
        pub amount: f64,
    }
}

pub mod transaction {
    use super::*;
    use crate::currency::CurrencyView;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CostCategoryCreateBody {
        pub name: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CostCategoryView {
        pub id: i32,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CostCreateBody {
        pub name: String,
        /// Raw money value: string / integer / float.
        pub value: serde_json::Value,
        /// `%Y-%m-%d` or a full datetime; defaults to today.
        pub timestamp: Option<String>,
        pub currency_id: i32,
        pub category_id: i32,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CostUpdateBody {
        pub name: Option<String>,
        pub value: Option<serde_json::Value>,
        pub timestamp: Option<String>,
        pub currency_id: Option<i32>,
        pub category_id: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CostView {
        pub id: i32,
        pub name: String,
        pub value: f64,
        pub timestamp: NaiveDate,
        pub currency: CurrencyView,
        pub category: CostCategoryView,
    }

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

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeCreateBody {
        pub name: String,
        pub value: serde_json::Value,
        pub timestamp: Option<String>,
        pub source: IncomeSource,
        pub currency_id: i32,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeUpdateBody {
        pub name: Option<String>,
        pub value: Option<serde_json::Value>,
        pub timestamp: Option<String>,
        pub source: Option<IncomeSource>,
        pub currency_id: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeView {
        pub id: i32,
        pub name: String,
        pub value: f64,
        pub timestamp: NaiveDate,
        pub source: IncomeSource,
        pub currency: CurrencyView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExchangeCreateBody {
        pub from_value: serde_json::Value,
        pub to_value: serde_json::Value,
        pub timestamp: Option<String>,
        pub from_currency_id: i32,
        pub to_currency_id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExchangeView {
        pub id: i32,
        pub from_value: f64,
        pub to_value: f64,
        pub timestamp: NaiveDate,
        pub from_currency: CurrencyView,
        pub to_currency: CurrencyView,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum OperationKind {
        Cost,
        Income,
        Exchange,
    }

    /// One row of the merged transaction feed.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: i32,
        pub operation: OperationKind,
        pub name: String,
        /// Category name for costs, a fixed glyph otherwise.
        pub icon: String,
        pub value: f64,
        pub timestamp: NaiveDate,
        pub currency: CurrencyView,
        pub user: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionsQuery {
        pub only_mine: Option<bool>,
        pub operation: Option<OperationKind>,
        pub currency_id: Option<i32>,
        pub cost_category_id: Option<i32>,
        /// `%Y-%m-%d`, inclusive.
        pub start_date: Option<NaiveDate>,
        /// `%Y-%m-%d`, inclusive.
        pub end_date: Option<NaiveDate>,
        /// Case-insensitive substring on cost/income names.
        pub pattern: Option<String>,
        pub context: Option<u64>,
        pub limit: Option<u64>,
    }
}

pub mod shortcut {
    use super::*;
    use crate::currency::CurrencyView;
    use crate::transaction::CostCategoryView;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CostShortcutCreateBody {
        pub name: String,
        /// Optional preset value; without it the shortcut needs a value on
        /// every apply.
        pub value: Option<serde_json::Value>,
        pub currency_id: i32,
        pub category_id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CostShortcutView {
        pub id: i32,
        pub name: String,
        pub value: Option<f64>,
        pub currency: CurrencyView,
        pub category: CostCategoryView,
        pub ui_position_index: i32,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CostShortcutApplyBody {
        pub value: Option<serde_json::Value>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CostShortcutReorderBody {
        pub id: i32,
        pub position: i32,
    }
}

pub mod analytics {
    use super::*;
    use crate::currency::CurrencyView;
    use crate::transaction::IncomeSource;

    /// Named reporting period, resolved to a date range by the server.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum Period {
        CurrentMonth,
        PreviousMonth,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AnalyticsQuery {
        pub period: Option<Period>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub pattern: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CostsByCategoryView {
        pub id: i32,
        pub name: String,
        pub total: f64,
        pub ratio: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CostsAnalyticsView {
        pub total: f64,
        pub categories: Vec<CostsByCategoryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomesBySourceView {
        pub source: IncomeSource,
        pub total: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomesAnalyticsView {
        pub total: f64,
        pub sources: Vec<IncomesBySourceView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BasicAnalyticsView {
        pub currency: CurrencyView,
        pub costs: CostsAnalyticsView,
        pub incomes: IncomesAnalyticsView,
        pub from_exchanges: f64,
        pub total_ratio: f64,
    }
}

pub mod notification {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NotificationView {
        pub message: String,
        pub level: String,
    }

    /// Drained on read: a second request returns empty lists.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NotificationsView {
        pub big_costs: Vec<NotificationView>,
        pub incomes: Vec<NotificationView>,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserView {
        pub id: i32,
        pub name: String,
        /// Major units; `None` means big-cost alerts are off.
        pub big_cost_threshold: Option<f64>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserUpdateBody {
        /// Raw money value, or `null` to turn alerts off.
        pub big_cost_threshold: Option<serde_json::Value>,
    }
}

pub mod sync {
    use super::*;

    /// Bank statement import request.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SyncBody {
        pub api_key: String,
        /// `%Y-%m-%d`, inclusive; defaults to the first day of the current
        /// month.
        pub start_date: Option<String>,
        /// `%Y-%m-%d`, inclusive; defaults to today.
        pub end_date: Option<String>,
        pub currency_id: i32,
        pub category_id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SyncView {
        pub imported: u64,
        pub skipped: u64,
    }
}
