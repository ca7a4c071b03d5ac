//! Unified transaction feed.
//!
//! Costs, incomes and exchanges are merged into one reverse-chronological
//! stream with a raw UNION ALL query. Each branch projects the common row
//! shape; filters are pushed into each branch's WHERE clause.
//!
//! Filter quirks preserved from the API contract:
//! - `cost_category_id` narrows only the cost branch, other branches stay.
//! - a free-text pattern drops the exchange branch entirely (exchanges have
//!   no user-given name to match).
//! - the currency filter matches the destination currency of an exchange.

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Statement, Value};
use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError, ResultEngine};

use super::Engine;

pub(crate) const INCOME_ICON: &str = "💰";
pub(crate) const EXCHANGE_ICON: &str = "🔄";
pub(crate) const EXCHANGE_NAME: &str = "exchange";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Cost,
    Income,
    Exchange,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cost => "cost",
            Self::Income => "income",
            Self::Exchange => "exchange",
        }
    }
}

impl TryFrom<&str> for OperationKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cost" => Ok(Self::Cost),
            "income" => Ok(Self::Income),
            "exchange" => Ok(Self::Exchange),
            other => Err(EngineError::BadRequest(format!(
                "invalid operation kind: {other}"
            ))),
        }
    }
}

/// Filters for the unified feed. All fields are optional and AND-ed.
#[derive(Clone, Debug, Default)]
pub struct TransactionsFilter {
    pub user_id: Option<i32>,
    pub operation: Option<OperationKind>,
    pub currency_id: Option<i32>,
    pub cost_category_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub pattern: Option<String>,
}

/// One row of the merged feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRow {
    pub id: i32,
    pub operation: OperationKind,
    pub name: String,
    pub icon: String,
    pub value: i64,
    pub timestamp: NaiveDate,
    pub currency: Currency,
    pub user: String,
}

struct Branch {
    sql: String,
    values: Vec<Value>,
}

fn push_common_filters(
    conds: &mut Vec<String>,
    values: &mut Vec<Value>,
    alias: &str,
    filter: &TransactionsFilter,
) {
    if let Some(user_id) = filter.user_id {
        conds.push(format!("{alias}.user_id = ?"));
        values.push(user_id.into());
    }
    if let Some(start) = filter.start_date {
        conds.push(format!("{alias}.timestamp >= ?"));
        values.push(start.into());
    }
    if let Some(end) = filter.end_date {
        conds.push(format!("{alias}.timestamp <= ?"));
        values.push(end.into());
    }
}

fn where_clause(conds: &[String]) -> String {
    if conds.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conds.join(" AND "))
    }
}

fn cost_branch(filter: &TransactionsFilter) -> Branch {
    let mut conds = Vec::new();
    let mut values = Vec::new();
    push_common_filters(&mut conds, &mut values, "c", filter);
    if let Some(currency_id) = filter.currency_id {
        conds.push("c.currency_id = ?".to_string());
        values.push(currency_id.into());
    }
    if let Some(category_id) = filter.cost_category_id {
        conds.push("c.category_id = ?".to_string());
        values.push(category_id.into());
    }
    if let Some(pattern) = &filter.pattern {
        conds.push("LOWER(c.name) LIKE ?".to_string());
        values.push(format!("%{}%", pattern.to_lowercase()).into());
    }

    let sql = format!(
        "SELECT c.id AS id, 'cost' AS operation, c.name AS name, \
         cat.name AS icon, c.value AS value, c.timestamp AS timestamp, \
         cur.id AS currency_id, cur.name AS currency_name, \
         cur.sign AS currency_sign, cur.equity AS currency_equity, \
         u.name AS user_name \
         FROM costs c \
         JOIN cost_categories cat ON cat.id = c.category_id \
         JOIN currencies cur ON cur.id = c.currency_id \
         JOIN users u ON u.id = c.user_id{}",
        where_clause(&conds)
    );
    Branch { sql, values }
}

fn income_branch(filter: &TransactionsFilter) -> Branch {
    let mut conds = Vec::new();
    let mut values = Vec::new();
    push_common_filters(&mut conds, &mut values, "i", filter);
    if let Some(currency_id) = filter.currency_id {
        conds.push("i.currency_id = ?".to_string());
        values.push(currency_id.into());
    }
    if let Some(pattern) = &filter.pattern {
        conds.push("LOWER(i.name) LIKE ?".to_string());
        values.push(format!("%{}%", pattern.to_lowercase()).into());
    }

    let sql = format!(
        "SELECT i.id AS id, 'income' AS operation, i.name AS name, \
         '{INCOME_ICON}' AS icon, i.value AS value, i.timestamp AS timestamp, \
         cur.id AS currency_id, cur.name AS currency_name, \
         cur.sign AS currency_sign, cur.equity AS currency_equity, \
         u.name AS user_name \
         FROM incomes i \
         JOIN currencies cur ON cur.id = i.currency_id \
         JOIN users u ON u.id = i.user_id{}",
        where_clause(&conds)
    );
    Branch { sql, values }
}

fn exchange_branch(filter: &TransactionsFilter) -> Branch {
    let mut conds = Vec::new();
    let mut values = Vec::new();
    push_common_filters(&mut conds, &mut values, "e", filter);
    if let Some(currency_id) = filter.currency_id {
        conds.push("e.to_currency_id = ?".to_string());
        values.push(currency_id.into());
    }

    let sql = format!(
        "SELECT e.id AS id, 'exchange' AS operation, '{EXCHANGE_NAME}' AS name, \
         '{EXCHANGE_ICON}' AS icon, e.to_value AS value, e.timestamp AS timestamp, \
         cur.id AS currency_id, cur.name AS currency_name, \
         cur.sign AS currency_sign, cur.equity AS currency_equity, \
         u.name AS user_name \
         FROM exchanges e \
         JOIN currencies cur ON cur.id = e.to_currency_id \
         JOIN users u ON u.id = e.user_id{}",
        where_clause(&conds)
    );
    Branch { sql, values }
}

fn build_union(filter: &TransactionsFilter) -> Option<(String, Vec<Value>)> {
    let mut branches = Vec::new();
    for kind in [
        OperationKind::Cost,
        OperationKind::Income,
        OperationKind::Exchange,
    ] {
        if filter.operation.is_some_and(|op| op != kind) {
            continue;
        }
        if kind == OperationKind::Exchange && filter.pattern.is_some() {
            continue;
        }
        branches.push(match kind {
            OperationKind::Cost => cost_branch(filter),
            OperationKind::Income => income_branch(filter),
            OperationKind::Exchange => exchange_branch(filter),
        });
    }
    if branches.is_empty() {
        return None;
    }

    let sql = branches
        .iter()
        .map(|branch| branch.sql.as_str())
        .collect::<Vec<_>>()
        .join(" UNION ALL ");
    let values = branches
        .into_iter()
        .flat_map(|branch| branch.values)
        .collect();
    Some((sql, values))
}

impl Engine {
    /// Merged reverse-chronological feed with the total match count.
    ///
    /// The count covers the whole filtered set, not just the returned window.
    pub async fn transactions(
        &self,
        filter: &TransactionsFilter,
        offset: u64,
        limit: u64,
    ) -> ResultEngine<(Vec<TransactionRow>, u64)> {
        let Some((union_sql, union_values)) = build_union(filter) else {
            return Ok((Vec::new(), 0));
        };
        let backend = self.database.get_database_backend();

        let total: u64 = {
            let stmt = Statement::from_sql_and_values(
                backend,
                format!("SELECT COUNT(*) AS total FROM ({union_sql})"),
                union_values.clone(),
            );
            let row = self.database.query_one(stmt).await?;
            row.and_then(|r| r.try_get::<i64>("", "total").ok())
                .unwrap_or(0) as u64
        };

        let stmt = Statement::from_sql_and_values(
            backend,
            format!("{union_sql} ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?"),
            {
                let mut values = union_values;
                values.push((limit as i64).into());
                values.push((offset as i64).into());
                values
            },
        );
        let rows = self.database.query_all(stmt).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let operation: String = row.try_get("", "operation")?;
            out.push(TransactionRow {
                id: row.try_get("", "id")?,
                operation: OperationKind::try_from(operation.as_str())?,
                name: row.try_get("", "name")?,
                icon: row.try_get("", "icon")?,
                value: row.try_get("", "value")?,
                timestamp: row.try_get("", "timestamp")?,
                currency: Currency {
                    id: row.try_get("", "currency_id")?,
                    name: row.try_get("", "currency_name")?,
                    sign: row.try_get("", "currency_sign")?,
                    equity: row.try_get("", "currency_equity")?,
                },
                user: row.try_get("", "user_name")?,
            });
        }
        Ok((out, total))
    }
}
