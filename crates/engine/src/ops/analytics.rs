//! Basic analytics: per-currency totals for a date range or a name pattern.
//!
//! Every currency gets a block, even when it has no activity in the window.
//! Exchanges have no user-given name, so a pattern filter skips them and the
//! `from_exchanges` accumulator stays at zero.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Statement, Value};
use serde::{Deserialize, Serialize};

use crate::{CostCategory, Currency, IncomeSource, ResultEngine, money};

use super::Engine;

/// Window selector: an inclusive date range or a case-insensitive name
/// pattern, never both.
#[derive(Clone, Debug)]
pub enum AnalyticsFilter {
    Range { start: NaiveDate, end: NaiveDate },
    Pattern(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: CostCategory,
    pub total: i64,
    /// Share of this category in the currency's cost total, 1 decimal place.
    pub ratio: f64,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct CostsSummary {
    pub total: i64,
    pub categories: Vec<CategoryBreakdown>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceBreakdown {
    pub source: IncomeSource,
    pub total: i64,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct IncomesSummary {
    pub total: i64,
    pub sources: Vec<SourceBreakdown>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrencyAnalytics {
    pub currency: Currency,
    pub costs: CostsSummary,
    pub incomes: IncomesSummary,
    /// Signed net flow from exchanges: inbound `to_value`s minus outbound
    /// `from_value`s for this currency.
    pub from_exchanges: i64,
}

impl CurrencyAnalytics {
    /// Costs as a percentage of effective inbound value.
    ///
    /// Exchange inflow counts as inbound only when the net is positive; with
    /// no effective inbound the ratio pins to 100.0.
    pub fn total_ratio(&self) -> f64 {
        let inbound = self.incomes.total + self.from_exchanges.max(0);
        if inbound <= 0 {
            return 100.0;
        }
        self.costs.total as f64 / inbound as f64 * 100.0
    }
}

fn filter_condition(filter: &AnalyticsFilter, alias: &str) -> (String, Vec<Value>) {
    match filter {
        AnalyticsFilter::Range { start, end } => (
            format!(" WHERE {alias}.timestamp >= ? AND {alias}.timestamp <= ?"),
            vec![(*start).into(), (*end).into()],
        ),
        AnalyticsFilter::Pattern(pattern) => (
            format!(" WHERE LOWER({alias}.name) LIKE ?"),
            vec![format!("%{}%", pattern.to_lowercase()).into()],
        ),
    }
}

impl Engine {
    /// Aggregate costs, incomes and exchange flows per currency.
    pub async fn basic_analytics(
        &self,
        filter: &AnalyticsFilter,
    ) -> ResultEngine<Vec<CurrencyAnalytics>> {
        let backend = self.database.get_database_backend();

        // costs grouped by (currency, category)
        let mut cost_groups: HashMap<i32, Vec<(CostCategory, i64)>> = HashMap::new();
        {
            let (cond, values) = filter_condition(filter, "c");
            let stmt = Statement::from_sql_and_values(
                backend,
                format!(
                    "SELECT c.currency_id AS currency_id, cat.id AS category_id, \
                     cat.name AS category_name, SUM(c.value) AS total \
                     FROM costs c \
                     JOIN cost_categories cat ON cat.id = c.category_id{cond} \
                     GROUP BY c.currency_id, cat.id, cat.name"
                ),
                values,
            );
            for row in self.database.query_all(stmt).await? {
                let currency_id: i32 = row.try_get("", "currency_id")?;
                let category = CostCategory {
                    id: row.try_get("", "category_id")?,
                    name: row.try_get("", "category_name")?,
                };
                let total: i64 = row.try_get("", "total")?;
                cost_groups
                    .entry(currency_id)
                    .or_default()
                    .push((category, total));
            }
        }

        // incomes grouped by (currency, source)
        let mut income_groups: HashMap<i32, Vec<(IncomeSource, i64)>> = HashMap::new();
        {
            let (cond, values) = filter_condition(filter, "i");
            let stmt = Statement::from_sql_and_values(
                backend,
                format!(
                    "SELECT i.currency_id AS currency_id, i.source AS source, \
                     SUM(i.value) AS total \
                     FROM incomes i{cond} \
                     GROUP BY i.currency_id, i.source \
                     ORDER BY i.source"
                ),
                values,
            );
            for row in self.database.query_all(stmt).await? {
                let currency_id: i32 = row.try_get("", "currency_id")?;
                let source: String = row.try_get("", "source")?;
                let total: i64 = row.try_get("", "total")?;
                income_groups
                    .entry(currency_id)
                    .or_default()
                    .push((IncomeSource::try_from(source.as_str())?, total));
            }
        }

        // net exchange flow per currency; meaningless under a pattern filter
        let mut exchange_flow: HashMap<i32, i64> = HashMap::new();
        if let AnalyticsFilter::Range { start, end } = filter {
            let stmt = Statement::from_sql_and_values(
                backend,
                "SELECT from_currency_id, to_currency_id, from_value, to_value \
                 FROM exchanges WHERE timestamp >= ? AND timestamp <= ?",
                [(*start).into(), (*end).into()],
            );
            for row in self.database.query_all(stmt).await? {
                let from_currency: i32 = row.try_get("", "from_currency_id")?;
                let to_currency: i32 = row.try_get("", "to_currency_id")?;
                let from_value: i64 = row.try_get("", "from_value")?;
                let to_value: i64 = row.try_get("", "to_value")?;
                *exchange_flow.entry(from_currency).or_default() -= from_value;
                *exchange_flow.entry(to_currency).or_default() += to_value;
            }
        }

        let mut out = Vec::new();
        for currency in self.currencies().await? {
            let costs = {
                let groups = cost_groups.remove(&currency.id).unwrap_or_default();
                let total: i64 = groups.iter().map(|(_, value)| value).sum();
                let mut categories: Vec<CategoryBreakdown> = groups
                    .into_iter()
                    .filter(|(_, value)| *value > 0)
                    .map(|(category, value)| CategoryBreakdown {
                        category,
                        total: value,
                        ratio: money::pretty_ratio(value as f64 / total as f64 * 100.0),
                    })
                    .collect();
                categories.sort_by(|a, b| {
                    b.ratio.partial_cmp(&a.ratio).unwrap_or(Ordering::Equal)
                });
                CostsSummary { total, categories }
            };

            let incomes = {
                let groups = income_groups.remove(&currency.id).unwrap_or_default();
                let total: i64 = groups.iter().map(|(_, value)| value).sum();
                let sources = groups
                    .into_iter()
                    .map(|(source, value)| SourceBreakdown {
                        source,
                        total: value,
                    })
                    .collect();
                IncomesSummary { total, sources }
            };

            let from_exchanges = exchange_flow.remove(&currency.id).unwrap_or(0);

            out.push(CurrencyAnalytics {
                currency,
                costs,
                incomes,
                from_exchanges,
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analytics(costs: i64, incomes: i64, from_exchanges: i64) -> CurrencyAnalytics {
        CurrencyAnalytics {
            currency: Currency {
                id: 1,
                name: "US Dollar".to_string(),
                sign: "$".to_string(),
                equity: 0,
            },
            costs: CostsSummary {
                total: costs,
                categories: Vec::new(),
            },
            incomes: IncomesSummary {
                total: incomes,
                sources: Vec::new(),
            },
            from_exchanges,
        }
    }

    #[test]
    fn total_ratio_counts_positive_exchange_flow_as_inbound() {
        let block = analytics(20000, 50000, 15000);
        assert_eq!(money::pretty_ratio(block.total_ratio()), 30.8);
    }

    #[test]
    fn total_ratio_ignores_negative_exchange_flow() {
        let block = analytics(20000, 50000, -15000);
        assert_eq!(money::pretty_ratio(block.total_ratio()), 40.0);
    }

    #[test]
    fn total_ratio_pins_to_hundred_without_inbound() {
        let block = analytics(20000, 0, 0);
        assert_eq!(block.total_ratio(), 100.0);
        let block = analytics(20000, 0, -500);
        assert_eq!(block.total_ratio(), 100.0);
    }
}
