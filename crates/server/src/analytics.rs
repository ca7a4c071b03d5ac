use axum::{
    Json,
    extract::{Query, State},
};

use api_types::{
    ResponseMulti,
    analytics::{
        AnalyticsQuery, BasicAnalyticsView, CostsAnalyticsView, CostsByCategoryView,
        IncomesAnalyticsView, IncomesBySourceView, Period,
    },
    transaction,
};
use engine::{AnalyticsFilter, CurrencyAnalytics, IncomeSource, money};

use crate::{ServerError, currencies::currency_view, server::ServerState};

/// Pick exactly one window selector out of the query parameters.
fn resolve_filter(query: AnalyticsQuery) -> Result<AnalyticsFilter, ServerError> {
    match (query.period, query.start_date, query.end_date, query.pattern) {
        (Some(period), None, None, None) => {
            let (start, end) = match period {
                Period::CurrentMonth => (money::first_day_of_current_month(), money::today()),
                Period::PreviousMonth => money::previous_month_range(),
            };
            Ok(AnalyticsFilter::Range { start, end })
        }
        (None, Some(start), Some(end), None) => Ok(AnalyticsFilter::Range { start, end }),
        (None, None, None, Some(pattern)) => Ok(AnalyticsFilter::Pattern(pattern)),
        _ => Err(ServerError::Generic(
            "specify a period, a full date range or a pattern".to_string(),
        )),
    }
}

fn source_to_api(source: IncomeSource) -> transaction::IncomeSource {
    match source {
        IncomeSource::Revenue => transaction::IncomeSource::Revenue,
        IncomeSource::Gift => transaction::IncomeSource::Gift,
        IncomeSource::Debt => transaction::IncomeSource::Debt,
        IncomeSource::Other => transaction::IncomeSource::Other,
    }
}

fn analytics_view(block: CurrencyAnalytics) -> BasicAnalyticsView {
    let total_ratio = money::pretty_ratio(block.total_ratio());
    BasicAnalyticsView {
        currency: currency_view(&block.currency),
        costs: CostsAnalyticsView {
            total: money::pretty_money(block.costs.total),
            categories: block
                .costs
                .categories
                .into_iter()
                .map(|breakdown| CostsByCategoryView {
                    id: breakdown.category.id,
                    name: breakdown.category.name,
                    total: money::pretty_money(breakdown.total),
                    ratio: breakdown.ratio,
                })
                .collect(),
        },
        incomes: IncomesAnalyticsView {
            total: money::pretty_money(block.incomes.total),
            sources: block
                .incomes
                .sources
                .into_iter()
                .map(|breakdown| IncomesBySourceView {
                    source: source_to_api(breakdown.source),
                    total: money::pretty_money(breakdown.total),
                })
                .collect(),
        },
        from_exchanges: money::pretty_money(block.from_exchanges),
        total_ratio,
    }
}

pub async fn basic(
    State(state): State<ServerState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<ResponseMulti<BasicAnalyticsView>>, ServerError> {
    let filter = resolve_filter(query)?;
    let blocks = state.engine.basic_analytics(&filter).await?;
    Ok(Json(ResponseMulti {
        result: blocks.into_iter().map(analytics_view).collect(),
    }))
}
