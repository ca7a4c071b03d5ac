use axum::{
    Extension, Json,
    extract::{Query, State},
};

use api_types::{
    ResponseMultiPaginated,
    transaction::{self, TransactionView, TransactionsQuery},
};
use engine::{OperationKind, TransactionsFilter, money, users};

use crate::{
    DEFAULT_PAGE_SIZE, ServerError, currencies::currency_view, paginated, server::ServerState,
};

fn operation_from_api(operation: transaction::OperationKind) -> OperationKind {
    match operation {
        transaction::OperationKind::Cost => OperationKind::Cost,
        transaction::OperationKind::Income => OperationKind::Income,
        transaction::OperationKind::Exchange => OperationKind::Exchange,
    }
}

fn operation_to_api(operation: OperationKind) -> transaction::OperationKind {
    match operation {
        OperationKind::Cost => transaction::OperationKind::Cost,
        OperationKind::Income => transaction::OperationKind::Income,
        OperationKind::Exchange => transaction::OperationKind::Exchange,
    }
}

/// The merged reverse-chronological feed over costs, incomes and exchanges.
pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<ResponseMultiPaginated<TransactionView>>, ServerError> {
    let offset = query.context.unwrap_or(0);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);

    let filter = TransactionsFilter {
        user_id: query.only_mine.unwrap_or(false).then_some(user.id),
        operation: query.operation.map(operation_from_api),
        currency_id: query.currency_id,
        cost_category_id: query.cost_category_id,
        start_date: query.start_date,
        end_date: query.end_date,
        pattern: query.pattern,
    };

    let (rows, total) = state.engine.transactions(&filter, offset, limit).await?;
    let views = rows
        .into_iter()
        .map(|row| TransactionView {
            id: row.id,
            operation: operation_to_api(row.operation),
            name: row.name,
            icon: row.icon,
            value: money::pretty_money(row.value),
            timestamp: row.timestamp,
            currency: currency_view(&row.currency),
            user: row.user,
        })
        .collect();
    Ok(Json(paginated(views, offset, total)))
}
