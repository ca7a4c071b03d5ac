use axum::{Json, extract::State, http::StatusCode};

use api_types::{
    Response, ResponseMulti,
    currency::{CurrencyCreateBody, CurrencyView, EquityView},
};
use engine::money;

use crate::{ServerError, server::ServerState};

pub(crate) fn currency_view(currency: &engine::Currency) -> CurrencyView {
    CurrencyView {
        id: currency.id,
        name: currency.name.clone(),
        sign: currency.sign.clone(),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(body): Json<CurrencyCreateBody>,
) -> Result<(StatusCode, Json<Response<CurrencyView>>), ServerError> {
    let currency = state.engine.create_currency(&body.name, &body.sign).await?;
    Ok((
        StatusCode::CREATED,
        Json(Response {
            result: currency_view(&currency),
        }),
    ))
}

/// Every currency with its equity in major units.
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<ResponseMulti<EquityView>>, ServerError> {
    let currencies = state.engine.currencies().await?;
    let result = currencies
        .iter()
        .map(|currency| EquityView {
            currency: currency_view(currency),
            amount: money::pretty_money(currency.equity),
        })
        .collect();
    Ok(Json(ResponseMulti { result }))
}
