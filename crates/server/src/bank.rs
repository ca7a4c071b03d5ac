//! Bank statement import (Monobank personal API).
//!
//! Only outgoing entries become costs; inbound ones and entries seen in a
//! previous sync are counted as skipped. Dedup is keyed by the bank's entry
//! id per user, so re-running a sync over the same window is safe.

use axum::{Extension, Json, extract::State};
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;

use api_types::{
    Response,
    sync::{SyncBody, SyncView},
};
use engine::{CostDraft, money, users};

use crate::{ServerError, server::ServerState};

const STATEMENT_URL: &str = "https://api.monobank.ua/personal/statement/0";

/// One statement row as the bank reports it. `amount` is in minor units,
/// negative for outgoing payments.
#[derive(Debug, Deserialize)]
struct StatementEntry {
    id: String,
    time: i64,
    description: String,
    amount: i64,
}

async fn fetch_statement(
    api_key: &str,
    from: i64,
    to: i64,
) -> Result<Vec<StatementEntry>, ServerError> {
    let response = reqwest::Client::new()
        .get(format!("{STATEMENT_URL}/{from}/{to}"))
        .header("X-Token", api_key)
        .send()
        .await
        .map_err(|err| ServerError::Generic(format!("bank request failed: {err}")))?;

    if !response.status().is_success() {
        return Err(ServerError::Generic(format!(
            "bank responded with {}",
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|err| ServerError::Generic(format!("unreadable bank statement: {err}")))
}

fn day_start(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

fn entry_date(entry_time: i64) -> NaiveDate {
    DateTime::from_timestamp(entry_time, 0)
        .map(|moment| moment.date_naive())
        .unwrap_or_else(money::today)
}

pub async fn sync(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(body): Json<SyncBody>,
) -> Result<Json<Response<SyncView>>, ServerError> {
    let start = match &body.start_date {
        Some(raw) => money::timestamp_from_raw(raw)?,
        None => money::first_day_of_current_month(),
    };
    let end = match &body.end_date {
        Some(raw) => money::timestamp_from_raw(raw)?,
        None => money::today(),
    };

    // inclusive window: end of the last day is one second short of midnight
    let entries =
        fetch_statement(&body.api_key, day_start(start), day_start(end) + 86_399).await?;

    let mut imported = 0;
    let mut skipped = 0;
    for entry in entries {
        if entry.amount >= 0 {
            skipped += 1;
            continue;
        }
        if state.engine.already_imported(user.id, &entry.id).await? {
            skipped += 1;
            continue;
        }

        let name = if entry.description.trim().is_empty() {
            "bank payment".to_string()
        } else {
            entry.description
        };
        state
            .engine
            .add_cost(CostDraft {
                name,
                value: -entry.amount,
                timestamp: entry_date(entry.time),
                user_id: user.id,
                currency_id: body.currency_id,
                category_id: body.category_id,
            })
            .await?;
        state.engine.mark_imported(user.id, &entry.id).await?;
        imported += 1;
    }

    Ok(Json(Response {
        result: SyncView { imported, skipped },
    }))
}
