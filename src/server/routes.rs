use crate::db::{Calculation, RECENT_LIMIT};
use crate::errors::{AppError, AppResult};
use crate::models::PricingInputs;
use crate::server::views;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::{Html, Json};
use std::sync::Arc;

/// GET / -- landing page
pub async fn index() -> Html<&'static str> {
    Html(views::INDEX_HTML)
}

/// POST /calculate -- validate, price, persist, render
pub async fn calculate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PricingInputs>, JsonRejection>,
) -> AppResult<Html<String>> {
    let Json(inputs) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    validate(&inputs)?;

    let prices = state.engine.price(&inputs)?;
    let calc = state
        .with_store(move |store| store.create(&inputs, &prices))
        .await?;

    tracing::info!(
        id = calc.id,
        call = calc.call_option_price,
        put = calc.put_option_price,
        "calculation stored"
    );
    Ok(Html(views::render_result(&calc)))
}

/// GET /calculations -- newest first, capped at RECENT_LIMIT
pub async fn list_calculations(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<serde_json::Value>> {
    let calcs = state.with_store(|store| store.list_recent(RECENT_LIMIT)).await?;
    Ok(Json(serde_json::json!({ "calculations": calcs })))
}

/// GET /calculations/{id}
pub async fn get_calculation(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Calculation>> {
    let Path(id) = id.map_err(|e| AppError::Validation(e.body_text()))?;
    state
        .with_store(move |store| store.get(id))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// Range checks applied before the engine sees the inputs.
pub fn validate(inputs: &PricingInputs) -> AppResult<()> {
    let fields = [
        ("stock_price", inputs.stock_price),
        ("strike_price", inputs.strike_price),
        ("time_to_maturity", inputs.time_to_maturity),
        ("risk_free_rate", inputs.risk_free_rate),
        ("dividend_yield", inputs.dividend_yield),
        ("volatility", inputs.volatility),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(AppError::Validation(format!("{name}: must be a finite number")));
        }
    }

    require("stock_price", inputs.stock_price > 0.0, "must be greater than 0")?;
    require("strike_price", inputs.strike_price > 0.0, "must be greater than 0")?;
    require("time_to_maturity", inputs.time_to_maturity > 0.0, "must be greater than 0")?;
    require("dividend_yield", inputs.dividend_yield >= 0.0, "must be greater than or equal to 0")?;
    require(
        "volatility",
        inputs.volatility > 0.0 && inputs.volatility <= 1.0,
        "must be greater than 0 and less than or equal to 1",
    )?;
    Ok(())
}

fn require(field: &str, ok: bool, rule: &str) -> AppResult<()> {
    if ok {
        Ok(())
    } else {
        Err(AppError::Validation(format!("{field}: {rule}")))
    }
}
