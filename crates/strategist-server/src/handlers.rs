//! HTTP Handlers

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use agent_core::AgentError;
use agent_core::provider::ModelInfo;
use finance_strategist::{
    Country, CountryRef, IndicatorBundle, MarketOverview, StrategistError, StrategyReport, UserProfile,
    economy::{HistoryRange, PolicyRate, PolicyRateTable, PriceHistory, is_ticker},
    estimate_tax,
    model::parse_money,
    tax::{FinancialInfo, TaxEstimate, financial_info, tax_strategies},
};

use crate::state::AppState;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

/// Error returned by every handler, rendered as `{ "error", "code" }`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn unknown_country(name: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "UNKNOWN_COUNTRY",
            format!("'{name}' is not a recognised country."),
        )
    }
}

impl From<StrategistError> for ApiError {
    fn from(err: StrategistError) -> Self {
        let (status, code) = match &err {
            StrategistError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            StrategistError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            StrategistError::UnsupportedCountry(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "UNSUPPORTED_COUNTRY")
            }
            StrategistError::NoData { .. } => (StatusCode::NOT_FOUND, "NO_DATA"),
            StrategistError::UpstreamStatus { .. }
            | StrategistError::Payload { .. }
            | StrategistError::Network(_) => (StatusCode::SERVICE_UNAVAILABLE, "UPSTREAM_UNAVAILABLE"),
            StrategistError::Agent(e) if e.is_retryable() => {
                (StatusCode::SERVICE_UNAVAILABLE, "LLM_UNAVAILABLE")
            }
            StrategistError::Agent(_) => (StatusCode::INTERNAL_SERVER_ERROR, "LLM_ERROR"),
            StrategistError::Config(_) | StrategistError::Serialization(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        if status.is_server_error() {
            tracing::error!(code, "request failed: {err}");
        } else {
            tracing::debug!(code, "request rejected: {err}");
        }
        Self::new(status, code, err.user_message())
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        StrategistError::Agent(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), "INVALID_JSON", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn known_country(name: &str) -> Result<Country, ApiError> {
    CountryRef::resolve(Some(name))
        .known()
        .ok_or_else(|| ApiError::unknown_country(name))
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub profile: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub llm_provider: String,
    pub llm_connected: bool,
    pub timestamp: DateTime<Utc>,
    pub features: &'static [&'static str],
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

#[derive(Serialize)]
pub struct ApiInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: &'static [EndpointInfo],
}

#[derive(Debug, Default, Deserialize)]
pub struct MarketQuery {
    pub country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StockQuery {
    pub range: Option<String>,
}

#[derive(Serialize)]
pub struct StockSummary {
    #[serde(flatten)]
    pub history: PriceHistory,
    pub range: HistoryRange,
    pub latest: Option<f64>,
    pub change_percent: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CountryQuery {
    pub annual_income: Option<String>,
    pub annual_gains: Option<String>,
}

#[derive(Serialize)]
pub struct CountryInfo {
    pub country: Country,
    pub iso_code: &'static str,
    pub currency: &'static str,
    pub currency_symbol: &'static str,
    pub benchmark_index: &'static str,
    pub financial_info: Option<FinancialInfo>,
    pub tax_strategies: &'static [&'static str],
    pub policy_rate: Option<PolicyRate>,
    pub tax_estimate: Option<TaxEstimate>,
}

const FEATURES: &[&str] = &[
    "questionnaire strategy",
    "free-text strategy",
    "economic indicators",
    "market overview",
    "country tax rules",
    "rule-based fallback",
];

const ENDPOINTS: &[EndpointInfo] = &[
    EndpointInfo { method: "POST", path: "/strategy", description: "Strategy from questionnaire answers" },
    EndpointInfo { method: "POST", path: "/strategy/text", description: "Strategy from a free-text description" },
    EndpointInfo { method: "GET", path: "/health", description: "Service and LLM status" },
    EndpointInfo { method: "GET", path: "/test", description: "Liveness check" },
    EndpointInfo { method: "GET", path: "/api/models", description: "Models offered by the LLM provider" },
    EndpointInfo { method: "GET", path: "/api/indicators/{country}", description: "Economic indicators" },
    EndpointInfo { method: "GET", path: "/api/market?country=", description: "Indices, sectors and bullish stocks" },
    EndpointInfo { method: "GET", path: "/api/stock/{symbol}?range=", description: "Price history summary" },
    EndpointInfo {
        method: "GET",
        path: "/api/country/{country}?annual_income=&annual_gains=",
        description: "Tax rules, strategies, policy rate and tax estimate",
    },
];

// ============================================================================
// Handlers
// ============================================================================

/// Strategy from questionnaire answers
pub async fn create_strategy(
    State(state): State<AppState>,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> ApiResult<StrategyReport> {
    let Json(request) = payload?;
    let report = state.pipeline.run_from_profile(request.profile).await?;
    Ok(Json(report))
}

/// Strategy from a free-text description
pub async fn create_strategy_from_text(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> ApiResult<StrategyReport> {
    let Json(request) = payload?;
    let report = state.pipeline.run_from_text(&request.text).await?;
    Ok(Json(report))
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider = state.pipeline.provider();
    let llm_connected = provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        llm_provider: provider.name().to_string(),
        llm_connected,
        timestamp: Utc::now(),
        features: FEATURES,
    })
}

pub async fn service_test() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        message: "Finance strategist service is running",
        timestamp: Utc::now(),
    })
}

pub async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo {
        name: "finance-strategist",
        version: env!("CARGO_PKG_VERSION"),
        description: "Personalized investment strategies from a short questionnaire, grounded in live economic data",
        endpoints: ENDPOINTS,
    })
}

pub async fn list_models(State(state): State<AppState>) -> ApiResult<Vec<ModelInfo>> {
    let models = state.pipeline.provider().list_models().await?;
    Ok(Json(models))
}

pub async fn indicators(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> ApiResult<IndicatorBundle> {
    let country = known_country(&country)?;
    let bundle = state.pipeline.economy().analyze(&CountryRef::Known(country)).await;
    Ok(Json(bundle))
}

/// Market overview; an absent country means the United States
pub async fn market_overview(
    State(state): State<AppState>,
    Query(query): Query<MarketQuery>,
) -> ApiResult<MarketOverview> {
    let country = match CountryRef::resolve(query.country.as_deref()) {
        CountryRef::Known(c) => c,
        CountryRef::Unknown(name) => return Err(ApiError::unknown_country(&name)),
    };
    Ok(Json(state.pipeline.market().overview(Some(country)).await))
}

pub async fn stock_history(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<StockQuery>,
) -> ApiResult<StockSummary> {
    let range = match query.range.as_deref() {
        Some(r) => r.parse::<HistoryRange>()?,
        None => HistoryRange::default(),
    };
    let symbol = symbol.trim().to_uppercase();
    if !is_ticker(&symbol) {
        return Err(StrategistError::InvalidInput(format!("'{symbol}' is not a ticker symbol")).into());
    }
    let history = state
        .pipeline
        .economy()
        .market_source()
        .history(&symbol, range)
        .await?;

    Ok(Json(StockSummary {
        range,
        latest: history.latest(),
        change_percent: history.change_percent().map(|c| (c * 100.0).round() / 100.0),
        history,
    }))
}

pub async fn country_info(
    Path(country): Path<String>,
    Query(query): Query<CountryQuery>,
) -> ApiResult<CountryInfo> {
    let country = known_country(&country)?;

    let money = |value: Option<&str>| -> Result<Option<Decimal>, StrategistError> {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(parse_money)
            .transpose()
    };
    let annual_income = money(query.annual_income.as_deref())?;
    let annual_gains = money(query.annual_gains.as_deref())?;

    let tax_estimate = match (annual_income, annual_gains) {
        (None, None) => None,
        (income, gains) => Some(estimate_tax(
            country,
            income.unwrap_or(Decimal::ZERO),
            gains.unwrap_or(Decimal::ZERO),
        )?),
    };

    Ok(Json(CountryInfo {
        country,
        iso_code: country.iso2(),
        currency: country.currency(),
        currency_symbol: country.currency_symbol(),
        benchmark_index: country.benchmark_index(),
        financial_info: financial_info(country),
        tax_strategies: tax_strategies(country),
        policy_rate: PolicyRateTable::lookup(country),
        tax_estimate,
    }))
}
