use crate::config;
use crate::history;
use crate::models::{
    parse_spot_input, ContractSpec, DateRange, OptionType, PricePoint, StraddleSnapshot,
};
use crate::nse_client::NSEClient;
use crate::straddle;
use anyhow::Result;
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;

// -----------------------------------------------
// API REQUEST/RESPONSE MODELS
// -----------------------------------------------

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Manually entered spot; the strike is snapped from it.
    pub spot: String,
    /// Contract expiry, e.g. `30-Dec-2025`.
    pub expiry: String,
    /// "CE", "PE", or "straddle".
    pub option_type: String,
    /// Range start, e.g. `01-11-2025`.
    pub from: String,
    /// Range end, e.g. `30-11-2025`.
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub processing_time_ms: Option<u64>,
}

impl<T> ApiResponse<T> {
    fn success(data: T, start_time: Instant) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            processing_time_ms: Some(start_time.elapsed().as_millis() as u64),
        }
    }

    fn failure(message: impl Into<String>, start_time: Instant) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            processing_time_ms: Some(start_time.elapsed().as_millis() as u64),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub symbol: String,
    pub strike_price: f64,
    pub expiry: NaiveDate,
    pub option_types: Vec<OptionType>,
    pub points: Vec<PricePoint>,
}

// -----------------------------------------------
// APPLICATION STATE
// -----------------------------------------------

#[derive(Clone)]
pub struct AppState {
    client: Arc<NSEClient>,
}

impl AppState {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: Arc::new(NSEClient::new()?),
        })
    }
}

// -----------------------------------------------
// API HANDLERS
// -----------------------------------------------

/// GET /api/history?spot=17823&expiry=30-Dec-2025&option_type=straddle&from=01-11-2025&to=30-11-2025
async fn get_history(
    Query(query): Query<HistoryQuery>,
    State(app_state): State<AppState>,
) -> Json<ApiResponse<HistoryResponse>> {
    let start_time = Instant::now();

    let spot = match parse_spot_input(&query.spot) {
        Ok(spot) => spot,
        Err(e) => return Json(ApiResponse::failure(e.to_string(), start_time)),
    };

    let option_types = match OptionType::parse_selection(&query.option_type) {
        Some(types) => types,
        None => {
            return Json(ApiResponse::failure(
                format!("Unknown option type {:?} (use CE, PE, or straddle)", query.option_type),
                start_time,
            ));
        }
    };

    let expiry = match NaiveDate::parse_from_str(&query.expiry, config::EXPIRY_DATE_FMT) {
        Ok(date) => date,
        Err(_) => {
            return Json(ApiResponse::failure(
                format!("Invalid expiry date {:?} (expected e.g. 30-Dec-2025)", query.expiry),
                start_time,
            ));
        }
    };

    let range = match parse_range(&query.from, &query.to) {
        Ok(range) => range,
        Err(message) => return Json(ApiResponse::failure(message, start_time)),
    };

    let spec = ContractSpec {
        symbol: config::DEFAULT_SYMBOL.to_string(),
        strike_price: straddle::atm_strike(spot),
        expiry,
        option_types,
    };

    match history::assemble_series(app_state.client.as_ref(), &spec, &range).await {
        Ok(series) => Json(ApiResponse::success(
            HistoryResponse {
                symbol: spec.symbol,
                strike_price: spec.strike_price,
                expiry: spec.expiry,
                option_types: series.option_types,
                points: series.points,
            },
            start_time,
        )),
        Err(e) => Json(ApiResponse::failure(e.to_string(), start_time)),
    }
}

/// GET /api/straddle - one live ATM straddle snapshot
async fn get_straddle(
    State(app_state): State<AppState>,
) -> Json<ApiResponse<StraddleSnapshot>> {
    let start_time = Instant::now();

    let chain = match app_state.client.fetch_option_chain(config::DEFAULT_SYMBOL).await {
        Ok(chain) => chain,
        Err(e) => return Json(ApiResponse::failure(e.to_string(), start_time)),
    };

    match straddle::compute_snapshot(&chain) {
        Ok(snapshot) => Json(ApiResponse::success(snapshot, start_time)),
        Err(e) => Json(ApiResponse::failure(e.to_string(), start_time)),
    }
}

// -----------------------------------------------
// HELPER FUNCTIONS
// -----------------------------------------------

fn parse_range(from: &str, to: &str) -> Result<DateRange, String> {
    let start = NaiveDate::parse_from_str(from, config::RANGE_DATE_FMT)
        .map_err(|_| format!("Invalid from date {:?} (expected e.g. 01-11-2025)", from))?;
    let end = NaiveDate::parse_from_str(to, config::RANGE_DATE_FMT)
        .map_err(|_| format!("Invalid to date {:?} (expected e.g. 30-11-2025)", to))?;
    Ok(DateRange { start, end })
}

// -----------------------------------------------
// SERVER SETUP
// -----------------------------------------------

pub async fn start_server(port: u16) -> Result<()> {
    let app_state = AppState::new()?;

    let app = Router::new()
        .route("/api/history", get(get_history))
        .route("/api/straddle", get(get_straddle))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("NSE straddle API running on http://{}", addr);
    println!("Available endpoints:");
    println!("   GET  /api/history?spot=17823&expiry=30-Dec-2025&option_type=straddle&from=01-11-2025&to=30-11-2025");
    println!("   GET  /api/straddle");
    println!();

    axum::serve(listener, app).await?;
    Ok(())
}
