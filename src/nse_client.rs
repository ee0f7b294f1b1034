use crate::config;
use crate::error::AnalyzerError;
use crate::history::{DailyClose, HistoryProvider};
use crate::models::{DateRange, OptionChain, OptionType};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rand::{seq::SliceRandom, thread_rng};
use reqwest::{header, Client};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::warn;

// -----------------------------------------------
// CLIENT WRAPPER WITH SESSION STATE
// -----------------------------------------------
pub struct NSEClient {
    client: Client,
    warmed_up: Arc<RwLock<bool>>,
}

impl NSEClient {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            warmed_up: Arc::new(RwLock::new(false)),
        })
    }

    /// Warmup NSE session (only once per client)
    async fn warmup_if_needed(&self) -> Result<()> {
        // Check if already warmed up
        if *self.warmed_up.read().await {
            return Ok(());
        }

        // Acquire write lock and warmup
        let mut warmed = self.warmed_up.write().await;
        if !*warmed {
            let _ = self
                .client
                .get(config::NSE_BASE_URL)
                .header("Accept", config::HEADER_ACCEPT_HTML)
                .send()
                .await
                .context("Failed to warm up NSE session")?;

            tokio::time::sleep(Duration::from_millis(config::WARMUP_DELAY_MS)).await;
            *warmed = true;
        }

        Ok(())
    }

    /// Single-attempt fetch. NSE failures are frequent and expected; the
    /// caller decides what to show, nothing is retried here.
    async fn fetch_json(&self, url: &str) -> Result<String> {
        self.warmup_if_needed().await?;

        let res = self
            .client
            .get(url)
            .header("Referer", config::HEADER_REFERER)
            .header("X-Requested-With", config::HEADER_X_REQUESTED_WITH)
            .send()
            .await
            .context("Request send failed")?;

        let status = res.status();

        if status.is_success() {
            let text = res.text().await.context("Failed to read body")?;

            // NSE serves an HTML block page with status 200 when it
            // refuses a client; validate the body looks like JSON.
            let trimmed = text.trim();
            if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
                let preview: String = text.chars().take(200).collect();
                anyhow::bail!("Non-JSON response: {}", preview);
            }

            Ok(text)
        } else {
            let body = res.text().await.unwrap_or_default();
            let preview: String = body.chars().take(200).collect();
            anyhow::bail!("HTTP {}: {}", status, preview)
        }
    }

    // -----------------------------------------------
    // LIVE OPTION CHAIN
    // -----------------------------------------------
    pub async fn fetch_option_chain(&self, symbol: &str) -> Result<OptionChain, AnalyzerError> {
        let url = config::nse_option_chain_url(symbol);

        let text = self.fetch_json(&url).await.map_err(|e| {
            warn!(symbol, error = %format!("{:#}", e), "live option-chain fetch failed");
            AnalyzerError::LiveFetchBlocked(format!("{:#}", e))
        })?;

        serde_json::from_str(&text).map_err(|e| {
            warn!(symbol, error = %e, "live option-chain payload did not parse");
            AnalyzerError::LiveFetchBlocked(e.to_string())
        })
    }
}

// -----------------------------------------------
// HISTORICAL DATA (foCPV)
// -----------------------------------------------

#[derive(Debug, Deserialize)]
struct HistoricalResponse {
    #[serde(default)]
    data: Vec<HistoricalRow>,
}

// foCPV rows carry dates as `06-Jan-2026` and prices as strings.
#[derive(Debug, Deserialize)]
struct HistoricalRow {
    #[serde(rename = "FH_TIMESTAMP")]
    timestamp: String,

    #[serde(rename = "FH_CLOSING_PRICE")]
    closing_price: String,
}

impl HistoryProvider for NSEClient {
    async fn fetch_close_history(
        &self,
        symbol: &str,
        option_type: OptionType,
        strike_price: f64,
        expiry: NaiveDate,
        range: &DateRange,
    ) -> Result<Vec<DailyClose>, AnalyzerError> {
        let url = config::nse_option_history_url(
            symbol,
            option_type.as_str(),
            strike_price,
            &expiry.format(config::EXPIRY_DATE_FMT).to_string(),
            &range.start.format(config::RANGE_DATE_FMT).to_string(),
            &range.end.format(config::RANGE_DATE_FMT).to_string(),
        );

        let text = self
            .fetch_json(&url)
            .await
            .map_err(|e| AnalyzerError::UpstreamFetch(format!("{:#}", e)))?;

        let parsed: HistoricalResponse = serde_json::from_str(&text).map_err(|e| {
            AnalyzerError::UpstreamFetch(format!("unexpected response shape: {}", e))
        })?;

        let mut rows = Vec::with_capacity(parsed.data.len());
        for row in parsed.data {
            let date = NaiveDate::parse_from_str(&row.timestamp, config::EXPIRY_DATE_FMT)
                .map_err(|e| {
                    AnalyzerError::UpstreamFetch(format!(
                        "bad FH_TIMESTAMP {:?}: {}",
                        row.timestamp, e
                    ))
                })?;
            let close: f64 = row.closing_price.parse().map_err(|_| {
                AnalyzerError::UpstreamFetch(format!(
                    "bad FH_CLOSING_PRICE {:?}",
                    row.closing_price
                ))
            })?;
            rows.push(DailyClose { date, close });
        }

        Ok(rows)
    }
}

// -----------------------------------------------
// HTTP CLIENT BUILDER
// -----------------------------------------------
fn build_client() -> Result<Client> {
    let mut headers = header::HeaderMap::new();

    // Rotating Accept-Language headers (fingerprint avoidance)
    let lang = config::ACCEPT_LANGUAGES.choose(&mut thread_rng()).unwrap();
    headers.insert(header::ACCEPT_LANGUAGE, header::HeaderValue::from_str(lang)?);
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("*/*"));

    Ok(Client::builder()
        .default_headers(headers)
        .cookie_store(true) // crucial for NSE
        .user_agent(config::USER_AGENT)
        .timeout(config::HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?)
}
