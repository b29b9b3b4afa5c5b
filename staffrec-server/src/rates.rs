//! Currency exchange rate lookup
//!
//! Rates come from an exchangeratesapi.io-style service that quotes every
//! currency against EUR; a cross rate from -> to is `rates[to] /
//! rates[from]`. Lookups are cached per currency pair for a bounded time
//! window. The provider is a trait so the statistics service can be
//! tested without network access, and so deployments without an API key
//! can run on the fixed sample table via an explicit configuration flag.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;

use staffrec_common::config::RatesSettings;
use staffrec_common::{Error, Result};

/// Exchange rate lookup: multiplier converting `from` amounts to `to`
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn rate(&self, from: &str, to: &str) -> Result<f64>;
}

/// Fixed EUR-base sample table for deployments without an API key
pub struct SampleRates;

/// 1 EUR in each currency, sampled 2023-07-07
const SAMPLE_EUR_RATES: &[(&str, f64)] = &[
    ("AED", 4.008051),
    ("AUD", 1.638818),
    ("BRL", 5.325988),
    ("CAD", 1.452003),
    ("CHF", 0.974357),
    ("CLP", 879.750645),
    ("CNY", 7.885376),
    ("COP", 4599.499003),
    ("CZK", 23.861087),
    ("DKK", 7.449929),
    ("EUR", 1.0),
    ("GBP", 0.853273),
    ("HKD", 8.540661),
    ("HUF", 385.642006),
    ("IDR", 16535.246493),
    ("ILS", 4.038633),
    ("INR", 90.153233),
    ("JPY", 155.661603),
    ("KRW", 1420.588891),
    ("MXN", 18.702732),
    ("MYR", 5.095315),
    ("NOK", 11.673589),
    ("NZD", 1.762955),
    ("PHP", 60.594871),
    ("PLN", 4.464846),
    ("RON", 4.954331),
    ("RUB", 99.980355),
    ("SAR", 4.093722),
    ("SEK", 11.904599),
    ("SGD", 1.472207),
    ("THB", 38.34389),
    ("TRY", 28.408712),
    ("TWD", 34.126436),
    ("USD", 1.091191),
    ("ZAR", 20.69241),
];

fn sample_eur_rate(code: &str) -> Result<f64> {
    SAMPLE_EUR_RATES
        .iter()
        .find(|(name, _)| *name == code)
        .map(|(_, rate)| *rate)
        .ok_or_else(|| Error::UnknownCurrency(code.to_string()))
}

#[async_trait]
impl RateProvider for SampleRates {
    async fn rate(&self, from: &str, to: &str) -> Result<f64> {
        let from_eur = sample_eur_rate(from)?;
        let to_eur = sample_eur_rate(to)?;
        Ok(to_eur / from_eur)
    }
}

/// Rate API JSON response
///
/// ```json
/// { "success": true, "base": "EUR",
///   "rates": { "USD": 1.089028, "PLN": 4.481929 } }
/// ```
#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Live exchange rate client with a TTL cache per currency pair
pub struct HttpRates {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    ttl: Duration,
    cache: Mutex<HashMap<(String, String), (f64, Instant)>>,
}

impl HttpRates {
    pub fn new(settings: &RatesSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: settings.api_url.clone(),
            api_key: settings.api_key.clone().unwrap_or_default(),
            ttl: Duration::from_secs(settings.cache_ttl_secs),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cached(&self, from: &str, to: &str) -> Option<f64> {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        let (rate, fetched_at) = cache.get(&(from.to_string(), to.to_string()))?;
        (fetched_at.elapsed() < self.ttl).then_some(*rate)
    }

    fn store(&self, from: &str, to: &str, rate: f64) {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.insert((from.to_string(), to.to_string()), (rate, Instant::now()));
    }

    async fn fetch(&self, from: &str, to: &str) -> Result<f64> {
        let url = format!("{}/latest", self.api_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("access_key", self.api_key.as_str()),
                ("symbols", &format!("{},{}", from, to)),
            ])
            .send()
            .await
            .map_err(|e| Error::Internal(format!("rate API request failed: {}", e)))?;

        let status = response.status();
        let body: RatesResponse = response
            .json()
            .await
            .map_err(|e| Error::ExchangeRateFormat(format!("malformed rate API body: {}", e)))?;

        if !status.is_success() || !body.success {
            return Err(Error::ExchangeRateFormat(format!(
                "rate API returned status {} (success: {})",
                status, body.success
            )));
        }

        let from_eur = *body
            .rates
            .get(from)
            .ok_or_else(|| Error::UnknownCurrency(from.to_string()))?;
        let to_eur = *body
            .rates
            .get(to)
            .ok_or_else(|| Error::UnknownCurrency(to.to_string()))?;
        if from_eur <= 0.0 {
            return Err(Error::ExchangeRateFormat(format!(
                "non-positive rate for {}",
                from
            )));
        }

        Ok(to_eur / from_eur)
    }
}

#[async_trait]
impl RateProvider for HttpRates {
    async fn rate(&self, from: &str, to: &str) -> Result<f64> {
        if let Some(rate) = self.cached(from, to) {
            return Ok(rate);
        }
        let rate = self.fetch(from, to).await?;
        self.store(from, to, rate);
        Ok(rate)
    }
}
