use moka::future::Cache;
use reqwest::Client;
use serde_json::Value;

use crate::error::AppError;

/// Proxy for the upstream public-holiday API. Successful responses are cached
/// for the lifetime of the process, keyed by country and year.
#[derive(Clone)]
pub struct HolidayService {
    client: Client,
    cache: Cache<String, Value>,
    base_url: String,
}

impl HolidayService {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            cache: Cache::builder().build(),
            base_url,
        }
    }

    fn cache_key(country: &str, year: i32) -> String {
        format!("{}/{}", country.trim().to_uppercase(), year)
    }

    pub async fn lookup(&self, country: &str, year: i32) -> Result<Value, AppError> {
        let key = Self::cache_key(country, year);

        if let Some(cached) = self.cache.get(&key).await {
            log::debug!("Responding with cached holidays for {}", key);
            return Ok(cached);
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("action", "getPublicHolidaysForYear"),
                ("year", &year.to_string()),
                ("country", country),
            ])
            .send()
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        // The upstream reports failures inside the payload rather than via
        // status codes.
        if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
            let message = error
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(AppError::BadRequest(message));
        }

        log::debug!("Caching holidays for {}", key);
        self.cache.insert(key, body.clone()).await;

        Ok(body)
    }

    /// Pre-populates the cache. Test hook; lookups hit the cache before the
    /// network.
    pub async fn prime(&self, country: &str, year: i32, payload: Value) {
        self.cache
            .insert(Self::cache_key(country, year), payload)
            .await;
    }
}
