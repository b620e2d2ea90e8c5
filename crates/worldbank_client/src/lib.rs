//! World Bank API client.
//!
//! Fetches country listings and indicator time series from
//! `api.worldbank.org` and normalizes the `[metadata, data-or-null]`
//! envelope into flat records for the aggregation layer.

pub mod normalize;

use std::future::Future;

use common::{CountryDirectory, DashboardConfig, Error, IndicatorTable, Result};
use tracing::debug;

/// Scope applied to a country listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryScope {
    /// Every country the upstream knows about.
    All,
    /// Countries in one World Bank region (e.g. "SAS").
    Region(String),
    /// Countries in one income tier (e.g. "LIC").
    Income(String),
}

impl CountryScope {
    /// Stable identity of this scope, used as a cache key component.
    pub fn cache_key(&self) -> String {
        match self {
            CountryScope::All => "all".into(),
            CountryScope::Region(code) => format!("region:{code}"),
            CountryScope::Income(code) => format!("income:{code}"),
        }
    }
}

/// The raw HTTP seam.
///
/// The production implementation is [`HttpTransport`]; tests substitute a
/// canned-response fake to assert call counts and failure handling.
/// Stateless and retry-free; degradation policy lives upstream.
pub trait Transport: Send + Sync {
    /// Issue a GET and return the response body on a 2xx status.
    fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Reqwest-backed transport with connection pooling and a per-request
/// timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("health-dashboard/0.1 (indicator aggregation)")
            .pool_max_idle_per_host(4)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build World Bank HTTP client");

        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        debug!("GET {} ({} params)", url, query.len());

        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("HTTP error for {url}: {e}")))?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Remote {
                status,
                endpoint: url.to_string(),
                message: body[..body.len().min(500)].to_string(),
            });
        }

        resp.text()
            .await
            .map_err(|e| Error::Transport(format!("body read error for {url}: {e}")))
    }
}

/// Client for the World Bank v2 API, generic over the transport.
#[derive(Debug, Clone)]
pub struct WorldBankClient<T: Transport = HttpTransport> {
    transport: T,
    base_url: String,
    indicator_per_page: u32,
    country_per_page: u32,
    scoped_per_page: u32,
}

impl WorldBankClient<HttpTransport> {
    pub fn new(config: &DashboardConfig) -> Self {
        Self::with_transport(HttpTransport::new(config.timeout_secs), config)
    }
}

impl<T: Transport> WorldBankClient<T> {
    pub fn with_transport(transport: T, config: &DashboardConfig) -> Self {
        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            indicator_per_page: config.indicator_per_page,
            country_per_page: config.country_per_page,
            scoped_per_page: config.scoped_per_page,
        }
    }

    /// Fetch one indicator for a set of countries over a year range.
    ///
    /// Country codes are path-joined with `;` in caller order; the year
    /// range is forwarded verbatim (no ordering validation here).
    pub async fn fetch_indicator(
        &self,
        indicator_code: &str,
        country_codes: &[String],
        start_year: i32,
        end_year: i32,
    ) -> Result<IndicatorTable> {
        let joined = country_codes.join(";");
        let url = format!(
            "{}/country/{}/indicator/{}",
            self.base_url, joined, indicator_code
        );
        let query = [
            ("format", "json".to_string()),
            ("date", format!("{start_year}:{end_year}")),
            ("per_page", self.indicator_per_page.to_string()),
        ];

        let body = self.transport.get(&url, &query).await?;
        let table = normalize::indicator_table(&body)?;

        debug!(
            "{}: {} records for {} countries, {}-{}",
            indicator_code,
            table.len(),
            country_codes.len(),
            start_year,
            end_year
        );
        Ok(table)
    }

    /// Fetch the country directory for a scope.
    pub async fn fetch_countries(&self, scope: &CountryScope) -> Result<CountryDirectory> {
        let url = format!("{}/country", self.base_url);

        let mut query = vec![("format", "json".to_string())];
        match scope {
            CountryScope::All => {
                query.push(("per_page", self.country_per_page.to_string()));
            }
            CountryScope::Region(code) => {
                query.push(("region", code.clone()));
                query.push(("per_page", self.scoped_per_page.to_string()));
            }
            CountryScope::Income(code) => {
                query.push(("incomeLevel", code.clone()));
                query.push(("per_page", self.scoped_per_page.to_string()));
            }
        }

        let body = self.transport.get(&url, &query).await?;
        let directory = normalize::country_directory(&body)?;

        debug!("{:?}: {} countries", scope, directory.len());
        Ok(directory)
    }
}
