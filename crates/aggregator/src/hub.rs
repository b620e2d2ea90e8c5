//! The data hub: cached, always-available directory and series access.
//!
//! Failures from the client are absorbed here: this is the single
//! conversion point where Result-style outcomes become the "always
//! return a usable value" contract the presentation layer relies on.

use std::time::Duration;

use common::{Catalog, CountryDirectory, DashboardConfig, IndicatorTable};
use tracing::warn;
use worldbank_client::{HttpTransport, Transport, WorldBankClient};

use crate::cache::TtlCache;
use crate::scope::ScopeFilter;

/// Orchestrates the World Bank client and the response caches.
pub struct DataHub<T: Transport = HttpTransport> {
    client: WorldBankClient<T>,
    catalog: Catalog,
    directories: TtlCache<CountryDirectory>,
    tables: TtlCache<IndicatorTable>,
}

impl DataHub<HttpTransport> {
    pub fn new(config: &DashboardConfig) -> Self {
        Self::with_transport(HttpTransport::new(config.timeout_secs), config)
    }
}

impl<T: Transport> DataHub<T> {
    pub fn with_transport(transport: T, config: &DashboardConfig) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_secs);
        Self {
            client: WorldBankClient::with_transport(transport, config),
            catalog: config.catalog.clone(),
            directories: TtlCache::new(ttl),
            tables: TtlCache::new(ttl),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Resolve the selectable country directory for a filter.
    ///
    /// Never fails and never returns an empty directory: any remote or
    /// normalization problem, or an empty upstream listing, falls back
    /// to the built-in sample countries.
    pub async fn resolve_directory(&self, filter: &ScopeFilter) -> CountryDirectory {
        let scope = filter.scope();
        let key = scope.cache_key();

        let resolved = self
            .directories
            .get_or_compute(&key, || self.client.fetch_countries(&scope))
            .await;

        match resolved {
            Ok(directory) if !directory.is_empty() => directory,
            Ok(_) => {
                warn!("country listing for {key} came back empty, using sample countries");
                self.catalog.sample_directory()
            }
            Err(e) => {
                warn!("could not fetch country list ({key}): {e}, using sample countries");
                self.catalog.sample_directory()
            }
        }
    }

    /// Fetch one indicator table for a set of country codes and a year
    /// range.
    ///
    /// Never fails: remote errors degrade to an empty table, the
    /// canonical "no data" signal. Codes are forwarded in caller order;
    /// only the cache key sorts them, so permuted selections share an
    /// entry.
    pub async fn fetch_series(
        &self,
        indicator_code: &str,
        country_codes: &[String],
        start_year: i32,
        end_year: i32,
    ) -> IndicatorTable {
        if country_codes.is_empty() {
            warn!("{indicator_code}: no countries selected, returning empty table");
            return IndicatorTable::new();
        }

        let mut sorted = country_codes.to_vec();
        sorted.sort();
        let key = format!(
            "series:{indicator_code}:{}:{start_year}:{end_year}",
            sorted.join(";")
        );

        let fetched = self
            .tables
            .get_or_compute(&key, || {
                self.client
                    .fetch_indicator(indicator_code, country_codes, start_year, end_year)
            })
            .await;

        match fetched {
            Ok(table) => table,
            Err(e) => {
                warn!("error fetching {indicator_code}: {e}, returning empty table");
                IndicatorTable::new()
            }
        }
    }
}
