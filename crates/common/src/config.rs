//! Configuration types: upstream settings and the indicator catalog.

use serde::{Deserialize, Serialize};

use crate::types::CountryDirectory;

/// Top-level configuration for the data layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the World Bank v2 API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// TTL for cached directories and tables, in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Page size for indicator queries.
    #[serde(default = "default_indicator_per_page")]
    pub indicator_per_page: u32,

    /// Page size for the full country listing.
    #[serde(default = "default_country_per_page")]
    pub country_per_page: u32,

    /// Page size for region/income-scoped country listings.
    #[serde(default = "default_scoped_per_page")]
    pub scoped_per_page: u32,

    /// Soft cap on countries per series request (UI selection limit).
    #[serde(default = "default_max_countries")]
    pub max_countries: usize,

    /// Indicator and taxonomy catalog.
    #[serde(default)]
    pub catalog: Catalog,
}

/// Injected lookup tables: indicators, scope taxonomies, and the
/// built-in sample countries used as the resolver fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default = "default_indicators")]
    pub indicators: Vec<IndicatorEntry>,

    #[serde(default = "default_regions")]
    pub regions: Vec<ScopeEntry>,

    #[serde(default = "default_income_groups")]
    pub income_groups: Vec<ScopeEntry>,

    #[serde(default = "default_sample_countries")]
    pub sample_countries: Vec<CountryEntry>,

    /// Country names pre-selected when the caller names none.
    #[serde(default = "default_selection")]
    pub default_selection: Vec<String>,
}

/// A named indicator and its upstream code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorEntry {
    pub name: String,
    pub code: String,
}

/// A region or income-group label and its scope code.
///
/// `code: None` means "no scoping" (the All entry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeEntry {
    pub label: String,
    pub code: Option<String>,
}

/// A country display name and ISO alpha-3 code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryEntry {
    pub name: String,
    pub code: String,
}

impl Catalog {
    /// Upstream code for an indicator display name.
    pub fn indicator_code(&self, name: &str) -> Option<&str> {
        self.indicators
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.code.as_str())
    }

    /// Scope code for a region label, if the label scopes at all.
    pub fn region_code(&self, label: &str) -> Option<&str> {
        self.regions
            .iter()
            .find(|e| e.label == label)
            .and_then(|e| e.code.as_deref())
    }

    /// Scope code for an income-group label, if the label scopes at all.
    pub fn income_code(&self, label: &str) -> Option<&str> {
        self.income_groups
            .iter()
            .find(|e| e.label == label)
            .and_then(|e| e.code.as_deref())
    }

    /// The fallback directory, as a sorted name→code mapping.
    pub fn sample_directory(&self) -> CountryDirectory {
        self.sample_countries
            .iter()
            .map(|c| (c.name.clone(), c.code.clone()))
            .collect()
    }
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_base_url() -> String {
    "https://api.worldbank.org/v2".into()
}

fn default_timeout() -> u64 {
    30
}

fn default_cache_ttl() -> u64 {
    86_400
}

fn default_indicator_per_page() -> u32 {
    1000
}

fn default_country_per_page() -> u32 {
    300
}

fn default_scoped_per_page() -> u32 {
    100
}

fn default_max_countries() -> usize {
    10
}

fn entry(name: &str, code: &str) -> IndicatorEntry {
    IndicatorEntry {
        name: name.into(),
        code: code.into(),
    }
}

fn default_indicators() -> Vec<IndicatorEntry> {
    vec![
        entry("Life Expectancy at Birth", "SP.DYN.LE00.IN"),
        entry("Under-5 Mortality Rate (per 1000)", "SH.DYN.MORT"),
        entry("Infant Mortality Rate (per 1000)", "SP.DYN.IMRT.IN"),
        entry(
            "Immunization, DPT (% of children ages 12-23 months)",
            "SH.IMM.IDPT",
        ),
        entry(
            "Immunization, Measles (% of children ages 12-23 months)",
            "SH.IMM.MEAS",
        ),
        entry("GDP per Capita (current US$)", "NY.GDP.PCAP.CD"),
        entry("Health Expenditure (% of GDP)", "SH.XPD.CHEX.GD.ZS"),
        entry("Physicians (per 1,000 people)", "SH.MED.PHYS.ZS"),
        entry("Hospital Beds (per 1,000 people)", "SH.MED.BEDS.ZS"),
    ]
}

fn scope(label: &str, code: Option<&str>) -> ScopeEntry {
    ScopeEntry {
        label: label.into(),
        code: code.map(Into::into),
    }
}

fn default_regions() -> Vec<ScopeEntry> {
    vec![
        scope("All Regions", None),
        scope("East Asia & Pacific", Some("EAS")),
        scope("Europe & Central Asia", Some("ECS")),
        scope("Latin America & Caribbean", Some("LCN")),
        scope("Middle East & North Africa", Some("MEA")),
        scope("North America", Some("NAC")),
        scope("South Asia", Some("SAS")),
        scope("Sub-Saharan Africa", Some("SSF")),
    ]
}

fn default_income_groups() -> Vec<ScopeEntry> {
    vec![
        scope("All Income Levels", None),
        scope("High Income", Some("HIC")),
        scope("Upper Middle Income", Some("UMC")),
        scope("Lower Middle Income", Some("LMC")),
        scope("Low Income", Some("LIC")),
    ]
}

fn country(name: &str, code: &str) -> CountryEntry {
    CountryEntry {
        name: name.into(),
        code: code.into(),
    }
}

fn default_sample_countries() -> Vec<CountryEntry> {
    vec![
        country("United States", "USA"),
        country("United Kingdom", "GBR"),
        country("Germany", "DEU"),
        country("France", "FRA"),
        country("China", "CHN"),
        country("India", "IND"),
        country("Brazil", "BRA"),
        country("Japan", "JPN"),
        country("Nigeria", "NGA"),
        country("South Africa", "ZAF"),
        country("Kenya", "KEN"),
        country("Pakistan", "PAK"),
        country("Indonesia", "IDN"),
        country("Mexico", "MEX"),
        country("Russia", "RUS"),
        country("Canada", "CAN"),
        country("Australia", "AUS"),
        country("Egypt", "EGY"),
        country("Bangladesh", "BGD"),
        country("Ethiopia", "ETH"),
    ]
}

fn default_selection() -> Vec<String> {
    vec![
        "United States".into(),
        "India".into(),
        "Germany".into(),
        "Nigeria".into(),
        "Brazil".into(),
    ]
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            indicators: default_indicators(),
            regions: default_regions(),
            income_groups: default_income_groups(),
            sample_countries: default_sample_countries(),
            default_selection: default_selection(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            cache_ttl_secs: default_cache_ttl(),
            indicator_per_page: default_indicator_per_page(),
            country_per_page: default_country_per_page(),
            scoped_per_page: default_scoped_per_page(),
            max_countries: default_max_countries(),
            catalog: Catalog::default(),
        }
    }
}
