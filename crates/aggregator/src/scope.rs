//! Country universe scoping.

use worldbank_client::CountryScope;

/// Requested restriction of the country universe.
///
/// Exactly one scope applies per resolution. When both are set, region
/// wins: income is only consulted if no region is given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeFilter {
    pub region: Option<String>,
    pub income: Option<String>,
}

impl ScopeFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn region(code: impl Into<String>) -> Self {
        Self {
            region: Some(code.into()),
            income: None,
        }
    }

    pub fn income(code: impl Into<String>) -> Self {
        Self {
            region: None,
            income: Some(code.into()),
        }
    }

    /// Collapse the filter into the single scope actually queried.
    pub fn scope(&self) -> CountryScope {
        if let Some(region) = &self.region {
            CountryScope::Region(region.clone())
        } else if let Some(income) = &self.income {
            CountryScope::Income(income.clone())
        } else {
            CountryScope::All
        }
    }
}
