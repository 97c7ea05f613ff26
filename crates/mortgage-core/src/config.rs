//! Calculator configuration: loan term, insurance rate and the county tax table.
//!
//! Every field has a default, so a config file only needs to name what it changes.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::types::{Percent, Rate};
use crate::MortgageResult;

/// Rate applied to counties missing from the table.
pub const DEFAULT_COUNTY_RATE_PERCENT: Percent = dec!(1.25);

/// Annual homeowners insurance as a fraction of purchase price.
pub const DEFAULT_ANNUAL_INSURANCE_RATE: Rate = dec!(0.002);

pub const DEFAULT_TERM_YEARS: u32 = 30;

/// Older form values still sent by callers, mapped to the table's spelling.
const COUNTY_ALIASES: [(&str, &str); 1] = [("San Bernadino County", "San Bernardino County")];

/// Annual property tax rate by county, as a percentage of purchase price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyTaxTable {
    #[serde(default = "default_county_rate")]
    pub default_rate_percent: Percent,
    #[serde(default)]
    pub rates: BTreeMap<String, Percent>,
}

/// Result of a county lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountyRate {
    pub rate_percent: Percent,
    /// False when the default rate was used.
    pub matched: bool,
}

fn default_county_rate() -> Percent {
    DEFAULT_COUNTY_RATE_PERCENT
}

impl CountyTaxTable {
    /// An empty table that answers every lookup with `default_rate_percent`.
    pub fn new(default_rate_percent: Percent) -> Self {
        Self {
            default_rate_percent,
            rates: BTreeMap::new(),
        }
    }

    /// Southern California counties the estimator ships with.
    pub fn southern_california() -> Self {
        Self::new(DEFAULT_COUNTY_RATE_PERCENT)
            .with_county("Los Angeles County", dec!(1.25))
            .with_county("Orange County", dec!(1.2))
            .with_county("San Bernardino County", dec!(1.1))
            .with_county("Riverside County", dec!(1.15))
            .with_county("San Diego County", dec!(1.2))
            .with_county("Ventura County", dec!(1.3))
    }

    pub fn with_county(mut self, name: impl Into<String>, rate_percent: Percent) -> Self {
        self.rates.insert(name.into(), rate_percent);
        self
    }

    /// Exact match first, then a trimmed case-insensitive match, then a known
    /// alternate spelling, then the default.
    pub fn lookup(&self, county: &str) -> CountyRate {
        let found = self.find(county).or_else(|| {
            let wanted = county.trim();
            COUNTY_ALIASES
                .iter()
                .find(|(alias, _)| alias.eq_ignore_ascii_case(wanted))
                .and_then(|(_, canonical)| self.find(canonical))
        });

        match found {
            Some(rate_percent) => CountyRate {
                rate_percent,
                matched: true,
            },
            None => CountyRate {
                rate_percent: self.default_rate_percent,
                matched: false,
            },
        }
    }

    fn find(&self, county: &str) -> Option<Percent> {
        self.rates.get(county).copied().or_else(|| {
            let wanted = county.trim();
            self.rates
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
                .map(|(_, rate)| *rate)
        })
    }

    pub fn counties(&self) -> impl Iterator<Item = (&str, Percent)> {
        self.rates.iter().map(|(name, rate)| (name.as_str(), *rate))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for CountyTaxTable {
    fn default() -> Self {
        Self::southern_california()
    }
}

/// Settings the calculator reads on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub term_years: u32,
    pub annual_insurance_rate: Rate,
    pub county_taxes: CountyTaxTable,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            term_years: DEFAULT_TERM_YEARS,
            annual_insurance_rate: DEFAULT_ANNUAL_INSURANCE_RATE,
            county_taxes: CountyTaxTable::default(),
        }
    }
}

impl CalculatorConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> MortgageResult<Self> {
        let config: CalculatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MortgageResult<()> {
        if self.term_years == 0 {
            return Err(MortgageError::InvalidInput {
                field: "term_years".into(),
                reason: "Loan term must be at least one year".into(),
            });
        }
        if self.annual_insurance_rate < Decimal::ZERO {
            return Err(MortgageError::InvalidInput {
                field: "annual_insurance_rate".into(),
                reason: "Insurance rate cannot be negative".into(),
            });
        }
        if self.county_taxes.default_rate_percent < Decimal::ZERO {
            return Err(MortgageError::InvalidInput {
                field: "county_taxes.default_rate_percent".into(),
                reason: "Default county rate cannot be negative".into(),
            });
        }
        if let Some((name, _)) = self
            .county_taxes
            .counties()
            .find(|(_, rate)| *rate < Decimal::ZERO)
        {
            return Err(MortgageError::InvalidInput {
                field: format!("county_taxes.rates.{name}"),
                reason: "County tax rate cannot be negative".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_table_lookup() {
        let table = CountyTaxTable::default();
        assert_eq!(table.len(), 6);
        assert_eq!(
            table.lookup("Ventura County"),
            CountyRate {
                rate_percent: dec!(1.3),
                matched: true
            }
        );
    }

    #[test]
    fn test_lookup_ignores_case_and_padding() {
        let table = CountyTaxTable::default();
        let rate = table.lookup("  orange county ");
        assert!(rate.matched);
        assert_eq!(rate.rate_percent, dec!(1.2));
    }

    #[test]
    fn test_unknown_county_falls_back_to_default() {
        let table = CountyTaxTable::default();
        let rate = table.lookup("Kern County");
        assert!(!rate.matched);
        assert_eq!(rate.rate_percent, dec!(1.25));
    }

    #[test]
    fn test_legacy_san_bernadino_spelling_resolves() {
        let table = CountyTaxTable::default();
        let rate = table.lookup("San Bernadino County");
        assert!(rate.matched);
        assert_eq!(rate.rate_percent, dec!(1.1));
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_table_is_extendable() {
        let table = CountyTaxTable::new(dec!(1.0)).with_county("Kern County", dec!(1.05));
        assert_eq!(table.lookup("Kern County").rate_percent, dec!(1.05));
        assert_eq!(table.lookup("Orange County").rate_percent, dec!(1.0));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CalculatorConfig::from_json_str(r#"{"term_years": 15}"#).unwrap();
        assert_eq!(config.term_years, 15);
        assert_eq!(config.annual_insurance_rate, DEFAULT_ANNUAL_INSURANCE_RATE);
        assert_eq!(config.county_taxes, CountyTaxTable::default());
    }

    #[test]
    fn test_json_county_table_replaces_builtin() {
        let config = CalculatorConfig::from_json_str(
            r#"{"county_taxes": {"rates": {"King County": "0.95"}}}"#,
        )
        .unwrap();
        assert_eq!(config.county_taxes.len(), 1);
        assert_eq!(config.county_taxes.default_rate_percent, dec!(1.25));
        assert_eq!(config.county_taxes.lookup("King County").rate_percent, dec!(0.95));
    }

    #[test]
    fn test_validation_rejects_zero_term() {
        let err = CalculatorConfig::from_json_str(r#"{"term_years": 0}"#).unwrap_err();
        assert!(matches!(err, MortgageError::InvalidInput { ref field, .. } if field == "term_years"));
    }

    #[test]
    fn test_validation_rejects_negative_county_rate() {
        let config = CalculatorConfig {
            county_taxes: CountyTaxTable::default().with_county("Bad County", dec!(-1)),
            ..CalculatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = CalculatorConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, MortgageError::SerializationError(_)));
    }
}
