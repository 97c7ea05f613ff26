use std::time::Instant;

use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use mortgage_core::{with_metadata, CalculatorConfig};

/// Arguments for the county tax table
#[derive(Args)]
pub struct CountiesArgs {
    /// Look up a single county instead of listing the table
    #[arg(long)]
    pub county: Option<String>,
}

#[derive(Serialize)]
struct CountyRow {
    county: String,
    rate_percent: Decimal,
}

#[derive(Serialize)]
struct CountyTable {
    default_rate_percent: Decimal,
    annual_insurance_rate: Decimal,
    counties: Vec<CountyRow>,
}

#[derive(Serialize)]
struct CountyLookup {
    county: String,
    rate_percent: Decimal,
    matched: bool,
}

pub fn run_counties(
    args: CountiesArgs,
    config: CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let table = &config.county_taxes;

    let value = match args.county {
        Some(county) => {
            let rate = table.lookup(&county);
            let mut warnings = Vec::new();
            if !rate.matched {
                warnings.push(format!(
                    "County {county} is not in the tax table; the default rate applies"
                ));
            }
            let result = CountyLookup {
                county,
                rate_percent: rate.rate_percent,
                matched: rate.matched,
            };
            let elapsed = start.elapsed().as_micros() as u64;
            serde_json::to_value(with_metadata(
                "County property tax lookup",
                &config,
                warnings,
                elapsed,
                result,
            ))?
        }
        None => {
            let result = CountyTable {
                default_rate_percent: table.default_rate_percent,
                annual_insurance_rate: config.annual_insurance_rate,
                counties: table
                    .counties()
                    .map(|(county, rate_percent)| CountyRow {
                        county: county.to_string(),
                        rate_percent,
                    })
                    .collect(),
            };
            let elapsed = start.elapsed().as_micros() as u64;
            serde_json::to_value(with_metadata(
                "County property tax table",
                &config,
                Vec::new(),
                elapsed,
                result,
            ))?
        }
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_builtin_table() {
        let value = run_counties(CountiesArgs { county: None }, CalculatorConfig::default()).unwrap();
        assert_eq!(value["result"]["counties"].as_array().unwrap().len(), 6);
        assert_eq!(value["result"]["default_rate_percent"], "1.25");
    }

    #[test]
    fn test_unknown_county_lookup_warns() {
        let args = CountiesArgs {
            county: Some("Kern County".into()),
        };
        let value = run_counties(args, CalculatorConfig::default()).unwrap();
        assert_eq!(value["result"]["matched"], false);
        assert_eq!(value["warnings"].as_array().unwrap().len(), 1);
    }
}
