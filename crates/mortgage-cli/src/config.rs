use std::path::Path;

use mortgage_core::CalculatorConfig;
use tracing::debug;

use crate::input;

/// Load calculator settings, falling back to the built-in defaults when no file is given.
///
/// Files ending in `.toml` are read as TOML, anything else as JSON.
pub fn load(path: Option<&str>) -> Result<CalculatorConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(CalculatorConfig::default());
    };

    let contents = input::file::read_text(path)?;
    let config = if is_toml(path) {
        parse_toml(&contents).map_err(|e| format!("Invalid config '{}': {}", path, e))?
    } else {
        CalculatorConfig::from_json_str(&contents)
            .map_err(|e| format!("Invalid config '{}': {}", path, e))?
    };

    debug!(
        path,
        term_years = config.term_years,
        counties = config.county_taxes.len(),
        "loaded calculator config"
    );
    Ok(config)
}

fn is_toml(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

fn parse_toml(contents: &str) -> Result<CalculatorConfig, Box<dyn std::error::Error>> {
    let config: CalculatorConfig = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_no_path_uses_defaults() {
        assert_eq!(load(None).unwrap(), CalculatorConfig::default());
    }

    #[test]
    fn test_toml_county_table() {
        let config = parse_toml(
            r#"
            term_years = 15
            annual_insurance_rate = "0.0035"

            [county_taxes]
            default_rate_percent = "1.1"

            [county_taxes.rates]
            "King County" = "0.93"
            "Pierce County" = "1.12"
            "#,
        )
        .unwrap();
        assert_eq!(config.term_years, 15);
        assert_eq!(config.annual_insurance_rate, dec!(0.0035));
        assert_eq!(config.county_taxes.len(), 2);
        assert_eq!(config.county_taxes.lookup("Pierce County").rate_percent, dec!(1.12));
        assert_eq!(config.county_taxes.lookup("Orange County").rate_percent, dec!(1.1));
    }

    #[test]
    fn test_toml_is_validated() {
        assert!(parse_toml("term_years = 0").is_err());
    }

    #[test]
    fn test_extension_detection() {
        assert!(is_toml("rates.TOML"));
        assert!(!is_toml("rates.json"));
        assert!(!is_toml("toml"));
    }
}
