use std::collections::BTreeMap;

use napi::Result as NapiResult;
use napi_derive::napi;

use mortgage_core::display::DisplayModel;
use mortgage_core::{
    AdjustedBreakdown, CalculatorConfig, Component, MonthlyBreakdown, MortgageForm,
    PaymentCalculator,
};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_payment(form_json: String) -> NapiResult<String> {
    let form: MortgageForm = serde_json::from_str(&form_json).map_err(to_napi_error)?;
    let output = PaymentCalculator::default().calculate(&form);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_payment_with_config(form_json: String, config_json: String) -> NapiResult<String> {
    let form: MortgageForm = serde_json::from_str(&form_json).map_err(to_napi_error)?;
    let config = CalculatorConfig::from_json_str(&config_json).map_err(to_napi_error)?;
    let output = PaymentCalculator::new(config).calculate(&form);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn default_config() -> NapiResult<String> {
    serde_json::to_string(&CalculatorConfig::default()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

/// Chart segments and line items for a breakdown as returned by `calculatePayment`.
#[napi]
pub fn display_breakdown(breakdown_json: String) -> NapiResult<String> {
    let breakdown = parse_breakdown(&breakdown_json)?;
    serde_json::to_string(&DisplayModel::from_breakdown(&breakdown)).map_err(to_napi_error)
}

/// Layer edited values (component key → typed text) over a calculated breakdown.
///
/// Principal & interest is never recomputed here; editing it is an error.
#[napi]
pub fn apply_overrides(breakdown_json: String, overrides_json: String) -> NapiResult<String> {
    let breakdown = parse_breakdown(&breakdown_json)?;
    let overrides: BTreeMap<String, String> =
        serde_json::from_str(&overrides_json).map_err(to_napi_error)?;

    let mut adjusted = AdjustedBreakdown::new(breakdown);
    for (key, text) in &overrides {
        let component: Component = key.parse().map_err(to_napi_error)?;
        adjusted = adjusted
            .with_override_text(component, text)
            .map_err(to_napi_error)?;
    }

    serde_json::to_string(&DisplayModel::from_adjusted(&adjusted)).map_err(to_napi_error)
}

/// Accepts either a bare breakdown or the full envelope from `calculatePayment`.
fn parse_breakdown(json: &str) -> NapiResult<MonthlyBreakdown> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(to_napi_error)?;
    let breakdown = match value.get("result") {
        Some(result) => serde_json::from_value(result.clone()),
        None => serde_json::from_value(value),
    };
    breakdown.map_err(to_napi_error)
}
