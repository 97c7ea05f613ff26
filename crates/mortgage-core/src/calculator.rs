use std::time::Instant;

use tracing::debug;

use crate::breakdown::{MonthlyBreakdown, MonthlyComponents};
use crate::config::CalculatorConfig;
use crate::form::MortgageForm;
use crate::inputs::LoanInputs;
use crate::types::{with_metadata, ComputationOutput};

/// Turns a submitted form into a monthly payment breakdown.
///
/// Calculation never fails: text that does not read as a number counts as zero.
#[derive(Debug, Clone, Default)]
pub struct PaymentCalculator {
    config: CalculatorConfig,
}

impl PaymentCalculator {
    pub fn new(config: CalculatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Calculate a form, wrapped with the inputs it resolved to and any warnings.
    pub fn calculate(&self, form: &MortgageForm) -> ComputationOutput<MonthlyBreakdown> {
        let start = Instant::now();

        let resolved = form.resolve(&self.config);
        let breakdown = self.breakdown(&resolved.inputs);
        debug!(
            mode = %resolved.inputs.mode,
            total = %breakdown.total_monthly_payment(),
            "calculated monthly payment"
        );

        let elapsed = start.elapsed().as_micros() as u64;
        with_metadata(
            form.methodology(),
            &resolved.inputs,
            resolved.warnings,
            elapsed,
            breakdown,
        )
    }

    /// Breakdown for already-coerced inputs.
    pub fn breakdown(&self, inputs: &LoanInputs) -> MonthlyBreakdown {
        MonthlyBreakdown::new(MonthlyComponents {
            principal_and_interest: inputs.principal.monthly_amount(),
            property_taxes: inputs.property_tax_monthly,
            home_insurance: inputs.home_insurance_monthly,
            hoa_fees: inputs.hoa_dues_monthly,
            mortgage_insurance: inputs.mortgage_insurance_monthly,
            pmi: inputs.pmi_monthly,
        })
    }
}
