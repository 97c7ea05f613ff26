use crate::breakdown::{AdjustedBreakdown, Component};
use crate::calculator::PaymentCalculator;
use crate::display::DisplayModel;
use crate::error::MortgageError;
use crate::form::MortgageForm;
use crate::types::Money;
use crate::MortgageResult;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum EstimatorState {
    #[default]
    Idle,
    HasResult(AdjustedBreakdown),
}

/// The estimator screen: the latest calculation plus any edits made to it.
#[derive(Debug, Clone, Default)]
pub struct EstimatorSession {
    calculator: PaymentCalculator,
    state: EstimatorState,
    warnings: Vec<String>,
}

impl EstimatorSession {
    pub fn new(calculator: PaymentCalculator) -> Self {
        Self {
            calculator,
            state: EstimatorState::Idle,
            warnings: Vec::new(),
        }
    }

    pub fn state(&self) -> &EstimatorState {
        &self.state
    }

    pub fn current(&self) -> Option<&AdjustedBreakdown> {
        match &self.state {
            EstimatorState::Idle => None,
            EstimatorState::HasResult(adjusted) => Some(adjusted),
        }
    }

    /// Warnings from the latest submission.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Run a full calculation and return its total. Any earlier result and its edits are discarded.
    pub fn submit(&mut self, form: &MortgageForm) -> Money {
        let output = self.calculator.calculate(form);
        let total = output.result.total_monthly_payment();
        self.warnings = output.warnings;
        self.state = EstimatorState::HasResult(AdjustedBreakdown::new(output.result));
        total
    }

    /// Apply an edit typed into the result and return the new total.
    pub fn edit(&mut self, component: Component, text: &str) -> MortgageResult<Money> {
        let current = self.current().ok_or(MortgageError::NoResult)?;
        let next = current.with_override_text(component, text)?;
        let total = next.recomputed_total();
        self.state = EstimatorState::HasResult(next);
        Ok(total)
    }

    pub fn display(&self) -> Option<DisplayModel> {
        self.current().map(DisplayModel::from_adjusted)
    }

    pub fn reset(&mut self) {
        self.state = EstimatorState::Idle;
        self.warnings.clear();
    }
}
