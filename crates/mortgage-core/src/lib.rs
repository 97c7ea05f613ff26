pub mod amortization;
pub mod breakdown;
pub mod calculator;
pub mod coerce;
pub mod config;
pub mod display;
pub mod error;
pub mod form;
pub mod inputs;
pub mod session;
pub mod types;

pub use breakdown::{AdjustedBreakdown, Component, MonthlyBreakdown, MonthlyComponents};
pub use calculator::PaymentCalculator;
pub use config::{CalculatorConfig, CountyTaxTable};
pub use error::MortgageError;
pub use form::MortgageForm;
pub use inputs::{LoanInputs, PrincipalSource, TransactionMode};
pub use session::EstimatorSession;
pub use types::*;

/// Standard result type for the fallible edges of the estimator
pub type MortgageResult<T> = Result<T, MortgageError>;
