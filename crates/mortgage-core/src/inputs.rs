use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::amortization;
use crate::types::{Money, Percent};

/// Whether the loan finances a purchase or replaces an existing loan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionMode {
    #[default]
    Purchase,
    Refinance,
}

impl fmt::Display for TransactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionMode::Purchase => write!(f, "Purchase"),
            TransactionMode::Refinance => write!(f, "Refinance"),
        }
    }
}

/// Where the principal & interest figure comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PrincipalSource {
    /// Derived with the level-payment formula.
    Amortized {
        loan_amount: Money,
        annual_rate_percent: Percent,
        term_years: u32,
    },
    /// Supplied by the caller as a monthly figure.
    Stated { monthly_amount: Money },
}

impl PrincipalSource {
    /// Monthly principal & interest, never negative.
    pub fn monthly_amount(&self) -> Money {
        match self {
            PrincipalSource::Amortized {
                loan_amount,
                annual_rate_percent,
                term_years,
            } => amortization::principal_and_interest(*loan_amount, *annual_rate_percent, *term_years),
            PrincipalSource::Stated { monthly_amount } => (*monthly_amount).max(Decimal::ZERO),
        }
    }

    /// Loan amount when the payment is amortized.
    pub fn loan_amount(&self) -> Option<Money> {
        match self {
            PrincipalSource::Amortized { loan_amount, .. } => Some(*loan_amount),
            PrincipalSource::Stated { .. } => None,
        }
    }
}

/// Numeric inputs shared by every form variant once text has been coerced.
///
/// All amounts are monthly and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInputs {
    pub mode: TransactionMode,
    pub principal: PrincipalSource,
    pub property_tax_monthly: Money,
    pub home_insurance_monthly: Money,
    pub hoa_dues_monthly: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mortgage_insurance_monthly: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmi_monthly: Option<Money>,
}

/// Purchase loan amount: price less the down payment, never negative.
pub fn purchase_loan_amount(purchase_price: Money, down_payment_percent: Percent) -> Money {
    let financed = Decimal::ONE - down_payment_percent / Decimal::ONE_HUNDRED;
    purchase_price.saturating_mul(financed).max(Decimal::ZERO)
}

/// Annual figure spread over twelve months.
pub fn monthly_from_annual(annual: Money) -> Money {
    if annual <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    annual / Decimal::from(amortization::MONTHS_PER_YEAR)
}

/// Optional pass-through component: present only when it adds to the payment.
pub fn optional_component(value: Money) -> Option<Money> {
    (value > Decimal::ZERO).then_some(value)
}
