use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::coerce::non_negative;
use crate::types::{Money, Percent, Rate};

pub const MONTHS_PER_YEAR: u32 = 12;

/// Number of monthly payments over a term.
pub fn payment_count(term_years: u32) -> u32 {
    term_years.saturating_mul(MONTHS_PER_YEAR)
}

/// Convert an annual percentage (6.875) into a monthly decimal rate (0.00572916...).
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
}

/// Level monthly payment that retires `loan_amount` over `payments` months.
///
/// Always non-negative and non-decreasing in `loan_amount`. A payment larger
/// than `Decimal` can hold saturates at `Decimal::MAX`.
pub fn monthly_payment(loan_amount: Money, monthly_rate: Rate, payments: u32) -> Money {
    if loan_amount <= Decimal::ZERO || payments == 0 {
        return Decimal::ZERO;
    }

    if monthly_rate.is_zero() {
        return loan_amount / Decimal::from(payments);
    }

    match annuity_factor(monthly_rate, payments) {
        Some(factor) => non_negative(loan_amount.saturating_mul(factor)),
        // (1+r)^n rounds to 1: the rate is too small to register
        None => loan_amount / Decimal::from(payments),
    }
}

/// Monthly principal and interest for an annual percentage rate and a term in years.
pub fn principal_and_interest(loan_amount: Money, annual_rate_percent: Percent, term_years: u32) -> Money {
    monthly_payment(
        loan_amount,
        monthly_rate(annual_rate_percent),
        payment_count(term_years),
    )
}

/// Payment per unit of principal: r / (1 - (1+r)^-n).
///
/// Tends to `r` as (1+r)^n grows, which is used once the power leaves
/// `Decimal` range.
fn annuity_factor(rate: Rate, payments: u32) -> Option<Rate> {
    let growth = Decimal::ONE
        .checked_add(rate)
        .and_then(|base| base.checked_powu(u64::from(payments)));
    let growth = match growth {
        Some(growth) => growth,
        None => {
            debug!(%rate, payments, "compounding overflowed; using the interest-only limit");
            return Some(rate);
        }
    };
    if growth.is_zero() {
        return None;
    }
    let discount = Decimal::ONE.checked_sub(Decimal::ONE.checked_div(growth)?)?;
    if discount.is_zero() {
        return None;
    }
    rate.checked_div(discount)
}
