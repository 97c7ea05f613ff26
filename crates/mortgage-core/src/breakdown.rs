//! Monthly payment breakdown and the caller-editable layer on top of it.
//!
//! A [`MonthlyBreakdown`] is the authoritative calculation result: its total is
//! derived once from its components and it is never patched. Edits made after
//! the fact live in an [`AdjustedBreakdown`], which keeps the base result
//! intact and recomputes the total from the effective values.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::coerce;
use crate::error::MortgageError;
use crate::types::Money;
use crate::MortgageResult;

/// One line of the monthly payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    PrincipalAndInterest,
    PropertyTaxes,
    HomeInsurance,
    HoaFees,
    MortgageInsurance,
    Pmi,
}

impl Component {
    /// Display order, which is also the chart segment order.
    pub const ALL: [Component; 6] = [
        Component::PrincipalAndInterest,
        Component::PropertyTaxes,
        Component::HomeInsurance,
        Component::HoaFees,
        Component::MortgageInsurance,
        Component::Pmi,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Component::PrincipalAndInterest => "Principal & Interest",
            Component::PropertyTaxes => "Property Tax",
            Component::HomeInsurance => "Homeowner's Insurance",
            Component::HoaFees => "HOA Fees",
            Component::MortgageInsurance => "Mortgage Insurance",
            Component::Pmi => "PMI",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Component::PrincipalAndInterest => "principal_and_interest",
            Component::PropertyTaxes => "property_taxes",
            Component::HomeInsurance => "home_insurance",
            Component::HoaFees => "hoa_fees",
            Component::MortgageInsurance => "mortgage_insurance",
            Component::Pmi => "pmi",
        }
    }

    /// Principal & interest only changes with a new calculation.
    pub fn is_editable(self) -> bool {
        self != Component::PrincipalAndInterest
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Component {
    type Err = MortgageError;

    /// Accepts the snake_case key plus a few short aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let component = match normalized.as_str() {
            "principal_and_interest" | "principal_interest" | "pi" => Component::PrincipalAndInterest,
            "property_taxes" | "property_tax" | "tax" => Component::PropertyTaxes,
            "home_insurance" | "insurance" => Component::HomeInsurance,
            "hoa_fees" | "hoa" => Component::HoaFees,
            "mortgage_insurance" | "mi" => Component::MortgageInsurance,
            "pmi" => Component::Pmi,
            _ => {
                return Err(MortgageError::InvalidInput {
                    field: "component".into(),
                    reason: format!("Unknown payment component '{s}'"),
                })
            }
        };
        Ok(component)
    }
}

/// Monthly amount for each component. Optional components are absent, not zero,
/// when the inputs never supplied them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyComponents {
    pub principal_and_interest: Money,
    pub property_taxes: Money,
    pub home_insurance: Money,
    pub hoa_fees: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mortgage_insurance: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmi: Option<Money>,
}

impl MonthlyComponents {
    pub fn get(&self, component: Component) -> Option<Money> {
        match component {
            Component::PrincipalAndInterest => Some(self.principal_and_interest),
            Component::PropertyTaxes => Some(self.property_taxes),
            Component::HomeInsurance => Some(self.home_insurance),
            Component::HoaFees => Some(self.hoa_fees),
            Component::MortgageInsurance => self.mortgage_insurance,
            Component::Pmi => self.pmi,
        }
    }

    fn set(&mut self, component: Component, value: Money) {
        match component {
            Component::PrincipalAndInterest => self.principal_and_interest = value,
            Component::PropertyTaxes => self.property_taxes = value,
            Component::HomeInsurance => self.home_insurance = value,
            Component::HoaFees => self.hoa_fees = value,
            Component::MortgageInsurance => self.mortgage_insurance = Some(value),
            Component::Pmi => self.pmi = Some(value),
        }
    }

    /// Populated components in display order.
    pub fn populated(&self) -> impl Iterator<Item = (Component, Money)> + '_ {
        Component::ALL
            .into_iter()
            .filter_map(move |c| self.get(c).map(|v| (c, v)))
    }

    /// Negative amounts become zero; optional components are kept only when positive.
    fn clamped(self) -> Self {
        let optional = |value: Option<Money>| {
            value
                .map(coerce::non_negative)
                .filter(|v| *v > Decimal::ZERO)
        };
        Self {
            principal_and_interest: coerce::non_negative(self.principal_and_interest),
            property_taxes: coerce::non_negative(self.property_taxes),
            home_insurance: coerce::non_negative(self.home_insurance),
            hoa_fees: coerce::non_negative(self.hoa_fees),
            mortgage_insurance: optional(self.mortgage_insurance),
            pmi: optional(self.pmi),
        }
    }

    /// Sum of the components that add to the payment.
    pub fn total(&self) -> Money {
        self.populated()
            .map(|(_, v)| v)
            .filter(|v| *v > Decimal::ZERO)
            .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
    }
}

/// Authoritative result of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredBreakdown")]
pub struct MonthlyBreakdown {
    total_monthly_payment: Money,
    breakdown: MonthlyComponents,
}

/// Incoming shape; any total carried by the caller is ignored and recomputed.
#[derive(Deserialize)]
struct StoredBreakdown {
    breakdown: MonthlyComponents,
}

impl From<StoredBreakdown> for MonthlyBreakdown {
    fn from(stored: StoredBreakdown) -> Self {
        MonthlyBreakdown::new(stored.breakdown)
    }
}

impl MonthlyBreakdown {
    pub fn new(components: MonthlyComponents) -> Self {
        let components = components.clamped();
        Self {
            total_monthly_payment: components.total(),
            breakdown: components,
        }
    }

    pub fn total_monthly_payment(&self) -> Money {
        self.total_monthly_payment
    }

    pub fn components(&self) -> &MonthlyComponents {
        &self.breakdown
    }

    pub fn principal_and_interest(&self) -> Money {
        self.breakdown.principal_and_interest
    }

    pub fn get(&self, component: Component) -> Option<Money> {
        self.breakdown.get(component)
    }

    /// Total the payment would have with one component replaced. The breakdown itself is unchanged.
    pub fn override_total(&self, component: Component, value: Money) -> MortgageResult<Money> {
        Ok(AdjustedBreakdown::new(self.clone())
            .with_override(component, value)?
            .recomputed_total())
    }
}

/// A base result with caller edits layered on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedBreakdown {
    base: MonthlyBreakdown,
    #[serde(default)]
    overrides: BTreeMap<Component, Money>,
}

impl From<MonthlyBreakdown> for AdjustedBreakdown {
    fn from(base: MonthlyBreakdown) -> Self {
        Self::new(base)
    }
}

impl AdjustedBreakdown {
    pub fn new(base: MonthlyBreakdown) -> Self {
        Self {
            base,
            overrides: BTreeMap::new(),
        }
    }

    pub fn base(&self) -> &MonthlyBreakdown {
        &self.base
    }

    pub fn overrides(&self) -> &BTreeMap<Component, Money> {
        &self.overrides
    }

    /// New adjusted breakdown with `component` set to `value` (negative values clamp to zero).
    pub fn with_override(&self, component: Component, value: Money) -> MortgageResult<Self> {
        if !component.is_editable() {
            return Err(MortgageError::ImmutableComponent(component));
        }
        let mut next = self.clone();
        next.overrides.insert(component, coerce::non_negative(value));
        Ok(next)
    }

    /// Same as [`with_override`](Self::with_override) for a value typed into the display.
    pub fn with_override_text(&self, component: Component, text: &str) -> MortgageResult<Self> {
        self.with_override(component, coerce::coerce_field(component.key(), text))
    }

    /// Drop an edit, returning to the calculated value.
    pub fn without_override(&self, component: Component) -> Self {
        let mut next = self.clone();
        next.overrides.remove(&component);
        next
    }

    /// Calculated values with edits applied.
    pub fn effective(&self) -> MonthlyComponents {
        let mut components = self.base.components().clone();
        for (component, value) in &self.overrides {
            components.set(*component, *value);
        }
        components
    }

    pub fn value(&self, component: Component) -> Option<Money> {
        self.overrides
            .get(&component)
            .copied()
            .or_else(|| self.base.get(component))
    }

    pub fn recomputed_total(&self) -> Money {
        self.effective().total()
    }

    pub fn is_overridden(&self, component: Component) -> bool {
        self.overrides.contains_key(&component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn sample() -> MonthlyBreakdown {
        MonthlyBreakdown::new(MonthlyComponents {
            principal_and_interest: dec!(2000),
            property_taxes: dec!(500),
            home_insurance: dec!(100),
            hoa_fees: Decimal::ZERO,
            mortgage_insurance: None,
            pmi: Some(dec!(75)),
        })
    }

    #[test]
    fn test_total_is_sum_of_populated() {
        assert_eq!(sample().total_monthly_payment(), dec!(2675));
    }

    #[test]
    fn test_populated_skips_absent_components() {
        let keys: Vec<Component> = sample().components().populated().map(|(c, _)| c).collect();
        assert_eq!(
            keys,
            vec![
                Component::PrincipalAndInterest,
                Component::PropertyTaxes,
                Component::HomeInsurance,
                Component::HoaFees,
                Component::Pmi,
            ]
        );
    }

    #[test]
    fn test_override_leaves_base_untouched() {
        let base = sample();
        let adjusted = AdjustedBreakdown::new(base.clone())
            .with_override(Component::PropertyTaxes, dec!(450))
            .unwrap();
        assert_eq!(adjusted.recomputed_total(), dec!(2625));
        assert_eq!(adjusted.base(), &base);
        assert_eq!(base.total_monthly_payment(), dec!(2675));
    }

    #[test]
    fn test_principal_and_interest_is_immutable() {
        let err = AdjustedBreakdown::new(sample())
            .with_override(Component::PrincipalAndInterest, dec!(1))
            .unwrap_err();
        assert!(matches!(
            err,
            MortgageError::ImmutableComponent(Component::PrincipalAndInterest)
        ));
    }

    #[test]
    fn test_override_adds_absent_optional_component() {
        let adjusted = AdjustedBreakdown::new(sample())
            .with_override(Component::MortgageInsurance, dec!(40))
            .unwrap();
        assert_eq!(adjusted.value(Component::MortgageInsurance), Some(dec!(40)));
        assert_eq!(adjusted.recomputed_total(), dec!(2715));
    }

    #[test]
    fn test_override_text_is_coerced() {
        let adjusted = AdjustedBreakdown::new(sample())
            .with_override_text(Component::HomeInsurance, "garbage")
            .unwrap();
        assert_eq!(adjusted.value(Component::HomeInsurance), Some(Decimal::ZERO));
        assert_eq!(adjusted.recomputed_total(), dec!(2575));
    }

    #[test]
    fn test_negative_override_clamps() {
        let adjusted = AdjustedBreakdown::new(sample())
            .with_override(Component::HoaFees, dec!(-300))
            .unwrap();
        assert_eq!(adjusted.value(Component::HoaFees), Some(Decimal::ZERO));
    }

    #[test]
    fn test_without_override_restores_base_value() {
        let adjusted = AdjustedBreakdown::new(sample())
            .with_override(Component::PropertyTaxes, dec!(1))
            .unwrap()
            .without_override(Component::PropertyTaxes);
        assert!(!adjusted.is_overridden(Component::PropertyTaxes));
        assert_eq!(adjusted.recomputed_total(), sample().total_monthly_payment());
    }

    #[test]
    fn test_override_total_shortcut() {
        let total = sample().override_total(Component::Pmi, Decimal::ZERO).unwrap();
        assert_eq!(total, dec!(2600));
    }

    #[test]
    fn test_deserialize_recomputes_total() {
        let json = r#"{
            "total_monthly_payment": "999999",
            "breakdown": {
                "principal_and_interest": "1000",
                "property_taxes": "200",
                "home_insurance": "50",
                "hoa_fees": "25"
            }
        }"#;
        let breakdown: MonthlyBreakdown = serde_json::from_str(json).unwrap();
        assert_eq!(breakdown.total_monthly_payment(), dec!(1275));
        assert_eq!(breakdown.get(Component::Pmi), None);
    }

    #[test]
    fn test_deserialize_clamps_negative_components() {
        let json = r#"{
            "breakdown": {
                "principal_and_interest": "1000",
                "property_taxes": "-500",
                "home_insurance": "50",
                "hoa_fees": "0",
                "pmi": "-20"
            }
        }"#;
        let breakdown: MonthlyBreakdown = serde_json::from_str(json).unwrap();
        assert_eq!(breakdown.get(Component::PropertyTaxes), Some(Decimal::ZERO));
        assert_eq!(breakdown.get(Component::Pmi), None);

        let sum = breakdown
            .components()
            .populated()
            .fold(Decimal::ZERO, |acc, (_, v)| acc + v);
        assert_eq!(breakdown.total_monthly_payment(), dec!(1050));
        assert_eq!(sum, breakdown.total_monthly_payment());
        assert!(breakdown.components().populated().all(|(_, v)| v >= Decimal::ZERO));
    }

    #[test]
    fn test_component_parsing() {
        assert_eq!("property_taxes".parse::<Component>().unwrap(), Component::PropertyTaxes);
        assert_eq!("HOA".parse::<Component>().unwrap(), Component::HoaFees);
        assert_eq!("home-insurance".parse::<Component>().unwrap(), Component::HomeInsurance);
        assert!("escrow".parse::<Component>().is_err());
    }
}
