//! What the presentation layer draws: donut chart segments and the line-item list.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::breakdown::{AdjustedBreakdown, Component, MonthlyBreakdown, MonthlyComponents};
use crate::types::Money;

/// Segment colors in component order.
pub const CHART_PALETTE: [&str; 6] = [
    "#3B82F6", "#10B981", "#8B5CF6", "#F59E0B", "#EF4444", "#6366F1",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSegment {
    pub label: String,
    pub value: Money,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub component: Component,
    pub label: String,
    pub value: Money,
    pub formatted: String,
    pub editable: bool,
    pub overridden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayModel {
    pub total_monthly_payment: Money,
    pub formatted_total: String,
    pub chart: Vec<ChartSegment>,
    pub line_items: Vec<LineItem>,
}

impl DisplayModel {
    pub fn from_adjusted(adjusted: &AdjustedBreakdown) -> Self {
        build(&adjusted.effective(), |c| adjusted.is_overridden(c))
    }

    pub fn from_breakdown(breakdown: &MonthlyBreakdown) -> Self {
        build(breakdown.components(), |_| false)
    }
}

fn build(components: &MonthlyComponents, overridden: impl Fn(Component) -> bool) -> DisplayModel {
    let total = components.total();

    let chart = components
        .populated()
        .filter(|(_, value)| *value > Decimal::ZERO)
        .map(|(component, value)| ChartSegment {
            label: component.label().to_string(),
            value: to_cents(value),
            color: segment_color(component).to_string(),
        })
        .collect();

    let line_items = components
        .populated()
        .map(|(component, value)| LineItem {
            component,
            label: component.label().to_string(),
            value: to_cents(value),
            formatted: format_usd(value),
            editable: component.is_editable(),
            overridden: overridden(component),
        })
        .collect();

    DisplayModel {
        total_monthly_payment: to_cents(total),
        formatted_total: format_usd(total),
        chart,
        line_items,
    }
}

fn segment_color(component: Component) -> &'static str {
    let index = Component::ALL
        .iter()
        .position(|c| *c == component)
        .unwrap_or_default();
    CHART_PALETTE[index % CHART_PALETTE.len()]
}

/// Round half away from zero to whole cents.
pub fn to_cents(value: Money) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// US dollar formatting with thousands separators, e.g. `$2,890.49`.
pub fn format_usd(value: Money) -> String {
    let cents = to_cents(value);
    let text = format!("{:.2}", cents.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if cents.is_sign_negative() && !cents.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{fraction}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn breakdown() -> MonthlyBreakdown {
        MonthlyBreakdown::new(MonthlyComponents {
            principal_and_interest: dec!(2890.4867),
            property_taxes: dec!(572.9166),
            home_insurance: dec!(91.6666),
            hoa_fees: Decimal::ZERO,
            mortgage_insurance: None,
            pmi: None,
        })
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(dec!(2890.4867)), "$2,890.49");
        assert_eq!(format_usd(dec!(0)), "$0.00");
        assert_eq!(format_usd(dec!(999.995)), "$1,000.00");
        assert_eq!(format_usd(dec!(1234567)), "$1,234,567.00");
        assert_eq!(format_usd(dec!(-12.5)), "-$12.50");
    }

    #[test]
    fn test_chart_excludes_zero_components() {
        let model = DisplayModel::from_breakdown(&breakdown());
        let labels: Vec<&str> = model.chart.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Principal & Interest", "Property Tax", "Homeowner's Insurance"]
        );
        assert_eq!(model.chart[0].color, "#3B82F6");
        assert_eq!(model.chart[2].value, dec!(91.67));
    }

    #[test]
    fn test_line_items_keep_zero_hoa_for_editing() {
        let model = DisplayModel::from_breakdown(&breakdown());
        let hoa = model
            .line_items
            .iter()
            .find(|item| item.component == Component::HoaFees)
            .unwrap();
        assert_eq!(hoa.value, Decimal::ZERO);
        assert!(hoa.editable);
        assert!(!model.line_items[0].editable);
        assert_eq!(model.line_items.len(), 4);
    }

    #[test]
    fn test_line_items_from_stored_negative_values_add_up() {
        let stored: MonthlyBreakdown = serde_json::from_str(
            r#"{"breakdown": {
                "principal_and_interest": "1000",
                "property_taxes": "-500",
                "home_insurance": "0",
                "hoa_fees": "0"
            }}"#,
        )
        .unwrap();
        let model = DisplayModel::from_breakdown(&stored);
        let listed = model
            .line_items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc + item.value);
        assert_eq!(listed, model.total_monthly_payment);
        assert_eq!(model.line_items[1].formatted, "$0.00");
    }

    #[test]
    fn test_overridden_items_are_flagged() {
        let adjusted = AdjustedBreakdown::new(breakdown())
            .with_override(Component::PropertyTaxes, dec!(600))
            .unwrap();
        let model = DisplayModel::from_adjusted(&adjusted);
        assert!(model.line_items[1].overridden);
        assert_eq!(model.line_items[1].formatted, "$600.00");
        assert_eq!(model.formatted_total, "$3,582.15");
    }
}
