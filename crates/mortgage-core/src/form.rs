//! Form variants as the presentation layer submits them.
//!
//! Every field is the raw text of an input box. Each variant has one
//! conversion into [`LoanInputs`]; coercion to numbers happens there.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::coerce::coerce_field;
use crate::config::CalculatorConfig;
use crate::inputs::{
    monthly_from_annual, optional_component, purchase_loan_amount, LoanInputs, PrincipalSource,
    TransactionMode,
};
use crate::types::Money;

/// Purchase where the caller already knows monthly tax and insurance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurchaseDirectForm {
    pub purchase_price: String,
    pub down_payment_percentage: String,
    pub interest_rate: String,
    pub property_tax_per_month: String,
    pub home_insurance_per_month: String,
    pub hoa_dues: String,
    pub mortgage_insurance: String,
    pub pmi_per_month: String,
}

/// Purchase where tax and insurance are estimated from the county and price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurchaseCountyForm {
    pub purchase_price: String,
    pub down_payment_percentage: String,
    pub interest_rate: String,
    pub county: String,
    pub hoa_dues: String,
    pub mortgage_insurance: String,
    pub pmi_per_month: String,
}

/// Refinance of an existing balance with annual tax and insurance estimates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinanceForm {
    pub loan_balance: String,
    pub interest_rate: String,
    pub annual_property_tax: String,
    pub annual_home_insurance: String,
    pub hoa_dues: String,
    pub mortgage_insurance: String,
    pub pmi_per_month: String,
}

/// Every line entered by hand, principal & interest included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualForm {
    pub transaction_type: TransactionMode,
    pub principal_interest: String,
    pub property_tax_per_month: String,
    pub home_insurance_per_month: String,
    pub hoa_fees: String,
    pub mortgage_insurance: String,
    pub pmi_per_month: String,
}

/// A submitted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum MortgageForm {
    PurchaseDirect(PurchaseDirectForm),
    PurchaseCounty(PurchaseCountyForm),
    Refinance(RefinanceForm),
    Manual(ManualForm),
}

/// Coerced inputs plus anything the caller may want to know about how they were derived.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInputs {
    pub inputs: LoanInputs,
    pub warnings: Vec<String>,
}

impl ResolvedInputs {
    fn clean(inputs: LoanInputs) -> Self {
        Self {
            inputs,
            warnings: Vec::new(),
        }
    }
}

impl MortgageForm {
    pub fn mode(&self) -> TransactionMode {
        match self {
            MortgageForm::PurchaseDirect(_) | MortgageForm::PurchaseCounty(_) => {
                TransactionMode::Purchase
            }
            MortgageForm::Refinance(_) => TransactionMode::Refinance,
            MortgageForm::Manual(form) => form.transaction_type,
        }
    }

    pub fn resolve(&self, config: &CalculatorConfig) -> ResolvedInputs {
        match self {
            MortgageForm::PurchaseDirect(form) => form.resolve(config),
            MortgageForm::PurchaseCounty(form) => form.resolve(config),
            MortgageForm::Refinance(form) => form.resolve(config),
            MortgageForm::Manual(form) => form.resolve(),
        }
    }

    pub fn methodology(&self) -> &'static str {
        match self {
            MortgageForm::PurchaseDirect(_) => "Purchase, fixed-rate amortization with monthly estimates",
            MortgageForm::PurchaseCounty(_) => "Purchase, fixed-rate amortization with county tax lookup",
            MortgageForm::Refinance(_) => "Refinance, fixed-rate amortization with annual estimates",
            MortgageForm::Manual(_) => "Manual monthly breakdown",
        }
    }
}

fn purchase_principal(
    purchase_price: Money,
    down_payment_text: &str,
    rate_text: &str,
    config: &CalculatorConfig,
) -> PrincipalSource {
    let down_payment = coerce_field("down_payment_percentage", down_payment_text);
    PrincipalSource::Amortized {
        loan_amount: purchase_loan_amount(purchase_price, down_payment),
        annual_rate_percent: coerce_field("interest_rate", rate_text),
        term_years: config.term_years,
    }
}

impl PurchaseDirectForm {
    pub fn resolve(&self, config: &CalculatorConfig) -> ResolvedInputs {
        let purchase_price = coerce_field("purchase_price", &self.purchase_price);
        ResolvedInputs::clean(LoanInputs {
            mode: TransactionMode::Purchase,
            principal: purchase_principal(
                purchase_price,
                &self.down_payment_percentage,
                &self.interest_rate,
                config,
            ),
            property_tax_monthly: coerce_field("property_tax_per_month", &self.property_tax_per_month),
            home_insurance_monthly: coerce_field(
                "home_insurance_per_month",
                &self.home_insurance_per_month,
            ),
            hoa_dues_monthly: coerce_field("hoa_dues", &self.hoa_dues),
            mortgage_insurance_monthly: optional_component(coerce_field(
                "mortgage_insurance",
                &self.mortgage_insurance,
            )),
            pmi_monthly: optional_component(coerce_field("pmi_per_month", &self.pmi_per_month)),
        })
    }
}

impl PurchaseCountyForm {
    pub fn resolve(&self, config: &CalculatorConfig) -> ResolvedInputs {
        let purchase_price = coerce_field("purchase_price", &self.purchase_price);
        let county = config.county_taxes.lookup(&self.county);

        let mut warnings = Vec::new();
        if !county.matched {
            let shown = if self.county.trim().is_empty() {
                "(none)"
            } else {
                self.county.as_str()
            };
            warnings.push(format!(
                "County {shown} is not in the tax table; using the default rate of {}%",
                county.rate_percent
            ));
        }

        let months = Decimal::from(crate::amortization::MONTHS_PER_YEAR);
        let annual_tax = purchase_price.saturating_mul(county.rate_percent / Decimal::ONE_HUNDRED);
        let annual_insurance = purchase_price.saturating_mul(config.annual_insurance_rate);

        ResolvedInputs {
            inputs: LoanInputs {
                mode: TransactionMode::Purchase,
                principal: purchase_principal(
                    purchase_price,
                    &self.down_payment_percentage,
                    &self.interest_rate,
                    config,
                ),
                property_tax_monthly: (annual_tax / months).max(Decimal::ZERO),
                home_insurance_monthly: (annual_insurance / months).max(Decimal::ZERO),
                hoa_dues_monthly: coerce_field("hoa_dues", &self.hoa_dues),
                mortgage_insurance_monthly: optional_component(coerce_field(
                    "mortgage_insurance",
                    &self.mortgage_insurance,
                )),
                pmi_monthly: optional_component(coerce_field("pmi_per_month", &self.pmi_per_month)),
            },
            warnings,
        }
    }
}

impl RefinanceForm {
    pub fn resolve(&self, config: &CalculatorConfig) -> ResolvedInputs {
        ResolvedInputs::clean(LoanInputs {
            mode: TransactionMode::Refinance,
            principal: PrincipalSource::Amortized {
                loan_amount: coerce_field("loan_balance", &self.loan_balance),
                annual_rate_percent: coerce_field("interest_rate", &self.interest_rate),
                term_years: config.term_years,
            },
            property_tax_monthly: monthly_from_annual(coerce_field(
                "annual_property_tax",
                &self.annual_property_tax,
            )),
            home_insurance_monthly: monthly_from_annual(coerce_field(
                "annual_home_insurance",
                &self.annual_home_insurance,
            )),
            hoa_dues_monthly: coerce_field("hoa_dues", &self.hoa_dues),
            mortgage_insurance_monthly: optional_component(coerce_field(
                "mortgage_insurance",
                &self.mortgage_insurance,
            )),
            pmi_monthly: optional_component(coerce_field("pmi_per_month", &self.pmi_per_month)),
        })
    }
}

impl ManualForm {
    pub fn resolve(&self) -> ResolvedInputs {
        ResolvedInputs::clean(LoanInputs {
            mode: self.transaction_type,
            principal: PrincipalSource::Stated {
                monthly_amount: coerce_field("principal_interest", &self.principal_interest),
            },
            property_tax_monthly: coerce_field("property_tax_per_month", &self.property_tax_per_month),
            home_insurance_monthly: coerce_field(
                "home_insurance_per_month",
                &self.home_insurance_per_month,
            ),
            hoa_dues_monthly: coerce_field("hoa_fees", &self.hoa_fees),
            mortgage_insurance_monthly: optional_component(coerce_field(
                "mortgage_insurance",
                &self.mortgage_insurance,
            )),
            pmi_monthly: optional_component(coerce_field("pmi_per_month", &self.pmi_per_month)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_county_form_derives_tax_and_insurance() {
        let form = PurchaseCountyForm {
            purchase_price: "600000".into(),
            down_payment_percentage: "20%".into(),
            interest_rate: "6".into(),
            county: "Ventura County".into(),
            ..Default::default()
        };
        let resolved = form.resolve(&CalculatorConfig::default());
        // 600k * 1.3% / 12 and 600k * 0.2% / 12
        assert_eq!(resolved.inputs.property_tax_monthly, dec!(650));
        assert_eq!(resolved.inputs.home_insurance_monthly, dec!(100));
        assert_eq!(resolved.inputs.principal.loan_amount(), Some(dec!(480000)));
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn test_unknown_county_warns_and_uses_default() {
        let form = PurchaseCountyForm {
            purchase_price: "120000".into(),
            county: "Atlantis".into(),
            ..Default::default()
        };
        let resolved = form.resolve(&CalculatorConfig::default());
        assert_eq!(resolved.inputs.property_tax_monthly, dec!(125));
        assert_eq!(resolved.warnings.len(), 1);
        assert!(resolved.warnings[0].contains("Atlantis"));
    }

    #[test]
    fn test_refinance_ignores_down_payment_and_uses_balance() {
        let form = RefinanceForm {
            loan_balance: "300000".into(),
            annual_property_tax: "6000".into(),
            annual_home_insurance: "".into(),
            ..Default::default()
        };
        let resolved = form.resolve(&CalculatorConfig::default());
        assert_eq!(resolved.inputs.mode, TransactionMode::Refinance);
        assert_eq!(resolved.inputs.principal.loan_amount(), Some(dec!(300000)));
        assert_eq!(resolved.inputs.property_tax_monthly, dec!(500));
        assert_eq!(resolved.inputs.home_insurance_monthly, Decimal::ZERO);
    }

    #[test]
    fn test_manual_form_states_principal() {
        let form = ManualForm {
            principal_interest: "1,850".into(),
            pmi_per_month: "0".into(),
            mortgage_insurance: "45".into(),
            ..Default::default()
        };
        let resolved = form.resolve();
        assert_eq!(
            resolved.inputs.principal,
            PrincipalSource::Stated {
                monthly_amount: dec!(1850)
            }
        );
        assert_eq!(resolved.inputs.pmi_monthly, None);
        assert_eq!(resolved.inputs.mortgage_insurance_monthly, Some(dec!(45)));
    }

    #[test]
    fn test_tagged_json_selects_variant() {
        let json = r#"{
            "variant": "purchase_county",
            "purchase_price": "550000",
            "down_payment_percentage": "20%",
            "interest_rate": "6.875",
            "county": "Los Angeles County",
            "credit_score": "720"
        }"#;
        let form: MortgageForm = serde_json::from_str(json).unwrap();
        assert_eq!(form.mode(), TransactionMode::Purchase);
        match form {
            MortgageForm::PurchaseCounty(ref f) => assert_eq!(f.hoa_dues, ""),
            other => panic!("unexpected variant {other:?}"),
        }
    }

    #[test]
    fn test_manual_form_mode_defaults_to_purchase() {
        let form: MortgageForm = serde_json::from_str(r#"{"variant": "manual"}"#).unwrap();
        assert_eq!(form.mode(), TransactionMode::Purchase);
    }
}
