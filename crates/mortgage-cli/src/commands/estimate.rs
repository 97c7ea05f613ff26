use clap::Args;
use serde_json::Value;
use tracing::warn;

use mortgage_core::display::DisplayModel;
use mortgage_core::form::{ManualForm, PurchaseCountyForm, PurchaseDirectForm, RefinanceForm};
use mortgage_core::{
    AdjustedBreakdown, CalculatorConfig, Component, MortgageForm, PaymentCalculator,
    TransactionMode,
};

use crate::input;

/// Edits applied to the calculated breakdown, as typed into the result list
#[derive(Args)]
pub struct EditArgs {
    /// Replace a calculated line, e.g. --set property_taxes=480 (repeatable)
    #[arg(long = "set", value_name = "COMPONENT=VALUE", value_parser = parse_edit)]
    pub edits: Vec<(Component, String)>,
}

/// Arguments for a purchase estimate
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PurchaseArgs {
    /// Purchase price
    #[arg(long, alias = "price")]
    pub purchase_price: Option<String>,

    /// Down payment as a percentage of price (e.g. 20 or 20%)
    #[arg(long, alias = "down")]
    pub down_payment: Option<String>,

    /// Annual interest rate in percent (e.g. 6.875)
    #[arg(long, alias = "interest-rate")]
    pub rate: Option<String>,

    /// County for the property tax lookup; estimates tax and insurance from the price
    #[arg(long)]
    pub county: Option<String>,

    /// Monthly property tax (ignored with --county)
    #[arg(long)]
    pub property_tax: Option<String>,

    /// Monthly homeowners insurance (ignored with --county)
    #[arg(long)]
    pub home_insurance: Option<String>,

    /// Monthly HOA dues
    #[arg(long, alias = "hoa-dues")]
    pub hoa: Option<String>,

    /// Monthly mortgage insurance
    #[arg(long)]
    pub mortgage_insurance: Option<String>,

    /// Monthly PMI
    #[arg(long)]
    pub pmi: Option<String>,

    #[command(flatten)]
    pub edit: EditArgs,
}

/// Arguments for a refinance estimate
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RefinanceArgs {
    /// Outstanding loan balance
    #[arg(long, alias = "balance")]
    pub loan_balance: Option<String>,

    /// Annual interest rate in percent (e.g. 6.875)
    #[arg(long, alias = "interest-rate")]
    pub rate: Option<String>,

    /// Annual property tax estimate
    #[arg(long)]
    pub annual_property_tax: Option<String>,

    /// Annual homeowners insurance estimate
    #[arg(long)]
    pub annual_home_insurance: Option<String>,

    /// Monthly HOA dues
    #[arg(long, alias = "hoa-dues")]
    pub hoa: Option<String>,

    /// Monthly mortgage insurance
    #[arg(long)]
    pub mortgage_insurance: Option<String>,

    /// Monthly PMI
    #[arg(long)]
    pub pmi: Option<String>,

    #[command(flatten)]
    pub edit: EditArgs,
}

/// Arguments for a hand-entered breakdown
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ManualArgs {
    /// Monthly principal & interest
    #[arg(long, alias = "pi")]
    pub principal_interest: Option<String>,

    /// Monthly property tax
    #[arg(long)]
    pub property_tax: Option<String>,

    /// Monthly homeowners insurance
    #[arg(long)]
    pub home_insurance: Option<String>,

    /// Monthly HOA fees
    #[arg(long, alias = "hoa-fees")]
    pub hoa: Option<String>,

    /// Monthly mortgage insurance
    #[arg(long)]
    pub mortgage_insurance: Option<String>,

    /// Monthly PMI
    #[arg(long)]
    pub pmi: Option<String>,

    /// Label the breakdown as a refinance
    #[arg(long)]
    pub refinance: bool,

    #[command(flatten)]
    pub edit: EditArgs,
}

/// Arguments for calculating a JSON form
#[derive(Args)]
pub struct CalculateArgs {
    /// Path to JSON form (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub edit: EditArgs,
}

pub fn run_purchase(
    args: PurchaseArgs,
    config: CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let form = match args.county {
        Some(county) => {
            if args.property_tax.is_some() || args.home_insurance.is_some() {
                warn!("--county given; --property-tax and --home-insurance are ignored");
            }
            MortgageForm::PurchaseCounty(PurchaseCountyForm {
                purchase_price: args.purchase_price.unwrap_or_default(),
                down_payment_percentage: args.down_payment.unwrap_or_default(),
                interest_rate: args.rate.unwrap_or_default(),
                county,
                hoa_dues: args.hoa.unwrap_or_default(),
                mortgage_insurance: args.mortgage_insurance.unwrap_or_default(),
                pmi_per_month: args.pmi.unwrap_or_default(),
            })
        }
        None => MortgageForm::PurchaseDirect(PurchaseDirectForm {
            purchase_price: args.purchase_price.unwrap_or_default(),
            down_payment_percentage: args.down_payment.unwrap_or_default(),
            interest_rate: args.rate.unwrap_or_default(),
            property_tax_per_month: args.property_tax.unwrap_or_default(),
            home_insurance_per_month: args.home_insurance.unwrap_or_default(),
            hoa_dues: args.hoa.unwrap_or_default(),
            mortgage_insurance: args.mortgage_insurance.unwrap_or_default(),
            pmi_per_month: args.pmi.unwrap_or_default(),
        }),
    };

    estimate(&form, &args.edit.edits, config)
}

pub fn run_refinance(
    args: RefinanceArgs,
    config: CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let form = MortgageForm::Refinance(RefinanceForm {
        loan_balance: args.loan_balance.unwrap_or_default(),
        interest_rate: args.rate.unwrap_or_default(),
        annual_property_tax: args.annual_property_tax.unwrap_or_default(),
        annual_home_insurance: args.annual_home_insurance.unwrap_or_default(),
        hoa_dues: args.hoa.unwrap_or_default(),
        mortgage_insurance: args.mortgage_insurance.unwrap_or_default(),
        pmi_per_month: args.pmi.unwrap_or_default(),
    });

    estimate(&form, &args.edit.edits, config)
}

pub fn run_manual(
    args: ManualArgs,
    config: CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let transaction_type = if args.refinance {
        TransactionMode::Refinance
    } else {
        TransactionMode::Purchase
    };
    let form = MortgageForm::Manual(ManualForm {
        transaction_type,
        principal_interest: args.principal_interest.unwrap_or_default(),
        property_tax_per_month: args.property_tax.unwrap_or_default(),
        home_insurance_per_month: args.home_insurance.unwrap_or_default(),
        hoa_fees: args.hoa.unwrap_or_default(),
        mortgage_insurance: args.mortgage_insurance.unwrap_or_default(),
        pmi_per_month: args.pmi.unwrap_or_default(),
    });

    estimate(&form, &args.edit.edits, config)
}

pub fn run_calculate(
    args: CalculateArgs,
    config: CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let form: MortgageForm = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(form) = input::stdin::read_piped()? {
        form
    } else {
        return Err("--input file (or a JSON form on stdin) is required".into());
    };

    estimate(&form, &args.edit.edits, config)
}

/// Calculate, layer the edits on top and shape the result for display.
fn estimate(
    form: &MortgageForm,
    edits: &[(Component, String)],
    config: CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let calculator = PaymentCalculator::new(config);
    let output = calculator.calculate(form);

    let mut adjusted = AdjustedBreakdown::new(output.result.clone());
    for (component, text) in edits {
        adjusted = adjusted.with_override_text(*component, text)?;
    }

    let report = output.map(|_| DisplayModel::from_adjusted(&adjusted));
    Ok(serde_json::to_value(report)?)
}

fn parse_edit(raw: &str) -> Result<(Component, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected COMPONENT=VALUE, got '{raw}'"))?;
    let component: Component = name.parse().map_err(|e: mortgage_core::MortgageError| e.to_string())?;
    Ok((component, value.trim().to_string()))
}
