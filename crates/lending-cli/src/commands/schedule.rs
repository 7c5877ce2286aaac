use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use lending_core::amortization::{self, LoanTerms};
use lending_core::types::{Frequency, InterestModel, LateFeePolicy};

use crate::input;

/// Arguments for schedule computation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScheduleArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Principal amount lent
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Interest rate per installment period, as a percentage
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Number of installments
    #[arg(long)]
    pub installments: Option<u32>,

    /// Interest model: simple or compound
    #[arg(long, default_value = "compound")]
    pub model: String,

    /// Payment frequency: daily, weekly, biweekly, monthly, quarterly
    #[arg(long, default_value = "monthly")]
    pub frequency: String,

    /// Contract signing date (YYYY-MM-DD)
    #[arg(long)]
    pub contract_date: Option<NaiveDate>,

    /// First installment due date (YYYY-MM-DD); defaults to the contract date
    #[arg(long, alias = "first-due")]
    pub first_installment_date: Option<NaiveDate>,

    /// Daily late-fee rate as a percentage; supplying it enables the policy
    #[arg(long)]
    pub late_fee_rate: Option<Decimal>,
}

/// Arguments for late-fee accrual
#[derive(Args)]
pub struct LateFeeArgs {
    /// Installment value the penalty accrues on
    #[arg(long)]
    pub value: Decimal,

    /// Original due date (YYYY-MM-DD)
    #[arg(long)]
    pub due_date: NaiveDate,

    /// Accrual date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Daily penalty rate as a percentage
    #[arg(long)]
    pub daily_rate: Decimal,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let contract_date = args
            .contract_date
            .ok_or("--contract-date is required (or provide --input)")?;
        LoanTerms {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            period_rate_percent: args
                .rate
                .ok_or("--rate is required (or provide --input)")?,
            interest_model: args.model.parse::<InterestModel>()?,
            installment_count: args
                .installments
                .ok_or("--installments is required (or provide --input)")?,
            frequency: args.frequency.parse::<Frequency>()?,
            contract_date,
            first_installment_date: args.first_installment_date.unwrap_or(contract_date),
            late_fee: args.late_fee_rate.map(|rate| LateFeePolicy {
                enabled: true,
                daily_rate_percent: rate,
            }),
        }
    };

    let result = amortization::compute_schedule(&terms)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_late_fee(args: LateFeeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let as_of = args
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let days = amortization::days_overdue(args.due_date, as_of);
    let amount = amortization::late_fee_amount(args.value, args.due_date, as_of, args.daily_rate)?;

    Ok(serde_json::json!({
        "due_date": args.due_date,
        "as_of": as_of,
        "days_overdue": days,
        "late_fee": amount.round_dp(2),
    }))
}
