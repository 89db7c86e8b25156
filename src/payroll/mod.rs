//! Statutory payroll calculation engine.
//!
//! Everything in this module is a pure function over snapshots supplied by the
//! caller. Nothing here touches the database or holds shared mutable state.

use bigdecimal::{BigDecimal, RoundingMode};
use serde::Serializer;

pub mod calculator;
pub mod deductions;
pub mod error;
pub mod isr;
pub mod legal_parameters;
pub mod months;
pub mod period;
pub mod policy;
pub mod rules;
pub mod run;
pub mod sipe;

pub use calculator::{PayrollCalculation, compute_entry};
pub use deductions::{AppliedDeduction, ApplicableDeductions, applicable_deductions};
pub use error::{FailureDetail, PayrollError};
pub use isr::IsrTable;
pub use legal_parameters::LegalParameterIndex;
pub use months::MonthSet;
pub use period::Period;
pub use policy::{BracketBasis, DeductionOverflow, PayrollPolicy, TaxableBase};
pub use rules::CompanyRules;
pub use run::{EmployeeOutcome, PayrollRun, run_payroll};
pub use sipe::{SipeRemittance, compute_remittance};

/// Round a money amount to cents, half away from zero.
pub fn round_money(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(2, RoundingMode::HalfUp)
}

/// `amount × rate / 100`, rounded to cents.
pub fn percent_of(amount: &BigDecimal, rate: &BigDecimal) -> BigDecimal {
    round_money(&(amount * rate / BigDecimal::from(100)))
}

pub fn zero_money() -> BigDecimal {
    BigDecimal::from(0).with_scale(2)
}

/// Serialize a money amount as a plain decimal string, keeping its scale
/// (`"0.00"`, never `"0"`).
pub fn serialize_money<S: Serializer>(amount: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&amount.to_plain_string())
}
