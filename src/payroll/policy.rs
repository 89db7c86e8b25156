use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Scale the bracket table is expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "basis")]
pub enum BracketBasis {
    /// Brackets apply to the monthly taxable base directly.
    #[default]
    Monthly,
    /// Brackets are annual: the monthly base is multiplied by
    /// `periods_per_year`, and the withholding divided back by it.
    Annual { periods_per_year: u32 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxableBase {
    /// Gross minus the employee's CSS and educational insurance.
    #[default]
    GrossLessSocialSecurity,
    Gross,
}

impl FromStr for TaxableBase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gross_less_social_security" => Ok(TaxableBase::GrossLessSocialSecurity),
            "gross" => Ok(TaxableBase::Gross),
            _ => Err(format!("Invalid TaxableBase: {}", s)),
        }
    }
}

/// What happens when an employee's deductions exceed gross pay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionOverflow {
    /// Fail the employee's calculation.
    #[default]
    Reject,
    /// Report a net salary of zero and flag the entry.
    ClampNet,
}

impl FromStr for DeductionOverflow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(DeductionOverflow::Reject),
            "clamp" | "clamp_net" => Ok(DeductionOverflow::ClampNet),
            _ => Err(format!("Invalid DeductionOverflow: {}", s)),
        }
    }
}

/// Conventions applied uniformly to every calculation of a deployment.
///
/// Salaries are never prorated: the full base salary is paid for any period
/// in which the employee is active, whatever the hire date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollPolicy {
    pub bracket_basis: BracketBasis,
    pub taxable_base: TaxableBase,
    pub deduction_overflow: DeductionOverflow,
}

impl BracketBasis {
    pub fn parse(basis: &str, periods_per_year: u32) -> Result<Self, String> {
        match basis.to_lowercase().as_str() {
            "monthly" => Ok(BracketBasis::Monthly),
            "annual" if periods_per_year > 0 => Ok(BracketBasis::Annual { periods_per_year }),
            "annual" => Err("Annual bracket basis needs at least one period per year".to_string()),
            _ => Err(format!("Invalid BracketBasis: {}", basis)),
        }
    }
}
