use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::{round_money, serialize_money, zero_money};
use crate::database::models::{CustomDeduction, Employee};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDeduction {
    pub label: String,
    #[serde(serialize_with = "serialize_money")]
    pub amount: BigDecimal,
}

/// Optional deductions that apply to one employee in one month.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicableDeductions {
    pub bank: BigDecimal,
    pub loan: BigDecimal,
    pub custom: Vec<AppliedDeduction>,
}

impl ApplicableDeductions {
    pub fn custom_total(&self) -> BigDecimal {
        self.custom
            .iter()
            .fold(zero_money(), |total, d| total + &d.amount)
    }

    pub fn total(&self) -> BigDecimal {
        &self.bank + &self.loan + self.custom_total()
    }
}

fn applies_to(custom: &CustomDeduction, month: u32) -> bool {
    match &custom.months {
        Some(months) if !months.is_empty() => months.contains(month),
        _ => true,
    }
}

/// Bank and loan deductions only apply in their configured months; a custom
/// deduction without a month restriction applies every month.
pub fn applicable_deductions(employee: &Employee, month: u32) -> ApplicableDeductions {
    let scheduled = |amount: &Option<BigDecimal>, in_month: bool| match amount {
        Some(amount) if in_month => round_money(amount),
        _ => zero_money(),
    };

    let bank = scheduled(
        &employee.bank_deduction,
        employee.bank_deduction_months.contains(month),
    );
    let loan = scheduled(
        &employee.loan_deduction,
        employee.loan_deduction_months.contains(month),
    );

    let custom = employee
        .custom_deductions
        .iter()
        .filter(|d| applies_to(d, month))
        .map(|d| AppliedDeduction {
            label: d.label.clone(),
            amount: round_money(&d.amount),
        })
        .collect();

    ApplicableDeductions { bank, loan, custom }
}
