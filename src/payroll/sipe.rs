use bigdecimal::BigDecimal;
use serde::Serialize;
use uuid::Uuid;

use super::period::Period;
use super::{round_money, serialize_money, zero_money};
use crate::database::models::PayrollEntry;

/// Social contributions owed to the state for one company and period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SipeRemittance {
    pub company_id: Uuid,
    pub period: Period,
    /// CSS and educational insurance withheld from employees.
    #[serde(serialize_with = "serialize_money")]
    pub employee_total: BigDecimal,
    /// CSS, educational insurance and occupational risk owed by the employer.
    #[serde(serialize_with = "serialize_money")]
    pub employer_total: BigDecimal,
    #[serde(serialize_with = "serialize_money")]
    pub grand_total: BigDecimal,
    pub entry_count: usize,
}

/// Sum the paid entries of `company_id` for `period`. Computed but unpaid
/// entries are not owed yet and are left out; no paid entries gives zeros.
pub fn compute_remittance(company_id: Uuid, period: Period, entries: &[PayrollEntry]) -> SipeRemittance {
    let paid = entries.iter().filter(|e| {
        e.is_paid() && e.calculation.company_id == company_id && e.calculation.period == period
    });

    let mut employee_total = zero_money();
    let mut employer_total = zero_money();
    let mut entry_count = 0;
    for entry in paid {
        employee_total += entry.calculation.employee_social_contributions();
        employer_total += entry.calculation.employer_social_contributions();
        entry_count += 1;
    }

    let grand_total = round_money(&(&employee_total + &employer_total));
    SipeRemittance {
        company_id,
        period,
        employee_total: round_money(&employee_total),
        employer_total: round_money(&employer_total),
        grand_total,
        entry_count,
    }
}
