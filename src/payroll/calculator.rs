use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::deductions::{AppliedDeduction, applicable_deductions};
use super::error::PayrollError;
use super::period::Period;
use super::policy::{BracketBasis, DeductionOverflow, PayrollPolicy, TaxableBase};
use super::rules::CompanyRules;
use super::{percent_of, round_money, serialize_money, zero_money};
use crate::database::models::{Employee, LegalParameterName};

/// Itemized payroll of one employee for one period.
///
/// Contains nothing but the inputs' consequences, so computing the same
/// employee and period twice yields identical values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollCalculation {
    pub company_id: Uuid,
    pub employee_id: Uuid,
    pub period: Period,
    #[serde(serialize_with = "serialize_money")]
    pub gross_salary: BigDecimal,

    // Employee side
    #[serde(serialize_with = "serialize_money")]
    pub css_employee: BigDecimal,
    #[serde(serialize_with = "serialize_money")]
    pub edu_insurance_employee: BigDecimal,
    #[serde(serialize_with = "serialize_money")]
    pub taxable_base: BigDecimal,
    #[serde(serialize_with = "serialize_money")]
    pub income_tax: BigDecimal,
    #[serde(serialize_with = "serialize_money")]
    pub bank_deduction: BigDecimal,
    #[serde(serialize_with = "serialize_money")]
    pub loan_deduction: BigDecimal,
    pub custom_deductions: Vec<AppliedDeduction>,
    #[serde(serialize_with = "serialize_money")]
    pub total_deductions: BigDecimal,
    #[serde(serialize_with = "serialize_money")]
    pub net_salary: BigDecimal,
    /// Set when deductions exceeded gross and net was reported as zero.
    pub net_clamped: bool,

    // Employer side, not deducted from net
    #[serde(serialize_with = "serialize_money")]
    pub css_employer: BigDecimal,
    #[serde(serialize_with = "serialize_money")]
    pub edu_insurance_employer: BigDecimal,
    #[serde(serialize_with = "serialize_money")]
    pub occupational_risk: BigDecimal,
    #[serde(serialize_with = "serialize_money")]
    pub total_employer_contributions: BigDecimal,
}

impl PayrollCalculation {
    pub fn employee_social_contributions(&self) -> BigDecimal {
        &self.css_employee + &self.edu_insurance_employee
    }

    pub fn employer_social_contributions(&self) -> BigDecimal {
        &self.css_employer + &self.edu_insurance_employer + &self.occupational_risk
    }

    pub fn custom_deductions_total(&self) -> BigDecimal {
        self.custom_deductions
            .iter()
            .fold(zero_money(), |total, d| total + &d.amount)
    }
}

fn withhold_income_tax(
    rules: &CompanyRules,
    basis: BracketBasis,
    taxable_base: &BigDecimal,
) -> Result<BigDecimal, PayrollError> {
    match basis {
        BracketBasis::Monthly => rules.withholding(taxable_base),
        BracketBasis::Annual { periods_per_year } => {
            let periods = BigDecimal::from(periods_per_year);
            let annual = rules.withholding(&(taxable_base * &periods))?;
            Ok(round_money(&(annual / periods)))
        }
    }
}

/// Compute one employee's payroll for `period` under the company's rules.
///
/// Any missing rate or bracket aborts the whole calculation; no partial
/// entry is ever produced.
pub fn compute_entry(
    employee: &Employee,
    rules: &CompanyRules,
    policy: &PayrollPolicy,
    period: Period,
) -> Result<PayrollCalculation, PayrollError> {
    let company_id = rules.company_id();
    if employee.company_id != company_id {
        return Err(PayrollError::EmployeeNotFound {
            company_id: Some(company_id),
            employee_id: employee.id,
        });
    }

    let employee_id = employee.id;
    let as_of = period.reference_date();
    let rate = move |name: LegalParameterName| {
        rules
            .rate(name, as_of)
            .map_err(|e| e.with_employee(employee_id))
    };

    let gross_salary = round_money(&employee.base_salary);

    let css_employee = percent_of(&gross_salary, rate(LegalParameterName::CssEmployee)?);
    let edu_insurance_employee =
        percent_of(&gross_salary, rate(LegalParameterName::EduInsuranceEmployee)?);
    let css_employer = percent_of(&gross_salary, rate(LegalParameterName::CssEmployer)?);
    let edu_insurance_employer =
        percent_of(&gross_salary, rate(LegalParameterName::EduInsuranceEmployer)?);
    let occupational_risk = percent_of(&gross_salary, rate(LegalParameterName::OccupationalRisk)?);

    let taxable_base = match policy.taxable_base {
        TaxableBase::GrossLessSocialSecurity => {
            (&gross_salary - &css_employee - &edu_insurance_employee).max(zero_money())
        }
        TaxableBase::Gross => gross_salary.clone(),
    };
    let income_tax = withhold_income_tax(rules, policy.bracket_basis, &taxable_base)
        .map_err(|e| e.with_employee(employee_id))?;

    let optional = applicable_deductions(employee, period.month());
    let negative = [("bank", &optional.bank), ("loan", &optional.loan)]
        .into_iter()
        .chain(optional.custom.iter().map(|d| (d.label.as_str(), &d.amount)))
        .find(|(_, amount)| *amount < &BigDecimal::zero());
    if let Some((label, _)) = negative {
        return Err(PayrollError::NegativeDeduction {
            company_id,
            employee_id,
            label: label.to_string(),
        });
    }

    let total_deductions =
        &css_employee + &edu_insurance_employee + &income_tax + optional.total();

    let (net_salary, net_clamped) = if total_deductions > gross_salary {
        match policy.deduction_overflow {
            DeductionOverflow::Reject => {
                return Err(PayrollError::DeductionsExceedGross {
                    company_id,
                    employee_id,
                    gross: gross_salary,
                    deductions: total_deductions,
                });
            }
            DeductionOverflow::ClampNet => (zero_money(), true),
        }
    } else {
        (&gross_salary - &total_deductions, false)
    };

    let total_employer_contributions = &css_employer + &edu_insurance_employer + &occupational_risk;

    Ok(PayrollCalculation {
        company_id,
        employee_id,
        period,
        gross_salary,
        css_employee,
        edu_insurance_employee,
        taxable_base: round_money(&taxable_base),
        income_tax,
        bank_deduction: optional.bank,
        loan_deduction: optional.loan,
        custom_deductions: optional.custom,
        total_deductions: round_money(&total_deductions),
        net_salary: round_money(&net_salary),
        net_clamped,
        css_employer,
        edu_insurance_employer,
        occupational_risk,
        total_employer_contributions: round_money(&total_employer_contributions),
    })
}
