use rayon::prelude::*;
use serde::{Serialize, Serializer};
use uuid::Uuid;

use super::calculator::{PayrollCalculation, compute_entry};
use super::error::{FailureDetail, PayrollError};
use super::period::Period;
use super::policy::PayrollPolicy;
use super::rules::CompanyRules;
use crate::database::models::Employee;

/// Outcome of one employee within a company run.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeOutcome {
    pub employee_id: Uuid,
    pub employee_name: String,
    pub result: Result<PayrollCalculation, PayrollError>,
}

impl EmployeeOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "status")]
enum OutcomeView<'a> {
    Computed {
        employee_id: Uuid,
        employee_name: &'a str,
        entry: &'a PayrollCalculation,
    },
    Failed {
        employee_id: Uuid,
        employee_name: &'a str,
        error: FailureDetail,
    },
}

impl Serialize for EmployeeOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let view = match &self.result {
            Ok(entry) => OutcomeView::Computed {
                employee_id: self.employee_id,
                employee_name: &self.employee_name,
                entry,
            },
            Err(error) => OutcomeView::Failed {
                employee_id: self.employee_id,
                employee_name: &self.employee_name,
                error: error.into(),
            },
        };
        view.serialize(serializer)
    }
}

/// Per-employee outcomes of one company's payroll for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRun {
    pub company_id: Uuid,
    pub period: Period,
    pub complete: bool,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<EmployeeOutcome>,
}

impl PayrollRun {
    /// True only when every active employee has a computed entry.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn entries(&self) -> impl Iterator<Item = &PayrollCalculation> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&EmployeeOutcome, &PayrollError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o, e)))
    }
}

/// Compute every active employee of `company_id`. Employees are independent,
/// so they are computed in parallel; outcomes keep the input order. A failure
/// never stops the other employees.
pub fn run_payroll(
    company_id: Uuid,
    period: Period,
    employees: &[Employee],
    rules: &CompanyRules,
    policy: &PayrollPolicy,
) -> PayrollRun {
    let outcomes: Vec<EmployeeOutcome> = employees
        .par_iter()
        .filter(|e| e.company_id == company_id && e.is_active())
        .map(|employee| EmployeeOutcome {
            employee_id: employee.id,
            employee_name: employee.full_name(),
            result: compute_entry(employee, rules, policy, period),
        })
        .collect();

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    let failed = outcomes.len() - succeeded;

    PayrollRun {
        company_id,
        period,
        complete: failed == 0,
        succeeded,
        failed,
        outcomes,
    }
}
