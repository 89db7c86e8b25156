use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::LegalParameterName;

fn for_employee(employee_id: &Option<Uuid>) -> String {
    employee_id.map_or(String::new(), |id| format!(" (employee {})", id))
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayrollError {
    #[error(
        "Legal parameter {parameter} is not configured for company {company_id} as of {effective_date}{}",
        for_employee(.employee_id)
    )]
    ParameterNotConfigured {
        company_id: Uuid,
        employee_id: Option<Uuid>,
        parameter: LegalParameterName,
        effective_date: NaiveDate,
    },

    #[error(
        "Legal parameter {parameter} has {count} active rows effective {effective_from} for company {company_id}{}",
        for_employee(.employee_id)
    )]
    ConflictingParameters {
        company_id: Uuid,
        employee_id: Option<Uuid>,
        parameter: LegalParameterName,
        effective_from: NaiveDate,
        count: usize,
    },

    #[error(
        "No income tax bracket configured for company {company_id}{}{}",
        .taxable_amount.as_ref().map_or(String::new(), |a| format!(" covering {}", a)),
        for_employee(.employee_id)
    )]
    NoBracketConfigured {
        company_id: Uuid,
        employee_id: Option<Uuid>,
        taxable_amount: Option<BigDecimal>,
    },

    #[error("Income tax brackets for company {company_id} are malformed: {detail}{}", for_employee(.employee_id))]
    BracketGapOrOverlap {
        company_id: Uuid,
        employee_id: Option<Uuid>,
        detail: String,
    },

    #[error(
        "Employee {employee_id} not found{}",
        .company_id.map_or(String::new(), |id| format!(" in company {}", id))
    )]
    EmployeeNotFound {
        company_id: Option<Uuid>,
        employee_id: Uuid,
    },

    #[error("Employee {employee_id} of company {company_id} is not active")]
    EmployeeInactive { company_id: Uuid, employee_id: Uuid },

    #[error("Invalid payroll period '{0}', expected YYYY-MM")]
    InvalidPeriod(String),

    #[error("Month {0} is outside the range 1-12")]
    MonthOutOfRange(i32),

    #[error("Deduction '{label}' of employee {employee_id} in company {company_id} is negative")]
    NegativeDeduction {
        company_id: Uuid,
        employee_id: Uuid,
        label: String,
    },

    #[error(
        "Deductions of {deductions} exceed gross salary {gross} for employee {employee_id} in company {company_id}"
    )]
    DeductionsExceedGross {
        company_id: Uuid,
        employee_id: Uuid,
        gross: BigDecimal,
        deductions: BigDecimal,
    },
}

impl PayrollError {
    /// Attach the employee whose calculation surfaced this error.
    pub fn with_employee(mut self, id: Uuid) -> Self {
        match &mut self {
            PayrollError::ParameterNotConfigured { employee_id, .. }
            | PayrollError::ConflictingParameters { employee_id, .. }
            | PayrollError::NoBracketConfigured { employee_id, .. }
            | PayrollError::BracketGapOrOverlap { employee_id, .. } => {
                *employee_id = Some(id);
            }
            _ => {}
        }
        self
    }

    pub fn code(&self) -> &'static str {
        match self {
            PayrollError::ParameterNotConfigured { .. } => "parameter_not_configured",
            PayrollError::ConflictingParameters { .. } => "conflicting_parameters",
            PayrollError::NoBracketConfigured { .. } => "no_bracket_configured",
            PayrollError::BracketGapOrOverlap { .. } => "bracket_gap_or_overlap",
            PayrollError::EmployeeNotFound { .. } => "employee_not_found",
            PayrollError::EmployeeInactive { .. } => "employee_inactive",
            PayrollError::InvalidPeriod(_) => "invalid_period",
            PayrollError::MonthOutOfRange(_) => "month_out_of_range",
            PayrollError::NegativeDeduction { .. } => "negative_deduction",
            PayrollError::DeductionsExceedGross { .. } => "deductions_exceed_gross",
        }
    }

    pub fn company_id(&self) -> Option<Uuid> {
        match self {
            PayrollError::ParameterNotConfigured { company_id, .. }
            | PayrollError::ConflictingParameters { company_id, .. }
            | PayrollError::NoBracketConfigured { company_id, .. }
            | PayrollError::BracketGapOrOverlap { company_id, .. }
            | PayrollError::EmployeeInactive { company_id, .. }
            | PayrollError::NegativeDeduction { company_id, .. }
            | PayrollError::DeductionsExceedGross { company_id, .. } => Some(*company_id),
            PayrollError::EmployeeNotFound { company_id, .. } => *company_id,
            PayrollError::InvalidPeriod(_) | PayrollError::MonthOutOfRange(_) => None,
        }
    }

    pub fn employee_id(&self) -> Option<Uuid> {
        match self {
            PayrollError::ParameterNotConfigured { employee_id, .. }
            | PayrollError::ConflictingParameters { employee_id, .. }
            | PayrollError::NoBracketConfigured { employee_id, .. }
            | PayrollError::BracketGapOrOverlap { employee_id, .. } => *employee_id,
            PayrollError::EmployeeNotFound { employee_id, .. }
            | PayrollError::EmployeeInactive { employee_id, .. }
            | PayrollError::NegativeDeduction { employee_id, .. }
            | PayrollError::DeductionsExceedGross { employee_id, .. } => Some(*employee_id),
            PayrollError::InvalidPeriod(_) | PayrollError::MonthOutOfRange(_) => None,
        }
    }

    pub fn parameter(&self) -> Option<LegalParameterName> {
        match self {
            PayrollError::ParameterNotConfigured { parameter, .. }
            | PayrollError::ConflictingParameters { parameter, .. } => Some(*parameter),
            _ => None,
        }
    }
}

/// Serializable description of a failed calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureDetail {
    pub code: &'static str,
    pub message: String,
    pub company_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<LegalParameterName>,
}

impl From<&PayrollError> for FailureDetail {
    fn from(error: &PayrollError) -> Self {
        Self {
            code: error.code(),
            message: error.to_string(),
            company_id: error.company_id(),
            employee_id: error.employee_id(),
            parameter: error.parameter(),
        }
    }
}
