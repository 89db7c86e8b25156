use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use crate::payroll::MonthSet;

string_enum! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum EmployeeStatus {
        #[default]
        Active => "active",
        Inactive => "inactive",
    }
}

/// A recurring ad-hoc deduction configured on the employee record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDeduction {
    pub label: String,
    pub amount: BigDecimal,
    /// Absent or empty means every month.
    #[serde(default)]
    pub months: Option<MonthSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub company_id: Uuid,
    pub national_id: String,
    pub first_name: String,
    pub last_name: String,
    pub hire_date: NaiveDate,
    pub department: Option<String>,
    pub position: Option<String>,
    pub base_salary: BigDecimal,
    pub status: EmployeeStatus,
    pub bank_deduction: Option<BigDecimal>,
    pub bank_deduction_months: MonthSet,
    pub loan_deduction: Option<BigDecimal>,
    pub loan_deduction_months: MonthSet,
    pub custom_deductions: Vec<CustomDeduction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
