use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use super::models::{CustomDeduction, Employee, EmployeeStatus, EntryStatus, PayrollEntry};
use crate::payroll::{AppliedDeduction, MonthSet, PayrollCalculation};

// Database row types that match the PostgreSQL schema
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmployeeRow {
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
    pub bank_deduction_months: Vec<i16>,   // SMALLINT[]
    pub loan_deduction: Option<BigDecimal>,
    pub loan_deduction_months: Vec<i16>,   // SMALLINT[]
    pub custom_deductions: Json<Vec<CustomDeduction>>, // JSONB
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PayrollEntryRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub employee_id: Uuid,
    pub period: String, // 'YYYY-MM'
    pub gross_salary: BigDecimal,
    pub css_employee: BigDecimal,
    pub edu_insurance_employee: BigDecimal,
    pub taxable_base: BigDecimal,
    pub income_tax: BigDecimal,
    pub bank_deduction: BigDecimal,
    pub loan_deduction: BigDecimal,
    pub custom_deductions: Json<Vec<AppliedDeduction>>,
    pub total_deductions: BigDecimal,
    pub net_salary: BigDecimal,
    pub net_clamped: bool,
    pub css_employer: BigDecimal,
    pub edu_insurance_employer: BigDecimal,
    pub occupational_risk: BigDecimal,
    pub total_employer_contributions: BigDecimal,
    pub status: EntryStatus,
    pub computed_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

fn decode_error(message: String) -> sqlx::Error {
    sqlx::Error::Decode(message.into())
}

// Conversion functions
impl TryFrom<EmployeeRow> for Employee {
    type Error = sqlx::Error;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let months = |column: &str, values: &[i16]| {
            MonthSet::try_from(values)
                .map_err(|e| decode_error(format!("employee {} {}: {}", id, column, e)))
        };
        let bank_deduction_months = months("bank_deduction_months", &row.bank_deduction_months)?;
        let loan_deduction_months = months("loan_deduction_months", &row.loan_deduction_months)?;

        Ok(Self {
            id,
            company_id: row.company_id,
            national_id: row.national_id,
            first_name: row.first_name,
            last_name: row.last_name,
            hire_date: row.hire_date,
            department: row.department,
            position: row.position,
            base_salary: row.base_salary,
            status: row.status,
            bank_deduction: row.bank_deduction,
            bank_deduction_months,
            loan_deduction: row.loan_deduction,
            loan_deduction_months,
            custom_deductions: row.custom_deductions.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<PayrollEntryRow> for PayrollEntry {
    type Error = sqlx::Error;

    fn try_from(row: PayrollEntryRow) -> Result<Self, Self::Error> {
        let period = row
            .period
            .parse()
            .map_err(|e| decode_error(format!("payroll entry {}: {}", row.id, e)))?;

        Ok(Self {
            id: row.id,
            status: row.status,
            calculation: PayrollCalculation {
                company_id: row.company_id,
                employee_id: row.employee_id,
                period,
                gross_salary: row.gross_salary,
                css_employee: row.css_employee,
                edu_insurance_employee: row.edu_insurance_employee,
                taxable_base: row.taxable_base,
                income_tax: row.income_tax,
                bank_deduction: row.bank_deduction,
                loan_deduction: row.loan_deduction,
                custom_deductions: row.custom_deductions.0,
                total_deductions: row.total_deductions,
                net_salary: row.net_salary,
                net_clamped: row.net_clamped,
                css_employer: row.css_employer,
                edu_insurance_employer: row.edu_insurance_employer,
                occupational_risk: row.occupational_risk,
                total_employer_contributions: row.total_employer_contributions,
            },
            computed_at: row.computed_at,
            paid_at: row.paid_at,
        })
    }
}
