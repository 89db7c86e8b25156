#![allow(dead_code)]

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};
use tokio::sync::Notify;
use uuid::Uuid;

use payroll::database::models::*;
use payroll::database::{CompanyRulesSnapshot, CompanySnapshot, PayrollStore};
use payroll::error::AppError;
use payroll::payroll::{
    CompanyRules, MonthSet, PayrollCalculation, PayrollPolicy, Period,
};
use payroll::services::PayrollService;

pub fn dec(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

pub fn period(value: &str) -> Period {
    value.parse().unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn parameter(
    company_id: Uuid,
    name: LegalParameterName,
    percentage: &str,
    effective_from: NaiveDate,
) -> LegalParameter {
    LegalParameter {
        id: Uuid::new_v4(),
        company_id,
        name,
        kind: name.kind(),
        percentage: dec(percentage),
        effective_from,
        active: true,
        created_at: Utc::now(),
    }
}

/// Standard statutory rates, effective from the start of 2024.
pub fn standard_parameters(company_id: Uuid) -> Vec<LegalParameter> {
    let from = date(2024, 1, 1);
    vec![
        parameter(company_id, LegalParameterName::CssEmployee, "9.75", from),
        parameter(company_id, LegalParameterName::EduInsuranceEmployee, "1.25", from),
        parameter(company_id, LegalParameterName::CssEmployer, "12.25", from),
        parameter(company_id, LegalParameterName::EduInsuranceEmployer, "1.50", from),
        parameter(company_id, LegalParameterName::OccupationalRisk, "0.98", from),
    ]
}

pub fn bracket(
    company_id: Uuid,
    lower: &str,
    upper: Option<&str>,
    percentage: &str,
    fixed: &str,
) -> IsrBracket {
    IsrBracket {
        id: Uuid::new_v4(),
        company_id,
        lower_bound: dec(lower),
        upper_bound: upper.map(dec),
        percentage: dec(percentage),
        fixed_deduction: dec(fixed),
        active: true,
        created_at: Utc::now(),
    }
}

/// 0% up to 11000, 15% plus 1650 up to 50000, 25% plus 6650 above.
pub fn standard_brackets(company_id: Uuid) -> Vec<IsrBracket> {
    vec![
        bracket(company_id, "0", Some("11000"), "0", "0"),
        bracket(company_id, "11000.01", Some("50000"), "15", "1650"),
        bracket(company_id, "50000.01", None, "25", "6650"),
    ]
}

pub fn standard_rules(company_id: Uuid) -> CompanyRules {
    CompanyRules::new(
        company_id,
        &standard_parameters(company_id),
        &standard_brackets(company_id),
    )
}

pub fn employee(company_id: Uuid, first_name: &str, salary: &str) -> Employee {
    let now = Utc::now();
    Employee {
        id: Uuid::new_v4(),
        company_id,
        national_id: format!("8-{}", &Uuid::new_v4().simple().to_string()[..6]),
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        hire_date: date(2023, 6, 15),
        department: Some("Operations".to_string()),
        position: None,
        base_salary: dec(salary),
        status: EmployeeStatus::Active,
        bank_deduction: None,
        bank_deduction_months: MonthSet::empty(),
        loan_deduction: None,
        loan_deduction_months: MonthSet::empty(),
        custom_deductions: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

pub fn months(values: &[i32]) -> MonthSet {
    MonthSet::from_months(values.iter().copied()).unwrap()
}

/// Blocks `mark_paid` until released, so tests can overlap two transitions.
pub struct PaidGate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

/// `PayrollStore` backed by vectors, standing in for Postgres.
#[derive(Default)]
pub struct InMemoryStore {
    pub parameters: Mutex<Vec<LegalParameter>>,
    pub brackets: Mutex<Vec<IsrBracket>>,
    pub employees: Mutex<Vec<Employee>>,
    pub entries: Mutex<Vec<PayrollEntry>>,
    pub paid_gate: Option<PaidGate>,
}

impl InMemoryStore {
    /// A company configured with the standard rates and brackets.
    pub fn with_company(company_id: Uuid) -> Self {
        let store = Self::default();
        store.parameters.lock().unwrap().extend(standard_parameters(company_id));
        store.brackets.lock().unwrap().extend(standard_brackets(company_id));
        store
    }

    pub fn add_employee(&self, employee: Employee) -> Uuid {
        let id = employee.id;
        self.employees.lock().unwrap().push(employee);
        id
    }

    pub fn entries(&self) -> Vec<PayrollEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl PayrollStore for InMemoryStore {
    async fn employee(&self, employee_id: Uuid) -> Result<Option<Employee>, AppError> {
        Ok(self
            .employees
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == employee_id)
            .cloned())
    }

    async fn company_rules(&self, company_id: Uuid) -> Result<CompanyRulesSnapshot, AppError> {
        Ok(CompanyRulesSnapshot {
            parameters: self
                .parameters
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.company_id == company_id && p.active)
                .cloned()
                .collect(),
            brackets: self
                .brackets
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b.company_id == company_id && b.active)
                .cloned()
                .collect(),
        })
    }

    async fn company_snapshot(&self, company_id: Uuid) -> Result<CompanySnapshot, AppError> {
        let rules = self.company_rules(company_id).await?;
        let employees = self
            .employees
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.company_id == company_id && e.is_active())
            .cloned()
            .collect();
        Ok(CompanySnapshot { rules, employees })
    }

    async fn payroll_entries(
        &self,
        company_id: Uuid,
        period: Period,
        status: Option<EntryStatus>,
    ) -> Result<Vec<PayrollEntry>, AppError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.calculation.company_id == company_id && e.calculation.period == period)
            .filter(|e| status.is_none_or(|s| e.status == s))
            .cloned()
            .collect())
    }

    async fn save_computed(
        &self,
        calculations: &[PayrollCalculation],
    ) -> Result<SaveSummary, AppError> {
        let mut entries = self.entries.lock().unwrap();
        let mut summary = SaveSummary::default();

        for calculation in calculations {
            let existing = entries.iter_mut().find(|e| {
                e.calculation.company_id == calculation.company_id
                    && e.calculation.employee_id == calculation.employee_id
                    && e.calculation.period == calculation.period
            });
            match existing {
                Some(entry) if entry.is_paid() => {
                    summary.skipped_paid.push(calculation.employee_id);
                }
                Some(entry) => {
                    entry.calculation = calculation.clone();
                    entry.computed_at = Utc::now();
                    summary.saved.push(calculation.employee_id);
                }
                None => {
                    entries.push(PayrollEntry {
                        id: Uuid::new_v4(),
                        status: EntryStatus::Computed,
                        calculation: calculation.clone(),
                        computed_at: Utc::now(),
                        paid_at: None,
                    });
                    summary.saved.push(calculation.employee_id);
                }
            }
        }

        Ok(summary)
    }

    async fn mark_paid(
        &self,
        company_id: Uuid,
        period: Period,
    ) -> Result<Vec<PayrollEntry>, AppError> {
        if let Some(gate) = &self.paid_gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let mut entries = self.entries.lock().unwrap();
        let now = Utc::now();
        let mut paid = Vec::new();
        for entry in entries.iter_mut().filter(|e| {
            e.calculation.company_id == company_id
                && e.calculation.period == period
                && e.status == EntryStatus::Computed
        }) {
            entry.status = EntryStatus::Paid;
            entry.paid_at = Some(now);
            paid.push(entry.clone());
        }
        Ok(paid)
    }
}

pub fn service(store: Arc<InMemoryStore>) -> PayrollService {
    PayrollService::new(store, PayrollPolicy::default())
}

pub fn service_with_policy(store: Arc<InMemoryStore>, policy: PayrollPolicy) -> PayrollService {
    PayrollService::new(store, policy)
}
