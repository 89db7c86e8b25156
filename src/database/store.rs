use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Employee, EntryStatus, IsrBracket, LegalParameter, PayrollEntry, SaveSummary};
use super::repositories::{employee, isr_bracket, legal_parameter, payroll_entry};
use super::transaction::DatabaseTransaction;
use crate::error::AppError;
use crate::payroll::{CompanyRules, PayrollCalculation, Period};

/// Active statutory configuration of one company.
#[derive(Debug, Clone, Default)]
pub struct CompanyRulesSnapshot {
    pub parameters: Vec<LegalParameter>,
    pub brackets: Vec<IsrBracket>,
}

impl CompanyRulesSnapshot {
    pub fn rules(&self, company_id: Uuid) -> CompanyRules {
        CompanyRules::new(company_id, &self.parameters, &self.brackets)
    }
}

/// Everything a company run reads, taken from one consistent point in time.
#[derive(Debug, Clone, Default)]
pub struct CompanySnapshot {
    pub rules: CompanyRulesSnapshot,
    pub employees: Vec<Employee>,
}

/// Read and write access to the payroll tables.
#[async_trait]
pub trait PayrollStore: Send + Sync {
    async fn employee(&self, employee_id: Uuid) -> Result<Option<Employee>, AppError>;

    async fn company_rules(&self, company_id: Uuid) -> Result<CompanyRulesSnapshot, AppError>;

    async fn company_snapshot(&self, company_id: Uuid) -> Result<CompanySnapshot, AppError>;

    async fn payroll_entries(
        &self,
        company_id: Uuid,
        period: Period,
        status: Option<EntryStatus>,
    ) -> Result<Vec<PayrollEntry>, AppError>;

    /// Persist computed entries atomically. Paid entries are never touched.
    async fn save_computed(
        &self,
        calculations: &[PayrollCalculation],
    ) -> Result<SaveSummary, AppError>;

    /// Move the period's computed entries to paid and return them.
    async fn mark_paid(&self, company_id: Uuid, period: Period)
    -> Result<Vec<PayrollEntry>, AppError>;
}

#[derive(Debug, Clone)]
pub struct PgPayrollStore {
    pool: PgPool,
}

impl PgPayrollStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PayrollStore for PgPayrollStore {
    async fn employee(&self, employee_id: Uuid) -> Result<Option<Employee>, AppError> {
        Ok(employee::find_by_id(&self.pool, employee_id).await?)
    }

    async fn company_rules(&self, company_id: Uuid) -> Result<CompanyRulesSnapshot, AppError> {
        DatabaseTransaction::snapshot(&self.pool, move |tx| {
            Box::pin(async move {
                let parameters =
                    legal_parameter::list_active_for_company(&mut **tx, company_id).await?;
                let brackets = isr_bracket::list_active_for_company(&mut **tx, company_id).await?;
                Ok(CompanyRulesSnapshot {
                    parameters,
                    brackets,
                })
            })
        })
        .await
    }

    async fn company_snapshot(&self, company_id: Uuid) -> Result<CompanySnapshot, AppError> {
        DatabaseTransaction::snapshot(&self.pool, move |tx| {
            Box::pin(async move {
                let parameters =
                    legal_parameter::list_active_for_company(&mut **tx, company_id).await?;
                let brackets = isr_bracket::list_active_for_company(&mut **tx, company_id).await?;
                let employees = employee::list_active_for_company(&mut **tx, company_id).await?;
                Ok(CompanySnapshot {
                    rules: CompanyRulesSnapshot {
                        parameters,
                        brackets,
                    },
                    employees,
                })
            })
        })
        .await
    }

    async fn payroll_entries(
        &self,
        company_id: Uuid,
        period: Period,
        status: Option<EntryStatus>,
    ) -> Result<Vec<PayrollEntry>, AppError> {
        Ok(payroll_entry::list_for_period(&self.pool, company_id, period, status).await?)
    }

    async fn save_computed(
        &self,
        calculations: &[PayrollCalculation],
    ) -> Result<SaveSummary, AppError> {
        let calculations = calculations.to_vec();
        DatabaseTransaction::run(&self.pool, move |tx| {
            Box::pin(async move {
                let mut summary = SaveSummary::default();
                for calculation in &calculations {
                    match payroll_entry::upsert_computed(tx, calculation).await? {
                        Some(employee_id) => summary.saved.push(employee_id),
                        None => summary.skipped_paid.push(calculation.employee_id),
                    }
                }
                Ok(summary)
            })
        })
        .await
    }

    async fn mark_paid(
        &self,
        company_id: Uuid,
        period: Period,
    ) -> Result<Vec<PayrollEntry>, AppError> {
        DatabaseTransaction::run(&self.pool, move |tx| {
            Box::pin(async move {
                payroll_entry::lock_period(tx, company_id, period).await?;
                Ok(payroll_entry::mark_paid(tx, company_id, period).await?)
            })
        })
        .await
    }
}
