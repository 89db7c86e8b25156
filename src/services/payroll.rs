use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use uuid::Uuid;

use crate::database::PayrollStore;
use crate::database::models::{EntryStatus, PayrollEntry, SaveSummary};
use crate::error::AppError;
use crate::payroll::{
    PayrollCalculation, PayrollError, PayrollPolicy, PayrollRun, Period, SipeRemittance,
    compute_entry, compute_remittance, run_payroll,
};

/// A company run together with what was persisted from it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRun {
    pub run: PayrollRun,
    pub saved: SaveSummary,
}

type PeriodLocks = Mutex<HashMap<(Uuid, Period), Arc<tokio::sync::Mutex<()>>>>;

/// Orchestrates loading snapshots, running the engine and persisting entries.
#[derive(Clone)]
pub struct PayrollService {
    store: Arc<dyn PayrollStore>,
    policy: PayrollPolicy,
    paid_locks: Arc<PeriodLocks>,
}

impl PayrollService {
    pub fn new(store: Arc<dyn PayrollStore>, policy: PayrollPolicy) -> Self {
        Self {
            store,
            policy,
            paid_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn calculate_employee(
        &self,
        employee_id: Uuid,
        period: Period,
    ) -> Result<PayrollCalculation, AppError> {
        let employee = self
            .store
            .employee(employee_id)
            .await?
            .ok_or(PayrollError::EmployeeNotFound {
                company_id: None,
                employee_id,
            })?;

        if !employee.is_active() {
            return Err(PayrollError::EmployeeInactive {
                company_id: employee.company_id,
                employee_id,
            }
            .into());
        }

        let rules = self
            .store
            .company_rules(employee.company_id)
            .await?
            .rules(employee.company_id);

        let calculation = compute_entry(&employee, &rules, &self.policy, period)?;
        log::info!(
            "Computed payroll for employee {} ({}) period {}: net {}",
            employee.id,
            employee.full_name(),
            period,
            calculation.net_salary
        );
        Ok(calculation)
    }

    pub async fn run_company(&self, company_id: Uuid, period: Period) -> Result<PayrollRun, AppError> {
        log::info!("Starting payroll run for company {} period {}", company_id, period);

        let snapshot = self.store.company_snapshot(company_id).await?;
        let policy = self.policy;
        let run = tokio::task::spawn_blocking(move || {
            let rules = snapshot.rules.rules(company_id);
            run_payroll(company_id, period, &snapshot.employees, &rules, &policy)
        })
        .await
        .map_err(|e| AppError::internal_server_error_message(e.to_string()))?;

        for (outcome, error) in run.failures() {
            log::warn!(
                "Payroll failed for employee {} ({}) in company {} period {}: [{}] {}",
                outcome.employee_id,
                outcome.employee_name,
                company_id,
                period,
                error.code(),
                error
            );
        }
        log::info!(
            "Finished payroll run for company {} period {}: {} computed, {} failed",
            company_id,
            period,
            run.succeeded,
            run.failed
        );

        Ok(run)
    }

    /// Run the company and persist every successful entry as computed.
    pub async fn run_and_save(&self, company_id: Uuid, period: Period) -> Result<SavedRun, AppError> {
        let run = self.run_company(company_id, period).await?;
        let calculations: Vec<PayrollCalculation> = run.entries().cloned().collect();
        let saved = self.store.save_computed(&calculations).await?;

        for employee_id in &saved.skipped_paid {
            log::warn!(
                "Entry of employee {} for company {} period {} is already paid, not overwritten",
                employee_id,
                company_id,
                period
            );
        }
        log::info!(
            "Saved {} payroll entries for company {} period {}",
            saved.saved.len(),
            company_id,
            period
        );

        Ok(SavedRun { run, saved })
    }

    fn period_lock(&self, company_id: Uuid, period: Period) -> Result<Arc<tokio::sync::Mutex<()>>, AppError> {
        let mut locks = self
            .paid_locks
            .lock()
            .map_err(|_| AppError::internal_server_error_message("payroll period locks poisoned"))?;
        Ok(locks.entry((company_id, period)).or_default().clone())
    }

    /// Transition the period's computed entries to paid. A second transition
    /// for the same company and period while one is in flight is refused.
    pub async fn mark_paid(&self, company_id: Uuid, period: Period) -> Result<Vec<PayrollEntry>, AppError> {
        let lock = self.period_lock(company_id, period)?;
        let result = self.transition_paid(&lock, company_id, period).await;
        self.release_period_lock(company_id, period, lock);
        result
    }

    async fn transition_paid(
        &self,
        lock: &tokio::sync::Mutex<()>,
        company_id: Uuid,
        period: Period,
    ) -> Result<Vec<PayrollEntry>, AppError> {
        let _guard = lock.try_lock().map_err(|_| {
            log::warn!(
                "Refused concurrent paid transition for company {} period {}",
                company_id,
                period
            );
            AppError::Conflict(format!(
                "A paid transition for company {} period {} is already in progress",
                company_id, period
            ))
        })?;

        let paid = self.store.mark_paid(company_id, period).await?;
        log::info!(
            "Marked {} payroll entries paid for company {} period {}",
            paid.len(),
            company_id,
            period
        );
        Ok(paid)
    }

    // Drops the entry once only the map and this caller still hold it
    fn release_period_lock(&self, company_id: Uuid, period: Period, lock: Arc<tokio::sync::Mutex<()>>) {
        let Ok(mut locks) = self.paid_locks.lock() else {
            return;
        };
        let key = (company_id, period);
        let unused = locks
            .get(&key)
            .is_some_and(|held| Arc::ptr_eq(held, &lock) && Arc::strong_count(&lock) == 2);
        if unused {
            locks.remove(&key);
        }
    }

    pub async fn remittance(&self, company_id: Uuid, period: Period) -> Result<SipeRemittance, AppError> {
        let entries = self
            .store
            .payroll_entries(company_id, period, Some(EntryStatus::Paid))
            .await?;
        let remittance = compute_remittance(company_id, period, &entries);
        log::info!(
            "SIPE remittance for company {} period {}: {} over {} entries",
            company_id,
            period,
            remittance.grand_total,
            remittance.entry_count
        );
        Ok(remittance)
    }

    pub async fn entries(
        &self,
        company_id: Uuid,
        period: Period,
        status: Option<EntryStatus>,
    ) -> Result<Vec<PayrollEntry>, AppError> {
        self.store.payroll_entries(company_id, period, status).await
    }
}
