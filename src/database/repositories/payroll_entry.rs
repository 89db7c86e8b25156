use sqlx::{PgExecutor, Postgres, Transaction, types::Json};
use uuid::Uuid;

use crate::database::{
    models::{EntryStatus, PayrollEntry},
    types::PayrollEntryRow,
};
use crate::payroll::{PayrollCalculation, Period};

const ENTRY_COLUMNS: &str = r#"
    id,
    company_id,
    employee_id,
    period,
    gross_salary,
    css_employee,
    edu_insurance_employee,
    taxable_base,
    income_tax,
    bank_deduction,
    loan_deduction,
    custom_deductions,
    total_deductions,
    net_salary,
    net_clamped,
    css_employer,
    edu_insurance_employer,
    occupational_risk,
    total_employer_contributions,
    status,
    computed_at,
    paid_at
"#;

pub async fn list_for_period<'e, E>(
    executor: E,
    company_id: Uuid,
    period: Period,
    status: Option<EntryStatus>,
) -> Result<Vec<PayrollEntry>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let query = format!(
        "SELECT {ENTRY_COLUMNS} FROM payroll_entries \
         WHERE company_id = $1 AND period = $2 AND ($3::TEXT IS NULL OR status = $3) \
         ORDER BY employee_id"
    );
    let rows = sqlx::query_as::<_, PayrollEntryRow>(&query)
        .bind(company_id)
        .bind(period.to_string())
        .bind(status.map(|s| s.as_str()))
        .fetch_all(executor)
        .await?;

    rows.into_iter().map(PayrollEntry::try_from).collect()
}

/// Insert or overwrite the computed entry for the calculation's employee and
/// period. A paid entry is never overwritten; `None` is returned for it.
pub async fn upsert_computed(
    tx: &mut Transaction<'_, Postgres>,
    calculation: &PayrollCalculation,
) -> Result<Option<Uuid>, sqlx::Error> {
    let saved = sqlx::query_scalar::<_, Uuid>(
        r#"
            INSERT INTO
                payroll_entries (
                    id,
                    company_id,
                    employee_id,
                    period,
                    gross_salary,
                    css_employee,
                    edu_insurance_employee,
                    taxable_base,
                    income_tax,
                    bank_deduction,
                    loan_deduction,
                    custom_deductions,
                    total_deductions,
                    net_salary,
                    net_clamped,
                    css_employer,
                    edu_insurance_employer,
                    occupational_risk,
                    total_employer_contributions,
                    status,
                    computed_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, 'computed', NOW())
            ON CONFLICT (company_id, employee_id, period) DO UPDATE
            SET
                gross_salary = EXCLUDED.gross_salary,
                css_employee = EXCLUDED.css_employee,
                edu_insurance_employee = EXCLUDED.edu_insurance_employee,
                taxable_base = EXCLUDED.taxable_base,
                income_tax = EXCLUDED.income_tax,
                bank_deduction = EXCLUDED.bank_deduction,
                loan_deduction = EXCLUDED.loan_deduction,
                custom_deductions = EXCLUDED.custom_deductions,
                total_deductions = EXCLUDED.total_deductions,
                net_salary = EXCLUDED.net_salary,
                net_clamped = EXCLUDED.net_clamped,
                css_employer = EXCLUDED.css_employer,
                edu_insurance_employer = EXCLUDED.edu_insurance_employer,
                occupational_risk = EXCLUDED.occupational_risk,
                total_employer_contributions = EXCLUDED.total_employer_contributions,
                computed_at = EXCLUDED.computed_at
            WHERE
                payroll_entries.status = 'computed'
            RETURNING
                employee_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(calculation.company_id)
    .bind(calculation.employee_id)
    .bind(calculation.period.to_string())
    .bind(&calculation.gross_salary)
    .bind(&calculation.css_employee)
    .bind(&calculation.edu_insurance_employee)
    .bind(&calculation.taxable_base)
    .bind(&calculation.income_tax)
    .bind(&calculation.bank_deduction)
    .bind(&calculation.loan_deduction)
    .bind(Json(&calculation.custom_deductions))
    .bind(&calculation.total_deductions)
    .bind(&calculation.net_salary)
    .bind(calculation.net_clamped)
    .bind(&calculation.css_employer)
    .bind(&calculation.edu_insurance_employer)
    .bind(&calculation.occupational_risk)
    .bind(&calculation.total_employer_contributions)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(saved)
}

/// Serialize paid transitions for one company and period across processes.
/// The lock is released when the transaction ends.
pub async fn lock_period(
    tx: &mut Transaction<'_, Postgres>,
    company_id: Uuid,
    period: Period,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(format!("payroll:{}:{}", company_id, period))
        .execute(&mut **tx)
        .await?;

    Ok(())
}

/// Move every computed entry of the period to paid and return the moved
/// entries. Entries already paid are left as they are.
pub async fn mark_paid(
    tx: &mut Transaction<'_, Postgres>,
    company_id: Uuid,
    period: Period,
) -> Result<Vec<PayrollEntry>, sqlx::Error> {
    let query = format!(
        "UPDATE payroll_entries SET status = 'paid', paid_at = NOW() \
         WHERE company_id = $1 AND period = $2 AND status = 'computed' \
         RETURNING {ENTRY_COLUMNS}"
    );
    let rows = sqlx::query_as::<_, PayrollEntryRow>(&query)
        .bind(company_id)
        .bind(period.to_string())
        .fetch_all(&mut **tx)
        .await?;

    rows.into_iter().map(PayrollEntry::try_from).collect()
}
