use sqlx::PgExecutor;
use uuid::Uuid;

use crate::database::{models::Employee, types::EmployeeRow};

const EMPLOYEE_COLUMNS: &str = r#"
    id,
    company_id,
    national_id,
    first_name,
    last_name,
    hire_date,
    department,
    position,
    base_salary,
    status,
    bank_deduction,
    bank_deduction_months,
    loan_deduction,
    loan_deduction_months,
    custom_deductions,
    created_at,
    updated_at
"#;

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Employee>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let query = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1");
    let row = sqlx::query_as::<_, EmployeeRow>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    row.map(Employee::try_from).transpose()
}

pub async fn list_active_for_company<'e, E>(
    executor: E,
    company_id: Uuid,
) -> Result<Vec<Employee>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let query = format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees \
         WHERE company_id = $1 AND status = 'active' \
         ORDER BY last_name, first_name, id"
    );
    let rows = sqlx::query_as::<_, EmployeeRow>(&query)
        .bind(company_id)
        .fetch_all(executor)
        .await?;

    rows.into_iter().map(Employee::try_from).collect()
}
