use sqlx::PgExecutor;
use uuid::Uuid;

use crate::database::models::IsrBracket;

pub async fn list_active_for_company<'e, E>(
    executor: E,
    company_id: Uuid,
) -> Result<Vec<IsrBracket>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let brackets = sqlx::query_as::<_, IsrBracket>(
        r#"
            SELECT
                id,
                company_id,
                lower_bound,
                upper_bound,
                percentage,
                fixed_deduction,
                active,
                created_at
            FROM
                isr_brackets
            WHERE
                company_id = $1
                AND active = TRUE
            ORDER BY
                lower_bound
        "#,
    )
    .bind(company_id)
    .fetch_all(executor)
    .await?;

    Ok(brackets)
}
