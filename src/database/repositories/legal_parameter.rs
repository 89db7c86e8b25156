use sqlx::PgExecutor;
use uuid::Uuid;

use crate::database::models::LegalParameter;

pub async fn list_active_for_company<'e, E>(
    executor: E,
    company_id: Uuid,
) -> Result<Vec<LegalParameter>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let parameters = sqlx::query_as::<_, LegalParameter>(
        r#"
            SELECT
                id,
                company_id,
                name,
                kind,
                percentage,
                effective_from,
                active,
                created_at
            FROM
                legal_parameters
            WHERE
                company_id = $1
                AND active = TRUE
            ORDER BY
                name,
                effective_from
        "#,
    )
    .bind(company_id)
    .fetch_all(executor)
    .await?;

    Ok(parameters)
}
