use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of a company's progressive income tax (ISR) table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct IsrBracket {
    pub id: Uuid,
    pub company_id: Uuid,
    pub lower_bound: BigDecimal,         // NUMERIC(14,2)
    pub upper_bound: Option<BigDecimal>, // NULL for the top bracket
    pub percentage: BigDecimal,          // marginal rate
    pub fixed_deduction: BigDecimal,     // added after the marginal part
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
