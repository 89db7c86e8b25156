use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum LegalParameterName {
        CssEmployee => "CSS_EMPLOYEE",
        EduInsuranceEmployee => "EDU_INSURANCE_EMPLOYEE",
        CssEmployer => "CSS_EMPLOYER",
        EduInsuranceEmployer => "EDU_INSURANCE_EMPLOYER",
        OccupationalRisk => "OCCUPATIONAL_RISK",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ParameterKind {
        EmployeeDeduction => "employee_deduction",
        EmployerContribution => "employer_contribution",
    }
}

impl LegalParameterName {
    /// Which side of the payroll the statutory rate is charged to.
    pub fn kind(&self) -> ParameterKind {
        match self {
            LegalParameterName::CssEmployee | LegalParameterName::EduInsuranceEmployee => {
                ParameterKind::EmployeeDeduction
            }
            LegalParameterName::CssEmployer
            | LegalParameterName::EduInsuranceEmployer
            | LegalParameterName::OccupationalRisk => ParameterKind::EmployerContribution,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LegalParameter {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: LegalParameterName,
    pub kind: ParameterKind,
    pub percentage: BigDecimal,      // NUMERIC(7,4)
    pub effective_from: NaiveDate,   // DATE
    pub active: bool,
    pub created_at: DateTime<Utc>,   // TIMESTAMPTZ
}
