use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::EntryStatus;
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, parse_period};
use crate::services::PayrollService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    pub employee_id: Uuid,
    pub period: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub company_id: Uuid,
    pub period: String,
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRequest {
    pub company_id: Uuid,
    pub period: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntriesQuery {
    pub company_id: Uuid,
    pub period: String,
    pub status: Option<String>,
}

/// Compute one employee's payroll without storing it
pub async fn calculate(
    service: web::Data<PayrollService>,
    input: web::Json<CalculateRequest>,
) -> Result<HttpResponse, AppError> {
    let period = parse_period(&input.period)?;
    let calculation = service.calculate_employee(input.employee_id, period).await?;

    Ok(ApiResponse::ok(calculation))
}

/// Run a company's payroll, optionally persisting the computed entries
pub async fn run_company(
    service: web::Data<PayrollService>,
    input: web::Json<RunRequest>,
) -> Result<HttpResponse, AppError> {
    let period = parse_period(&input.period)?;

    if input.save {
        let saved = service.run_and_save(input.company_id, period).await?;
        Ok(ApiResponse::ok(saved))
    } else {
        let run = service.run_company(input.company_id, period).await?;
        Ok(ApiResponse::ok(run))
    }
}

pub async fn mark_paid(
    service: web::Data<PayrollService>,
    input: web::Json<PeriodRequest>,
) -> Result<HttpResponse, AppError> {
    let period = parse_period(&input.period)?;
    let paid = service.mark_paid(input.company_id, period).await?;

    Ok(ApiResponse::ok(paid))
}

pub async fn list_entries(
    service: web::Data<PayrollService>,
    query: web::Query<EntriesQuery>,
) -> Result<HttpResponse, AppError> {
    let period = parse_period(&query.period)?;
    let status = query
        .status
        .as_deref()
        .map(|s| s.parse::<EntryStatus>().map_err(AppError::BadRequest))
        .transpose()?;

    let entries = service.entries(query.company_id, period, status).await?;

    Ok(ApiResponse::ok(entries))
}
