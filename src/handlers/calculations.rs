use actix_web::{HttpResponse, web};

use crate::error::AppError;
use crate::handlers::payroll::PeriodRequest;
use crate::handlers::shared::{ApiResponse, parse_period};
use crate::services::PayrollService;

/// SIPE remittance owed for a company's paid entries of one period
pub async fn sipe(
    service: web::Data<PayrollService>,
    input: web::Json<PeriodRequest>,
) -> Result<HttpResponse, AppError> {
    let period = parse_period(&input.period)?;
    let remittance = service.remittance(input.company_id, period).await?;

    Ok(ApiResponse::ok(remittance))
}
