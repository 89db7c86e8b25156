use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio::sync::Notify;
use uuid::Uuid;

use payroll::database::models::LegalParameterName;
use payroll::routes;

mod common;
use common::*;

macro_rules! init_app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(service($store)))
                .configure(routes::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health() {
    let app = init_app!(Arc::new(InMemoryStore::default()));

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_calculate_employee() {
    let company_id = Uuid::new_v4();
    let store = Arc::new(InMemoryStore::with_company(company_id));
    let employee_id = store.add_employee(employee(company_id, "Ana", "2200"));
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/payroll/calculate")
        .set_json(json!({ "employeeId": employee_id, "period": "2025-03" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["period"], "2025-03");
    assert_eq!(body["data"]["cssEmployee"], "214.50");
    assert_eq!(body["data"]["eduInsuranceEmployee"], "27.50");
    assert_eq!(body["data"]["incomeTax"], "0.00");
    assert_eq!(body["data"]["bankDeduction"], "0.00");
    assert_eq!(body["data"]["loanDeduction"], "0.00");
    assert_eq!(body["data"]["netSalary"], "1958.00");
    assert_eq!(body["data"]["totalEmployerContributions"], "324.06");
}

#[actix_web::test]
async fn test_calculate_with_invalid_period_is_bad_request() {
    let company_id = Uuid::new_v4();
    let store = Arc::new(InMemoryStore::with_company(company_id));
    let employee_id = store.add_employee(employee(company_id, "Ana", "2200"));
    let app = init_app!(store);

    for bad in ["2025-13", "2025-3", "March"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/payroll/calculate")
            .set_json(json!({ "employeeId": employee_id, "period": bad }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "period {}", bad);
    }
}

#[actix_web::test]
async fn test_calculate_unknown_employee_is_not_found() {
    let app = init_app!(Arc::new(InMemoryStore::default()));

    let req = test::TestRequest::post()
        .uri("/api/v1/payroll/calculate")
        .set_json(json!({ "employeeId": Uuid::new_v4(), "period": "2025-03" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["code"], "employee_not_found");
}

#[actix_web::test]
async fn test_calculate_missing_parameter_is_unprocessable() {
    let company_id = Uuid::new_v4();
    let store = Arc::new(InMemoryStore::with_company(company_id));
    store
        .parameters
        .lock()
        .unwrap()
        .retain(|p| p.name != LegalParameterName::CssEmployer);
    let employee_id = store.add_employee(employee(company_id, "Ana", "2200"));
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/payroll/calculate")
        .set_json(json!({ "employeeId": employee_id, "period": "2025-03" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["code"], "parameter_not_configured");
    assert_eq!(body["data"]["parameter"], "CSS_EMPLOYER");
    assert_eq!(body["data"]["companyId"], company_id.to_string());
    assert_eq!(body["data"]["employeeId"], employee_id.to_string());
}

#[actix_web::test]
async fn test_run_reports_each_employee() {
    let company_id = Uuid::new_v4();
    let store = Arc::new(InMemoryStore::with_company(company_id));
    store.add_employee(employee(company_id, "Ana", "2200"));
    let mut broke = employee(company_id, "Broke", "300");
    broke.loan_deduction = Some(dec("400"));
    broke.loan_deduction_months = months(&[3]);
    let broke_id = store.add_employee(broke);
    let app = init_app!(store.clone());

    let req = test::TestRequest::post()
        .uri("/api/v1/payroll/runs")
        .set_json(json!({ "companyId": company_id, "period": "2025-03" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let run = &body["data"];
    assert_eq!(run["complete"], false);
    assert_eq!(run["succeeded"], 1);
    assert_eq!(run["failed"], 1);

    let outcomes = run["outcomes"].as_array().unwrap();
    let failed = outcomes
        .iter()
        .find(|o| o["status"] == "failed")
        .unwrap();
    assert_eq!(failed["employeeId"], broke_id.to_string());
    assert_eq!(failed["error"]["code"], "deductions_exceed_gross");
    let computed = outcomes
        .iter()
        .find(|o| o["status"] == "computed")
        .unwrap();
    assert_eq!(computed["entry"]["netSalary"], "1958.00");

    // Without save nothing is stored
    assert!(store.entries().is_empty());
}

#[actix_web::test]
async fn test_save_pay_and_remit() {
    let company_id = Uuid::new_v4();
    let store = Arc::new(InMemoryStore::with_company(company_id));
    store.add_employee(employee(company_id, "Ana", "2200"));
    let app = init_app!(store.clone());

    let req = test::TestRequest::post()
        .uri("/api/v1/payroll/runs")
        .set_json(json!({ "companyId": company_id, "period": "2025-03", "save": true }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["saved"]["saved"].as_array().unwrap().len(), 1);

    let uri = format!(
        "/api/v1/payroll/entries?companyId={}&period=2025-03&status=computed",
        company_id
    );
    let req = test::TestRequest::get().uri(&uri).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["status"], "computed");

    let req = test::TestRequest::post()
        .uri("/api/v1/payroll/runs/paid")
        .set_json(json!({ "companyId": company_id, "period": "2025-03" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["status"], "paid");

    let req = test::TestRequest::post()
        .uri("/api/v1/calculations/sipe")
        .set_json(json!({ "companyId": company_id, "period": "2025-03" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["entryCount"], 1);
    assert_eq!(body["data"]["employeeTotal"], "242.00");
    assert_eq!(body["data"]["employerTotal"], "324.06");
    assert_eq!(body["data"]["grandTotal"], "566.06");
}

#[actix_web::test]
async fn test_sipe_without_paid_entries_reports_zero_totals() {
    let company_id = Uuid::new_v4();
    let store = Arc::new(InMemoryStore::with_company(company_id));
    store.add_employee(employee(company_id, "Ana", "2200"));
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/calculations/sipe")
        .set_json(json!({ "companyId": company_id, "period": "2025-03" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["entryCount"], 0);
    assert_eq!(body["data"]["employeeTotal"], "0.00");
    assert_eq!(body["data"]["employerTotal"], "0.00");
    assert_eq!(body["data"]["grandTotal"], "0.00");
}

#[actix_web::test]
async fn test_entries_with_unknown_status_is_bad_request() {
    let app = init_app!(Arc::new(InMemoryStore::default()));

    let uri = format!(
        "/api/v1/payroll/entries?companyId={}&period=2025-03&status=approved",
        Uuid::new_v4()
    );
    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_concurrent_paid_transition_is_refused() {
    let company_id = Uuid::new_v4();
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let mut store = InMemoryStore::with_company(company_id);
    store.paid_gate = Some(PaidGate {
        entered: entered.clone(),
        release: release.clone(),
    });
    let store = Arc::new(store);
    store.add_employee(employee(company_id, "Ana", "2200"));
    let service = service(store.clone());
    let march = period("2025-03");
    service.run_and_save(company_id, march).await.unwrap();

    let first = {
        let service = service.clone();
        tokio::spawn(async move { service.mark_paid(company_id, march).await })
    };
    entered.notified().await;

    let err = service.mark_paid(company_id, march).await.unwrap_err();
    assert!(matches!(err, payroll::error::AppError::Conflict(_)));

    release.notify_one();
    let paid = first.await.unwrap().unwrap();
    assert_eq!(paid.len(), 1);

    // Once released, a later transition finds nothing left to pay
    release.notify_one();
    let again = service.mark_paid(company_id, march).await.unwrap();
    assert!(again.is_empty());
}
