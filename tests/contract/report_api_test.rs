// Contract tests for the report endpoints over in-memory data

use std::str::FromStr;
use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use fueltrade::config::AppConfig;
use fueltrade::middleware::query_config;
use fueltrade::modules::lpos::models::LpoStatus;
use fueltrade::modules::reports::{self, InMemoryReportRepository, ReportService};
use fueltrade::modules::sales::models::{Sale, SaleStatus, SaleView};
use fueltrade::modules::stock::StockBatch;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct SaleFixture<'a> {
    id: &'a str,
    client: (&'a str, &'a str),
    project: (&'a str, &'a str),
    quantity: Decimal,
    unit_price: Decimal,
    purchase_cost: Decimal,
    status: SaleStatus,
    paid: Decimal,
    sale_date: NaiveDate,
}

fn sale(fixture: SaleFixture<'_>) -> SaleView {
    let total_amount = Sale::compute_total(fixture.quantity, fixture.unit_price).unwrap();
    SaleView {
        sale: Sale {
            id: fixture.id.to_string(),
            client_id: fixture.client.0.to_string(),
            project_id: fixture.project.0.to_string(),
            quantity: fixture.quantity,
            unit_price: fixture.unit_price,
            purchase_cost: fixture.purchase_cost,
            fifo_unit_cost: fixture.purchase_cost,
            total_amount,
            status: fixture.status,
            sale_date: fixture.sale_date,
            remarks: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        },
        client_name: fixture.client.1.to_string(),
        project_name: fixture.project.1.to_string(),
        paid_amount: fixture.paid,
        remaining_amount: total_amount - fixture.paid,
    }
}

fn purchase(id: &str, purchase_date: NaiveDate, initial: Decimal, cost: Decimal) -> StockBatch {
    StockBatch {
        id: id.to_string(),
        supplier: "ADNOC".to_string(),
        initial_quantity: initial,
        quantity: initial,
        purchase_cost: cost,
        purchase_date,
        remarks: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

const AL_NOOR: (&str, &str) = ("client-1", "Al Noor Contracting");
const GULF: (&str, &str) = ("client-2", "Gulf Builders");
const MARINA: (&str, &str) = ("project-1", "Marina Tower");
const CREEK: (&str, &str) = ("project-2", "Creek Harbour");

fn repository() -> InMemoryReportRepository {
    InMemoryReportRepository::new()
        .with_purchase(purchase("stock-1", date(2024, 1, 10), dec!(100), dec!(2)))
        .with_sale(sale(SaleFixture {
            id: "sale-1",
            client: AL_NOOR,
            project: MARINA,
            quantity: dec!(120),
            unit_price: dec!(3.25),
            purchase_cost: dec!(2.1667),
            status: SaleStatus::PartiallyPaid,
            paid: dec!(100),
            sale_date: date(2024, 2, 1),
        }))
        .with_sale(sale(SaleFixture {
            id: "sale-2",
            client: GULF,
            project: CREEK,
            quantity: dec!(400),
            unit_price: dec!(2.50),
            purchase_cost: dec!(2),
            status: SaleStatus::InvoiceGenerated,
            paid: dec!(0),
            sale_date: date(2024, 2, 5),
        }))
        .with_sale(sale(SaleFixture {
            id: "sale-3",
            client: AL_NOOR,
            project: MARINA,
            quantity: dec!(50),
            unit_price: dec!(3),
            purchase_cost: dec!(2),
            status: SaleStatus::Cancelled,
            paid: dec!(0),
            sale_date: date(2024, 2, 6),
        }))
        .with_sale(sale(SaleFixture {
            id: "sale-4",
            client: GULF,
            project: CREEK,
            quantity: dec!(10),
            unit_price: dec!(3),
            purchase_cost: dec!(2),
            status: SaleStatus::PendingLpo,
            paid: dec!(0),
            sale_date: date(2024, 3, 2),
        }))
        .with_lpo(LpoStatus::InvoicePending)
        .with_lpo(LpoStatus::Completed)
}

macro_rules! app {
    () => {{
        let service = ReportService::new(Arc::new(repository()), &AppConfig::default())
            .expect("report service");
        test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .app_data(query_config())
                .service(web::scope("/api").configure(reports::controllers::configure)),
        )
        .await
    }};
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).expect("decimal string"),
        Value::Number(n) => Decimal::from_str(&n.to_string()).expect("decimal number"),
        other => panic!("not a decimal: {}", other),
    }
}

#[actix_web::test]
async fn test_dashboard_shape() {
    let app = app!();

    let req = test::TestRequest::get().uri("/api/dashboard").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    for key in [
        "monthlyProfits",
        "yearlyStats",
        "pendingLPOCount",
        "pendingInvoiceCount",
        "recentSales",
        "stockSummary",
    ] {
        assert!(body.get(key).is_some(), "missing {}", key);
    }

    assert_eq!(body["pendingLPOCount"], 1);
    assert_eq!(body["pendingInvoiceCount"], 1);
    assert_eq!(decimal(&body["stockSummary"]["totalQuantity"]), dec!(100));

    // Recent sales cover every status, newest sale date first
    let recent = body["recentSales"].as_array().unwrap();
    assert_eq!(recent.len(), 4);
    assert_eq!(recent[0]["id"], "sale-4");
}

#[actix_web::test]
async fn test_vat_report_totals() {
    let app = app!();

    let req = test::TestRequest::get()
        .uri("/api/reports/vat?start=2024-01-01&end=2024-02-28")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["purchases"].as_array().unwrap().len(), 1);
    // sale-3 is cancelled and sale-4 falls outside the range
    assert_eq!(body["sales"].as_array().unwrap().len(), 2);
    assert_eq!(decimal(&body["total_input_vat"]), dec!(10.00));
    // 5% of 390.00 and 1000.00
    assert_eq!(decimal(&body["total_output_vat"]), dec!(69.50));
    assert_eq!(decimal(&body["net_vat"]), dec!(59.50));
}

#[actix_web::test]
async fn test_vat_report_rejects_inverted_range() {
    let app = app!();

    let req = test::TestRequest::get()
        .uri("/api/reports/vat?start=2024-03-01&end=2024-02-01")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("must be before or equal to end"));
}

#[actix_web::test]
async fn test_reports_are_stable_across_calls() {
    let app = app!();

    for uri in [
        "/api/reports/vat?start=2024-01-01&end=2024-12-31",
        "/api/reports/profit-loss?start=2024-01-01&end=2024-12-31",
        "/api/reports/pending-payments",
    ] {
        let first = test::call_and_read_body(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let second = test::call_and_read_body(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(first, second, "{}", uri);
    }
}

#[actix_web::test]
async fn test_profit_loss_summary() {
    let app = app!();

    let req = test::TestRequest::get()
        .uri("/api/reports/profit-loss?start=2024-02-01&end=2024-02-28")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["sales"].as_array().unwrap().len(), 2);
    assert_eq!(decimal(&body["summary"]["total_sales"]), dec!(1390.00));
    assert_eq!(decimal(&body["summary"]["total_quantity"]), dec!(520));
    assert_eq!(body["start"], "2024-02-01");
}

#[actix_web::test]
async fn test_pending_payments_ordering() {
    let app = app!();

    let req = test::TestRequest::get()
        .uri("/api/reports/pending-payments")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);

    // Gulf Builders: 1000.00 + 30.00 outstanding; Al Noor: 390.00 - 100 paid
    assert_eq!(entries[0]["client"], "Gulf Builders");
    assert_eq!(entries[0]["projectId"], "project-2");
    assert_eq!(decimal(&entries[0]["pending_amount"]), dec!(1030.00));
    assert_eq!(entries[1]["client"], "Al Noor Contracting");
    assert_eq!(decimal(&entries[1]["pending_amount"]), dec!(290.00));
    assert_eq!(decimal(&body["total_pending"]), dec!(1320.00));
}
