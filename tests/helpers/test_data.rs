use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use fueltrade::modules::clients::models::{CreateClientRequest, CreateProjectRequest};
use fueltrade::modules::clients::{ClientService, ProjectService};
use fueltrade::modules::invoices::models::CreateInvoiceRequest;
use fueltrade::modules::invoices::InvoiceService;
use fueltrade::modules::lpos::models::CreateLpoRequest;
use fueltrade::modules::lpos::LpoService;
use fueltrade::modules::payments::models::{CreatePaymentRequest, PaymentMethod};
use fueltrade::modules::sales::models::CreateSaleRequest;
use fueltrade::modules::sales::SaleService;
use fueltrade::modules::stock::models::CreateStockRequest;
use fueltrade::modules::stock::{StockBatch, StockService};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A client with one project; returns (client_id, project_id)
pub async fn seed_client_project(pool: &MySqlPool) -> (String, String) {
    let client = ClientService::new(pool.clone())
        .create(CreateClientRequest {
            name: "Al Noor Contracting".to_string(),
            email: Some("accounts@alnoor.ae".to_string()),
            phone: None,
            address: None,
        })
        .await
        .expect("create client");

    let project = ProjectService::new(pool.clone())
        .create(CreateProjectRequest {
            name: "Marina Tower".to_string(),
            client_id: client.id.clone(),
        })
        .await
        .expect("create project");

    (client.id, project.id)
}

pub async fn seed_stock(
    pool: &MySqlPool,
    quantity: Decimal,
    purchase_cost: Decimal,
    purchase_date: NaiveDate,
) -> StockBatch {
    StockService::new(pool.clone())
        .create(CreateStockRequest {
            supplier: "ADNOC Distribution".to_string(),
            quantity,
            purchase_cost,
            purchase_date,
            remarks: None,
        })
        .await
        .expect("create stock batch")
}

pub fn sale_request(
    client_id: &str,
    project_id: &str,
    quantity: Decimal,
    unit_price: Decimal,
) -> CreateSaleRequest {
    CreateSaleRequest {
        client_id: client_id.to_string(),
        project_id: project_id.to_string(),
        quantity,
        unit_price,
        purchase_cost: None,
        total_amount: None,
        sale_date: date(2024, 2, 1),
        remarks: None,
    }
}

pub fn lpo_request(sale_id: &str, lpo_no: &str) -> CreateLpoRequest {
    CreateLpoRequest {
        sale_id: sale_id.to_string(),
        lpo_no: lpo_no.to_string(),
        lpo_date: Some(date(2024, 2, 5)),
        remarks: None,
    }
}

pub fn invoice_request(lpo_id: &str, invoice_no: &str) -> CreateInvoiceRequest {
    CreateInvoiceRequest {
        lpo_id: lpo_id.to_string(),
        invoice_no: invoice_no.to_string(),
        invoice_date: Some(date(2024, 2, 10)),
        remarks: None,
    }
}

pub fn payment_request(sale_id: &str, amount: Decimal) -> CreatePaymentRequest {
    CreatePaymentRequest {
        client_id: None,
        sale_id: sale_id.to_string(),
        payment_date: Some(date(2024, 3, 1)),
        payment_method: Some(PaymentMethod::BankTransfer),
        reference_no: None,
        amount,
        remarks: None,
    }
}

/// Drive a new sale through LPO and invoice; returns the sale id
pub async fn seed_invoiced_sale(
    pool: &MySqlPool,
    client_id: &str,
    project_id: &str,
    quantity: Decimal,
    unit_price: Decimal,
) -> String {
    let sale = SaleService::new(pool.clone())
        .create_sale(sale_request(client_id, project_id, quantity, unit_price))
        .await
        .expect("create sale");
    let sale_id = sale.view.sale.id.clone();

    let lpo = LpoService::new(pool.clone())
        .create_lpo(lpo_request(&sale_id, &format!("LPO-{}", &sale_id[..8])))
        .await
        .expect("create LPO");

    InvoiceService::new(pool.clone())
        .create_invoice(invoice_request(&lpo.lpo.id, &format!("INV-{}", &sale_id[..8])))
        .await
        .expect("create invoice");

    sale_id
}
