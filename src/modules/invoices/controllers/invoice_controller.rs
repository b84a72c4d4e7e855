use actix_web::{web, HttpResponse};

use crate::core::Result;
use crate::modules::invoices::models::{
    CreateInvoiceRequest, InvoiceListQuery, UpdateInvoiceRequest,
};
use crate::modules::invoices::services::InvoiceService;

/// GET /api/invoice?status=
pub async fn list_invoices(
    service: web::Data<InvoiceService>,
    query: web::Query<InvoiceListQuery>,
) -> Result<HttpResponse> {
    let invoices = service.list_invoices(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(invoices))
}

/// POST /api/invoice
pub async fn create_invoice(
    service: web::Data<InvoiceService>,
    request: web::Json<CreateInvoiceRequest>,
) -> Result<HttpResponse> {
    let invoice = service.create_invoice(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(invoice))
}

/// PUT /api/invoice
pub async fn update_invoice(
    service: web::Data<InvoiceService>,
    request: web::Json<UpdateInvoiceRequest>,
) -> Result<HttpResponse> {
    let invoice = service.update_invoice(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(invoice))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/invoice")
            .route(web::get().to(list_invoices))
            .route(web::post().to(create_invoice))
            .route(web::put().to(update_invoice)),
    );
}
