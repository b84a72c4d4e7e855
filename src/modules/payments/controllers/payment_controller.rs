use actix_web::{web, HttpResponse};

use crate::core::{IdQuery, Result};
use crate::modules::payments::models::{
    CreatePaymentRequest, PaymentListQuery, UpdatePaymentRequest,
};
use crate::modules::payments::services::{PaymentLookup, PaymentService};

/// GET /api/payments?id= | ?saleId=
pub async fn get_payments(
    service: web::Data<PaymentService>,
    query: web::Query<PaymentListQuery>,
) -> Result<HttpResponse> {
    match service.lookup(query.into_inner()).await? {
        PaymentLookup::One(payment) => Ok(HttpResponse::Ok().json(payment)),
        PaymentLookup::Many(payments) => Ok(HttpResponse::Ok().json(payments)),
    }
}

/// POST /api/payments
pub async fn create_payment(
    service: web::Data<PaymentService>,
    request: web::Json<CreatePaymentRequest>,
) -> Result<HttpResponse> {
    let payment = service.create_payment(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(payment))
}

/// PUT /api/payments
pub async fn update_payment(
    service: web::Data<PaymentService>,
    request: web::Json<UpdatePaymentRequest>,
) -> Result<HttpResponse> {
    let payment = service.update_payment(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(payment))
}

/// DELETE /api/payments?id=
pub async fn delete_payment(
    service: web::Data<PaymentService>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse> {
    service.delete_payment(query.require("Payment")?).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// Configure payment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/payments")
            .route(web::get().to(get_payments))
            .route(web::post().to(create_payment))
            .route(web::put().to(update_payment))
            .route(web::delete().to(delete_payment)),
    );
}
