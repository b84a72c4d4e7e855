use actix_web::{web, HttpResponse};

use crate::core::{DateRangeQuery, Result};
use crate::modules::reports::services::ReportService;

/// GET /api/dashboard
pub async fn get_dashboard(service: web::Data<ReportService>) -> Result<HttpResponse> {
    let dashboard = service.dashboard().await?;
    Ok(HttpResponse::Ok().json(dashboard))
}

/// GET /api/reports/vat?start=&end=
pub async fn get_vat_report(
    service: web::Data<ReportService>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse> {
    let report = service.vat(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /api/reports/profit-loss?start=&end=
pub async fn get_profit_loss_report(
    service: web::Data<ReportService>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse> {
    let report = service.profit_loss(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /api/reports/pending-payments
pub async fn get_pending_payments_report(
    service: web::Data<ReportService>,
) -> Result<HttpResponse> {
    let report = service.pending_payments().await?;
    Ok(HttpResponse::Ok().json(report))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(get_dashboard))
        .service(
            web::scope("/reports")
                .route("/vat", web::get().to(get_vat_report))
                .route("/profit-loss", web::get().to(get_profit_loss_report))
                .route("/pending-payments", web::get().to(get_pending_payments_report)),
        );
}
