use actix_web::{web, HttpResponse};

use crate::core::{IdQuery, Result};
use crate::modules::sales::models::{CreateSaleRequest, SaleListQuery, UpdateSaleRequest};
use crate::modules::sales::services::SaleService;

/// GET /api/sales?status=&start=&end=&include=
pub async fn list_sales(
    service: web::Data<SaleService>,
    query: web::Query<SaleListQuery>,
) -> Result<HttpResponse> {
    let sales = service.list_sales(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(sales))
}

/// GET /api/sales/{id}
pub async fn get_sale(
    service: web::Data<SaleService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let sale = service.get_sale(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(sale))
}

/// POST /api/sales
pub async fn create_sale(
    service: web::Data<SaleService>,
    request: web::Json<CreateSaleRequest>,
) -> Result<HttpResponse> {
    let sale = service.create_sale(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(sale))
}

/// PUT /api/sales
pub async fn update_sale(
    service: web::Data<SaleService>,
    request: web::Json<UpdateSaleRequest>,
) -> Result<HttpResponse> {
    let sale = service.update_sale(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(sale))
}

/// POST /api/sales/{id}/cancel
pub async fn cancel_sale(
    service: web::Data<SaleService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let sale = service.cancel_sale(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(sale))
}

/// DELETE /api/sales?id=
pub async fn delete_sale(
    service: web::Data<SaleService>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse> {
    service.delete_sale(query.require("Sale")?).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// Configure sale routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/sales")
            .route(web::get().to(list_sales))
            .route(web::post().to(create_sale))
            .route(web::put().to(update_sale))
            .route(web::delete().to(delete_sale)),
    )
    .route("/sales/{id}", web::get().to(get_sale))
    .route("/sales/{id}/cancel", web::post().to(cancel_sale));
}
