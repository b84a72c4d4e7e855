use actix_web::{web, HttpResponse};

use crate::core::{DateRangeQuery, IdQuery, Result};
use crate::modules::stock::models::{CreateStockRequest, UpdateStockRequest};
use crate::modules::stock::services::StockService;

/// GET /api/stock?start=&end=
pub async fn list_stock(
    service: web::Data<StockService>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse> {
    let batches = service.list(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(batches))
}

/// POST /api/stock
pub async fn create_stock(
    service: web::Data<StockService>,
    request: web::Json<CreateStockRequest>,
) -> Result<HttpResponse> {
    let batch = service.create(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(batch))
}

/// PUT /api/stock
pub async fn update_stock(
    service: web::Data<StockService>,
    request: web::Json<UpdateStockRequest>,
) -> Result<HttpResponse> {
    let batch = service.update(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(batch))
}

/// DELETE /api/stock?id=
pub async fn delete_stock(
    service: web::Data<StockService>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse> {
    let id = query.require("Stock")?;
    service.delete(id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// Configure stock routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/stock")
            .route(web::get().to(list_stock))
            .route(web::post().to(create_stock))
            .route(web::put().to(update_stock))
            .route(web::delete().to(delete_stock)),
    );
}
