use actix_web::{web, HttpResponse};

use crate::core::Result;
use crate::modules::lpos::models::{CreateLpoRequest, LpoListQuery, UpdateLpoRequest};
use crate::modules::lpos::services::LpoService;

/// GET /api/lpo?status=&include=invoice
pub async fn list_lpos(
    service: web::Data<LpoService>,
    query: web::Query<LpoListQuery>,
) -> Result<HttpResponse> {
    let lpos = service.list_lpos(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(lpos))
}

/// POST /api/lpo
pub async fn create_lpo(
    service: web::Data<LpoService>,
    request: web::Json<CreateLpoRequest>,
) -> Result<HttpResponse> {
    let lpo = service.create_lpo(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(lpo))
}

/// PUT /api/lpo
pub async fn update_lpo(
    service: web::Data<LpoService>,
    request: web::Json<UpdateLpoRequest>,
) -> Result<HttpResponse> {
    let lpo = service.update_lpo(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(lpo))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/lpo")
            .route(web::get().to(list_lpos))
            .route(web::post().to(create_lpo))
            .route(web::put().to(update_lpo)),
    );
}
