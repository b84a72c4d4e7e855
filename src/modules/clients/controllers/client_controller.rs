use actix_web::{web, HttpResponse};

use crate::core::{IdQuery, Result};
use crate::modules::clients::models::{CreateClientRequest, UpdateClientRequest};
use crate::modules::clients::services::ClientService;

/// GET /api/clients
pub async fn list_clients(service: web::Data<ClientService>) -> Result<HttpResponse> {
    let clients = service.list().await?;
    Ok(HttpResponse::Ok().json(clients))
}

/// POST /api/clients
pub async fn create_client(
    service: web::Data<ClientService>,
    request: web::Json<CreateClientRequest>,
) -> Result<HttpResponse> {
    let client = service.create(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(client))
}

/// PUT /api/clients
pub async fn update_client(
    service: web::Data<ClientService>,
    request: web::Json<UpdateClientRequest>,
) -> Result<HttpResponse> {
    let client = service.update(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(client))
}

/// DELETE /api/clients?id=
pub async fn delete_client(
    service: web::Data<ClientService>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse> {
    service.delete(query.require("Client")?).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/clients")
            .route(web::get().to(list_clients))
            .route(web::post().to(create_client))
            .route(web::put().to(update_client))
            .route(web::delete().to(delete_client)),
    );
}
