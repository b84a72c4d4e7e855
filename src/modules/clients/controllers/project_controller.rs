use actix_web::{web, HttpResponse};

use crate::core::{IdQuery, Result};
use crate::modules::clients::models::{CreateProjectRequest, UpdateProjectRequest};
use crate::modules::clients::services::ProjectService;

/// GET /api/projects
pub async fn list_projects(service: web::Data<ProjectService>) -> Result<HttpResponse> {
    let projects = service.list().await?;
    Ok(HttpResponse::Ok().json(projects))
}

/// POST /api/projects
pub async fn create_project(
    service: web::Data<ProjectService>,
    request: web::Json<CreateProjectRequest>,
) -> Result<HttpResponse> {
    let project = service.create(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project))
}

/// PUT /api/projects
pub async fn update_project(
    service: web::Data<ProjectService>,
    request: web::Json<UpdateProjectRequest>,
) -> Result<HttpResponse> {
    let project = service.update(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project))
}

/// DELETE /api/projects?id=
pub async fn delete_project(
    service: web::Data<ProjectService>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse> {
    service.delete(query.require("Project")?).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects")
            .route(web::get().to(list_projects))
            .route(web::post().to(create_project))
            .route(web::put().to(update_project))
            .route(web::delete().to(delete_project)),
    );
}
