pub mod client_controller;
pub mod project_controller;

use actix_web::web;

/// Configure client and project routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    client_controller::configure(cfg);
    project_controller::configure(cfg);
}
