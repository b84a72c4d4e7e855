//! Fuel trading back office.
//!
//! Stock intake with FIFO depletion, sales to client projects, LPO receipt,
//! invoicing, payment collection and the reports built on top of them.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

use std::sync::Arc;

use actix_web::web;
use sqlx::MySqlPool;

use crate::config::AppConfig;
use crate::modules::clients::{ClientService, ProjectService};
use crate::modules::invoices::InvoiceService;
use crate::modules::lpos::LpoService;
use crate::modules::payments::PaymentService;
use crate::modules::reports::{MySqlReportRepository, ReportService};
use crate::modules::sales::SaleService;
use crate::modules::stock::StockService;

pub use crate::core::{AppError, Result};

/// Services shared by every worker, built once from the storage handle
#[derive(Clone)]
pub struct AppServices {
    pool: web::Data<MySqlPool>,
    stock: web::Data<StockService>,
    clients: web::Data<ClientService>,
    projects: web::Data<ProjectService>,
    sales: web::Data<SaleService>,
    lpos: web::Data<LpoService>,
    invoices: web::Data<InvoiceService>,
    payments: web::Data<PaymentService>,
    reports: web::Data<ReportService>,
}

impl AppServices {
    pub fn new(pool: MySqlPool, settings: &AppConfig) -> Result<Self> {
        let report_repository = Arc::new(MySqlReportRepository::new(pool.clone()));

        Ok(Self {
            stock: web::Data::new(StockService::new(pool.clone())),
            clients: web::Data::new(ClientService::new(pool.clone())),
            projects: web::Data::new(ProjectService::new(pool.clone())),
            sales: web::Data::new(SaleService::new(pool.clone())),
            lpos: web::Data::new(LpoService::new(pool.clone())),
            invoices: web::Data::new(InvoiceService::new(pool.clone())),
            payments: web::Data::new(PaymentService::new(pool.clone())),
            reports: web::Data::new(ReportService::new(report_repository, settings)?),
            pool: web::Data::new(pool),
        })
    }

    /// Register shared state, extractor settings and every route
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.pool.clone())
            .app_data(self.stock.clone())
            .app_data(self.clients.clone())
            .app_data(self.projects.clone())
            .app_data(self.sales.clone())
            .app_data(self.lpos.clone())
            .app_data(self.invoices.clone())
            .app_data(self.payments.clone())
            .app_data(self.reports.clone())
            .app_data(middleware::json_config())
            .app_data(middleware::query_config())
            .configure(configure_routes);
    }
}

/// Probes at the root, the JSON API under `/api`
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(modules::health::controllers::configure)
        .service(
            web::scope("/api")
                .configure(modules::stock::controllers::configure)
                .configure(modules::clients::controllers::configure)
                .configure(modules::sales::controllers::configure)
                .configure(modules::lpos::controllers::configure)
                .configure(modules::invoices::controllers::configure)
                .configure(modules::payments::controllers::configure)
                .configure(modules::reports::controllers::configure),
        );
}
