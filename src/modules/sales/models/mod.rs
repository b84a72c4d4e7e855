mod sale;
mod sale_status;

pub use sale::{CreateSaleRequest, Sale, SaleDetails, SaleListQuery, SaleView, UpdateSaleRequest};
pub use sale_status::SaleStatus;
