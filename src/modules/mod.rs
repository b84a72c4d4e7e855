pub mod clients;
pub mod health;
pub mod invoices;
pub mod lpos;
pub mod payments;
pub mod reports;
pub mod sales;
pub mod stock;
