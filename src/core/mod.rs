pub mod error;
pub mod money;
pub mod params;
pub mod timezone;
pub mod unit_of_work;

pub use error::{AppError, Result};
pub use params::{DateRangeQuery, IdQuery};
pub use timezone::BusinessCalendar;
pub use unit_of_work::in_transaction;
