pub mod payment_service;
pub mod reconciliation;

pub use payment_service::{PaymentLookup, PaymentService};
pub use reconciliation::{ensure_accepts, reconcile, PaymentAction};
