mod payment;

pub use payment::{
    CreatePaymentRequest, Payment, PaymentDetails, PaymentListQuery, PaymentMethod,
    UpdatePaymentRequest,
};
