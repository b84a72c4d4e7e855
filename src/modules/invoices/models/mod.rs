mod invoice;

pub use invoice::{
    CreateInvoiceRequest, Invoice, InvoiceDetails, InvoiceListQuery, InvoiceStatus,
    UpdateInvoiceRequest,
};
