mod lpo;

pub use lpo::{
    CreateLpoRequest, Lpo, LpoDetails, LpoListQuery, LpoStatus, LpoWithInvoice, UpdateLpoRequest,
};
