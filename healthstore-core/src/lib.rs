pub mod customer;
pub mod supplier;
pub mod repository;
pub mod report;

pub use customer::{Address, Customer, TransactionSummary};
pub use supplier::Supplier;
pub use report::{
    CustomerSpend, DailySales, SalesReport, DEFAULT_REPORT_DAYS, DEFAULT_TOP_CUSTOMERS,
};
pub use repository::{
    CatalogLookup, CustomerLookup, CustomerRepository, ProductRepository, SupplierRepository,
};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    Conflict(String),
    #[error("Internal service error: {0}")]
    Internal(String),
}

impl From<healthstore_catalog::CatalogError> for CoreError {
    fn from(err: healthstore_catalog::CatalogError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Short uppercase identifier with a record prefix, e.g. `CUST-1A2B3C4D`.
pub fn generate_id(prefix: &str) -> String {
    let simple = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{}-{}", prefix, &simple[..8])
}
