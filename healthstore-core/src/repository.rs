use async_trait::async_trait;
use healthstore_catalog::Product;
use healthstore_shared::SoldLine;

use crate::customer::{Customer, TransactionSummary};
use crate::supplier::Supplier;
use crate::CoreResult;

/// Read-only product lookup consumed by the register.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn find_product(&self, id: &str) -> CoreResult<Option<Product>>;
}

/// Read-only customer lookup consumed by the register.
#[async_trait]
pub trait CustomerLookup: Send + Sync {
    /// Display name for `id`, or `None` if there is no such customer.
    async fn customer_name(&self, id: &str) -> CoreResult<Option<String>>;
}

/// Repository trait for product catalog access
#[async_trait]
pub trait ProductRepository: CatalogLookup {
    async fn create_product(&self, product: Product) -> CoreResult<Product>;

    async fn get_product(&self, id: &str) -> CoreResult<Product>;

    async fn list_products(&self, category: Option<&str>) -> CoreResult<Vec<Product>>;

    async fn list_categories(&self) -> CoreResult<Vec<String>>;

    async fn update_product(&self, id: &str, product: Product) -> CoreResult<Product>;

    async fn delete_product(&self, id: &str) -> CoreResult<()>;

    /// Take sold quantities off the shelf. Unknown ids are skipped.
    async fn apply_sale(&self, lines: &[SoldLine]) -> CoreResult<()>;
}

/// Repository trait for customer records
#[async_trait]
pub trait CustomerRepository: CustomerLookup {
    async fn create_customer(&self, customer: Customer) -> CoreResult<Customer>;

    async fn get_customer(&self, id: &str) -> CoreResult<Customer>;

    async fn list_customers(&self) -> CoreResult<Vec<Customer>>;

    async fn update_customer(&self, id: &str, customer: Customer) -> CoreResult<Customer>;

    async fn delete_customer(&self, id: &str) -> CoreResult<()>;

    async fn record_purchase(&self, id: &str, summary: TransactionSummary) -> CoreResult<()>;
}

/// Repository trait for supplier records
#[async_trait]
pub trait SupplierRepository: Send + Sync {
    async fn create_supplier(&self, supplier: Supplier) -> CoreResult<Supplier>;

    async fn get_supplier(&self, id: &str) -> CoreResult<Supplier>;

    async fn list_suppliers(&self) -> CoreResult<Vec<Supplier>>;

    async fn update_supplier(&self, id: &str, supplier: Supplier) -> CoreResult<Supplier>;

    async fn delete_supplier(&self, id: &str) -> CoreResult<()>;
}
