use std::sync::Arc;

use healthstore_catalog::StockPolicy;
use healthstore_core::{CustomerRepository, ProductRepository, SupplierRepository};
use healthstore_sale::{PosTerminal, SaleAggregator};
use healthstore_shared::SaleCompletedEvent;
use healthstore_store::app_config::Config;
use healthstore_store::{
    MemoryCustomerRepository, MemoryProductRepository, MemorySupplierRepository, SeedData,
    StoreError,
};
use tokio::sync::{broadcast, Mutex};

#[derive(Clone)]
pub struct StoreInfo {
    pub name: String,
    pub currency: String,
}

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub suppliers: Arc<dyn SupplierRepository>,
    /// The register's open sale; one request at a time drives it.
    pub terminal: Arc<Mutex<PosTerminal>>,
    pub sales_tx: broadcast::Sender<SaleCompletedEvent>,
    pub stock_policy: StockPolicy,
    pub store: StoreInfo,
}

impl AppState {
    /// Wire the in-memory repositories and the register from seed data.
    pub fn from_seed(seed: SeedData, config: &Config) -> Result<Self, StoreError> {
        let products = Arc::new(MemoryProductRepository::new(seed.products()?));
        let customers = Arc::new(MemoryCustomerRepository::new(seed.customers));
        let suppliers = Arc::new(MemorySupplierRepository::new(seed.suppliers));

        let terminal = PosTerminal::new(
            products.clone(),
            customers.clone(),
            SaleAggregator::with_transaction_prefix(config.sale.transaction_prefix.clone()),
        );
        let (sales_tx, _) = broadcast::channel(100);

        Ok(Self {
            products,
            customers,
            suppliers,
            terminal: Arc::new(Mutex::new(terminal)),
            sales_tx,
            stock_policy: StockPolicy::new(config.catalog.low_stock_threshold),
            store: StoreInfo {
                name: config.store.name.clone(),
                currency: config.store.currency.clone(),
            },
        })
    }
}
