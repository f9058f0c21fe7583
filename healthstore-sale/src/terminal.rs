use std::sync::Arc;

use healthstore_core::{CatalogLookup, CoreError, CustomerLookup};

use crate::manager::{LineChange, SaleAggregator, SaleError};
use crate::models::{CartLine, CustomerRef, Receipt, Sale, SaleStatus};

/// A register: resolves ids through the injected lookups, then drives the
/// aggregator synchronously.
pub struct PosTerminal {
    catalog: Arc<dyn CatalogLookup>,
    customers: Arc<dyn CustomerLookup>,
    aggregator: SaleAggregator,
}

impl PosTerminal {
    pub fn new(
        catalog: Arc<dyn CatalogLookup>,
        customers: Arc<dyn CustomerLookup>,
        aggregator: SaleAggregator,
    ) -> Self {
        Self {
            catalog,
            customers,
            aggregator,
        }
    }

    pub fn sale(&self) -> &Sale {
        self.aggregator.sale()
    }

    pub fn lines(&self) -> &[CartLine] {
        self.aggregator.lines()
    }

    pub fn total_cents(&self) -> i64 {
        self.aggregator.total_cents()
    }

    pub fn last_status(&self) -> SaleStatus {
        self.aggregator.last_status()
    }

    pub fn last_receipt(&self) -> Option<&Receipt> {
        self.aggregator.last_receipt()
    }

    /// Look up the current product record and add it to the sale.
    pub async fn add_product(&mut self, product_id: &str, quantity: u32) -> Result<u32, TerminalError> {
        let Some(product) = self.catalog.find_product(product_id).await? else {
            self.aggregator.record_not_found();
            return Err(TerminalError::ProductNotFound(product_id.to_string()));
        };

        Ok(self.aggregator.add_item(&product, quantity)?)
    }

    /// Change a line's quantity, checked against the product's current stock.
    ///
    /// A product that has left the catalog is checked against the line's own
    /// snapshot, so it can still be reduced or removed.
    pub async fn set_quantity(&mut self, product_id: &str, quantity: i64) -> Result<LineChange, TerminalError> {
        if self.aggregator.sale().line(product_id).is_none() {
            return Ok(self.aggregator.set_quantity(product_id, quantity)?);
        }

        let change = match self.catalog.find_product(product_id).await? {
            Some(product) => self.aggregator.set_product_quantity(&product, quantity)?,
            None => self.aggregator.set_quantity(product_id, quantity)?,
        };
        Ok(change)
    }

    pub fn remove_product(&mut self, product_id: &str) -> LineChange {
        self.aggregator.remove_item(product_id)
    }

    pub fn clear(&mut self) {
        self.aggregator.clear();
    }

    /// Attach a customer by id, or detach with `None` for a walk-in sale.
    pub async fn assign_customer(&mut self, customer_id: Option<&str>) -> Result<(), TerminalError> {
        let Some(id) = customer_id else {
            self.aggregator.detach_customer();
            return Ok(());
        };

        let Some(name) = self.customers.customer_name(id).await? else {
            self.aggregator.record_not_found();
            return Err(TerminalError::CustomerNotFound(id.to_string()));
        };

        self.aggregator.attach_customer(CustomerRef {
            id: id.to_string(),
            name,
        });
        Ok(())
    }

    pub fn checkout(&mut self) -> Result<Receipt, TerminalError> {
        Ok(self.aggregator.checkout()?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    #[error(transparent)]
    Sale(#[from] SaleError),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("Lookup failed: {0}")]
    Lookup(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use healthstore_catalog::Product;
    use healthstore_core::CoreResult;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FixedCatalog(Mutex<HashMap<String, Product>>);

    impl FixedCatalog {
        fn new(products: Vec<Product>) -> Arc<Self> {
            Arc::new(Self(Mutex::new(
                products.into_iter().map(|p| (p.id.clone(), p)).collect(),
            )))
        }

        fn set_stock(&self, id: &str, stock: u32) {
            self.0.lock().unwrap().get_mut(id).unwrap().stock = stock;
        }

        fn remove(&self, id: &str) {
            self.0.lock().unwrap().remove(id);
        }
    }

    #[async_trait]
    impl CatalogLookup for FixedCatalog {
        async fn find_product(&self, id: &str) -> CoreResult<Option<Product>> {
            Ok(self.0.lock().unwrap().get(id).cloned())
        }
    }

    struct FixedCustomers;

    #[async_trait]
    impl CustomerLookup for FixedCustomers {
        async fn customer_name(&self, id: &str) -> CoreResult<Option<String>> {
            match id {
                "CUST-001-AB" => Ok(Some("Alice Wonderland".to_string())),
                "BROKEN" => Err(CoreError::Internal("backend unavailable".to_string())),
                _ => Ok(None),
            }
        }
    }

    fn catalog() -> Arc<FixedCatalog> {
        FixedCatalog::new(vec![
            Product::new("HS001", "Organic Apples (Bag)", "Organic Foods", 599, 150),
            Product::new("HS002", "Vitamin C 1000mg", "Supplements", 1249, 2).with_sale_price(1099),
        ])
    }

    fn terminal_with(catalog: Arc<FixedCatalog>) -> PosTerminal {
        PosTerminal::new(catalog, Arc::new(FixedCustomers), SaleAggregator::new())
    }

    fn terminal() -> PosTerminal {
        terminal_with(catalog())
    }

    #[tokio::test]
    async fn test_add_by_id_and_checkout() {
        let mut terminal = terminal();
        terminal.add_product("HS001", 2).await.unwrap();
        terminal.add_product("HS002", 1).await.unwrap();
        terminal.assign_customer(Some("CUST-001-AB")).await.unwrap();

        assert_eq!(terminal.total_cents(), 2 * 599 + 1099);

        let receipt = terminal.checkout().unwrap();
        assert_eq!(receipt.total_cents(), 2297);
        assert_eq!(receipt.customer_name(), Some("Alice Wonderland"));
        assert!(terminal.sale().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_leaves_sale_untouched() {
        let mut terminal = terminal();
        terminal.add_product("HS001", 1).await.unwrap();
        let err = terminal.add_product("NOPE", 1).await.unwrap_err();
        assert!(matches!(err, TerminalError::ProductNotFound(_)));
        assert_eq!(terminal.lines().len(), 1);
        assert_eq!(terminal.last_status(), SaleStatus::NotFound);
    }

    #[tokio::test]
    async fn test_stock_rejection_passes_through() {
        let mut terminal = terminal();
        terminal.add_product("HS002", 2).await.unwrap();
        let err = terminal.add_product("HS002", 1).await.unwrap_err();
        assert!(matches!(
            err,
            TerminalError::Sale(SaleError::StockLimitExceeded { .. })
        ));
        assert_eq!(terminal.last_status(), SaleStatus::StockLimitExceeded);
    }

    #[tokio::test]
    async fn test_set_quantity_checks_current_stock() {
        let catalog = catalog();
        let mut terminal = terminal_with(catalog.clone());
        terminal.add_product("HS001", 10).await.unwrap();

        catalog.set_stock("HS001", 12);
        let err = terminal.set_quantity("HS001", 20).await.unwrap_err();
        assert!(matches!(
            err,
            TerminalError::Sale(SaleError::StockLimitExceeded { available: 12, .. })
        ));
        assert_eq!(terminal.sale().line("HS001").unwrap().quantity(), 10);

        assert_eq!(
            terminal.set_quantity("HS001", 12).await.unwrap(),
            LineChange::Updated { quantity: 12 }
        );

        catalog.remove("HS001");
        assert_eq!(
            terminal.set_quantity("HS001", 0).await.unwrap(),
            LineChange::Removed
        );
        assert_eq!(
            terminal.set_quantity("HS001", 1).await.unwrap(),
            LineChange::NotInCart
        );
        assert_eq!(terminal.last_status(), SaleStatus::NotFound);
    }

    #[tokio::test]
    async fn test_customer_assignment() {
        let mut terminal = terminal();

        let err = terminal.assign_customer(Some("CUST-999")).await.unwrap_err();
        assert!(matches!(err, TerminalError::CustomerNotFound(_)));
        assert!(terminal.sale().customer().is_none());
        assert_eq!(terminal.last_status(), SaleStatus::NotFound);

        let err = terminal.assign_customer(Some("BROKEN")).await.unwrap_err();
        assert!(matches!(err, TerminalError::Lookup(_)));

        terminal.assign_customer(Some("CUST-001-AB")).await.unwrap();
        assert_eq!(terminal.sale().customer().unwrap().name, "Alice Wonderland");

        terminal.assign_customer(None).await.unwrap();
        assert!(terminal.sale().customer().is_none());
    }
}
