use healthstore_catalog::Product;
use uuid::Uuid;

use crate::models::{CartLine, CustomerRef, Receipt, Sale, SaleStatus};

/// What a quantity change or removal did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    Updated { quantity: u32 },
    Removed,
    /// The product was not in the cart; nothing changed.
    NotInCart,
}

/// Holds the open sale for one register and enforces its invariants.
///
/// Every line quantity stays within `1..=product.stock`. A rejected call leaves
/// the sale exactly as it was and records the reason in [`last_status`].
///
/// [`last_status`]: SaleAggregator::last_status
pub struct SaleAggregator {
    sale: Sale,
    last_status: SaleStatus,
    last_receipt: Option<Receipt>,
    transaction_prefix: String,
}

impl SaleAggregator {
    pub fn new() -> Self {
        Self::with_transaction_prefix("TXN")
    }

    pub fn with_transaction_prefix(prefix: impl Into<String>) -> Self {
        Self {
            sale: Sale::new(),
            last_status: SaleStatus::Success,
            last_receipt: None,
            transaction_prefix: prefix.into(),
        }
    }

    pub fn sale(&self) -> &Sale {
        &self.sale
    }

    pub fn lines(&self) -> &[CartLine] {
        self.sale.lines()
    }

    pub fn total_cents(&self) -> i64 {
        self.sale.total_cents()
    }

    pub fn last_status(&self) -> SaleStatus {
        self.last_status
    }

    /// Receipt from the most recent checkout, kept until the next one.
    pub fn last_receipt(&self) -> Option<&Receipt> {
        self.last_receipt.as_ref()
    }

    /// Add `requested` units of `product`, merging into an existing line.
    ///
    /// On success the line's product snapshot is replaced with `product`, and the
    /// new line quantity is returned.
    pub fn add_item(&mut self, product: &Product, requested: u32) -> Result<u32, SaleError> {
        if requested == 0 {
            return self.reject(SaleError::InvalidQuantity {
                product_id: product.id.clone(),
                quantity: 0,
            });
        }
        if product.stock == 0 {
            return self.reject(SaleError::OutOfStock {
                product_id: product.id.clone(),
            });
        }

        let position = self.sale.position(&product.id);
        let current = position.map(|i| self.sale.lines[i].quantity).unwrap_or(0);
        let wanted = u64::from(current) + u64::from(requested);

        if wanted > u64::from(product.stock) {
            return self.reject(SaleError::StockLimitExceeded {
                product_id: product.id.clone(),
                requested: wanted,
                available: product.stock,
            });
        }
        let quantity = wanted as u32;

        match position {
            Some(i) => {
                let line = &mut self.sale.lines[i];
                line.product = product.clone();
                line.quantity = quantity;
            }
            None => self.sale.lines.push(CartLine {
                product: product.clone(),
                quantity,
            }),
        }

        tracing::debug!("Added {} x {} (line now {})", requested, product.id, quantity);
        self.last_status = SaleStatus::Success;
        Ok(quantity)
    }

    /// Set a line's quantity. Zero or below removes the line.
    ///
    /// The stock limit comes from the product snapshot held by the line. A
    /// product that is not in the cart is left alone and reported as
    /// [`LineChange::NotInCart`]; it is not re-added.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> Result<LineChange, SaleError> {
        let Some(i) = self.sale.position(product_id) else {
            return Ok(self.not_in_cart());
        };
        let product = self.sale.lines[i].product.clone();
        self.apply_quantity(i, &product, quantity)
    }

    /// Same as [`set_quantity`], checked against `product` as currently
    /// listed. On success the line's snapshot is replaced with `product`.
    ///
    /// [`set_quantity`]: SaleAggregator::set_quantity
    pub fn set_product_quantity(&mut self, product: &Product, quantity: i64) -> Result<LineChange, SaleError> {
        let Some(i) = self.sale.position(&product.id) else {
            return Ok(self.not_in_cart());
        };
        self.apply_quantity(i, product, quantity)
    }

    fn apply_quantity(&mut self, i: usize, product: &Product, quantity: i64) -> Result<LineChange, SaleError> {
        if quantity <= 0 {
            self.sale.lines.remove(i);
            tracing::debug!("Removed {} via zero quantity", product.id);
            self.last_status = SaleStatus::Success;
            return Ok(LineChange::Removed);
        }

        let available = product.stock;
        if quantity > i64::from(available) {
            return self.reject(SaleError::StockLimitExceeded {
                product_id: product.id.clone(),
                requested: quantity as u64,
                available,
            });
        }

        let quantity = quantity as u32;
        let line = &mut self.sale.lines[i];
        line.product = product.clone();
        line.quantity = quantity;
        tracing::debug!("Set {} quantity to {}", product.id, quantity);
        self.last_status = SaleStatus::Success;
        Ok(LineChange::Updated { quantity })
    }

    fn not_in_cart(&mut self) -> LineChange {
        self.last_status = SaleStatus::NotFound;
        LineChange::NotInCart
    }

    /// A lookup outside the aggregator found nothing for the requested id.
    pub(crate) fn record_not_found(&mut self) {
        self.last_status = SaleStatus::NotFound;
    }

    pub fn remove_item(&mut self, product_id: &str) -> LineChange {
        match self.sale.position(product_id) {
            Some(i) => {
                self.sale.lines.remove(i);
                tracing::debug!("Removed {}", product_id);
                self.last_status = SaleStatus::Success;
                LineChange::Removed
            }
            None => self.not_in_cart(),
        }
    }

    /// Drop every line and the attached customer.
    pub fn clear(&mut self) {
        self.sale = Sale::new();
        self.last_status = SaleStatus::Success;
    }

    pub fn attach_customer(&mut self, customer: CustomerRef) {
        self.sale.customer = Some(customer);
        self.last_status = SaleStatus::Success;
    }

    pub fn detach_customer(&mut self) {
        self.sale.customer = None;
        self.last_status = SaleStatus::Success;
    }

    /// Finalize the open sale into a receipt and start a fresh one.
    pub fn checkout(&mut self) -> Result<Receipt, SaleError> {
        if self.sale.is_empty() {
            return self.reject(SaleError::EmptySale);
        }

        let receipt = Receipt::from_sale(self.next_transaction_id(), &self.sale);
        tracing::info!(
            "Sale {} finalized as {}: {} items, total {} cents",
            self.sale.id(),
            receipt.transaction_id(),
            receipt.item_count(),
            receipt.total_cents()
        );

        self.sale = Sale::new();
        self.last_status = SaleStatus::Success;
        self.last_receipt = Some(receipt.clone());
        Ok(receipt)
    }

    fn next_transaction_id(&self) -> String {
        let simple = Uuid::new_v4().simple().to_string().to_uppercase();
        format!("{}-{}", self.transaction_prefix, &simple[..12])
    }

    fn reject<T>(&mut self, err: SaleError) -> Result<T, SaleError> {
        tracing::warn!("Sale change rejected: {}", err);
        self.last_status = err.status();
        Err(err)
    }
}

impl Default for SaleAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SaleError {
    #[error("Product {product_id} is out of stock")]
    OutOfStock { product_id: String },

    #[error("Stock limit exceeded for {product_id}: requested {requested}, available {available}")]
    StockLimitExceeded {
        product_id: String,
        requested: u64,
        available: u32,
    },

    #[error("Cannot check out an empty sale")]
    EmptySale,

    #[error("Invalid quantity {quantity} for {product_id}")]
    InvalidQuantity { product_id: String, quantity: u32 },
}

impl SaleError {
    pub fn status(&self) -> SaleStatus {
        match self {
            SaleError::OutOfStock { .. } => SaleStatus::OutOfStock,
            SaleError::StockLimitExceeded { .. } => SaleStatus::StockLimitExceeded,
            SaleError::EmptySale => SaleStatus::EmptySale,
            SaleError::InvalidQuantity { .. } => SaleStatus::InvalidQuantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn product_a() -> Product {
        Product::new("A", "Product A", "Misc", 1000, 5)
    }

    fn product_b() -> Product {
        Product::new("B", "Product B", "Misc", 2000, 1).with_sale_price(1500)
    }

    fn product_c() -> Product {
        Product::new("C", "Product C", "Misc", 500, 3)
    }

    fn assert_invariants(aggregator: &SaleAggregator) {
        let mut recomputed = 0;
        for line in aggregator.lines() {
            assert!(line.quantity() >= 1);
            assert!(line.quantity() <= line.product().stock);
            recomputed += i64::from(line.quantity()) * line.product().effective_price_cents();
        }
        assert_eq!(aggregator.total_cents(), recomputed);
    }

    #[test]
    fn test_total_uses_effective_price() {
        let mut aggregator = SaleAggregator::new();
        aggregator.add_item(&product_a(), 2).unwrap();
        aggregator.add_item(&product_b(), 1).unwrap();

        assert_eq!(aggregator.total_cents(), 3500);
        let ids: Vec<_> = aggregator.lines().iter().map(|l| l.product_id()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_add_up_to_stock_then_reject() {
        let mut aggregator = SaleAggregator::new();
        let c = product_c();

        assert_eq!(aggregator.add_item(&c, 1), Ok(1));
        assert_eq!(aggregator.add_item(&c, 1), Ok(2));
        assert_eq!(aggregator.add_item(&c, 1), Ok(3));

        let err = aggregator.add_item(&c, 1).unwrap_err();
        assert_eq!(
            err,
            SaleError::StockLimitExceeded {
                product_id: "C".to_string(),
                requested: 4,
                available: 3,
            }
        );
        assert_eq!(aggregator.last_status(), SaleStatus::StockLimitExceeded);
        assert_eq!(aggregator.sale().line("C").unwrap().quantity(), 3);
        assert_eq!(aggregator.lines().len(), 1);
    }

    #[test]
    fn test_new_line_over_stock_is_rejected() {
        let mut aggregator = SaleAggregator::new();
        assert!(aggregator.add_item(&product_c(), 4).is_err());
        assert!(aggregator.sale().is_empty());
    }

    #[test]
    fn test_out_of_stock_never_touches_cart() {
        let mut aggregator = SaleAggregator::new();
        let empty = Product::new("Z", "Sold out", "Misc", 100, 0);

        for _ in 0..3 {
            let err = aggregator.add_item(&empty, 1).unwrap_err();
            assert!(matches!(err, SaleError::OutOfStock { .. }));
            assert_eq!(aggregator.last_status(), SaleStatus::OutOfStock);
            assert!(aggregator.sale().is_empty());
        }
    }

    #[test]
    fn test_stock_drop_between_adds() {
        let mut aggregator = SaleAggregator::new();
        aggregator.add_item(&product_a(), 2).unwrap();

        let mut restocked = product_a();
        restocked.stock = 0;
        assert!(aggregator.add_item(&restocked, 1).is_err());
        assert_eq!(aggregator.sale().line("A").unwrap().quantity(), 2);
        assert_eq!(aggregator.sale().line("A").unwrap().product().stock, 5);
    }

    #[test]
    fn test_add_refreshes_snapshot() {
        let mut aggregator = SaleAggregator::new();
        aggregator.add_item(&product_a(), 1).unwrap();

        let discounted = product_a().with_sale_price(800);
        aggregator.add_item(&discounted, 1).unwrap();
        assert_eq!(aggregator.total_cents(), 1600);
    }

    #[test]
    fn test_zero_requested_is_invalid() {
        let mut aggregator = SaleAggregator::new();
        let err = aggregator.add_item(&product_a(), 0).unwrap_err();
        assert!(matches!(err, SaleError::InvalidQuantity { .. }));
        assert_eq!(aggregator.last_status(), SaleStatus::InvalidQuantity);
        assert!(aggregator.sale().is_empty());
    }

    #[test]
    fn test_set_quantity() {
        let mut aggregator = SaleAggregator::new();
        aggregator.add_item(&product_a(), 1).unwrap();

        assert_eq!(aggregator.set_quantity("A", 4), Ok(LineChange::Updated { quantity: 4 }));
        assert_eq!(aggregator.total_cents(), 4000);

        let err = aggregator.set_quantity("A", 6).unwrap_err();
        assert!(matches!(err, SaleError::StockLimitExceeded { available: 5, .. }));
        assert_eq!(aggregator.sale().line("A").unwrap().quantity(), 4);
    }

    #[test]
    fn test_set_product_quantity_uses_current_stock() {
        let mut aggregator = SaleAggregator::new();
        aggregator.add_item(&product_a(), 2).unwrap();

        let mut restocked_down = product_a();
        restocked_down.stock = 3;

        let err = aggregator.set_product_quantity(&restocked_down, 4).unwrap_err();
        assert!(matches!(err, SaleError::StockLimitExceeded { available: 3, .. }));
        assert_eq!(aggregator.sale().line("A").unwrap().quantity(), 2);
        assert_eq!(aggregator.sale().line("A").unwrap().product().stock, 5);

        assert_eq!(
            aggregator.set_product_quantity(&restocked_down, 3),
            Ok(LineChange::Updated { quantity: 3 })
        );
        assert_eq!(aggregator.sale().line("A").unwrap().product().stock, 3);

        assert_eq!(
            aggregator.set_product_quantity(&product_c(), 1),
            Ok(LineChange::NotInCart)
        );
        assert_eq!(aggregator.last_status(), SaleStatus::NotFound);
    }

    #[test]
    fn test_set_quantity_zero_removes_and_missing_is_ignored() {
        let mut aggregator = SaleAggregator::new();
        aggregator.add_item(&product_a(), 2).unwrap();

        assert_eq!(aggregator.set_quantity("A", 0), Ok(LineChange::Removed));
        assert!(aggregator.sale().is_empty());

        assert_eq!(aggregator.set_quantity("A", 2), Ok(LineChange::NotInCart));
        assert_eq!(aggregator.last_status(), SaleStatus::NotFound);
        assert!(aggregator.sale().is_empty());

        aggregator.add_item(&product_c(), 1).unwrap();
        assert_eq!(aggregator.set_quantity("C", -3), Ok(LineChange::Removed));
    }

    #[test]
    fn test_remove_item() {
        let mut aggregator = SaleAggregator::new();
        aggregator.add_item(&product_a(), 1).unwrap();
        aggregator.add_item(&product_c(), 1).unwrap();

        assert_eq!(aggregator.remove_item("A"), LineChange::Removed);
        assert_eq!(aggregator.remove_item("A"), LineChange::NotInCart);
        assert_eq!(aggregator.last_status(), SaleStatus::NotFound);
        assert_eq!(aggregator.lines().len(), 1);
        assert_eq!(aggregator.total_cents(), 500);
    }

    #[test]
    fn test_clear_drops_lines_and_customer() {
        let mut aggregator = SaleAggregator::new();
        aggregator.add_item(&product_a(), 3).unwrap();
        aggregator.attach_customer(CustomerRef {
            id: "CUST-001-AB".to_string(),
            name: "Alice Wonderland".to_string(),
        });

        aggregator.clear();
        assert!(aggregator.sale().is_empty());
        assert!(aggregator.sale().customer().is_none());
        assert_eq!(aggregator.total_cents(), 0);

        aggregator.clear();
        assert_eq!(aggregator.total_cents(), 0);
    }

    #[test]
    fn test_checkout_empty_is_refused() {
        let mut aggregator = SaleAggregator::new();
        let sale_id = aggregator.sale().id();

        assert_eq!(aggregator.checkout(), Err(SaleError::EmptySale));
        assert_eq!(aggregator.last_status(), SaleStatus::EmptySale);
        assert!(aggregator.last_receipt().is_none());
        assert_eq!(aggregator.sale().id(), sale_id);
    }

    #[test]
    fn test_checkout_snapshots_and_clears() {
        let mut aggregator = SaleAggregator::with_transaction_prefix("HS");
        aggregator.add_item(&product_a(), 2).unwrap();
        aggregator.add_item(&product_b(), 1).unwrap();
        aggregator.attach_customer(CustomerRef {
            id: "CUST-001-AB".to_string(),
            name: "Alice Wonderland".to_string(),
        });
        let expected_total = aggregator.total_cents();
        let first_sale = aggregator.sale().id();

        let receipt = aggregator.checkout().unwrap();
        assert_eq!(receipt.total_cents(), expected_total);
        assert_eq!(receipt.total_cents(), 3500);
        assert!(receipt.transaction_id().starts_with("HS-"));
        assert_eq!(receipt.customer_name(), Some("Alice Wonderland"));
        assert_eq!(receipt.lines().len(), 2);
        assert_eq!(receipt.lines()[0].subtotal_cents, 2000);

        assert!(aggregator.sale().is_empty());
        assert!(aggregator.sale().customer().is_none());
        assert_ne!(aggregator.sale().id(), first_sale);
        assert_eq!(aggregator.last_receipt(), Some(&receipt));

        aggregator.add_item(&product_c(), 1).unwrap();
        let second = aggregator.checkout().unwrap();
        assert_ne!(second.transaction_id(), receipt.transaction_id());
        assert_eq!(aggregator.last_receipt(), Some(&second));
    }

    #[test]
    fn test_random_mutations_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(7);
        let catalog = vec![
            product_a(),
            product_b(),
            product_c(),
            Product::new("D", "Sold out", "Misc", 300, 0),
        ];
        let mut aggregator = SaleAggregator::new();

        for _ in 0..2000 {
            let product = &catalog[rng.gen_range(0..catalog.len())];
            match rng.gen_range(0..4) {
                0 => {
                    let _ = aggregator.add_item(product, rng.gen_range(0..4));
                }
                1 => {
                    let _ = aggregator.set_quantity(&product.id, rng.gen_range(-2..8));
                }
                2 => {
                    aggregator.remove_item(&product.id);
                }
                _ => {
                    if rng.gen_bool(0.05) {
                        aggregator.clear();
                    }
                }
            }
            assert_invariants(&aggregator);
            assert!(aggregator.sale().line("D").is_none());
        }
    }
}
