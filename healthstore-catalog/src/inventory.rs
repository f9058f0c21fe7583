use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Shelf availability shown next to a product.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
}

/// Thresholds for classifying stock levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StockPolicy {
    /// At or below this count a product is "low stock".
    pub low_stock_threshold: u32,
}

impl Default for StockPolicy {
    fn default() -> Self {
        Self {
            low_stock_threshold: 10,
        }
    }
}

impl StockPolicy {
    pub fn new(low_stock_threshold: u32) -> Self {
        Self { low_stock_threshold }
    }

    pub fn status(&self, product: &Product) -> StockStatus {
        if product.stock == 0 {
            StockStatus::OutOfStock
        } else if product.stock <= self.low_stock_threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Units needed to bring the product back to its optimum stock.
    pub fn restock_shortfall(&self, product: &Product) -> u32 {
        product
            .optimum_stock
            .map(|optimum| optimum.saturating_sub(product.stock))
            .unwrap_or(0)
    }

    /// Products below optimum, largest shortfall first.
    pub fn restock_candidates<'a>(&self, products: &'a [Product]) -> Vec<(&'a Product, u32)> {
        let mut candidates: Vec<_> = products
            .iter()
            .map(|p| (p, self.restock_shortfall(p)))
            .filter(|(_, shortfall)| *shortfall > 0)
            .collect();
        candidates.sort_by(|a, b| b.1.cmp(&a.1));
        candidates
    }
}
