use chrono::{DateTime, Utc};
use healthstore_catalog::Product;
use healthstore_shared::{SaleCompletedEvent, SoldLine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of the most recent attempt to change the sale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    Success,
    OutOfStock,
    StockLimitExceeded,
    EmptySale,
    NotFound,
    InvalidQuantity,
}

/// Customer the sale is rung up for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerRef {
    pub id: String,
    pub name: String,
}

/// One product and how many of it are being bought.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CartLine {
    pub(crate) product: Product,
    pub(crate) quantity: u32,
}

impl CartLine {
    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price_cents(&self) -> i64 {
        self.product.effective_price_cents()
    }

    /// Saturates instead of overflowing for prices that never passed validation.
    pub fn subtotal_cents(&self) -> i64 {
        i64::from(self.quantity).saturating_mul(self.unit_price_cents())
    }
}

/// An open, in-progress sale.
///
/// Lines keep insertion order. The total is never stored; it is summed from the
/// lines on every call.
#[derive(Debug, Clone, Serialize)]
pub struct Sale {
    pub(crate) id: Uuid,
    pub(crate) lines: Vec<CartLine>,
    pub(crate) customer: Option<CustomerRef>,
    pub(crate) opened_at: DateTime<Utc>,
}

impl Sale {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            lines: Vec::new(),
            customer: None,
            opened_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn customer(&self) -> Option<&CustomerRef> {
        self.customer.as_ref()
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == product_id)
    }

    pub(crate) fn position(&self, product_id: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.product.id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn total_cents(&self) -> i64 {
        self.lines
            .iter()
            .map(CartLine::subtotal_cents)
            .fold(0, i64::saturating_add)
    }
}

impl Default for Sale {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceiptLine {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

impl From<&CartLine> for ReceiptLine {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id.clone(),
            product_name: line.product.name.clone(),
            quantity: line.quantity,
            unit_price_cents: line.unit_price_cents(),
            subtotal_cents: line.subtotal_cents(),
        }
    }
}

/// Snapshot of a finalized sale. Has no mutators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Receipt {
    transaction_id: String,
    timestamp: DateTime<Utc>,
    customer_id: Option<String>,
    customer_name: Option<String>,
    lines: Vec<ReceiptLine>,
    total_cents: i64,
}

impl Receipt {
    pub(crate) fn from_sale(transaction_id: String, sale: &Sale) -> Self {
        Self {
            transaction_id,
            timestamp: Utc::now(),
            customer_id: sale.customer.as_ref().map(|c| c.id.clone()),
            customer_name: sale.customer.as_ref().map(|c| c.name.clone()),
            lines: sale.lines.iter().map(ReceiptLine::from).collect(),
            total_cents: sale.total_cents(),
        }
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.customer_name.as_deref()
    }

    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    pub fn total_cents(&self) -> i64 {
        self.total_cents
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn to_event(&self) -> SaleCompletedEvent {
        SaleCompletedEvent {
            transaction_id: self.transaction_id.clone(),
            customer_id: self.customer_id.clone(),
            total_cents: self.total_cents,
            lines: self
                .lines
                .iter()
                .map(|line| SoldLine {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                    subtotal_cents: line.subtotal_cents,
                })
                .collect(),
            timestamp: self.timestamp,
        }
    }
}
