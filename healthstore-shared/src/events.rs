use serde::{Deserialize, Serialize};

/// One product line of a completed sale, as carried on the event.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SoldLine {
    pub product_id: String,
    pub quantity: u32,
    pub subtotal_cents: i64,
}

/// Published once per checkout, after the receipt has been handed out.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SaleCompletedEvent {
    pub transaction_id: String,
    pub customer_id: Option<String>,
    pub total_cents: i64,
    pub lines: Vec<SoldLine>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl SaleCompletedEvent {
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}
