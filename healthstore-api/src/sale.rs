use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use healthstore_catalog::format_cents;
use healthstore_sale::{CartLine, CustomerRef, PosTerminal, Receipt, SaleStatus};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct AssignCustomerRequest {
    /// `null` rings the sale up as a walk-in.
    pub customer_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaleLineResponse {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub stock: u32,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

impl From<&CartLine> for SaleLineResponse {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id().to_string(),
            name: line.product().name.clone(),
            quantity: line.quantity(),
            stock: line.product().stock,
            unit_price_cents: line.unit_price_cents(),
            subtotal_cents: line.subtotal_cents(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaleResponse {
    pub sale_id: String,
    pub customer: Option<CustomerRef>,
    pub lines: Vec<SaleLineResponse>,
    pub item_count: u32,
    pub total_cents: i64,
    pub currency: String,
    pub last_status: SaleStatus,
}

impl SaleResponse {
    fn new(terminal: &PosTerminal, currency: &str) -> Self {
        let sale = terminal.sale();
        Self {
            sale_id: sale.id().to_string(),
            customer: sale.customer().cloned(),
            lines: sale.lines().iter().map(SaleLineResponse::from).collect(),
            item_count: sale.item_count(),
            total_cents: terminal.total_cents(),
            currency: currency.to_string(),
            last_status: terminal.last_status(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReceiptResponse {
    #[serde(flatten)]
    pub receipt: Receipt,
    pub store_name: String,
    pub currency: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/sale", get(get_sale).delete(clear_sale))
        .route("/v1/sale/items", post(add_item))
        .route(
            "/v1/sale/items/{product_id}",
            put(set_quantity).delete(remove_item),
        )
        .route("/v1/sale/customer", put(assign_customer))
        .route("/v1/sale/checkout", post(checkout))
        .route("/v1/sale/receipt", get(last_receipt))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/sale
pub async fn get_sale(State(state): State<AppState>) -> Json<SaleResponse> {
    let terminal = state.terminal.lock().await;
    Json(SaleResponse::new(&terminal, &state.store.currency))
}

/// DELETE /v1/sale
/// Abandon the open sale
pub async fn clear_sale(State(state): State<AppState>) -> Json<SaleResponse> {
    let mut terminal = state.terminal.lock().await;
    terminal.clear();
    Json(SaleResponse::new(&terminal, &state.store.currency))
}

/// POST /v1/sale/items
pub async fn add_item(
    State(state): State<AppState>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<SaleResponse>, AppError> {
    let mut terminal = state.terminal.lock().await;
    terminal.add_product(&req.product_id, req.quantity).await?;
    Ok(Json(SaleResponse::new(&terminal, &state.store.currency)))
}

/// PUT /v1/sale/items/:product_id
/// Checked against current catalog stock. A product that is not in the sale is
/// ignored; `last_status` reports NOT_FOUND
pub async fn set_quantity(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(req): Json<SetQuantityRequest>,
) -> Result<Json<SaleResponse>, AppError> {
    let mut terminal = state.terminal.lock().await;
    terminal.set_quantity(&product_id, req.quantity).await?;
    Ok(Json(SaleResponse::new(&terminal, &state.store.currency)))
}

/// DELETE /v1/sale/items/:product_id
pub async fn remove_item(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Json<SaleResponse> {
    let mut terminal = state.terminal.lock().await;
    terminal.remove_product(&product_id);
    Json(SaleResponse::new(&terminal, &state.store.currency))
}

/// PUT /v1/sale/customer
pub async fn assign_customer(
    State(state): State<AppState>,
    Json(req): Json<AssignCustomerRequest>,
) -> Result<Json<SaleResponse>, AppError> {
    let mut terminal = state.terminal.lock().await;
    terminal.assign_customer(req.customer_id.as_deref()).await?;
    Ok(Json(SaleResponse::new(&terminal, &state.store.currency)))
}

/// POST /v1/sale/checkout
/// Finalize the sale, take the sold units off the shelf and publish the sale.
/// The register stays locked until the stock is updated.
pub async fn checkout(State(state): State<AppState>) -> Result<Json<ReceiptResponse>, AppError> {
    let mut terminal = state.terminal.lock().await;
    let receipt = terminal.checkout()?;

    let event = receipt.to_event();
    state.products.apply_sale(&event.lines).await?;
    drop(terminal);

    if state.sales_tx.send(event).is_err() {
        warn!("No sale listeners for {}", receipt.transaction_id());
    }
    info!(
        "Checkout complete: {} ({} {})",
        receipt.transaction_id(),
        format_cents(receipt.total_cents()),
        state.store.currency
    );

    Ok(Json(ReceiptResponse {
        receipt,
        store_name: state.store.name.clone(),
        currency: state.store.currency.clone(),
    }))
}

/// GET /v1/sale/receipt
/// Receipt of the most recent checkout
pub async fn last_receipt(State(state): State<AppState>) -> Result<Json<ReceiptResponse>, AppError> {
    let terminal = state.terminal.lock().await;
    let receipt = terminal
        .last_receipt()
        .cloned()
        .ok_or_else(|| AppError::NotFoundError("no completed sale yet".to_string()))?;

    Ok(Json(ReceiptResponse {
        receipt,
        store_name: state.store.name.clone(),
        currency: state.store.currency.clone(),
    }))
}
