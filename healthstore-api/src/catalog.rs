use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use healthstore_catalog::{Product, StockStatus};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub effective_price_cents: i64,
    pub on_sale: bool,
    pub stock_status: StockStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RestockResponse {
    pub product_id: String,
    pub name: String,
    pub stock: u32,
    pub optimum_stock: Option<u32>,
    pub shortfall: u32,
}

impl ProductResponse {
    pub fn new(product: Product, state: &AppState) -> Self {
        Self {
            effective_price_cents: product.effective_price_cents(),
            on_sale: product.is_on_sale(),
            stock_status: state.stock_policy.status(&product),
            product,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/catalog/products", get(list_products))
        .route("/v1/catalog/products/{id}", get(get_product))
        .route("/v1/catalog/categories", get(list_categories))
        .route("/v1/catalog/restock", get(restock_report))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/catalog/products?category=
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = state.products.list_products(query.category.as_deref()).await?;
    Ok(Json(
        products
            .into_iter()
            .map(|p| ProductResponse::new(p, &state))
            .collect(),
    ))
}

/// GET /v1/catalog/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = state.products.get_product(&id).await?;
    Ok(Json(ProductResponse::new(product, &state)))
}

/// GET /v1/catalog/categories
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.products.list_categories().await?))
}

/// GET /v1/catalog/restock
/// Products under their optimum stock, largest gap first
pub async fn restock_report(
    State(state): State<AppState>,
) -> Result<Json<Vec<RestockResponse>>, AppError> {
    let products = state.products.list_products(None).await?;
    let report = state
        .stock_policy
        .restock_candidates(&products)
        .into_iter()
        .map(|(product, shortfall)| RestockResponse {
            product_id: product.id.clone(),
            name: product.name.clone(),
            stock: product.stock,
            optimum_stock: product.optimum_stock,
            shortfall,
        })
        .collect();
    Ok(Json(report))
}
