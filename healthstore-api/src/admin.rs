use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use healthstore_catalog::Product;
use chrono::Utc;
use healthstore_core::{
    generate_id, Address, Customer, SalesReport, Supplier, DEFAULT_REPORT_DAYS,
    DEFAULT_TOP_CUSTOMERS,
};
use healthstore_shared::Masked;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub price_cents: i64,
    pub sale_price_cents: Option<i64>,
    pub stock: u32,
    pub optimum_stock: Option<u32>,
    pub supplier_id: Option<String>,
    pub image_url: Option<String>,
}

impl ProductRequest {
    fn into_product(self, id: String) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            price_cents: self.price_cents,
            sale_price_cents: self.sale_price_cents,
            stock: self.stock,
            optimum_stock: self.optimum_stock,
            supplier_id: self.supplier_id,
            image_url: self.image_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<Address>,
}

impl CustomerRequest {
    fn into_customer(self, id: String) -> Customer {
        let mut customer = Customer::new(id, self.name, self.email);
        customer.phone = self.phone.map(Masked);
        customer.address = self.address;
        customer
    }
}

#[derive(Debug, Deserialize)]
pub struct SupplierRequest {
    pub id: Option<String>,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub notes: Option<String>,
}

impl SupplierRequest {
    fn into_supplier(self, id: String) -> Supplier {
        Supplier {
            id,
            name: self.name,
            contact_person: self.contact_person,
            email: self.email,
            phone: self.phone,
            address: self.address,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SalesReportQuery {
    pub days: Option<u32>,
    pub top: Option<usize>,
}

const MAX_REPORT_DAYS: u32 = 90;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/products", get(list_products).post(create_product))
        .route(
            "/v1/admin/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/v1/admin/customers", get(list_customers).post(create_customer))
        .route(
            "/v1/admin/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/v1/admin/suppliers", get(list_suppliers).post(create_supplier))
        .route(
            "/v1/admin/suppliers/{id}",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
        .route("/v1/admin/reports/sales", get(sales_report))
}

// ============================================================================
// Product Management Handlers
// ============================================================================

/// POST /v1/admin/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let id = req.id.clone().unwrap_or_else(|| generate_id("HS"));
    let product = state.products.create_product(req.into_product(id)).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /v1/admin/products
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.products.list_products(None).await?))
}

/// GET /v1/admin/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.products.get_product(&id).await?))
}

/// PUT /v1/admin/products/:id
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<Product>, AppError> {
    let product = req.into_product(id.clone());
    Ok(Json(state.products.update_product(&id, product).await?))
}

/// DELETE /v1/admin/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.products.delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Customer Management Handlers
// ============================================================================

/// POST /v1/admin/customers
pub async fn create_customer(
    State(state): State<AppState>,
    Json(req): Json<CustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let id = req.id.clone().unwrap_or_else(|| generate_id("CUST"));
    let customer = state.customers.create_customer(req.into_customer(id)).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /v1/admin/customers
pub async fn list_customers(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, AppError> {
    Ok(Json(state.customers.list_customers().await?))
}

/// GET /v1/admin/customers/:id
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, AppError> {
    Ok(Json(state.customers.get_customer(&id).await?))
}

/// PUT /v1/admin/customers/:id
/// Keeps the original `customer_since` and purchase history
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CustomerRequest>,
) -> Result<Json<Customer>, AppError> {
    let existing = state.customers.get_customer(&id).await?;
    let mut customer = req.into_customer(id.clone());
    customer.customer_since = existing.customer_since;
    Ok(Json(state.customers.update_customer(&id, customer).await?))
}

/// DELETE /v1/admin/customers/:id
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.customers.delete_customer(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Supplier Management Handlers
// ============================================================================

/// POST /v1/admin/suppliers
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(req): Json<SupplierRequest>,
) -> Result<(StatusCode, Json<Supplier>), AppError> {
    let id = req.id.clone().unwrap_or_else(|| generate_id("SUPP"));
    let supplier = state.suppliers.create_supplier(req.into_supplier(id)).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// GET /v1/admin/suppliers
pub async fn list_suppliers(State(state): State<AppState>) -> Result<Json<Vec<Supplier>>, AppError> {
    Ok(Json(state.suppliers.list_suppliers().await?))
}

/// GET /v1/admin/suppliers/:id
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Supplier>, AppError> {
    Ok(Json(state.suppliers.get_supplier(&id).await?))
}

/// PUT /v1/admin/suppliers/:id
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SupplierRequest>,
) -> Result<Json<Supplier>, AppError> {
    let supplier = req.into_supplier(id.clone());
    Ok(Json(state.suppliers.update_supplier(&id, supplier).await?))
}

/// DELETE /v1/admin/suppliers/:id
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.suppliers.delete_supplier(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Reports
// ============================================================================

/// GET /v1/admin/reports/sales?days=&top=
/// Daily revenue for the trailing window and the biggest spenders
pub async fn sales_report(
    State(state): State<AppState>,
    Query(query): Query<SalesReportQuery>,
) -> Result<Json<SalesReport>, AppError> {
    let days = query.days.unwrap_or(DEFAULT_REPORT_DAYS);
    if days == 0 || days > MAX_REPORT_DAYS {
        return Err(AppError::ValidationError(format!(
            "days must be between 1 and {}",
            MAX_REPORT_DAYS
        )));
    }
    let top = query.top.unwrap_or(DEFAULT_TOP_CUSTOMERS);

    let customers = state.customers.list_customers().await?;
    Ok(Json(SalesReport::build(
        &customers,
        Utc::now().date_naive(),
        days,
        top,
    )))
}
