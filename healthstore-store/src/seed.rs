use std::path::Path;

use healthstore_catalog::{cents_from_major, parse_sale_price, CatalogError, Product};
use healthstore_core::{CoreError, Customer, Supplier};
use serde::Deserialize;

/// Product as stored by the backend: dollar price as a number, sale price as
/// free text.
#[derive(Debug, Deserialize, Clone)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub sale_price: Option<String>,
    pub stock: u32,
    #[serde(default)]
    pub optimum_stock: Option<u32>,
    #[serde(default)]
    pub supplier_id: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ProductRow {
    pub fn into_product(self) -> Result<Product, CatalogError> {
        let sale_price_cents = parse_sale_price(&self.id, self.sale_price.as_deref());
        let product = Product {
            price_cents: cents_from_major(self.price)?,
            sale_price_cents,
            id: self.id,
            name: self.name,
            description: self.description,
            category: self.category,
            stock: self.stock,
            optimum_stock: self.optimum_stock,
            supplier_id: self.supplier_id,
            image_url: self.image_url,
        };
        product.validate()?;
        Ok(product)
    }
}

/// Startup data for the in-memory repositories.
#[derive(Debug, Deserialize, Default)]
pub struct SeedData {
    #[serde(default)]
    pub products: Vec<ProductRow>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
}

impl SeedData {
    /// Parse seed data; customers and suppliers must pass validation.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let seed: Self = serde_json::from_str(json)?;
        seed.check_records()?;
        Ok(seed)
    }

    fn check_records(&self) -> Result<(), StoreError> {
        for customer in &self.customers {
            customer
                .validate()
                .map_err(|source| StoreError::invalid_record(&customer.id, source))?;
        }
        for supplier in &self.suppliers {
            supplier
                .validate()
                .map_err(|source| StoreError::invalid_record(&supplier.id, source))?;
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let seed = Self::from_json(&json)?;
        tracing::info!(
            "Loaded seed {}: {} products, {} customers, {} suppliers",
            path.display(),
            seed.products.len(),
            seed.customers.len(),
            seed.suppliers.len()
        );
        Ok(seed)
    }

    /// Convert product rows, failing on the first invalid one.
    pub fn products(&self) -> Result<Vec<Product>, StoreError> {
        self.products
            .iter()
            .cloned()
            .map(|row| {
                let id = row.id.clone();
                row.into_product()
                    .map_err(|source| StoreError::InvalidProduct { id, source })
            })
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed seed data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid product {id}: {source}")]
    InvalidProduct {
        id: String,
        #[source]
        source: CatalogError,
    },

    #[error("Invalid record {id}: {source}")]
    InvalidRecord {
        id: String,
        #[source]
        source: CoreError,
    },
}

impl StoreError {
    fn invalid_record(id: &str, source: CoreError) -> Self {
        StoreError::InvalidRecord {
            id: id.to_string(),
            source,
        }
    }
}
