use async_trait::async_trait;
use healthstore_catalog::{categories, filter_by_category, Product};
use healthstore_core::{CatalogLookup, CoreError, CoreResult, ProductRepository};
use healthstore_shared::SoldLine;
use tokio::sync::RwLock;
use tracing::info;

/// Product catalog held in memory, in insertion order.
pub struct MemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl MemoryProductRepository {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }
}

impl Default for MemoryProductRepository {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl CatalogLookup for MemoryProductRepository {
    async fn find_product(&self, id: &str) -> CoreResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn create_product(&self, product: Product) -> CoreResult<Product> {
        product.validate()?;
        let mut products = self.products.write().await;
        if products.iter().any(|p| p.id == product.id) {
            return Err(CoreError::Conflict(format!("product {}", product.id)));
        }
        products.push(product.clone());
        info!("Product created: {}", product.id);
        Ok(product)
    }

    async fn get_product(&self, id: &str) -> CoreResult<Product> {
        self.find_product(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("product {}", id)))
    }

    async fn list_products(&self, category: Option<&str>) -> CoreResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(filter_by_category(&products, category).into_iter().cloned().collect())
    }

    async fn list_categories(&self) -> CoreResult<Vec<String>> {
        let products = self.products.read().await;
        Ok(categories(&products))
    }

    async fn update_product(&self, id: &str, mut product: Product) -> CoreResult<Product> {
        product.id = id.to_string();
        product.validate()?;
        let mut products = self.products.write().await;
        let slot = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("product {}", id)))?;
        *slot = product.clone();
        info!("Product updated: {}", id);
        Ok(product)
    }

    async fn delete_product(&self, id: &str) -> CoreResult<()> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(CoreError::NotFound(format!("product {}", id)));
        }
        info!("Product deleted: {}", id);
        Ok(())
    }

    async fn apply_sale(&self, lines: &[SoldLine]) -> CoreResult<()> {
        let mut products = self.products.write().await;
        for line in lines {
            match products.iter_mut().find(|p| p.id == line.product_id) {
                Some(product) => {
                    product.stock = product.stock.saturating_sub(line.quantity);
                    info!("Stock for {} now {}", product.id, product.stock);
                }
                None => tracing::warn!("Sold product {} no longer in catalog", line.product_id),
            }
        }
        Ok(())
    }
}
