use async_trait::async_trait;
use healthstore_core::{CoreError, CoreResult, Supplier, SupplierRepository};
use tokio::sync::RwLock;
use tracing::info;

pub struct MemorySupplierRepository {
    suppliers: RwLock<Vec<Supplier>>,
}

impl MemorySupplierRepository {
    pub fn new(suppliers: Vec<Supplier>) -> Self {
        Self {
            suppliers: RwLock::new(suppliers),
        }
    }
}

impl Default for MemorySupplierRepository {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl SupplierRepository for MemorySupplierRepository {
    async fn create_supplier(&self, supplier: Supplier) -> CoreResult<Supplier> {
        supplier.validate()?;
        let mut suppliers = self.suppliers.write().await;
        if suppliers.iter().any(|s| s.id == supplier.id) {
            return Err(CoreError::Conflict(format!("supplier {}", supplier.id)));
        }
        suppliers.push(supplier.clone());
        info!("Supplier created: {}", supplier.id);
        Ok(supplier)
    }

    async fn get_supplier(&self, id: &str) -> CoreResult<Supplier> {
        let suppliers = self.suppliers.read().await;
        suppliers
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("supplier {}", id)))
    }

    async fn list_suppliers(&self) -> CoreResult<Vec<Supplier>> {
        Ok(self.suppliers.read().await.clone())
    }

    async fn update_supplier(&self, id: &str, mut supplier: Supplier) -> CoreResult<Supplier> {
        supplier.id = id.to_string();
        supplier.validate()?;
        let mut suppliers = self.suppliers.write().await;
        let slot = suppliers
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("supplier {}", id)))?;
        *slot = supplier.clone();
        info!("Supplier updated: {}", id);
        Ok(supplier)
    }

    async fn delete_supplier(&self, id: &str) -> CoreResult<()> {
        let mut suppliers = self.suppliers.write().await;
        let before = suppliers.len();
        suppliers.retain(|s| s.id != id);
        if suppliers.len() == before {
            return Err(CoreError::NotFound(format!("supplier {}", id)));
        }
        info!("Supplier deleted: {}", id);
        Ok(())
    }
}
