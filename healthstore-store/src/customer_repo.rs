use async_trait::async_trait;
use healthstore_core::{
    Customer, CustomerLookup, CustomerRepository, CoreError, CoreResult, TransactionSummary,
};
use tokio::sync::RwLock;
use tracing::info;

pub struct MemoryCustomerRepository {
    customers: RwLock<Vec<Customer>>,
}

impl MemoryCustomerRepository {
    pub fn new(customers: Vec<Customer>) -> Self {
        Self {
            customers: RwLock::new(customers),
        }
    }
}

impl Default for MemoryCustomerRepository {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl CustomerLookup for MemoryCustomerRepository {
    async fn customer_name(&self, id: &str) -> CoreResult<Option<String>> {
        let customers = self.customers.read().await;
        Ok(customers.iter().find(|c| c.id == id).map(|c| c.name.clone()))
    }
}

#[async_trait]
impl CustomerRepository for MemoryCustomerRepository {
    async fn create_customer(&self, customer: Customer) -> CoreResult<Customer> {
        customer.validate()?;
        let mut customers = self.customers.write().await;
        if customers.iter().any(|c| c.id == customer.id) {
            return Err(CoreError::Conflict(format!("customer {}", customer.id)));
        }
        customers.push(customer.clone());
        info!("Customer created: {}", customer.id);
        Ok(customer)
    }

    async fn get_customer(&self, id: &str) -> CoreResult<Customer> {
        let customers = self.customers.read().await;
        customers
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("customer {}", id)))
    }

    async fn list_customers(&self) -> CoreResult<Vec<Customer>> {
        Ok(self.customers.read().await.clone())
    }

    /// Replace a customer's details. Purchase history is kept from the stored record.
    async fn update_customer(&self, id: &str, mut customer: Customer) -> CoreResult<Customer> {
        customer.id = id.to_string();
        customer.validate()?;
        let mut customers = self.customers.write().await;
        let slot = customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("customer {}", id)))?;
        customer.purchase_history = std::mem::take(&mut slot.purchase_history);
        *slot = customer.clone();
        info!("Customer updated: {}", id);
        Ok(customer)
    }

    async fn delete_customer(&self, id: &str) -> CoreResult<()> {
        let mut customers = self.customers.write().await;
        let before = customers.len();
        customers.retain(|c| c.id != id);
        if customers.len() == before {
            return Err(CoreError::NotFound(format!("customer {}", id)));
        }
        info!("Customer deleted: {}", id);
        Ok(())
    }

    async fn record_purchase(&self, id: &str, summary: TransactionSummary) -> CoreResult<()> {
        let mut customers = self.customers.write().await;
        let customer = customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("customer {}", id)))?;
        info!("Recording {} for customer {}", summary.transaction_id, id);
        customer.record_purchase(summary);
        Ok(())
    }
}
