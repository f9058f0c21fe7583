use chrono::{DateTime, Utc};
use healthstore_shared::Masked;
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// One completed sale in a customer's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionSummary {
    pub transaction_id: String,
    pub timestamp: DateTime<Utc>,
    pub total_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: Masked<String>,
    #[serde(default)]
    pub phone: Option<Masked<String>>,
    #[serde(default)]
    pub address: Option<Address>,
    pub customer_since: DateTime<Utc>,
    #[serde(default)]
    pub purchase_history: Vec<TransactionSummary>,
}

impl Customer {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: Masked(email.into()),
            phone: None,
            address: None,
            customer_since: Utc::now(),
            purchase_history: Vec::new(),
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.id.trim().is_empty() {
            return Err(CoreError::Validation("customer id is required".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("customer name is required".to_string()));
        }
        if !self.email.expose().contains('@') {
            return Err(CoreError::Validation(format!(
                "customer {} has an invalid email",
                self.id
            )));
        }
        Ok(())
    }

    pub fn record_purchase(&mut self, summary: TransactionSummary) {
        self.purchase_history.push(summary);
    }

    pub fn lifetime_spend_cents(&self) -> i64 {
        self.purchase_history.iter().map(|t| t.total_cents).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let customer = Customer::new("CUST-001-AB", "Alice Wonderland", "alice.wonder@example.com");
        assert!(customer.validate().is_ok());

        let bad_email = Customer::new("CUST-002", "Bob", "bob-at-example");
        assert!(matches!(bad_email.validate(), Err(CoreError::Validation(_))));

        let no_name = Customer::new("CUST-003", "", "c@example.com");
        assert!(no_name.validate().is_err());
    }

    #[test]
    fn test_purchase_history() {
        let mut customer = Customer::new("CUST-001-AB", "Alice Wonderland", "alice.wonder@example.com");
        customer.record_purchase(TransactionSummary {
            transaction_id: "TXN-1".to_string(),
            timestamp: Utc::now(),
            total_cents: 3500,
        });
        customer.record_purchase(TransactionSummary {
            transaction_id: "TXN-2".to_string(),
            timestamp: Utc::now(),
            total_cents: 1099,
        });

        assert_eq!(customer.purchase_history.len(), 2);
        assert_eq!(customer.lifetime_spend_cents(), 4599);
    }

    #[test]
    fn test_debug_hides_contact_details() {
        let mut customer = Customer::new("CUST-001-AB", "Alice", "alice.wonder@example.com");
        customer.phone = Some(Masked("555-0101".to_string()));
        let debug = format!("{:?}", customer);
        assert!(!debug.contains("alice.wonder@example.com"));
        assert!(!debug.contains("555-0101"));
    }
}
