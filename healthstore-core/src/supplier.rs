use serde::{Deserialize, Serialize};

use crate::customer::Address;
use crate::{CoreError, CoreResult};

/// A vendor products can be sourced from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Supplier {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            contact_person: None,
            email: email.into(),
            phone: None,
            address: None,
            notes: None,
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.id.trim().is_empty() || self.name.trim().is_empty() {
            return Err(CoreError::Validation("supplier id and name are required".to_string()));
        }
        if !self.email.contains('@') {
            return Err(CoreError::Validation(format!(
                "supplier {} has an invalid email",
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let supplier = Supplier::new("SUPP-001-HG", "Healthy Growers", "orders@healthygrowers.example");
        assert!(supplier.validate().is_ok());

        let broken = Supplier::new("SUPP-002", "Vital Nutrients", "nope");
        assert!(broken.validate().is_err());
    }

    #[test]
    fn test_optional_fields_default_when_absent() {
        let json = r#"{"id":"SUPP-003-ES","name":"EcoSport","email":"hi@ecosport.example"}"#;
        let supplier: Supplier = serde_json::from_str(json).unwrap();
        assert_eq!(supplier.contact_person, None);
        assert_eq!(supplier.notes, None);
    }
}
