use serde::{Deserialize, Serialize};

/// Highest accepted regular price, 999,999.99.
pub const MAX_PRICE_CENTS: i64 = 99_999_999;

/// A sellable catalog item.
///
/// Prices are integer cents. `sale_price_cents`, when present and not above the
/// regular price, is what the register charges.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub price_cents: i64,
    #[serde(default)]
    pub sale_price_cents: Option<i64>,
    pub stock: u32,
    #[serde(default)]
    pub optimum_stock: Option<u32>,
    #[serde(default)]
    pub supplier_id: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price_cents: i64,
        stock: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: category.into(),
            price_cents,
            sale_price_cents: None,
            stock,
            optimum_stock: None,
            supplier_id: None,
            image_url: None,
        }
    }

    pub fn with_sale_price(mut self, sale_price_cents: i64) -> Self {
        self.sale_price_cents = Some(sale_price_cents);
        self
    }

    pub fn with_optimum_stock(mut self, optimum_stock: u32) -> Self {
        self.optimum_stock = Some(optimum_stock);
        self
    }

    pub fn with_supplier(mut self, supplier_id: impl Into<String>) -> Self {
        self.supplier_id = Some(supplier_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The unit price charged at the register.
    ///
    /// Falls back to the regular price when there is no sale price, or when the
    /// sale price is negative or above the regular price.
    pub fn effective_price_cents(&self) -> i64 {
        match self.sale_price_cents {
            Some(sale) if (0..=self.price_cents).contains(&sale) => sale,
            _ => self.price_cents,
        }
    }

    pub fn is_on_sale(&self) -> bool {
        self.effective_price_cents() < self.price_cents
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.id.trim().is_empty() {
            return Err(CatalogError::MissingField("id"));
        }
        if self.name.trim().is_empty() {
            return Err(CatalogError::MissingField("name"));
        }
        if self.price_cents <= 0 || self.price_cents > MAX_PRICE_CENTS {
            return Err(CatalogError::InvalidPrice(self.price_cents));
        }
        if let Some(sale) = self.sale_price_cents {
            if sale < 0 || sale > self.price_cents {
                return Err(CatalogError::InvalidSalePrice {
                    sale,
                    price: self.price_cents,
                });
            }
        }
        Ok(())
    }
}

/// Distinct categories in first-seen order.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in products {
        if !seen.iter().any(|c| c == &product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}

/// Products in `category`. `None` and `"All"` select everything.
pub fn filter_by_category<'a>(products: &'a [Product], category: Option<&str>) -> Vec<&'a Product> {
    match category {
        None | Some("All") => products.iter().collect(),
        Some(wanted) => products.iter().filter(|p| p.category == wanted).collect(),
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Price must be between 1 and {max} cents, got {0}", max = MAX_PRICE_CENTS)]
    InvalidPrice(i64),

    #[error("Sale price {sale} must be between 0 and the regular price {price}")]
    InvalidSalePrice { sale: i64, price: i64 },

    #[error("Invalid money amount: {0}")]
    InvalidMoney(String),
}
