pub mod product;
pub mod pricing;
pub mod inventory;

pub use product::{categories, filter_by_category, CatalogError, Product, MAX_PRICE_CENTS};
pub use pricing::{cents_from_major, format_cents, parse_money, parse_sale_price};
pub use inventory::{StockPolicy, StockStatus};
