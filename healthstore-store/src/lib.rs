pub mod app_config;
pub mod seed;
pub mod catalog_repo;
pub mod customer_repo;
pub mod supplier_repo;

pub use catalog_repo::MemoryProductRepository;
pub use customer_repo::MemoryCustomerRepository;
pub use seed::{SeedData, StoreError};
pub use supplier_repo::MemorySupplierRepository;
