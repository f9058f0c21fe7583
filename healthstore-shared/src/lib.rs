pub mod pii;
pub mod events;

pub use events::{SaleCompletedEvent, SoldLine};
pub use pii::Masked;
