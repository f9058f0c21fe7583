pub mod models;
pub mod manager;
pub mod terminal;

pub use models::{CartLine, CustomerRef, Receipt, ReceiptLine, Sale, SaleStatus};
pub use manager::{LineChange, SaleAggregator, SaleError};
pub use terminal::{PosTerminal, TerminalError};
