use std::sync::Arc;

use anyhow::Context;
use healthstore_core::{CustomerRepository, TransactionSummary};
use healthstore_shared::SaleCompletedEvent;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{error, info, warn};

/// Consume completed sales and append them to the buying customer's history.
pub async fn start_sale_worker(
    mut rx: broadcast::Receiver<SaleCompletedEvent>,
    customers: Arc<dyn CustomerRepository>,
) {
    info!("Sale worker started, listening for completed sales...");

    loop {
        match rx.recv().await {
            Ok(event) => {
                if let Err(e) = record_sale(customers.as_ref(), &event).await {
                    error!("Failed to record sale {}: {:#}", event.transaction_id, e);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Sale worker lagged, {} events skipped", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Sale channel closed, worker stopping");
                break;
            }
        }
    }
}

/// Walk-in sales have no customer and are skipped.
pub async fn record_sale(
    customers: &dyn CustomerRepository,
    event: &SaleCompletedEvent,
) -> anyhow::Result<()> {
    let Some(customer_id) = event.customer_id.as_deref() else {
        return Ok(());
    };

    customers
        .record_purchase(
            customer_id,
            TransactionSummary {
                transaction_id: event.transaction_id.clone(),
                timestamp: event.timestamp,
                total_cents: event.total_cents,
            },
        )
        .await
        .with_context(|| format!("customer {}", customer_id))?;

    info!(
        "Recorded {} ({} items) for customer {}",
        event.transaction_id,
        event.item_count(),
        customer_id
    );
    Ok(())
}
