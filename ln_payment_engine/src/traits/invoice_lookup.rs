use thiserror::Error;

use crate::db_types::{NodeInvoiceSnapshot, NodePubkey, PaymentHash};

#[derive(Debug, Clone, Error)]
pub enum InvoiceLookupError {
    #[error("No client is available for node {0}")]
    NodeUnavailable(NodePubkey),
    #[error("The node returned an error: {0}")]
    NodeError(String),
}

/// Resolves the status of an invoice on the node that issued it.
#[allow(async_fn_in_trait)]
pub trait InvoiceLookup {
    /// Look up the invoice with the given `payment_hash` on the node identified by `pubkey`.
    ///
    /// Returns `Ok(None)` if the node has no record of the invoice (e.g. it was deleted or expired and garbage
    /// collected). If there is no usable client for `pubkey`, [`InvoiceLookupError::NodeUnavailable`] is returned.
    async fn lookup_invoice(
        &self,
        pubkey: &NodePubkey,
        payment_hash: &PaymentHash,
    ) -> Result<Option<NodeInvoiceSnapshot>, InvoiceLookupError>;
}
