use std::collections::HashMap;

use ln_payment_engine::{
    db_types::{NodeInvoiceSnapshot, NodePubkey, PaymentHash, Sats},
    traits::{InvoiceLookup, InvoiceLookupError},
};
use lnd_tools::{LndApi, LndApiError, LndConfig, LndInvoice};
use log::*;

use crate::errors::ServerError;

/// Resolves invoice status against the LND nodes the server holds credentials for, keyed by node identity.
#[derive(Clone, Default)]
pub struct LndInvoiceLookup {
    nodes: HashMap<NodePubkey, LndApi>,
}

impl LndInvoiceLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: LndConfig) -> Result<Self, ServerError> {
        let pubkey = config.pubkey.parse::<NodePubkey>().map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
        let api = LndApi::new(config)?;
        Ok(Self::new().with_node(pubkey, api))
    }

    pub fn with_node(mut self, pubkey: NodePubkey, api: LndApi) -> Self {
        info!("⚡️ Registered LND node {pubkey} at {}", api.config().rest_url());
        self.nodes.insert(pubkey, api);
        self
    }
}

impl InvoiceLookup for LndInvoiceLookup {
    async fn lookup_invoice(
        &self,
        pubkey: &NodePubkey,
        payment_hash: &PaymentHash,
    ) -> Result<Option<NodeInvoiceSnapshot>, InvoiceLookupError> {
        let api = self.nodes.get(pubkey).ok_or_else(|| InvoiceLookupError::NodeUnavailable(pubkey.clone()))?;
        match api.lookup_invoice(payment_hash.as_str()).await {
            Ok(invoice) => Ok(invoice.map(snapshot)),
            Err(LndApiError::RestResponseError(e)) => {
                warn!("⚡️ Could not reach node {pubkey}. {e}");
                Err(InvoiceLookupError::NodeUnavailable(pubkey.clone()))
            },
            Err(e) => Err(InvoiceLookupError::NodeError(e.to_string())),
        }
    }
}

fn snapshot(invoice: LndInvoice) -> NodeInvoiceSnapshot {
    NodeInvoiceSnapshot {
        is_settled: invoice.is_settled(),
        received: Sats::from(invoice.amt_paid_sat),
        description: invoice.memo,
    }
}
