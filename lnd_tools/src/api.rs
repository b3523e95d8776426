use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Certificate,
    Client,
    Method,
};
use serde::de::DeserializeOwned;

use crate::{config::LndConfig, helpers::is_payment_hash_hex, LndApiError, LndInvoice};

#[derive(Clone)]
pub struct LndApi {
    config: LndConfig,
    client: Arc<Client>,
}

impl LndApi {
    pub fn new(config: LndConfig) -> Result<Self, LndApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        if !config.macaroon_hex.is_empty() {
            let mut val = HeaderValue::from_str(config.macaroon_hex.reveal().as_str())
                .map_err(|e| LndApiError::Initialization(e.to_string()))?;
            val.set_sensitive(true);
            headers.insert("Grpc-Metadata-macaroon", val);
        }
        let mut builder =
            Client::builder().default_headers(headers).danger_accept_invalid_certs(config.accept_invalid_certs);
        if let Some(path) = &config.tls_cert_path {
            let pem = std::fs::read(path)
                .map_err(|e| LndApiError::Initialization(format!("Cannot read {}. {e}", path.display())))?;
            let cert = Certificate::from_pem(&pem).map_err(|e| LndApiError::Initialization(e.to_string()))?;
            builder = builder.add_root_certificate(cert);
        }
        let client = builder.build().map_err(|e| LndApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &LndConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.rest_url())
    }

    pub async fn rest_query<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T, LndApiError> {
        let url = self.url(path);
        trace!("⚡️ Sending REST query: {url}");
        let response = self
            .client
            .request(method, url)
            .send()
            .await
            .map_err(|e| LndApiError::RestResponseError(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            trace!("⚡️ REST query successful. {status}");
            response.json::<T>().await.map_err(|e| LndApiError::JsonError(e.to_string()))
        } else {
            let message = response.text().await.map_err(|e| LndApiError::RestResponseError(e.to_string()))?;
            Err(LndApiError::QueryError { status: status.as_u16(), message })
        }
    }

    /// Fetches the invoice with the given payment hash (in hex). Returns `Ok(None)` if the node does not know it.
    pub async fn lookup_invoice(&self, payment_hash_hex: &str) -> Result<Option<LndInvoice>, LndApiError> {
        if !is_payment_hash_hex(payment_hash_hex) {
            return Err(LndApiError::InvalidPaymentHash(payment_hash_hex.to_string()));
        }
        let path = format!("/v1/invoice/{payment_hash_hex}");
        match self.rest_query::<LndInvoice>(Method::GET, &path).await {
            Ok(invoice) => {
                debug!("⚡️ Invoice {payment_hash_hex} is {:?}", invoice.state);
                Ok(Some(invoice))
            },
            Err(e) if e.is_invoice_not_found() => {
                debug!("⚡️ The node does not know invoice {payment_hash_hex}");
                Ok(None)
            },
            Err(e) => Err(e),
        }
    }
}
