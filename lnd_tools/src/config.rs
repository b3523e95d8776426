use std::path::PathBuf;

use log::*;
use lpg_common::{helpers::env_flag, Secret};

#[derive(Debug, Clone, Default)]
pub struct LndConfig {
    /// The identity pubkey of the node. Invoices issued by other nodes cannot be looked up with this client.
    pub pubkey: String,
    pub rest_url: String,
    pub macaroon_hex: Secret<String>,
    pub tls_cert_path: Option<PathBuf>,
    pub accept_invalid_certs: bool,
}

impl LndConfig {
    pub fn new_from_env_or_default() -> Self {
        let pubkey = std::env::var("LPG_LND_PUBKEY").unwrap_or_else(|_| {
            warn!("🪛️ LPG_LND_PUBKEY not set. Invoices will not be matched to this node.");
            String::default()
        });
        let rest_url = std::env::var("LPG_LND_REST_URL").unwrap_or_else(|_| {
            warn!("🪛️ LPG_LND_REST_URL not set, using https://localhost:8080 as default");
            "https://localhost:8080".to_string()
        });
        let macaroon_hex = Secret::new(std::env::var("LPG_LND_MACAROON_HEX").unwrap_or_else(|_| {
            warn!("🪛️ LPG_LND_MACAROON_HEX not set. Requests to the node will probably be rejected.");
            String::default()
        }));
        let tls_cert_path = std::env::var("LPG_LND_TLS_CERT_PATH").ok().map(PathBuf::from);
        let accept_invalid_certs = env_flag("LPG_LND_ACCEPT_INVALID_CERTS", false);
        if accept_invalid_certs {
            warn!("🪛️ TLS certificates from the LND node will NOT be verified");
        }
        Self { pubkey, rest_url, macaroon_hex, tls_cert_path, accept_invalid_certs }
    }

    pub fn rest_url(&self) -> &str {
        self.rest_url.trim_end_matches('/')
    }
}
