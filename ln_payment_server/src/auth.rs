//! Settlement signals can trigger node lookups and database writes, so when a signal token is configured, callers
//! must present it in the `lpg_signal_token` header.
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use log::*;
use lpg_common::Secret;

use crate::errors::ServerError;

pub const SIGNAL_TOKEN_HEADER: &str = "lpg_signal_token";

/// The token that protected routes expect. If no token is configured, the routes are open.
#[derive(Debug, Clone, Default)]
pub struct SignalToken(Option<Secret<String>>);

impl SignalToken {
    pub fn new(token: Option<Secret<String>>) -> Self {
        Self(token.filter(|t| !t.is_empty()))
    }

    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    fn accepts(&self, presented: Option<&str>) -> bool {
        match (&self.0, presented) {
            (None, _) => true,
            (Some(expected), Some(presented)) => expected.reveal() == presented,
            (Some(_), None) => false,
        }
    }
}

/// An extractor that only succeeds if the request carries the configured signal token.
#[derive(Debug, Clone, Copy)]
pub struct SignalAuthorized;

impl FromRequest for SignalAuthorized {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let presented = req.headers().get(SIGNAL_TOKEN_HEADER).and_then(|v| v.to_str().ok());
        let accepted = match req.app_data::<web::Data<SignalToken>>() {
            Some(token) => token.accepts(presented),
            None => true,
        };
        if accepted {
            ready(Ok(SignalAuthorized))
        } else {
            warn!("💻️ Rejected request to {}. Missing or invalid signal token.", req.path());
            ready(Err(ServerError::Forbidden("A valid signal token is required".to_string())))
        }
    }
}
