use actix_web::{http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use log::debug;

use crate::auth::SIGNAL_TOKEN_HEADER;

pub const TEST_TOKEN: &str = "let-me-in";

pub async fn get_request<F>(path: &str, configure: F) -> Result<(StatusCode, String), String>
where F: FnOnce(&mut ServiceConfig) {
    send(TestRequest::get().uri(path), "", configure).await
}

pub async fn post_request<F>(
    token: &str,
    path: &str,
    body: Option<serde_json::Value>,
    configure: F,
) -> Result<(StatusCode, String), String>
where
    F: FnOnce(&mut ServiceConfig),
{
    let mut req = TestRequest::post().uri(path);
    if let Some(body) = body {
        req = req.set_json(body);
    }
    send(req, token, configure).await
}

async fn send<F>(mut req: TestRequest, token: &str, configure: F) -> Result<(StatusCode, String), String>
where F: FnOnce(&mut ServiceConfig) {
    if !token.is_empty() {
        req = req.insert_header((SIGNAL_TOKEN_HEADER, token));
    }
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::try_call_service(&service, req.to_request()).await.map_err(|e| e.to_string())?;
    let status = res.status();
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    Ok((status, body))
}
