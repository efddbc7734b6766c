use awc::Client;
use log::error;

use crate::models::InferencePayload;

pub const DEFAULT_INFERENCE_URL: &str = "http://localhost:7777/invocations";

// HTTP client for the model server. Each server worker builds its own
// instance, so there is nothing to share or lock.
pub struct InferenceForwarder {
    client: Client,
    endpoint: String,
}

impl InferenceForwarder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        // No request timeout: the caller waits as long as the model server
        // takes to answer.
        let client = Client::builder().disable_timeout().finish();
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    // Posts the rows to the model server and hands back the response body
    // verbatim. The body is never parsed here.
    pub async fn forward(&self, payload: &InferencePayload) -> actix_web::Result<String> {
        let mut response = self
            .client
            .post(self.endpoint.as_str())
            .send_json(payload)
            .await
            .map_err(|e| {
                error!("Inference backend at {} unreachable: {}", self.endpoint, e);
                actix_web::error::ErrorInternalServerError("Inference request failed")
            })?;

        // No cap on the collected body; the response is relayed whatever
        // its size.
        let body = response.body().limit(usize::MAX).await.map_err(|e| {
            error!("Failed to read inference backend response: {}", e);
            actix_web::error::ErrorInternalServerError("Inference response unreadable")
        })?;

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{web, App, HttpResponse};

    use super::*;
    use crate::models::rows_from_csv;

    #[actix_rt::test]
    async fn test_forward_returns_backend_body() {
        let srv = actix_test::start(|| {
            App::new().service(web::resource("/invocations").route(web::post().to(
                || async { HttpResponse::Ok().body("{\"predictions\": [0]}") },
            )))
        });

        let forwarder = InferenceForwarder::new(srv.url("/invocations"));
        let rows = rows_from_csv("600,40\n").unwrap();
        let body = forwarder
            .forward(&InferencePayload::from_rows(rows))
            .await
            .unwrap();
        assert_eq!(body, "{\"predictions\": [0]}");
    }

    #[actix_rt::test]
    async fn test_forward_relays_large_backend_body() {
        // Well past awc's default 2 MiB body collection limit.
        let srv = actix_test::start(|| {
            App::new().service(web::resource("/invocations").route(web::post().to(
                || async { HttpResponse::Ok().body("x".repeat(3 * 1024 * 1024)) },
            )))
        });

        let forwarder = InferenceForwarder::new(srv.url("/invocations"));
        let body = forwarder
            .forward(&InferencePayload::from_rows(Vec::new()))
            .await
            .unwrap();
        assert_eq!(body, "x".repeat(3 * 1024 * 1024));
    }

    #[actix_rt::test]
    async fn test_forward_returns_body_for_non_200_status() {
        let srv = actix_test::start(|| {
            App::new().service(web::resource("/invocations").route(web::post().to(
                || async {
                    HttpResponse::ServiceUnavailable().body("{\"error\": \"model overloaded\"}")
                },
            )))
        });

        let forwarder = InferenceForwarder::new(srv.url("/invocations"));
        let body = forwarder
            .forward(&InferencePayload::from_rows(Vec::new()))
            .await
            .unwrap();
        assert_eq!(body, "{\"error\": \"model overloaded\"}");
    }

    #[actix_rt::test]
    async fn test_forward_fails_when_backend_unreachable() {
        // Port 1 is reserved; nothing listens there.
        let forwarder = InferenceForwarder::new("http://127.0.0.1:1/invocations");
        let result = forwarder
            .forward(&InferencePayload::from_rows(Vec::new()))
            .await;
        assert!(result.is_err());
    }
}
