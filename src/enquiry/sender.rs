// enquiry/sender.rs

use crate::enquiry::{EnquiryPayload, SUBMIT_ACTION};
use crate::model::EnquiryOutcome;
use reqwest::Client;
use reqwest::multipart::Form;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

pub const DEFAULT_SENT_MSG: &str = "Enquiry sent";
pub const DEFAULT_ERROR_MSG: &str = "Error";

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
}

fn build_form(payload: &EnquiryPayload) -> Form {
    Form::new()
        .text("action", SUBMIT_ACTION)
        .text("nonce", payload.nonce.clone())
        .text("name", payload.form.name.clone())
        .text("email", payload.form.email.clone())
        .text("message", payload.form.message.clone())
        .text("products", payload.products.clone())
}

/// Maps a response body onto an outcome. Bodies that are not a JSON envelope
/// count as a network failure.
pub fn interpret_response(body: &str) -> EnquiryOutcome {
    let envelope: ResponseEnvelope = match serde_json::from_str(body) {
        Ok(env) => env,
        Err(e) => {
            warn!("❌ Enquiry response is not JSON: {}", e);
            return EnquiryOutcome::NetworkError;
        }
    };

    let msg = envelope
        .data
        .get("msg")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    if envelope.success {
        EnquiryOutcome::Sent(msg.unwrap_or_else(|| DEFAULT_SENT_MSG.to_string()))
    } else {
        let text = msg
            .or(envelope.message.filter(|m| !m.is_empty()))
            .unwrap_or_else(|| DEFAULT_ERROR_MSG.to_string());
        EnquiryOutcome::Rejected(text)
    }
}

/// Sends the enquiry as a multipart form.
pub async fn send_enquiry(client: &Client, endpoint: &str, payload: &EnquiryPayload) -> EnquiryOutcome {
    info!(
        "📤 Submitting enquiry: name={}, email={}, products=[{}]",
        payload.form.name, payload.form.email, payload.products
    );

    let response = match client
        .post(endpoint)
        .multipart(build_form(payload))
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            warn!("❌ Enquiry send() failed: {:?}", e);
            return EnquiryOutcome::NetworkError;
        }
    };

    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!("❌ Enquiry body read failed [{}]: {:?}", status, e);
            return EnquiryOutcome::NetworkError;
        }
    };

    let outcome = interpret_response(&body);
    info!("Enquiry response [{}]: {:?}", status, outcome);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enquiry::{EnquiryClient, EnquiryTransport};
    use crate::feed::fetcher::build_client;
    use crate::model::EnquiryForm;
    use axum::Router;
    use axum::extract::Multipart;
    use axum::http::StatusCode;
    use axum::routing::post;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    fn payload() -> EnquiryPayload {
        EnquiryPayload {
            nonce: "n0nce".into(),
            form: EnquiryForm {
                name: "Ann".into(),
                email: "ann@example.com".into(),
                message: "Hi".into(),
            },
            products: "Lamp, Desk".into(),
        }
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
        format!("http://{addr}/wp-admin/admin-ajax.php")
    }

    #[test]
    fn success_envelope_carries_message() {
        assert_eq!(
            interpret_response(r#"{"success":true,"data":{"msg":"Thanks"}}"#),
            EnquiryOutcome::Sent("Thanks".into())
        );
        assert_eq!(
            interpret_response(r#"{"success":true}"#),
            EnquiryOutcome::Sent(DEFAULT_SENT_MSG.into())
        );
    }

    #[test]
    fn failure_envelope_falls_back_through_message() {
        assert_eq!(
            interpret_response(r#"{"success":false,"data":{"msg":"X"}}"#),
            EnquiryOutcome::Rejected("X".into())
        );
        assert_eq!(
            interpret_response(r#"{"success":false,"message":"Bad"}"#),
            EnquiryOutcome::Rejected("Bad".into())
        );
        assert_eq!(
            interpret_response(r#"{"success":false,"data":"0"}"#),
            EnquiryOutcome::Rejected(DEFAULT_ERROR_MSG.into())
        );
    }

    #[test]
    fn non_json_body_is_network_error() {
        assert_eq!(interpret_response("<html>oops</html>"), EnquiryOutcome::NetworkError);
    }

    #[tokio::test]
    async fn posts_every_form_field() {
        let seen: Arc<Mutex<HashMap<String, String>>> = Arc::default();
        let log = seen.clone();
        let app = Router::new().route(
            "/wp-admin/admin-ajax.php",
            post(move |mut multipart: Multipart| {
                let log = log.clone();
                async move {
                    while let Ok(Some(field)) = multipart.next_field().await {
                        let name = field.name().unwrap_or_default().to_string();
                        let value = field.text().await.unwrap_or_default();
                        log.lock().expect("lock").insert(name, value);
                    }
                    axum::Json(serde_json::json!({"success": true, "data": {"msg": "Sent!"}}))
                }
            }),
        );
        let endpoint = serve(app).await;
        let client = EnquiryClient::new(build_client().expect("client"), &endpoint);

        let outcome = client.submit(&payload()).await;
        assert_eq!(outcome, EnquiryOutcome::Sent("Sent!".into()));

        let seen = seen.lock().expect("lock");
        assert_eq!(seen["action"], SUBMIT_ACTION);
        assert_eq!(seen["nonce"], "n0nce");
        assert_eq!(seen["name"], "Ann");
        assert_eq!(seen["email"], "ann@example.com");
        assert_eq!(seen["message"], "Hi");
        assert_eq!(seen["products"], "Lamp, Desk");
    }

    #[tokio::test]
    async fn error_status_with_envelope_is_still_interpreted() {
        let app = Router::new().route(
            "/wp-admin/admin-ajax.php",
            post(|| async {
                (
                    StatusCode::FORBIDDEN,
                    axum::Json(serde_json::json!({"success": false, "data": {"msg": "Invalid nonce"}})),
                )
            }),
        );
        let endpoint = serve(app).await;
        let client = EnquiryClient::new(build_client().expect("client"), &endpoint);

        let outcome = client.submit(&payload()).await;
        assert_eq!(outcome, EnquiryOutcome::Rejected("Invalid nonce".into()));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let client = EnquiryClient::new(
            build_client().expect("client"),
            &format!("http://{addr}/wp-admin/admin-ajax.php"),
        );
        assert_eq!(client.submit(&payload()).await, EnquiryOutcome::NetworkError);
    }
}
