pub mod sender;

use crate::model::{EnquiryForm, EnquiryOutcome};
use reqwest::Client;

pub const SUBMIT_ACTION: &str = "sps_submit_enquiry";

/// Everything posted for one enquiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnquiryPayload {
    pub nonce: String,
    pub form: EnquiryForm,
    pub products: String,
}

#[async_trait::async_trait]
pub trait EnquiryTransport: Send + Sync {
    async fn submit(&self, payload: &EnquiryPayload) -> EnquiryOutcome;
}

/// Posts enquiries to the backend mailer action.
pub struct EnquiryClient {
    client: Client,
    endpoint: String,
}

impl EnquiryClient {
    pub fn new(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl EnquiryTransport for EnquiryClient {
    async fn submit(&self, payload: &EnquiryPayload) -> EnquiryOutcome {
        sender::send_enquiry(&self.client, &self.endpoint, payload).await
    }
}
