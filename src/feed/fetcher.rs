use crate::feed::traits::CatalogSource;
use crate::model::{FetchError, LoadError, ParseError, ProductRecord};
use crate::normalizer::normalize_all;
use crate::parser::{CsvParser, FeedParser};
use crate::utils::cache_bust_url;
use chrono::Utc;
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::{info, warn};

pub const PROXY_ACTION: &str = "sps_get_products";

pub fn build_client() -> Result<Client, FetchError> {
    Client::builder()
        .user_agent("Mozilla/5.0 (X11; Linux x86_64) SheetSniper/0.1")
        .build()
        .map_err(|e| FetchError::Http(e.to_string()))
}

/// `{success, data}` envelope returned by the proxy action.
#[derive(Debug, Deserialize)]
struct ProxyEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Value,
}

/// Loads the product feed, either straight from the sheet or through the
/// backend proxy action.
pub struct SheetLoader {
    client: Client,
    sheet_url: String,
    ajax_endpoint: String,
    use_proxy: bool,
    parser: CsvParser,
    last_stamp: AtomicI64,
}

impl SheetLoader {
    pub fn new(client: Client, sheet_url: &str, ajax_endpoint: &str, use_proxy: bool) -> Self {
        Self {
            client,
            sheet_url: sheet_url.to_string(),
            ajax_endpoint: ajax_endpoint.to_string(),
            use_proxy,
            parser: CsvParser::new(),
            last_stamp: AtomicI64::new(0),
        }
    }

    /// Current time in millis, bumped so that two calls never share a value.
    fn next_stamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let prev = match self
            .last_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
                Some(now.max(prev + 1))
            }) {
            Ok(prev) | Err(prev) => prev,
        };
        now.max(prev + 1)
    }

    async fn load_direct(&self) -> Result<Vec<ProductRecord>, LoadError> {
        let url = cache_bust_url(&self.sheet_url, self.next_stamp());
        info!("Fetching CSV: {}", url);

        let response = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("❌ CSV fetch responded [{}]", status);
            return Err(FetchError::Status(status.as_u16()).into());
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;
        info!("CSV fetched, length: {}", text.len());

        Ok(self.parser.parse(&text)?)
    }

    async fn load_proxy(&self) -> Result<Vec<ProductRecord>, LoadError> {
        info!("Proxy fetch: {} -> {}", self.ajax_endpoint, self.sheet_url);

        let response = self
            .client
            .get(&self.ajax_endpoint)
            .query(&[("action", PROXY_ACTION), ("url", self.sheet_url.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        Ok(parse_proxy_body(&body)?)
    }
}

/// Turns a proxy response body into records.
fn parse_proxy_body(body: &str) -> Result<Vec<ProductRecord>, ParseError> {
    let envelope: ProxyEnvelope =
        serde_json::from_str(body).map_err(|e| ParseError::Json(e.to_string()))?;

    if !envelope.success {
        let reason = match envelope.data {
            Value::String(s) if !s.is_empty() => s,
            _ => "proxy error".to_string(),
        };
        return Err(ParseError::Proxy(reason));
    }

    let rows: Vec<Map<String, Value>> = match envelope.data {
        Value::Null => Vec::new(),
        data => serde_json::from_value(data).map_err(|e| ParseError::Json(e.to_string()))?,
    };

    Ok(rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(k, v)| (k, value_to_string(v)))
                .collect::<ProductRecord>()
        })
        .collect())
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait::async_trait]
impl CatalogSource for SheetLoader {
    async fn load(&self) -> Result<Vec<ProductRecord>, LoadError> {
        if self.sheet_url.trim().is_empty() {
            return Err(FetchError::MissingUrl.into());
        }

        let raw = if self.use_proxy {
            self.load_proxy().await?
        } else {
            self.load_direct().await?
        };

        let records = normalize_all(raw);
        if records.is_empty() {
            return Err(ParseError::NoRows.into());
        }
        info!("Parsed rows count: {}", records.len());
        Ok(records)
    }
}
