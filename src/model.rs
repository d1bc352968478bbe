// Core structs: ProductRecord, CatalogEntry, EnquiryForm and the error kinds
use thiserror::Error;

/// One parsed row of the product feed, keyed by normalized field name.
///
/// Fields keep the column order of the feed. Records are built once per load
/// and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductRecord {
    fields: Vec<(String, String)>,
}

impl ProductRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First non-empty value among `keys`, in order.
    pub fn first_of<S: AsRef<str>>(&self, keys: &[S]) -> Option<&str> {
        keys.iter()
            .filter_map(|k| self.get(k.as_ref()))
            .find(|v| !v.is_empty())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn has_content(&self) -> bool {
        self.fields.iter().any(|(_, v)| !v.trim().is_empty())
    }

    /// All values joined by a single space, used for free-text search.
    pub fn joined_text(&self) -> String {
        self.fields
            .iter()
            .map(|(_, v)| v.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ProductRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = ProductRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// A catalog record together with its position at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub index: usize,
    pub record: ProductRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnquiryForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl EnquiryForm {
    /// Host-side checks: `name` required, `email` required and address-shaped.
    /// The product list is left to the server.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !email.contains(char::is_whitespace)
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
            }
            None => false,
        };
        if !valid {
            return Err(ValidationError::InvalidEmail(email.to_string()));
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Terminal result of one enquiry submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnquiryOutcome {
    Sent(String),
    Rejected(String),
    NetworkError,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("widget #{0} has no sheet_url")]
    MissingSheetUrl(usize),
    #[error("widget #{widget} ajax_endpoint {endpoint:?} is not an absolute URL: {reason}")]
    InvalidAjaxEndpoint {
        widget: usize,
        endpoint: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no sheet URL")]
    MissingUrl,
    #[error("request failed: {0}")]
    Http(String),
    #[error("network response not ok: {0}")]
    Status(u16),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("csv error: {0}")]
    Csv(String),
    #[error("proxy error: {0}")]
    Proxy(String),
    #[error("malformed response: {0}")]
    Json(String),
    #[error("feed contains no usable rows")]
    NoRows,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter your name.")]
    MissingName,
    #[error("Please enter your email.")]
    MissingEmail,
    #[error("Please enter a valid email address: {0}")]
    InvalidEmail(String),
}
