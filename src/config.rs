use crate::model::ConfigError;
use reqwest::Url;
use serde::Deserialize;
use std::fs;
use std::time::Duration;

/// Ordered candidate keys for each logical product field.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FieldKeys {
    pub title: Vec<String>,
    pub description: Vec<String>,
    pub price: Vec<String>,
    pub image: Vec<String>,
    /// Description keys searched by the suggestion list.
    pub suggest_description: Vec<String>,
}

impl Default for FieldKeys {
    fn default() -> Self {
        let keys = |list: &[&str]| -> Vec<String> { list.iter().map(|k| k.to_string()).collect() };
        Self {
            title: keys(&["title", "name", "product"]),
            description: keys(&["description", "details"]),
            price: keys(&["price", "cost"]),
            image: keys(&["image"]),
            suggest_description: keys(&["description"]),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WidgetConfig {
    pub sheet_url: String,
    /// Absolute URL of the backend action endpoint (proxy and enquiries).
    pub ajax_endpoint: String,
    #[serde(default)]
    pub use_proxy: bool,
    #[serde(default)]
    pub nonce: String,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_suggest_debounce_ms")]
    pub suggest_debounce_ms: u64,
    #[serde(default = "default_skeleton_ms")]
    pub skeleton_ms: u64,
    #[serde(default = "default_skeleton_count")]
    pub skeleton_count: usize,
    #[serde(default = "default_close_delay_ms")]
    pub close_delay_ms: u64,
    #[serde(default)]
    pub fields: FieldKeys,
}

#[cfg(test)]
impl WidgetConfig {
    pub fn new(sheet_url: impl Into<String>, ajax_endpoint: impl Into<String>) -> Self {
        Self {
            sheet_url: sheet_url.into(),
            ajax_endpoint: ajax_endpoint.into(),
            use_proxy: false,
            nonce: String::new(),
            search_debounce_ms: default_search_debounce_ms(),
            suggest_debounce_ms: default_suggest_debounce_ms(),
            skeleton_ms: default_skeleton_ms(),
            skeleton_count: default_skeleton_count(),
            close_delay_ms: default_close_delay_ms(),
            fields: FieldKeys::default(),
        }
    }
}

impl WidgetConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn suggest_debounce(&self) -> Duration {
        Duration::from_millis(self.suggest_debounce_ms)
    }

    pub fn skeleton_delay(&self) -> Duration {
        Duration::from_millis(self.skeleton_ms)
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub widgets: Vec<WidgetConfig>,
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: String,
}

fn default_search_debounce_ms() -> u64 {
    200
}

fn default_suggest_debounce_ms() -> u64 {
    160
}

fn default_skeleton_ms() -> u64 {
    400
}

fn default_skeleton_count() -> usize {
    4
}

fn default_close_delay_ms() -> u64 {
    1200
}

fn default_snapshot_dir() -> String {
    "logs/html".to_string()
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    for (pos, widget) in config.widgets.iter().enumerate() {
        if widget.sheet_url.trim().is_empty() {
            return Err(ConfigError::MissingSheetUrl(pos));
        }
        // A page-relative endpoint has no host to resolve against outside a browser.
        if let Err(e) = Url::parse(&widget.ajax_endpoint) {
            return Err(ConfigError::InvalidAjaxEndpoint {
                widget: pos,
                endpoint: widget.ajax_endpoint.clone(),
                reason: e.to_string(),
            });
        }
    }
    Ok(config)
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_follow_the_widget_embed() {
        let config = parse_config(
            r#"{"widgets":[{"sheet_url":"https://example.com/s.csv","ajax_endpoint":"https://shop.example.com/wp-admin/admin-ajax.php"}]}"#,
        )
        .expect("config");
        let widget = &config.widgets[0];
        assert_eq!(widget.ajax_endpoint, "https://shop.example.com/wp-admin/admin-ajax.php");
        assert!(!widget.use_proxy);
        assert_eq!(widget.search_debounce(), Duration::from_millis(200));
        assert_eq!(widget.suggest_debounce(), Duration::from_millis(160));
        assert_eq!(widget.close_delay(), Duration::from_millis(1200));
        assert_eq!(widget.fields.title, vec!["title", "name", "product"]);
        assert_eq!(config.snapshot_dir, "logs/html");
    }

    #[test]
    fn field_keys_can_be_overridden() {
        let config = parse_config(
            r#"{"widgets":[{"sheet_url":"u","ajax_endpoint":"http://localhost/ajax","fields":{"title":["model"]}}]}"#,
        )
        .expect("config");
        let fields = &config.widgets[0].fields;
        assert_eq!(fields.title, vec!["model"]);
        assert_eq!(fields.price, vec!["price", "cost"]);
    }

    #[test]
    fn empty_sheet_url_is_rejected() {
        let err = parse_config(r#"{"widgets":[{"sheet_url":"a","ajax_endpoint":"http://localhost/ajax"},{"sheet_url":" ","ajax_endpoint":"http://localhost/ajax"}]}"#)
            .expect_err("missing url");
        assert!(matches!(err, ConfigError::MissingSheetUrl(1)));
    }

    #[test]
    fn relative_ajax_endpoint_is_rejected() {
        let err = parse_config(
            r#"{"widgets":[{"sheet_url":"https://docs.example.com/pub?output=csv","ajax_endpoint":"/wp-admin/admin-ajax.php","use_proxy":true}]}"#,
        )
        .expect_err("relative endpoint");
        assert!(matches!(
            err,
            ConfigError::InvalidAjaxEndpoint { widget: 0, ref endpoint, .. } if endpoint == "/wp-admin/admin-ajax.php"
        ));
    }

    #[test]
    fn ajax_endpoint_is_required() {
        let err = parse_config(r#"{"widgets":[{"sheet_url":"https://docs.example.com/pub?output=csv"}]}"#)
            .expect_err("missing endpoint");
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"{{"widgets":[{{"sheet_url":"https://example.com/s.csv","ajax_endpoint":"https://example.com/ajax","use_proxy":true,"nonce":"abc"}}]}}"#
        )
        .expect("write config");
        let path = file.path().to_str().expect("utf-8 path").to_string();
        let config = load_config(&path).expect("config");
        assert!(config.widgets[0].use_proxy);
        assert_eq!(config.widgets[0].nonce, "abc");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config("/nonexistent/config.json").expect_err("io error");
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
