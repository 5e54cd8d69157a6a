//! Remote widget configuration

use futures_util::future::{FutureExt, LocalBoxFuture};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::CoreError;
use crate::Result;

/// Configuration document handed to the widget.
///
/// Its schema belongs to whoever serves it; the shell only insists on a
/// JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetConfig(Map<String, Value>);

impl WidgetConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(CoreError::InvalidConfig(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub trait ConfigFetcher {
    fn fetch<'a>(&'a self, url: &'a Url) -> LocalBoxFuture<'a, Result<WidgetConfig>>;
}

/// Fetches the configuration document over HTTP
#[derive(Debug, Clone, Default)]
pub struct HttpConfigFetcher {
    client: reqwest::Client,
}

impl HttpConfigFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ConfigFetcher for HttpConfigFetcher {
    fn fetch<'a>(&'a self, url: &'a Url) -> LocalBoxFuture<'a, Result<WidgetConfig>> {
        async move {
            tracing::debug!(url = %url, "Fetching widget configuration");

            let body = self
                .client
                .get(url.clone())
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?;

            WidgetConfig::from_json(&body)
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_config() {
        let config = WidgetConfig::from_json(
            r#"{"defaultHomeserver": "https://matrix.example.org", "roomId": "!abc:example.org"}"#,
        )
        .unwrap();

        assert_eq!(
            config.get("defaultHomeserver").and_then(|v| v.as_str()),
            Some("https://matrix.example.org")
        );
        assert_eq!(config.as_map().len(), 2);
    }

    #[test]
    fn test_non_object_config_is_rejected() {
        let err = WidgetConfig::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(msg) if msg.contains("an array")));
    }

    #[test]
    fn test_malformed_config_is_rejected() {
        let err = WidgetConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, CoreError::Serialization(_)));
    }

    #[test]
    fn test_serde_is_transparent() {
        let config: WidgetConfig = serde_json::from_str(r#"{"a": 1}"#).unwrap();
        assert_eq!(serde_json::to_string(&config).unwrap(), r#"{"a":1}"#);
        assert!(serde_json::from_str::<WidgetConfig>("true").is_err());
    }
}
