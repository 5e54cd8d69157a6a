//! Shell configuration
//!
//! Two layers:
//! - [`ShellSettings`]: how this build of the shell behaves
//! - [`LaunchParams`]: what the embedding page asked for, read from the
//!   page URL query on every load

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellSettings {
    /// Development build: no persistent log collection
    pub development: bool,
    /// Selector of the element the widget mounts into
    pub root_selector: String,
    /// Class applied to the root element before mounting
    pub root_class: String,
    /// Linked from the log export disclosure
    pub privacy_policy_url: String,
    /// Log records kept for export
    pub log_capacity: usize,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            development: cfg!(debug_assertions),
            root_selector: "#chatrix".to_string(),
            root_class: "hydrogen".to_string(),
            privacy_policy_url: chatrix_diagnostics::DEFAULT_PRIVACY_POLICY_URL.to_string(),
            log_capacity: 5000,
        }
    }
}

/// Query parameters of the page hosting the widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchParams {
    /// Where to fetch the widget configuration from (`config`)
    pub config_url: Url,
    /// Open collapsed (`minimized`)
    pub start_minimized: bool,
    /// Passed through to the widget (`loginToken`)
    pub login_token: Option<String>,
    /// Storage namespace passed through to the widget (`localStorageKey`)
    pub local_storage_key: Option<String>,
}

impl LaunchParams {
    pub fn from_url(page: &Url) -> Result<Self> {
        let param = |name: &str| {
            page.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
                .filter(|value| !value.is_empty())
        };

        let config = param("config").ok_or(CoreError::MissingConfigParam)?;
        // Relative links resolve against the page, absolute ones replace it
        let config_url = page.join(&config)?;

        Ok(Self {
            config_url,
            start_minimized: param("minimized").is_some(),
            login_token: param("loginToken"),
            local_storage_key: param("localStorageKey"),
        })
    }
}
