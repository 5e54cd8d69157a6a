//! User consent before logs leave the widget

use parking_lot::Mutex;
use std::sync::Arc;

pub const DEFAULT_PRIVACY_POLICY_URL: &str = "https://element.io/privacy";

/// Asks the operator a yes/no question and waits for the answer.
///
/// In the browser this is a blocking `confirm()` dialog. Anything
/// non-interactive must inject a provider with a fixed answer.
pub trait ConsentProvider {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Text shown before exporting logs
pub fn export_disclosure(privacy_policy_url: &str) -> String {
    format!(
        "Debug logs contain application usage data including your username, \
         the IDs or aliases of the rooms or groups you have visited, \
         the usernames of other users and the names of files you send. \
         They do not contain messages. For more information, review our \
         privacy policy at {privacy_policy_url}.\n\n\
         Continue to export logs?"
    )
}

/// Provider that always gives the same answer and remembers what it was asked
#[derive(Debug, Clone)]
pub struct FixedConsent {
    answer: bool,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FixedConsent {
    pub fn accepting() -> Self {
        Self::new(true)
    }

    pub fn declining() -> Self {
        Self::new(false)
    }

    fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

impl ConsentProvider for FixedConsent {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().push(prompt.to_string());
        self.answer
    }
}
