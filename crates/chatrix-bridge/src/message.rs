//! Outbound message shapes

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Views the parent resizes the iframe for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeView {
    Timeline,
    Login,
    Settings,
}

impl ResizeView {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeView::Timeline => "timeline",
            ResizeView::Login => "login",
            ResizeView::Settings => "settings",
        }
    }
}

impl std::fmt::Display for ResizeView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ResizeView {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "timeline" => Ok(ResizeView::Timeline),
            "login" => Ok(ResizeView::Login),
            "settings" => Ok(ResizeView::Settings),
            _ => Err(BridgeError::UnknownView(s.to_string())),
        }
    }
}

/// A message for the embedding page, tagged by `action`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ParentMessage {
    ResizeIframe { view: ResizeView },
    Minimize,
    UnreadMessage { count: u32 },
    Error,
}

impl ParentMessage {
    pub fn action(&self) -> &'static str {
        match self {
            ParentMessage::ResizeIframe { .. } => "resize-iframe",
            ParentMessage::Minimize => "minimize",
            ParentMessage::UnreadMessage { .. } => "unread-message",
            ParentMessage::Error => "error",
        }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shapes() {
        let cases = [
            (
                ParentMessage::ResizeIframe {
                    view: ResizeView::Login,
                },
                json!({"action": "resize-iframe", "view": "login"}),
            ),
            (ParentMessage::Minimize, json!({"action": "minimize"})),
            (
                ParentMessage::UnreadMessage { count: 3 },
                json!({"action": "unread-message", "count": 3}),
            ),
            (ParentMessage::Error, json!({"action": "error"})),
        ];

        for (message, expected) in cases {
            assert_eq!(serde_json::to_value(&message).unwrap(), expected);
            assert_eq!(expected["action"], message.action());
        }
    }

    #[test]
    fn test_resize_view_parse() {
        assert_eq!("settings".parse::<ResizeView>().unwrap(), ResizeView::Settings);
        assert!(matches!(
            "minimize".parse::<ResizeView>(),
            Err(BridgeError::UnknownView(_))
        ));
    }

    #[test]
    fn test_error_message_carries_no_detail() {
        let json = ParentMessage::Error.to_json().unwrap();
        assert_eq!(json, r#"{"action":"error"}"#);
    }
}
