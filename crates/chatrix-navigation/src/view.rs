//! Widget views and navigation states

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::NavigationError;

/// Every view kind the widget router knows about.
///
/// The set is closed: an unknown segment type is rejected when a state is
/// constructed, so the admission policy only ever sees known kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// Landing screen shown before the client has a session
    Start,
    /// Login form
    Login,
    /// Widget settings
    Settings,
    /// Room timeline
    Timeline,
    /// Collapsed widget (only the launcher bubble is visible)
    Minimize,
    /// Session scope inside the client router
    Session,
    /// A single room inside a session
    Room,
    /// Full-size image viewer
    Lightbox,
    /// Room details panel
    Details,
    /// Member list panel
    Members,
    /// Logout confirmation
    Logout,
}

impl ViewKind {
    pub const ALL: [ViewKind; 11] = [
        ViewKind::Start,
        ViewKind::Login,
        ViewKind::Settings,
        ViewKind::Timeline,
        ViewKind::Minimize,
        ViewKind::Session,
        ViewKind::Room,
        ViewKind::Lightbox,
        ViewKind::Details,
        ViewKind::Members,
        ViewKind::Logout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Start => "start",
            ViewKind::Login => "login",
            ViewKind::Settings => "settings",
            ViewKind::Timeline => "timeline",
            ViewKind::Minimize => "minimize",
            ViewKind::Session => "session",
            ViewKind::Room => "room",
            ViewKind::Lightbox => "lightbox",
            ViewKind::Details => "details",
            ViewKind::Members => "members",
            ViewKind::Logout => "logout",
        }
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ViewKind {
    type Err = NavigationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| NavigationError::UnknownView(s.to_string()))
    }
}

/// One addressable widget view.
///
/// States are immutable; a child holds a shared reference to its parent, so
/// the hierarchy is whatever the traversal built, not a stored tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    kind: ViewKind,
    parent: Option<Arc<NavigationState>>,
}

impl NavigationState {
    /// A state with no parent
    pub fn new(kind: ViewKind) -> Self {
        Self { kind, parent: None }
    }

    /// A state nested under `parent`
    pub fn child_of(kind: ViewKind, parent: Arc<NavigationState>) -> Self {
        Self {
            kind,
            parent: Some(parent),
        }
    }

    /// Build a parentless state from a router segment type
    pub fn parse(segment_type: &str) -> crate::Result<Self> {
        Ok(Self::new(segment_type.parse()?))
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn parent(&self) -> Option<&NavigationState> {
        self.parent.as_deref()
    }

    /// Number of ancestors above this state
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(state) = current {
            depth += 1;
            current = state.parent();
        }
        depth
    }
}
