//! Admission policy
//!
//! | Position        | Admitted children                                   |
//! |-----------------|-----------------------------------------------------|
//! | Root            | start, login, settings, timeline, minimize          |
//! | Under any state | none                                                |

use crate::view::{NavigationState, ViewKind};

/// Views that may be opened with no current view
pub const TOP_LEVEL_VIEWS: [ViewKind; 5] = [
    ViewKind::Start,
    ViewKind::Login,
    ViewKind::Settings,
    ViewKind::Timeline,
    ViewKind::Minimize,
];

/// Where a candidate view would be opened
#[derive(Debug, Clone, Copy)]
pub enum Position<'a> {
    /// No current view; the candidate would become a top-level view
    Root,
    /// Nested under an existing view
    Under(&'a NavigationState),
}

impl<'a> From<Option<&'a NavigationState>> for Position<'a> {
    fn from(parent: Option<&'a NavigationState>) -> Self {
        match parent {
            Some(state) => Position::Under(state),
            None => Position::Root,
        }
    }
}

/// Whether `child` may be opened at `position`.
///
/// Nested navigation is denied regardless of the parent's kind. The widget
/// router is capable of deeper paths; the embedding deliberately keeps it
/// flat.
pub fn allows_child(position: Position<'_>, child: &NavigationState) -> bool {
    match position {
        Position::Root => TOP_LEVEL_VIEWS.contains(&child.kind()),
        Position::Under(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_root_admits_top_level_views() {
        for kind in TOP_LEVEL_VIEWS {
            assert!(
                allows_child(Position::Root, &NavigationState::new(kind)),
                "{kind} should be admitted at the top level"
            );
        }
    }

    #[test]
    fn test_root_denies_other_views() {
        for kind in ViewKind::ALL {
            if TOP_LEVEL_VIEWS.contains(&kind) {
                continue;
            }
            assert!(!allows_child(Position::Root, &NavigationState::new(kind)));
        }
    }

    #[test]
    fn test_nested_always_denied() {
        for parent_kind in ViewKind::ALL {
            let parent = NavigationState::new(parent_kind);
            for child_kind in ViewKind::ALL {
                let child = NavigationState::new(child_kind);
                assert!(!allows_child(Position::Under(&parent), &child));
            }
        }
    }

    #[test]
    fn test_position_from_option() {
        let login = NavigationState::new(ViewKind::Login);
        assert!(allows_child(Position::from(None), &login));

        let timeline = Arc::new(NavigationState::new(ViewKind::Timeline));
        let settings = NavigationState::child_of(ViewKind::Settings, timeline.clone());
        assert!(!allows_child(settings.parent().into(), &settings));
    }
}
