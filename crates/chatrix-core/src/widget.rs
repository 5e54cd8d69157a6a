//! Seams to the host page and the embedded chat widget

use std::any::Any;
use url::Url;

use chatrix_navigation::{NavigationState, Position};

use crate::context::EmbedContext;
use crate::fetch::WidgetConfig;
use crate::Result;

/// Decides whether the widget router may open a view
pub type AdmissionPolicy = fn(Position<'_>, &NavigationState) -> bool;

/// Element the widget is mounted into
pub trait RootElement {
    fn set_class_name(&self, class_name: &str);

    /// Lets a widget reach the host's concrete element type
    fn as_any(&self) -> &dyn Any;
}

/// The page the shell runs in
pub trait HostPage {
    /// Full URL of the page, query included
    fn location(&self) -> Result<Url>;

    fn find_root(&self, selector: &str) -> Option<Box<dyn RootElement>>;
}

/// Everything the widget is constructed with
pub struct WidgetOptions {
    pub config: WidgetConfig,
    pub allows_child: AdmissionPolicy,
    pub start_minimized: bool,
    pub login_token: Option<String>,
    pub local_storage_key: Option<String>,
    pub development: bool,
    /// Status notifications and log export for the widget to call into
    pub context: EmbedContext,
}

/// A constructed chat widget
pub trait Widget {
    fn start(&mut self) -> Result<()>;

    fn mount(&mut self, root: &dyn RootElement) -> Result<()>;
}

pub trait WidgetFactory {
    fn create(&self, options: WidgetOptions) -> Result<Box<dyn Widget>>;
}
