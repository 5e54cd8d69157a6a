//! Startup sequence
//!
//! ```text
//! install fault suppressor    (FaultGuard::install, synchronous)
//!   ↓
//! locate root element
//!   ↓
//! read launch parameters      (missing `config` stops here)
//!   ↓
//! prepare root, fetch config
//!   ↓
//! build context, create widget, start, mount
//! ```
//!
//! The suppressor goes first so that a failure anywhere later is still
//! classified and reported to the parent frame. [`Shell::start`] takes the
//! [`FaultGuard`] as proof of that, so the host has to install it before it
//! schedules any async work.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chatrix_bridge::{ParentChannel, ParentNotifier};
use chatrix_diagnostics::{
    ConsentProvider, FaultEvent, FaultInterceptor, FaultSuppressor, FileSaver, LogExportGate,
    LogSource,
};
use chatrix_navigation::allows_child;

use crate::config::{LaunchParams, ShellSettings};
use crate::context::EmbedContext;
use crate::error::CoreError;
use crate::fetch::ConfigFetcher;
use crate::widget::{HostPage, RootElement, Widget, WidgetFactory, WidgetOptions};
use crate::Result;

/// An installed fault suppressor and the notifier it reports through.
///
/// Only [`FaultGuard::install`] creates one, so holding a guard means the
/// page's error and rejection events are already intercepted.
#[derive(Debug, Clone)]
pub struct FaultGuard {
    notifier: ParentNotifier,
    suppressor: Arc<FaultSuppressor>,
}

impl FaultGuard {
    /// Hook the suppressor into the host. `channel` is `None` when the page
    /// is not embedded in another frame.
    pub fn install(
        channel: Option<Arc<dyn ParentChannel>>,
        interceptor: &dyn FaultInterceptor,
    ) -> Result<Self> {
        let notifier = ParentNotifier::from_channel(channel);
        let suppressor = Arc::new(FaultSuppressor::new(notifier.clone()));
        suppressor.install(interceptor)?;

        Ok(Self {
            notifier,
            suppressor,
        })
    }

    pub fn notifier(&self) -> &ParentNotifier {
        &self.notifier
    }

    pub fn suppressor(&self) -> &Arc<FaultSuppressor> {
        &self.suppressor
    }
}

/// Collaborators the shell is wired to
pub struct Host<'a> {
    pub guard: FaultGuard,
    pub page: &'a dyn HostPage,
    pub fetcher: &'a dyn ConfigFetcher,
    pub widgets: &'a dyn WidgetFactory,
    pub logs: Arc<dyn LogSource>,
    pub consent: Arc<dyn ConsentProvider>,
    pub saver: Arc<dyn FileSaver>,
}

/// A running widget and the capabilities wired around it
pub struct Embedding {
    pub context: EmbedContext,
    pub params: LaunchParams,
    widget: Box<dyn Widget>,
    root: Box<dyn RootElement>,
}

impl std::fmt::Debug for Embedding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Embedding")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl Embedding {
    pub fn widget(&mut self) -> &mut dyn Widget {
        self.widget.as_mut()
    }

    pub fn root(&self) -> &dyn RootElement {
        self.root.as_ref()
    }
}

/// Bootstraps the widget once per page load
pub struct Shell {
    settings: ShellSettings,
    started: AtomicBool,
}

impl Shell {
    pub fn new(settings: ShellSettings) -> Self {
        Self {
            settings,
            started: AtomicBool::new(false),
        }
    }

    pub fn settings(&self) -> &ShellSettings {
        &self.settings
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub async fn start(&self, host: Host<'_>) -> Result<Embedding> {
        if self
            .started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CoreError::AlreadyStarted);
        }

        let notifier = host.guard.notifier().clone();
        let suppressor = Arc::clone(host.guard.suppressor());

        match self.boot(&host, notifier, Arc::clone(&suppressor)).await {
            Ok(embedding) => {
                tracing::info!(
                    config = %embedding.params.config_url,
                    minimized = embedding.params.start_minimized,
                    "Widget started"
                );
                Ok(embedding)
            }
            Err(e) => {
                suppressor.handle(&FaultEvent::rejection(e.to_string()));
                Err(e)
            }
        }
    }

    async fn boot(
        &self,
        host: &Host<'_>,
        notifier: ParentNotifier,
        suppressor: Arc<FaultSuppressor>,
    ) -> Result<Embedding> {
        let root = host
            .page
            .find_root(&self.settings.root_selector)
            .ok_or_else(|| CoreError::MissingRoot(self.settings.root_selector.clone()))?;

        let params = LaunchParams::from_url(&host.page.location()?)?;
        root.set_class_name(&self.settings.root_class);

        let config = host.fetcher.fetch(&params.config_url).await?;

        let export_gate = LogExportGate::new(
            Arc::clone(&host.logs),
            Arc::clone(&host.consent),
            Arc::clone(&host.saver),
        )
        .with_development(self.settings.development)
        .with_privacy_policy_url(self.settings.privacy_policy_url.clone());
        let context = EmbedContext::new(notifier, export_gate, suppressor);

        let mut widget = host.widgets.create(WidgetOptions {
            config,
            allows_child,
            start_minimized: params.start_minimized,
            login_token: params.login_token.clone(),
            local_storage_key: params.local_storage_key.clone(),
            development: self.settings.development,
            context: context.clone(),
        })?;
        widget.start()?;
        widget.mount(root.as_ref())?;

        Ok(Embedding {
            context,
            params,
            widget,
            root,
        })
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(ShellSettings::default())
    }
}
