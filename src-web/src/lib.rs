//! Chatrix - Browser entry point
//!
//! Runs inside the iframe the embedding page creates. Binds the shell's
//! collaborator traits to the DOM and exposes the page globals the widget
//! bundle calls into:
//! - `sendViewChangeToParent(view)`
//! - `sendMinimizeToParent()`
//! - `sendNotificationCount(count)`
//! - `sendError()`
//! - `downloadLogs()`
//!
//! Everything here is compiled for `wasm32-unknown-unknown` only.

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
mod browser;
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
mod globals;
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
mod interceptor;
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
mod widget;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub use entry::start;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
mod entry {
    use std::sync::{Arc, OnceLock};

    use chatrix_core::{
        init_logging, FaultGuard, Host, HttpConfigFetcher, LogCollector, ParentChannel, Shell,
        ShellSettings,
    };
    use wasm_bindgen::prelude::*;
    use web_sys::Window;

    use crate::browser::{BlobSaver, DialogConsent, WebPage, WindowParentChannel};
    use crate::globals;
    use crate::interceptor::WindowInterceptor;
    use crate::widget::SdkWidgetFactory;

    static SHELL: OnceLock<Shell> = OnceLock::new();

    /// Everything up to `spawn_local` runs before the page gets another
    /// turn of the event loop, so no error can slip past the interceptor.
    #[cfg_attr(not(test), wasm_bindgen(start))]
    pub fn start() {
        let shell = SHELL.get_or_init(|| Shell::new(ShellSettings::default()));
        let Some(window) = web_sys::window() else {
            return;
        };

        let channel = WindowParentChannel::detect(&window)
            .map(|channel| Arc::new(channel) as Arc<dyn ParentChannel>);
        let guard = FaultGuard::install(channel, &WindowInterceptor::new(window.clone()));
        let collector = init_logging(shell.settings());

        let guard = match guard {
            Ok(guard) => guard,
            Err(e) => {
                tracing::error!(error = %e, "Failed to install fault handlers, not starting");
                return;
            }
        };
        globals::expose_notifications(&window, guard.notifier().clone());

        wasm_bindgen_futures::spawn_local(run(shell, window, guard, collector));
    }

    async fn run(
        shell: &'static Shell,
        window: Window,
        guard: FaultGuard,
        collector: LogCollector,
    ) {
        let Some(document) = window.document() else {
            tracing::error!("No document, not starting");
            return;
        };

        let page = WebPage::new(window.clone());
        let fetcher = HttpConfigFetcher::new();
        let widgets = SdkWidgetFactory;

        let host = Host {
            guard,
            page: &page,
            fetcher: &fetcher,
            widgets: &widgets,
            logs: Arc::new(collector),
            consent: Arc::new(DialogConsent::new(window.clone())),
            saver: Arc::new(BlobSaver::new(window.clone(), document)),
        };

        match shell.start(host).await {
            Ok(embedding) => {
                globals::expose_log_export(&window, embedding.context.clone());
                globals::keep(embedding);
            }
            Err(e) => tracing::error!(error = %e, "Failed to start widget"),
        }
    }
}
