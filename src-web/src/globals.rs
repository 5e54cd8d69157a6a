//! Page globals the widget bundle calls into
//!
//! Installed as properties on `window`. The closures are leaked on purpose,
//! they have to live as long as the page.

use std::cell::RefCell;

use chatrix_core::{EmbedContext, Embedding, ParentNotifier, ResizeView};
use wasm_bindgen::closure::WasmClosure;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::browser::describe;

thread_local! {
    static EMBEDDING: RefCell<Option<Embedding>> = const { RefCell::new(None) };
}

/// Keep the running widget alive for the lifetime of the page
pub fn keep(embedding: Embedding) {
    EMBEDDING.with(|slot| *slot.borrow_mut() = Some(embedding));
}

/// Install the `send*` notification globals
pub fn expose_notifications(window: &Window, notifier: ParentNotifier) {
    let view_notifier = notifier.clone();
    let view_change = Closure::<dyn Fn(String)>::new(move |view: String| {
        match view.parse::<ResizeView>() {
            Ok(view) => view_notifier.notify_view_change(view),
            Err(e) => tracing::warn!(view = %view, error = %e, "Ignoring view change"),
        }
    });
    set_global(window, "sendViewChangeToParent", view_change);

    let minimize_notifier = notifier.clone();
    let minimize = Closure::<dyn Fn()>::new(move || minimize_notifier.notify_minimize());
    set_global(window, "sendMinimizeToParent", minimize);

    let count_notifier = notifier.clone();
    let count = Closure::<dyn Fn(f64)>::new(move |count: f64| match unread_count(count) {
        Some(count) => count_notifier.notify_unread_count(count),
        None => tracing::warn!(count, "Ignoring unread count"),
    });
    set_global(window, "sendNotificationCount", count);

    let error = Closure::<dyn Fn()>::new(move || notifier.notify_error());
    set_global(window, "sendError", error);
}

/// Install `downloadLogs()`, which returns a promise settling once the
/// export attempt is over
pub fn expose_log_export(window: &Window, context: EmbedContext) {
    let download = Closure::<dyn Fn() -> js_sys::Promise>::new(move || {
        let context = context.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            if let Some(report) = context.request_log_export().await {
                tracing::debug!(request_id = %report.request_id, "Log export settled");
            }
            Ok(JsValue::UNDEFINED)
        })
    });
    set_global(window, "downloadLogs", download);
}

/// JS numbers only count when they are whole and fit a `u32`
fn unread_count(value: f64) -> Option<u32> {
    let whole = value.is_finite() && value.fract() == 0.0;
    (whole && (0.0..=f64::from(u32::MAX)).contains(&value)).then_some(value as u32)
}

fn set_global<T: ?Sized + WasmClosure>(window: &Window, name: &str, closure: Closure<T>) {
    if let Err(e) = js_sys::Reflect::set(window, &JsValue::from_str(name), closure.as_ref()) {
        tracing::error!(name, error = %describe(&e), "Failed to install page global");
    }
    closure.forget();
}
