//! Window-level fault interception
//!
//! Listeners are added in capture phase so they run before anything else
//! on the page, and they are never removed.

use std::cell::RefCell;
use std::sync::Arc;

use chatrix_core::{
    DiagnosticsError, DiagnosticsResult, FaultEvent, FaultInterceptor, FaultSuppressor,
};
use wasm_bindgen::prelude::*;
use web_sys::{Element, ErrorEvent, Event, PromiseRejectionEvent, Window};

use crate::browser::describe;

thread_local! {
    static PANIC_SUPPRESSOR: RefCell<Option<Arc<FaultSuppressor>>> = const { RefCell::new(None) };
}

pub struct WindowInterceptor {
    window: Window,
}

impl WindowInterceptor {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl FaultInterceptor for WindowInterceptor {
    fn intercept(&self, suppressor: Arc<FaultSuppressor>) -> DiagnosticsResult<()> {
        let handler_suppressor = Arc::clone(&suppressor);
        let handler = Closure::<dyn Fn(Event)>::new(move |event: Event| {
            let disposition = handler_suppressor.handle(&fault_from_event(&event));
            if disposition.stop_propagation {
                event.stop_immediate_propagation();
            }
            if disposition.prevent_default {
                event.prevent_default();
            }
        });

        for event_type in ["error", "unhandledrejection"] {
            self.window
                .add_event_listener_with_callback_and_bool(
                    event_type,
                    handler.as_ref().unchecked_ref(),
                    true,
                )
                .map_err(|e| DiagnosticsError::Install(describe(&e)))?;
        }
        handler.forget();

        PANIC_SUPPRESSOR.with(|slot| *slot.borrow_mut() = Some(suppressor));
        std::panic::set_hook(Box::new(|info| {
            console_error_panic_hook::hook(info);

            let location = info.location().map(|l| l.to_string());
            let event = FaultEvent::from_panic(info.payload(), location);
            PANIC_SUPPRESSOR.with(|slot| {
                if let Some(suppressor) = slot.borrow().as_ref() {
                    suppressor.handle(&event);
                }
            });
        }));

        Ok(())
    }
}

fn fault_from_event(event: &Event) -> FaultEvent {
    let target_tag = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .map(|element| element.tag_name());

    let fault = if let Some(rejection) = event.dyn_ref::<PromiseRejectionEvent>() {
        FaultEvent::rejection(describe(&rejection.reason()))
    } else if let Some(error) = event.dyn_ref::<ErrorEvent>() {
        let fault = FaultEvent::error(error.message());
        let thrown = error.error();
        if thrown.is_undefined() || thrown.is_null() {
            fault
        } else {
            fault.with_detail(describe(&thrown))
        }
    } else {
        // Resource load failures arrive as plain events
        FaultEvent::error(event.type_())
    };

    match target_tag {
        Some(tag) => fault.with_target(tag),
        None => fault,
    }
}
