//! Binding to the chat widget bundle
//!
//! The bundle is loaded ahead of this module and publishes
//! `chatrixSdk.createWidget(options)`. The returned object exposes
//! `start()` and `mount()`, the latter yielding the node to attach under
//! the root element.

use chatrix_core::{
    AdmissionPolicy, CoreError, NavigationState, Position, RootElement, Widget, WidgetFactory,
    WidgetOptions,
};
use wasm_bindgen::prelude::*;

use crate::browser::{describe, DomRoot};

#[wasm_bindgen]
extern "C" {
    type SdkWidget;

    #[wasm_bindgen(js_namespace = chatrixSdk, js_name = createWidget, catch)]
    fn create_widget(options: &js_sys::Object) -> Result<SdkWidget, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn start(this: &SdkWidget) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn mount(this: &SdkWidget) -> Result<web_sys::Node, JsValue>;
}

pub struct SdkWidgetFactory;

impl WidgetFactory for SdkWidgetFactory {
    fn create(&self, options: WidgetOptions) -> chatrix_core::Result<Box<dyn Widget>> {
        let policy = options.allows_child;
        let admission = Closure::<dyn Fn(JsValue, JsValue) -> bool>::new(
            move |parent: JsValue, child: JsValue| admit(policy, &parent, &child),
        );

        let object = js_sys::Object::new();
        let config = js_sys::JSON::parse(&serde_json::to_string(&options.config)?)
            .map_err(|e| CoreError::Widget(describe(&e)))?;
        set(&object, "config", &config)?;
        set(&object, "allowsChild", admission.as_ref())?;
        set(&object, "startMinimized", &options.start_minimized.into())?;
        set(&object, "loginToken", &optional(options.login_token))?;
        set(&object, "localStorageKey", &optional(options.local_storage_key))?;
        set(&object, "development", &options.development.into())?;

        let inner = create_widget(&object).map_err(|e| CoreError::Widget(describe(&e)))?;
        tracing::debug!("Widget created");

        Ok(Box::new(JsWidget {
            inner,
            _admission: admission,
        }))
    }
}

struct JsWidget {
    inner: SdkWidget,
    // Called by the widget router for every navigation
    _admission: Closure<dyn Fn(JsValue, JsValue) -> bool>,
}

impl Widget for JsWidget {
    fn start(&mut self) -> chatrix_core::Result<()> {
        self.inner
            .start()
            .map_err(|e| CoreError::Widget(describe(&e)))
    }

    fn mount(&mut self, root: &dyn RootElement) -> chatrix_core::Result<()> {
        let root = root
            .as_any()
            .downcast_ref::<DomRoot>()
            .ok_or_else(|| CoreError::Widget("root is not a DOM element".to_string()))?;

        let node = self
            .inner
            .mount()
            .map_err(|e| CoreError::Widget(describe(&e)))?;
        root.element()
            .append_child(&node)
            .map_err(|e| CoreError::Widget(describe(&e)))?;
        Ok(())
    }
}

/// Apply the admission policy to the router's `{ type, parent }` segments.
/// Anything that does not parse as a known view is refused.
fn admit(policy: AdmissionPolicy, parent: &JsValue, child: &JsValue) -> bool {
    let Some(child) = segment(child) else {
        return false;
    };
    if parent.is_undefined() || parent.is_null() {
        return policy(Position::Root, &child);
    }
    match segment(parent) {
        Some(parent) => policy(Position::Under(&parent), &child),
        None => false,
    }
}

fn segment(value: &JsValue) -> Option<NavigationState> {
    let kind = js_sys::Reflect::get(value, &JsValue::from_str("type"))
        .ok()?
        .as_string()?;
    NavigationState::parse(&kind).ok()
}

fn optional(value: Option<String>) -> JsValue {
    value.map(JsValue::from).unwrap_or(JsValue::NULL)
}

fn set(object: &js_sys::Object, key: &str, value: &JsValue) -> chatrix_core::Result<()> {
    js_sys::Reflect::set(object, &JsValue::from_str(key), value)
        .map(drop)
        .map_err(|e| CoreError::Widget(describe(&e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrix_core::allows_child;
    use wasm_bindgen_test::wasm_bindgen_test;

    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

    fn segment_of(kind: &str) -> JsValue {
        let object = js_sys::Object::new();
        js_sys::Reflect::set(&object, &JsValue::from_str("type"), &JsValue::from_str(kind))
            .unwrap();
        object.into()
    }

    #[wasm_bindgen_test]
    fn test_top_level_segments() {
        assert!(admit(allows_child, &JsValue::UNDEFINED, &segment_of("login")));
        assert!(admit(allows_child, &JsValue::NULL, &segment_of("timeline")));
        assert!(!admit(allows_child, &JsValue::NULL, &segment_of("room")));
    }

    #[wasm_bindgen_test]
    fn test_malformed_child_is_denied() {
        assert!(!admit(allows_child, &JsValue::NULL, &segment_of("dashboard")));
        assert!(!admit(allows_child, &JsValue::NULL, &js_sys::Object::new().into()));
        assert!(!admit(allows_child, &JsValue::NULL, &JsValue::from_f64(3.0)));
        assert!(!admit(allows_child, &JsValue::NULL, &JsValue::UNDEFINED));
    }

    #[wasm_bindgen_test]
    fn test_nested_and_malformed_parents_are_denied() {
        assert!(!admit(allows_child, &segment_of("start"), &segment_of("login")));
        assert!(!admit(allows_child, &JsValue::from_str("start"), &segment_of("login")));
        assert!(!admit(allows_child, &segment_of("dashboard"), &segment_of("login")));
    }
}
