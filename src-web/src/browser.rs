//! DOM-backed implementations of the shell's collaborator traits

use std::any::Any;

use chatrix_core::{
    BridgeError, ConsentProvider, CoreError, DiagnosticsError, FileSaver, HostPage, ParentChannel,
    ParentMessage, RootElement,
};
use url::Url;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, Element, HtmlAnchorElement, Window};

/// Render a thrown JS value for logs and error messages
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.to_string());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// `postMessage` to the window embedding this one
pub struct WindowParentChannel {
    parent: Window,
}

impl WindowParentChannel {
    /// `None` unless the page runs inside another frame. A top-level
    /// window is its own parent.
    pub fn detect(window: &Window) -> Option<Self> {
        let parent = window.parent().ok().flatten()?;
        if js_sys::Object::is(parent.as_ref(), window.as_ref()) {
            return None;
        }
        Some(Self { parent })
    }
}

impl ParentChannel for WindowParentChannel {
    fn post_message(
        &self,
        message: &ParentMessage,
        target_origin: &str,
    ) -> chatrix_core::BridgeResult<()> {
        let payload = js_sys::JSON::parse(&message.to_json()?)
            .map_err(|e| BridgeError::Post(describe(&e)))?;

        self.parent
            .post_message(&payload, target_origin)
            .map_err(|e| BridgeError::Post(describe(&e)))
    }
}

pub struct WebPage {
    window: Window,
}

impl WebPage {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl HostPage for WebPage {
    fn location(&self) -> chatrix_core::Result<Url> {
        let href = self
            .window
            .location()
            .href()
            .map_err(|e| CoreError::Host(describe(&e)))?;
        Ok(Url::parse(&href)?)
    }

    fn find_root(&self, selector: &str) -> Option<Box<dyn RootElement>> {
        let element = self.window.document()?.query_selector(selector).ok()??;
        Some(Box::new(DomRoot { element }))
    }
}

pub struct DomRoot {
    element: Element,
}

impl DomRoot {
    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl RootElement for DomRoot {
    fn set_class_name(&self, class_name: &str) {
        self.element.set_class_name(class_name);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Blocking `window.confirm()` dialog
pub struct DialogConsent {
    window: Window,
}

impl DialogConsent {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl ConsentProvider for DialogConsent {
    fn confirm(&self, prompt: &str) -> bool {
        // Dialogs can be blocked (sandboxed iframes); treat that as a no
        self.window.confirm_with_message(prompt).unwrap_or(false)
    }
}

// Revoking right after the click can cancel the download in some browsers
const REVOKE_DELAY_MS: i32 = 40_000;

/// Offers the file through a temporary object URL and a clicked anchor
pub struct BlobSaver {
    window: Window,
    document: Document,
}

impl BlobSaver {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    /// Returns the object URL, which stays valid until the revoke timer fires
    fn save(&self, contents: &[u8], mime_type: &str, file_name: &str) -> Result<String, JsValue> {
        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(contents));
        let options = BlobPropertyBag::new();
        options.set_type(mime_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

        let object_url = web_sys::Url::create_object_url_with_blob(&blob)?;
        let anchor: HtmlAnchorElement = self.document.create_element("a")?.dyn_into()?;
        anchor.set_href(&object_url);
        anchor.set_download(file_name);
        anchor.click();

        let revoke_url = object_url.clone();
        let revoke = Closure::once_into_js(move || {
            if let Err(e) = web_sys::Url::revoke_object_url(&revoke_url) {
                tracing::warn!(error = %describe(&e), "Failed to revoke object URL");
            }
        });
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                revoke.unchecked_ref(),
                REVOKE_DELAY_MS,
            )?;

        Ok(object_url)
    }
}

impl FileSaver for BlobSaver {
    fn save_file_as(
        &self,
        contents: Vec<u8>,
        mime_type: &str,
        file_name: &str,
    ) -> chatrix_core::DiagnosticsResult<()> {
        self.save(&contents, mime_type, file_name)
            .map_err(|e| DiagnosticsError::Save(describe(&e)))?;

        tracing::info!(file_name, "Offered file for download");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::wasm_bindgen_test;

    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn test_object_url_outlives_the_click() {
        let window = web_sys::window().unwrap();
        let saver = BlobSaver::new(window.clone(), window.document().unwrap());

        let object_url = saver
            .save(br#"{"items":[]}"#, "application/json", "chatterbox-logs.json")
            .unwrap();

        // Still readable once the click has been dispatched
        let response = JsFuture::from(window.fetch_with_str(&object_url)).await;
        assert!(response.is_ok());
    }
}
