//! DOM Helpers
//!
//! History API backend for the router, file downloads and clipboard.

use js_sys::{Array, Function, Promise, Reflect};
use shopdesk::router::HistoryBackend;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Router history backed by `window.history`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHistory;

impl HistoryBackend for BrowserHistory {
    fn current_path(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    fn push(&mut self, path: &str) {
        if self.current_path() == path {
            return;
        }
        let pushed = web_sys::window()
            .and_then(|w| w.history().ok())
            .map(|h| h.push_state_with_url(&JsValue::NULL, "", Some(path)));
        if !matches!(pushed, Some(Ok(()))) {
            tracing::warn!(path, "history push failed");
        }
    }
}

/// Offer `content` as a file download
pub fn download(filename: &str, content: &str, mime_type: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob = web_sys::Blob::new_with_str_sequence_and_options(
        &Array::of1(&JsValue::from_str(content)),
        &options,
    )
    .map_err(|_| "failed to create blob")?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|_| "failed to create object URL")?;

    let anchor = document
        .create_element("a")
        .map_err(|_| "failed to create link")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| "unexpected element type")?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    let _ = web_sys::Url::revoke_object_url(&url);
    Ok(())
}

/// `navigator.clipboard.writeText(text)`
pub async fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("no window")?;
    let clipboard = Reflect::get(&window.navigator(), &JsValue::from_str("clipboard"))
        .map_err(|_| "clipboard unavailable")?;
    let write_text = Reflect::get(&clipboard, &JsValue::from_str("writeText"))
        .map_err(|_| "clipboard unavailable")?
        .dyn_into::<Function>()
        .map_err(|_| "clipboard unavailable")?;

    let promise = write_text
        .call1(&clipboard, &JsValue::from_str(text))
        .map_err(|_| "clipboard write rejected")?
        .dyn_into::<Promise>()
        .map_err(|_| "clipboard write rejected")?;
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|_| "clipboard write rejected".to_string())
}

/// Blocking `window.confirm`; `false` when no window is available
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopdesk::router::route_for;
    use shopdesk::{RouteId, Router};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_push_updates_location() {
        let mut history = BrowserHistory;
        history.push("/orders");
        assert_eq!(history.current_path(), "/orders");
        assert_eq!(route_for(&history.current_path()), RouteId::Orders);
    }

    #[wasm_bindgen_test]
    fn test_router_navigation_round_trip() {
        let mut router = Router::new(BrowserHistory);
        router.navigate(RouteId::Customers);
        assert_eq!(router.history().current_path(), "/customers");

        router.navigate(RouteId::Dashboard);
        assert_eq!(router.history().current_path(), "/");
        assert_eq!(router.sync_from_history(), RouteId::Dashboard);
    }
}
