// Browser-side helpers: page data, scroll lock, pointer capture and measurement.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::config::PageData;
use crate::error::GalleryError;
use crate::model::{Point, Size};
use crate::util::{cwarn, parse_css_duration_ms};

pub const PAGE_DATA_ID: &str = "gallery-data";

/// Read the JSON document the hosting page embeds for the gallery.
pub fn load_page_data() -> Result<PageData, GalleryError> {
    let document = gloo::utils::document();
    let script = document
        .get_element_by_id(PAGE_DATA_ID)
        .ok_or(GalleryError::MissingElement(PAGE_DATA_ID))?;
    let raw = script.text_content().unwrap_or_default();
    PageData::from_json(&raw)
}

/// Page data, or an empty gallery when it is absent or malformed.
pub fn page_data_or_default() -> PageData {
    match load_page_data() {
        Ok(data) => data,
        Err(GalleryError::MissingElement(_)) => PageData::default(),
        Err(err) => {
            cwarn(&format!("gallery data ignored: {}", err));
            PageData::default()
        }
    }
}

/// Keeps the page from scrolling behind the lightbox until dropped.
pub struct BodyScrollLock {
    body: HtmlElement,
    overflow: String,
    touch_action: String,
}

impl BodyScrollLock {
    pub fn acquire() -> Result<Self, GalleryError> {
        let body = gloo::utils::body();
        let style = body.style();
        let overflow = style.get_property_value("overflow")?;
        let touch_action = style.get_property_value("touch-action")?;
        style.set_property("overflow", "hidden")?;
        style.set_property("touch-action", "none")?;
        Ok(Self {
            body,
            overflow,
            touch_action,
        })
    }
}

impl Drop for BodyScrollLock {
    fn drop(&mut self) {
        let style = self.body.style();
        for (name, previous) in [
            ("overflow", &self.overflow),
            ("touch-action", &self.touch_action),
        ] {
            let _ = if previous.is_empty() {
                style.remove_property(name).map(|_| ())
            } else {
                style.set_property(name, previous)
            };
        }
    }
}

pub fn capture_pointer(element: &Element, pointer_id: i32) {
    if let Err(err) = element.set_pointer_capture(pointer_id) {
        cwarn(&format!("pointer capture failed: {:?}", err));
    }
}

/// Best effort; the browser may already have dropped the capture.
pub fn release_pointer(element: &Element, pointer_id: i32) {
    if element.has_pointer_capture(pointer_id) {
        let _ = element.release_pointer_capture(pointer_id);
    }
}

/// Client coordinates relative to the element's centre.
pub fn centered_point(element: &Element, client_x: f64, client_y: f64) -> Point {
    let rect = element.get_bounding_client_rect();
    Point::new(
        client_x - (rect.left() + rect.width() * 0.5),
        client_y - (rect.top() + rect.height() * 0.5),
    )
}

/// Layout size, unaffected by CSS transforms.
pub fn layout_size(element: &Element) -> Size {
    match element.dyn_ref::<HtmlElement>() {
        Some(el) => Size::new(el.offset_width() as f64, el.offset_height() as f64),
        None => Size::new(element.client_width() as f64, element.client_height() as f64),
    }
}

/// Longest computed `transition-duration` of the element.
pub fn transition_duration_ms(element: &Element) -> Option<u32> {
    let style = gloo::utils::window()
        .get_computed_style(element)
        .ok()
        .flatten()?;
    let raw = style.get_property_value("transition-duration").ok()?;
    parse_css_duration_ms(&raw)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn scroll_lock_restores_previous_overflow() {
        let body = gloo::utils::body();
        body.style().set_property("overflow", "auto").unwrap();
        {
            let _lock = BodyScrollLock::acquire().unwrap();
            assert_eq!(body.style().get_property_value("overflow").unwrap(), "hidden");
        }
        assert_eq!(body.style().get_property_value("overflow").unwrap(), "auto");
        assert_eq!(body.style().get_property_value("touch-action").unwrap(), "");
    }

    #[wasm_bindgen_test]
    fn missing_page_data_yields_empty_gallery() {
        if let Some(el) = gloo::utils::document().get_element_by_id(PAGE_DATA_ID) {
            el.remove();
        }
        assert!(page_data_or_default().images.is_empty());
    }
}
