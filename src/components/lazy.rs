use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry};
use yew::prelude::*;

use crate::error::GalleryError;
use crate::state::VisibleSet;
use crate::util::cwarn;

/// Slides carry their real image index in this attribute.
pub const INDEX_ATTR: &str = "data-index";

#[derive(Clone, Debug, PartialEq)]
pub struct LazyOptions {
    pub enabled: bool,
    /// `rootMargin` around the viewport.
    pub margin: String,
    pub len: usize,
    pub collection: u64,
}

/// Tracks which slides have come near `root`. The observer is rebuilt whenever
/// `mapping_key` changes, i.e. whenever slide elements map to different images.
#[hook]
pub fn use_lazy_visibility(
    root: NodeRef,
    targets: Vec<NodeRef>,
    mapping_key: i64,
    options: LazyOptions,
) -> Rc<RefCell<VisibleSet>> {
    let visible = use_mut_ref(|| VisibleSet::new(options.collection));
    let force = use_force_update();
    {
        let mut set = visible.borrow_mut();
        set.reset_for(options.collection);
        if !options.enabled {
            set.mark_all(options.len);
        }
    }
    {
        let visible = visible.clone();
        use_effect_with((mapping_key, options), move |(_, options)| {
            let observer = if options.enabled {
                root.cast::<Element>()
                    .and_then(|root| match observe(&root, &targets, &options.margin, visible, force) {
                        Ok(parts) => Some(parts),
                        Err(err) => {
                            cwarn(&format!("visibility observer unavailable: {}", err));
                            None
                        }
                    })
            } else {
                None
            };
            move || {
                if let Some((observer, _callback)) = observer {
                    observer.disconnect();
                }
            }
        });
    }
    visible
}

fn observe(
    root: &Element,
    targets: &[NodeRef],
    margin: &str,
    visible: Rc<RefCell<VisibleSet>>,
    force: UseForceUpdateHandle,
) -> Result<(IntersectionObserver, Closure<dyn FnMut(js_sys::Array)>), GalleryError> {
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array| {
        let mut changed = false;
        for entry in entries.iter() {
            let entry: IntersectionObserverEntry = entry.unchecked_into();
            if !entry.is_intersecting() {
                continue;
            }
            let index = entry
                .target()
                .get_attribute(INDEX_ATTR)
                .and_then(|v| v.parse::<usize>().ok());
            if let Some(index) = index {
                changed |= visible.borrow_mut().mark(index);
            }
        }
        if changed {
            force.force_update();
        }
    }) as Box<dyn FnMut(js_sys::Array)>);

    let init = js_sys::Object::new();
    js_sys::Reflect::set(&init, &JsValue::from_str("root"), root)?;
    js_sys::Reflect::set(
        &init,
        &JsValue::from_str("rootMargin"),
        &JsValue::from_str(margin),
    )?;
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), init.unchecked_ref())?;
    for target in targets {
        if let Some(el) = target.cast::<Element>() {
            observer.observe(&el);
        }
    }
    Ok((observer, callback))
}
