use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, Node, PointerEvent, TransitionEvent};
use yew::prelude::*;

use super::lazy::{LazyOptions, use_lazy_visibility};
use super::lightbox_controls::LightboxControls;
use crate::config::GalleryConfig;
use crate::dom::{self, BodyScrollLock};
use crate::model::{Image, SwipeDirection, wrap_index};
use crate::state::{
    CommitKind, Effect, GalleryController, PointerKind, PointerSample, Ticket, collection_key,
};
use crate::util::{FrameGate, clog, cwarn};

/// Handed to everything rendered inside the lightbox so it can open it.
#[derive(Clone, PartialEq)]
pub struct GalleryContext {
    pub open: Callback<usize>,
}

#[derive(Properties, PartialEq)]
pub struct LightboxProps {
    pub images: Rc<Vec<Image>>,
    pub config: Rc<GalleryConfig>,
    #[prop_or_default]
    pub children: Html,
}

/// Slide offsets around the current image, left to right.
const SLIDE_OFFSETS: [i64; 3] = [-1, 0, 1];

/// Browser half of the lightbox. Carries out controller effects and batches
/// renders to one per animation frame.
struct Shell {
    controller: RefCell<GalleryController>,
    scroll_lock: RefCell<Option<BodyScrollLock>>,
    commit_timer: RefCell<Option<(Ticket, Timeout)>>,
    gate: RefCell<FrameGate>,
    frame: RefCell<Option<AnimationFrame>>,
    open_frame: RefCell<Option<AnimationFrame>>,
    measure_pending: Cell<bool>,
    rerender: RefCell<Option<UseForceUpdateHandle>>,
    stage: NodeRef,
    track: NodeRef,
    backdrop: NodeRef,
    image: NodeRef,
    slides: [NodeRef; 3],
}

impl Shell {
    fn new(config: GalleryConfig, len: usize) -> Self {
        Self {
            controller: RefCell::new(GalleryController::new(config, len)),
            scroll_lock: RefCell::new(None),
            commit_timer: RefCell::new(None),
            gate: RefCell::new(FrameGate::default()),
            frame: RefCell::new(None),
            open_frame: RefCell::new(None),
            measure_pending: Cell::new(false),
            rerender: RefCell::new(None),
            stage: NodeRef::default(),
            track: NodeRef::default(),
            backdrop: NodeRef::default(),
            image: NodeRef::default(),
            slides: Default::default(),
        }
    }

    fn run(self: &Rc<Self>, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LockScroll => {
                    let mut lock = self.scroll_lock.borrow_mut();
                    if lock.is_none() {
                        match BodyScrollLock::acquire() {
                            Ok(acquired) => *lock = Some(acquired),
                            Err(err) => cwarn(&format!("scroll lock failed: {}", err)),
                        }
                    }
                }
                Effect::UnlockScroll => {
                    self.scroll_lock.borrow_mut().take();
                }
                Effect::CapturePointer(id) => {
                    if let Some(stage) = self.stage.cast::<Element>() {
                        dom::capture_pointer(&stage, id);
                    }
                }
                Effect::ReleasePointer(id) => {
                    if let Some(stage) = self.stage.cast::<Element>() {
                        dom::release_pointer(&stage, id);
                    }
                }
                Effect::ScheduleCommit { ticket, after_ms } => {
                    let shell = Rc::clone(self);
                    let timeout = Timeout::new(after_ms, move || {
                        let fx = shell.controller.borrow_mut().complete(ticket);
                        shell.run(fx);
                        shell.request_frame();
                    });
                    // replacing an older timer cancels it
                    *self.commit_timer.borrow_mut() = Some((ticket, timeout));
                }
                Effect::CancelCommit(ticket) => {
                    let mut timer = self.commit_timer.borrow_mut();
                    if timer.as_ref().is_some_and(|(pending, _)| *pending == ticket) {
                        timer.take();
                    }
                }
            }
        }
    }

    /// Queue a measurement and/or render for the next frame; coalesces.
    fn request_frame(self: &Rc<Self>) {
        if !self.gate.borrow_mut().request() {
            return;
        }
        let shell = Rc::clone(self);
        let handle = request_animation_frame(move |_| {
            shell.gate.borrow_mut().clear();
            shell.frame.borrow_mut().take();
            if shell.measure_pending.replace(false) {
                shell.measure();
            }
            if let Some(rerender) = shell.rerender.borrow().as_ref() {
                rerender.force_update();
            }
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    /// The start pose is in the DOM; release it on the next frame so the
    /// entry transition has a committed style to animate from.
    fn play_opening(self: &Rc<Self>) {
        // reading layout flushes the start pose into computed style
        self.measure();
        let shell = Rc::clone(self);
        let handle = request_animation_frame(move |_| {
            shell.open_frame.borrow_mut().take();
            if shell.controller.borrow_mut().finish_opening() {
                shell.request_frame();
            }
        });
        *self.open_frame.borrow_mut() = Some(handle);
    }

    fn remeasure(self: &Rc<Self>) {
        self.measure_pending.set(true);
        self.request_frame();
    }

    fn measure(&self) {
        let Some(stage) = self.stage.cast::<Element>() else {
            return;
        };
        let viewport = dom::layout_size(&stage);
        let content = self
            .image
            .cast::<Element>()
            .map(|image| dom::layout_size(&image))
            .unwrap_or_default();
        self.controller.borrow_mut().set_geometry(viewport, content);
    }

    fn read_durations(&self) {
        let swipe = self
            .track
            .cast::<Element>()
            .and_then(|el| dom::transition_duration_ms(&el));
        let close = self
            .backdrop
            .cast::<Element>()
            .and_then(|el| dom::transition_duration_ms(&el));
        self.controller.borrow_mut().set_durations(swipe, close);
    }

    fn sample(&self, e: &PointerEvent) -> Option<PointerSample> {
        let stage = self.stage.cast::<Element>()?;
        let target = e.target().and_then(|t| t.dyn_into::<Node>().ok());
        let on_image = match (self.image.cast::<Node>(), target) {
            (Some(image), Some(target)) => image.contains(Some(&target)),
            _ => false,
        };
        Some(PointerSample {
            id: e.pointer_id(),
            kind: PointerKind::from_dom(&e.pointer_type()),
            position: dom::centered_point(&stage, e.client_x() as f64, e.client_y() as f64),
            on_image,
        })
    }

    /// Run a controller operation and schedule the resulting render.
    fn dispatch(self: &Rc<Self>, op: impl FnOnce(&mut GalleryController) -> Vec<Effect>) {
        let fx = op(&mut self.controller.borrow_mut());
        self.run(fx);
        self.request_frame();
    }

    fn shutdown(self: &Rc<Self>) {
        let fx = self.controller.borrow_mut().dispose();
        self.run(fx);
        self.commit_timer.borrow_mut().take();
        self.frame.borrow_mut().take();
        self.open_frame.borrow_mut().take();
        self.gate.borrow_mut().clear();
        self.rerender.borrow_mut().take();
    }
}

#[function_component(Lightbox)]
pub fn lightbox(props: &LightboxProps) -> Html {
    let shell = {
        let config = props.config.clone();
        let len = props.images.len();
        use_memo((), move |_| Shell::new(config.as_ref().clone(), len))
    };
    let force = use_force_update();
    *shell.rerender.borrow_mut() = Some(force);

    // Collection changes may clamp the current index or close the lightbox.
    {
        let shell = shell.clone();
        use_effect_with(props.images.len(), move |len| {
            let len = *len;
            if shell.controller.borrow().len() != len {
                shell.dispatch(|c| c.set_len(len));
            }
            || ()
        });
    }

    // Window listeners: keyboard contract and viewport resizes.
    {
        let shell = shell.clone();
        use_effect_with((), move |_| {
            let window = gloo::utils::window();
            let keydown_cb = {
                let shell = shell.clone();
                Closure::wrap(Box::new(move |e: web_sys::KeyboardEvent| {
                    let handled = shell.controller.borrow_mut().handle_key(&e.key());
                    if let Some(fx) = handled {
                        e.prevent_default();
                        shell.run(fx);
                        shell.request_frame();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("keydown", keydown_cb.as_ref().unchecked_ref())
                .ok();
            let resize_cb = {
                let shell = shell.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    if shell.controller.borrow().is_open() {
                        shell.remeasure();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
                .ok();
            move || {
                let _ = window.remove_event_listener_with_callback(
                    "keydown",
                    keydown_cb.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "resize",
                    resize_cb.as_ref().unchecked_ref(),
                );
                shell.shutdown();
            }
        });
    }

    let state = shell.controller.borrow().state();

    // Re-read transition timing and geometry whenever a new image is shown.
    {
        let shell = shell.clone();
        use_effect_with((state.is_open, state.current), move |(open, current)| {
            if *open {
                clog(&format!("lightbox showing {:?}", current));
                shell.read_durations();
                shell.remeasure();
            }
            || ()
        });
    }

    {
        let shell = shell.clone();
        use_effect_with(state.is_opening, move |opening| {
            if *opening {
                shell.play_opening();
            }
            || ()
        });
    }

    let collection = *use_memo(props.images.clone(), |images| collection_key(images));
    let visible = use_lazy_visibility(
        shell.stage.clone(),
        shell.slides.to_vec(),
        state.current.map_or(-1, |c| c as i64),
        LazyOptions {
            enabled: props.config.lazy_load,
            margin: props.config.preload_margin.clone(),
            len: props.images.len(),
            collection,
        },
    );

    let open = {
        let shell = shell.clone();
        use_callback((), move |index: usize, _| shell.dispatch(|c| c.open_at(index)))
    };
    let context = GalleryContext { open };
    let children = props.children.clone();
    let wrap = move |overlay: Html| {
        html! {
            <ContextProvider<GalleryContext> context={context}>
                { children }
                { overlay }
            </ContextProvider<GalleryContext>>
        }
    };

    let images = &props.images;
    let (true, Some(current)) = (state.is_open, state.current) else {
        return wrap(Html::default());
    };
    if current >= images.len() {
        return wrap(Html::default());
    }
    // the image in view never waits for the observer
    visible.borrow_mut().mark(current);

    let (swipe_ms, close_ms) = {
        let controller = shell.controller.borrow();
        (controller.config().swipe_ms, controller.config().close_ms)
    };
    let len = shell.controller.borrow().len();

    let on_pointer_down = {
        let shell = shell.clone();
        Callback::from(move |e: PointerEvent| {
            if e.pointer_type() == "mouse" && e.button() != 0 {
                return;
            }
            let Some(sample) = shell.sample(&e) else {
                return;
            };
            let fx = shell.controller.borrow_mut().pointer_down(sample);
            if fx.is_empty() {
                return;
            }
            e.prevent_default();
            shell.run(fx);
            shell.request_frame();
        })
    };
    let on_pointer_move = {
        let shell = shell.clone();
        Callback::from(move |e: PointerEvent| {
            let Some(stage) = shell.stage.cast::<Element>() else {
                return;
            };
            let position = dom::centered_point(&stage, e.client_x() as f64, e.client_y() as f64);
            if shell.controller.borrow_mut().pointer_move(e.pointer_id(), position) {
                shell.request_frame();
            }
        })
    };
    let on_pointer_up = {
        let shell = shell.clone();
        Callback::from(move |e: PointerEvent| shell.dispatch(|c| c.pointer_up(e.pointer_id())))
    };
    let on_pointer_cancel = {
        let shell = shell.clone();
        Callback::from(move |e: PointerEvent| shell.dispatch(|c| c.pointer_cancel(e.pointer_id())))
    };
    // Capture can be lost without a pointerup reaching the stage.
    let on_lost_capture = {
        let shell = shell.clone();
        Callback::from(move |e: PointerEvent| shell.dispatch(|c| c.pointer_cancel(e.pointer_id())))
    };
    let transition_end = |kind: CommitKind, property: &'static str| {
        let shell = shell.clone();
        Callback::from(move |e: TransitionEvent| {
            if e.target() != e.current_target() || e.property_name() != property {
                return;
            }
            shell.dispatch(|c| c.complete_signal(kind));
        })
    };
    let on_track_end = transition_end(CommitKind::Track, "transform");
    let on_backdrop_end = transition_end(CommitKind::Backdrop, "opacity");
    let on_image_load = {
        let shell = shell.clone();
        Callback::from(move |_: Event| shell.remeasure())
    };
    let on_prev = {
        let shell = shell.clone();
        Callback::from(move |_| shell.dispatch(|c| c.show_prev()))
    };
    let on_next = {
        let shell = shell.clone();
        Callback::from(move |_| shell.dispatch(|c| c.show_next()))
    };
    let on_toggle_zoom = {
        let shell = shell.clone();
        Callback::from(move |_| shell.dispatch(|c| c.toggle_zoom()))
    };
    let on_close = {
        let shell = shell.clone();
        Callback::from(move |_| shell.dispatch(|c| c.close()))
    };

    let no_transition = if state.animate { "" } else { " transition:none;" };
    let slot_shift = match state.swipe {
        Some(SwipeDirection::Next) => -200.0,
        Some(SwipeDirection::Prev) => 0.0,
        None => -100.0,
    };
    let track_style = format!(
        "display:flex; width:100%; height:100%; transform:translate3d(calc({}% + {}px), {}px, 0); transition:transform {}ms ease-out;{}",
        slot_shift, state.drag.x, state.drag.y, swipe_ms, no_transition
    );
    let backdrop_opacity = if state.is_closing || state.is_opening {
        0.0
    } else {
        state.backdrop_opacity
    };
    let backdrop_style = format!(
        "position:absolute; inset:0; background:#000; opacity:{}; transition:opacity {}ms ease;{}",
        backdrop_opacity, close_ms, no_transition
    );
    let stage_style = format!(
        "position:absolute; inset:0; overflow:hidden; touch-action:none; transition:opacity {ms}ms ease, transform {ms}ms ease;{}",
        if state.is_closing {
            " opacity:0; transform:scale(0.96); pointer-events:none;"
        } else if state.is_opening {
            " opacity:0; transform:scale(0.96);"
        } else {
            ""
        },
        ms = close_ms
    );
    let image_style = format!(
        "max-width:100%; max-height:100%; object-fit:contain; user-select:none; -webkit-user-drag:none; transform:translate3d({}px, {}px, 0) scale({}); transition:transform {}ms ease-out;{}",
        state.pan.x, state.pan.y, state.zoom, swipe_ms, no_transition
    );

    let slides = SLIDE_OFFSETS.iter().enumerate().map(|(slot, offset)| {
        let index = wrap_index(current as i64 + offset, len);
        let image = &images[index];
        let is_current = *offset == 0;
        let content = if visible.borrow().contains(index) {
            if is_current {
                html! {
                    <img ref={shell.image.clone()} src={image.src.clone()} alt={image.alt_text().to_string()}
                        style={image_style.clone()} draggable="false" onload={on_image_load.clone()} />
                }
            } else {
                html! {
                    <img src={image.src.clone()} alt={image.alt_text().to_string()} draggable="false"
                        style="max-width:100%; max-height:100%; object-fit:contain; user-select:none;" />
                }
            }
        } else {
            html! { <div class="lightbox-placeholder" aria-hidden="true"
                style="width:48px; height:48px; border-radius:50%; border:3px solid #30363d;"></div> }
        };
        html! {
            <div key={slot} ref={shell.slides[slot].clone()} class="lightbox-slide"
                data-index={index.to_string()} aria-hidden={(!is_current).to_string()}
                style="flex:0 0 100%; display:flex; align-items:center; justify-content:center;">
                { content }
            </div>
        }
    });

    let caption = images[current].alt_text().to_string();
    wrap(html! {
        <div class="lightbox" role="dialog" aria-modal="true"
            style="position:fixed; inset:0; z-index:1000; color:#e6edf3; font-family:sans-serif;">
            <div ref={shell.backdrop.clone()} class="lightbox-backdrop" style={backdrop_style}
                ontransitionend={on_backdrop_end}></div>
            <div ref={shell.stage.clone()} class="lightbox-stage" style={stage_style}
                onpointerdown={on_pointer_down} onpointermove={on_pointer_move}
                onpointerup={on_pointer_up} onpointercancel={on_pointer_cancel}
                onlostpointercapture={on_lost_capture}>
                <div ref={shell.track.clone()} class="lightbox-track" style={track_style}
                    ontransitionend={on_track_end}>
                    { for slides }
                </div>
            </div>
            if !state.is_closing {
                <LightboxControls on_prev={on_prev} on_next={on_next} on_toggle_zoom={on_toggle_zoom}
                    on_close={on_close} zoomed={state.zoom > 1.0} show_nav={len > 1} />
            }
            <div style="position:absolute; left:0; right:0; bottom:12px; text-align:center; pointer-events:none; z-index:2;">
                if !caption.is_empty() {
                    <div>{ caption }</div>
                }
                <div style="opacity:0.7; font-size:13px;">{ format!("{} / {}", current + 1, len) }</div>
            </div>
        </div>
    })
}
