use std::cell::RefCell;
use std::rc::Rc;

use gloo::render::{AnimationFrame, request_animation_frame};
use web_sys::{HtmlElement, ScrollBehavior, ScrollToOptions};
use yew::prelude::*;

use super::lazy::{LazyOptions, use_lazy_visibility};
use super::lightbox::GalleryContext;
use crate::config::GalleryConfig;
use crate::model::Image;
use crate::state::{InfiniteCarousel, ScrollCheck, collection_key};
use crate::util::FrameGate;

#[derive(Properties, PartialEq)]
pub struct CarouselProps {
    pub images: Rc<Vec<Image>>,
    pub config: Rc<GalleryConfig>,
}

fn slide_width(viewport: &HtmlElement) -> f64 {
    viewport.client_width() as f64
}

/// Scroll without the smooth behaviour the stylesheet asks for.
fn jump_to(viewport: &HtmlElement, left: f64) {
    let options = ScrollToOptions::new();
    options.set_left(left);
    options.set_behavior(ScrollBehavior::Instant);
    viewport.scroll_to_with_scroll_to_options(&options);
}

/// Samples the scroll offset once per frame from the first scroll event
/// until it comes to rest, then rotates the window if needed.
struct ScrollWatch {
    carousel: Rc<RefCell<InfiniteCarousel>>,
    viewport: NodeRef,
    gate: RefCell<FrameGate>,
    frame: RefCell<Option<AnimationFrame>>,
    force: UseForceUpdateHandle,
}

impl ScrollWatch {
    fn start(self: &Rc<Self>) {
        if self.carousel.borrow().is_recentering() || !self.gate.borrow_mut().request() {
            return;
        }
        self.poll();
    }

    fn poll(self: &Rc<Self>) {
        let watch = Rc::clone(self);
        let handle = request_animation_frame(move |_| {
            watch.frame.borrow_mut().take();
            let Some(el) = watch.viewport.cast::<HtmlElement>() else {
                watch.gate.borrow_mut().clear();
                return;
            };
            let check = watch
                .carousel
                .borrow_mut()
                .observe_scroll(el.scroll_left() as f64, slide_width(&el));
            match check {
                ScrollCheck::Moving => watch.poll(),
                ScrollCheck::Settled(slot) => {
                    watch.gate.borrow_mut().clear();
                    if watch.carousel.borrow_mut().recenter(slot).is_some() {
                        watch.force.force_update();
                    }
                }
                ScrollCheck::Unaligned => watch.gate.borrow_mut().clear(),
            }
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn stop(&self) {
        self.frame.borrow_mut().take();
        self.gate.borrow_mut().clear();
    }
}

#[function_component(Carousel)]
pub fn carousel(props: &CarouselProps) -> Html {
    let len = props.images.len();
    let clones = props.config.carousel_clones;
    let carousel = use_mut_ref(|| InfiniteCarousel::new(len, clones));
    carousel.borrow_mut().set_len(len);
    let viewport = use_node_ref();
    let slot_count = carousel.borrow().slot_count();
    let slot_refs = use_memo(slot_count, |count| {
        (0..*count).map(|_| NodeRef::default()).collect::<Vec<_>>()
    });
    let settle_frame = use_mut_ref(|| None::<AnimationFrame>);
    let force = use_force_update();
    let watch = {
        let carousel = carousel.clone();
        let viewport = viewport.clone();
        let force = force.clone();
        use_memo((), move |_| ScrollWatch {
            carousel,
            viewport,
            gate: RefCell::new(FrameGate::default()),
            frame: RefCell::new(None),
            force,
        })
    };
    {
        let watch = watch.clone();
        let settle_frame = settle_frame.clone();
        use_effect_with((), move |_| {
            move || {
                watch.stop();
                settle_frame.borrow_mut().take();
            }
        });
    }
    let context = use_context::<GalleryContext>();

    let mapping_key = carousel.borrow().mapping_key();
    let collection = *use_memo(props.images.clone(), |images| collection_key(images));
    let visible = use_lazy_visibility(
        viewport.clone(),
        (*slot_refs).clone(),
        mapping_key,
        LazyOptions {
            enabled: props.config.lazy_load,
            margin: props.config.preload_margin.clone(),
            len,
            collection,
        },
    );

    // Start on the centre slot; the window resets whenever the collection size changes.
    {
        let carousel = carousel.clone();
        let viewport = viewport.clone();
        use_effect_with(len, move |_| {
            if let Some(el) = viewport.cast::<HtmlElement>() {
                let offset = carousel.borrow().center_offset(slide_width(&el));
                jump_to(&el, offset);
            }
            || ()
        });
    }

    // After a rotation is rendered, shift the scroll offset back by the same
    // number of slides, then re-enable snapping a frame later.
    {
        let carousel = carousel.clone();
        let viewport = viewport.clone();
        let frame = settle_frame.clone();
        let force = force.clone();
        use_effect_with(mapping_key, move |_| {
            let pending = carousel.borrow().is_recentering();
            if pending {
                let slot = frame.clone();
                let handle = request_animation_frame(move |_| {
                    let compensation = carousel.borrow_mut().take_compensation();
                    if let (Some(shift), Some(el)) = (compensation, viewport.cast::<HtmlElement>()) {
                        let left = el.scroll_left() as f64 + shift as f64 * slide_width(&el);
                        jump_to(&el, left);
                    }
                    let inner_slot = slot.clone();
                    let handle = request_animation_frame(move |_| {
                        inner_slot.borrow_mut().take();
                        carousel.borrow_mut().finish_recenter();
                        force.force_update();
                    });
                    *slot.borrow_mut() = Some(handle);
                });
                *frame.borrow_mut() = Some(handle);
            }
            || ()
        });
    }

    let on_scroll = {
        let watch = watch.clone();
        Callback::from(move |_: Event| watch.start())
    };

    let scroll_by = |slides: f64| {
        let viewport = viewport.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(el) = viewport.cast::<HtmlElement>() {
                el.scroll_by_with_x_and_y(slides * slide_width(&el), 0.0);
            }
        })
    };

    if len == 0 {
        return Html::default();
    }

    let c = carousel.borrow();
    let snap = if c.suppress_snap() {
        "scroll-snap-type:none; scroll-behavior:auto;"
    } else {
        "scroll-snap-type:x mandatory; scroll-behavior:smooth;"
    };
    let viewport_style = format!(
        "display:flex; overflow-x:auto; overflow-y:hidden; scrollbar-width:none; aspect-ratio:16/9; background:#0d1117; border-radius:8px; {}",
        snap
    );
    let images = &props.images;
    let center = c.center_slot();
    let slides = c.slots().into_iter().map(|slot| {
        let image = &images[slot.index];
        let onclick = context.as_ref().map(|ctx| {
            let open = ctx.open.clone();
            let index = slot.index;
            Callback::from(move |_: MouseEvent| open.emit(index))
        });
        let content = if visible.borrow().contains(slot.index) {
            html! { <img src={image.src.clone()} alt={image.alt_text().to_string()} draggable="false"
                style="width:100%; height:100%; object-fit:cover; user-select:none;" /> }
        } else {
            html! { <div class="carousel-placeholder" aria-hidden="true"
                style="width:100%; height:100%; background:#161b22;"></div> }
        };
        html! {
            <div key={slot.virtual_pos} ref={slot_refs.get(slot.slot).cloned().unwrap_or_default()}
                class={classes!("carousel-slide", (slot.slot == center).then_some("is-center"))}
                data-index={slot.index.to_string()} onclick={onclick}
                style="flex:0 0 100%; scroll-snap-align:start; cursor:zoom-in;">
                { content }
            </div>
        }
    });
    let label = c
        .centered_index()
        .map(|i| format!("{} / {}", i + 1, len))
        .unwrap_or_default();

    html! {
        <section class="carousel" style="position:relative; max-width:960px; margin:24px auto;">
            <div ref={viewport.clone()} class="carousel-viewport" style={viewport_style} onscroll={on_scroll}>
                { for slides }
            </div>
            <div style="display:flex; justify-content:center; align-items:center; gap:12px; margin-top:8px; color:#e6edf3;">
                <button aria-label="Previous slide" onclick={scroll_by(-1.0)}> {"‹"} </button>
                <span class="carousel-counter" style="font-size:13px; opacity:0.8;">{ label }</span>
                <button aria-label="Next slide" onclick={scroll_by(1.0)}> {"›"} </button>
            </div>
        </section>
    }
}
