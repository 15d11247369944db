use std::rc::Rc;

use super::{carousel::Carousel, lightbox::Lightbox, thumbnail_grid::ThumbnailGrid};
use crate::dom;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    // Page data is read once; the hosting page owns it.
    let data = use_memo((), |_| {
        let data = dom::page_data_or_default();
        (Rc::new(data.images), Rc::new(data.config))
    });
    let (images, config) = (data.0.clone(), data.1.clone());

    html! {
        <main style="min-height:100vh; background:#0d1117; padding:12px 0;">
            <Lightbox images={images.clone()} config={config.clone()}>
                if config.infinite_loop {
                    <Carousel images={images.clone()} config={config.clone()} />
                }
                <ThumbnailGrid images={images} />
            </Lightbox>
        </main>
    }
}
