use std::rc::Rc;

use yew::prelude::*;

use super::lightbox::GalleryContext;
use crate::model::Image;

#[derive(Properties, PartialEq)]
pub struct ThumbnailGridProps {
    pub images: Rc<Vec<Image>>,
}

#[function_component(ThumbnailGrid)]
pub fn thumbnail_grid(props: &ThumbnailGridProps) -> Html {
    let context = use_context::<GalleryContext>();
    if props.images.is_empty() {
        return html! {<p class="gallery-empty" style="color:#8b949e; text-align:center;">{"No images"}</p>};
    }
    let items = props.images.iter().enumerate().map(|(index, image)| {
        let onclick = context.as_ref().map(|ctx| {
            let open = ctx.open.clone();
            Callback::from(move |_: MouseEvent| open.emit(index))
        });
        html! {
            <button key={index} class="gallery-thumb" aria-label={format!("Open image {}", index + 1)} onclick={onclick}
                style="padding:0; border:1px solid #30363d; border-radius:6px; overflow:hidden; background:#161b22; cursor:zoom-in; aspect-ratio:1/1;">
                <img src={image.src.clone()} alt={image.alt_text().to_string()} loading="lazy" draggable="false"
                    style="width:100%; height:100%; object-fit:cover; display:block;" />
            </button>
        }
    });
    html! {
        <div class="gallery-grid"
            style="display:grid; grid-template-columns:repeat(auto-fill, minmax(140px, 1fr)); gap:8px; max-width:960px; margin:24px auto; padding:0 12px;">
            { for items }
        </div>
    }
}
