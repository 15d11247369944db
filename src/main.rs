mod components;
mod config;
mod dom;
mod error;
mod model;
mod state;
mod util;

use components::app::App;

fn main() {
    console_error_panic_hook::set_once();
    util::clog("folio-lightbox starting");
    yew::Renderer::<App>::new().render();
}
