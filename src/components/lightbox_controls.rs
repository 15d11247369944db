use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct LightboxControlsProps {
    pub on_prev: Callback<()>,
    pub on_next: Callback<()>,
    pub on_toggle_zoom: Callback<()>,
    pub on_close: Callback<()>,
    pub zoomed: bool,
    pub show_nav: bool,
}

#[function_component(LightboxControls)]
pub fn lightbox_controls(props: &LightboxControlsProps) -> Html {
    let prev = {
        let cb = props.on_prev.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let next = {
        let cb = props.on_next.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let zoom = {
        let cb = props.on_toggle_zoom.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let close = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let button = "background:rgba(22,27,34,0.8); color:#e6edf3; border:1px solid #30363d; border-radius:8px; padding:6px 12px; font-size:18px; cursor:pointer;";
    html! {<>
        <div style="position:absolute; top:12px; right:12px; display:flex; gap:6px; z-index:2;">
            <button style={button} aria-label={if props.zoomed { "Zoom out" } else { "Zoom in" }} onclick={zoom}>
                { if props.zoomed { "−" } else { "+" } }
            </button>
            <button style={button} aria-label="Close" onclick={close}> {"✕"} </button>
        </div>
        if props.show_nav {
            <button style={format!("{} position:absolute; left:12px; top:50%; transform:translateY(-50%); z-index:2;", button)}
                aria-label="Previous image" onclick={prev}> {"‹"} </button>
            <button style={format!("{} position:absolute; right:12px; top:50%; transform:translateY(-50%); z-index:2;", button)}
                aria-label="Next image" onclick={next}> {"›"} </button>
        }
    </>}
}
