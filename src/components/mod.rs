pub mod app;
pub mod carousel;
pub mod lazy;
pub mod lightbox;
pub mod lightbox_controls;
pub mod thumbnail_grid;
