pub mod carousel;
pub mod controller;
pub mod gesture;
pub mod pointers;
pub mod transition;
pub mod visibility;
pub mod zoom;

pub use carousel::{InfiniteCarousel, ScrollCheck};
pub use controller::{Effect, GalleryController};
pub use pointers::{PointerKind, PointerSample};
pub use transition::{CommitKind, Ticket};
pub use visibility::{VisibleSet, collection_key};
