use std::collections::HashMap;

use crate::model::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

impl PointerKind {
    pub fn from_dom(pointer_type: &str) -> Self {
        match pointer_type {
            "touch" => PointerKind::Touch,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Mouse,
        }
    }
}

/// Last known state of one pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub id: i32,
    pub kind: PointerKind,
    /// Stage-centred coordinates.
    pub position: Point,
    /// Went down over the zoomable image surface.
    pub on_image: bool,
}

/// In-flight pointers keyed by pointer id.
#[derive(Clone, Debug, Default)]
pub struct PointerCache {
    pointers: HashMap<i32, PointerSample>,
}

impl PointerCache {
    pub fn insert(&mut self, sample: PointerSample) {
        self.pointers.insert(sample.id, sample);
    }

    /// Move a known pointer; unknown ids are ignored.
    pub fn update(&mut self, id: i32, position: Point) -> Option<PointerSample> {
        let sample = self.pointers.get_mut(&id)?;
        sample.position = position;
        Some(*sample)
    }

    pub fn remove(&mut self, id: i32) -> Option<PointerSample> {
        self.pointers.remove(&id)
    }

    pub fn get(&self, id: i32) -> Option<&PointerSample> {
        self.pointers.get(&id)
    }

    pub fn clear(&mut self) {
        self.pointers.clear();
    }

    /// Both samples of a two-pointer pair, in the given order.
    pub fn pair(&self, a: i32, b: i32) -> Option<(PointerSample, PointerSample)> {
        Some((*self.pointers.get(&a)?, *self.pointers.get(&b)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(id: i32, x: f64, y: f64) -> PointerSample {
        PointerSample {
            id,
            kind: PointerKind::Touch,
            position: Point::new(x, y),
            on_image: true,
        }
    }

    #[test]
    fn update_ignores_unknown_pointers() {
        let mut cache = PointerCache::default();
        cache.insert(touch(1, 0.0, 0.0));
        assert!(cache.update(2, Point::new(5.0, 5.0)).is_none());
        let moved = cache.update(1, Point::new(3.0, 4.0)).unwrap();
        assert_eq!(moved.position, Point::new(3.0, 4.0));
        assert!(cache.get(2).is_none());
    }

    #[test]
    fn pair_requires_both_pointers() {
        let mut cache = PointerCache::default();
        cache.insert(touch(1, 0.0, 0.0));
        assert!(cache.pair(1, 2).is_none());
        cache.insert(touch(2, 10.0, 0.0));
        let (a, b) = cache.pair(1, 2).unwrap();
        assert_eq!(a.position.distance(b.position), 10.0);
        cache.remove(1);
        assert!(cache.pair(1, 2).is_none());
        cache.clear();
        assert!(cache.get(2).is_none());
    }

    #[test]
    fn pointer_kind_from_dom_type() {
        assert_eq!(PointerKind::from_dom("touch"), PointerKind::Touch);
        assert_eq!(PointerKind::from_dom("pen"), PointerKind::Pen);
        assert_eq!(PointerKind::from_dom("mouse"), PointerKind::Mouse);
        assert_eq!(PointerKind::from_dom(""), PointerKind::Mouse);
    }
}
