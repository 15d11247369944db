//! Infinite-loop carousel window.
//!
//! The carousel renders `2 * clones + 1` slots. Slot `s` sits at virtual
//! position `base + s` and shows real image `(base + s - clones) mod N`, so the
//! centre slot always shows `base mod N`. When scrolling settles on another
//! slot the window is rotated by moving `base`, and the scroll offset is
//! shifted back by the same number of slide widths on the next frame.
//! Scrolling counts as settled once two consecutive frames report the same
//! offset; smooth and momentum scrolling pass over slot boundaries mid-flight.

use crate::model::wrap_index;

/// Scroll offsets within this many pixels of a slot boundary count as settled.
const SETTLE_TOLERANCE_PX: f64 = 1.0;
/// Frame-to-frame movement below this is treated as stopped.
const REST_TOLERANCE_PX: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollCheck {
    /// Still moving, or only one sample so far.
    Moving,
    Settled(usize),
    /// At rest between slots.
    Unaligned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CarouselSlot {
    pub slot: usize,
    pub virtual_pos: i64,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InfiniteCarousel {
    len: usize,
    clones: usize,
    base: i64,
    suppress_snap: bool,
    /// Slide widths to add to the scroll offset once the rotated slots are in the DOM.
    compensation: Option<i64>,
    last_scroll: Option<f64>,
}

impl InfiniteCarousel {
    pub fn new(len: usize, clones: usize) -> Self {
        Self {
            len,
            clones: clones.max(1),
            base: 0,
            suppress_snap: false,
            compensation: None,
            last_scroll: None,
        }
    }

    pub fn set_len(&mut self, len: usize) {
        if self.len != len {
            self.len = len;
            self.base = 0;
            self.suppress_snap = false;
            self.compensation = None;
            self.last_scroll = None;
        }
    }

    pub fn slot_count(&self) -> usize {
        if self.len == 0 { 0 } else { 2 * self.clones + 1 }
    }

    pub fn center_slot(&self) -> usize {
        self.clones
    }

    pub fn real_index(&self, virtual_pos: i64) -> Option<usize> {
        (self.len > 0).then(|| wrap_index(virtual_pos - self.clones as i64, self.len))
    }

    pub fn centered_index(&self) -> Option<usize> {
        self.real_index(self.base + self.clones as i64)
    }

    pub fn slots(&self) -> Vec<CarouselSlot> {
        (0..self.slot_count())
            .filter_map(|slot| {
                let virtual_pos = self.base + slot as i64;
                self.real_index(virtual_pos).map(|index| CarouselSlot {
                    slot,
                    virtual_pos,
                    index,
                })
            })
            .collect()
    }

    /// Identity of the current slot to image mapping.
    pub fn mapping_key(&self) -> i64 {
        self.base
    }

    pub fn suppress_snap(&self) -> bool {
        self.suppress_snap
    }

    pub fn is_recentering(&self) -> bool {
        self.suppress_snap || self.compensation.is_some()
    }

    /// Scroll offset that puts the centre slot in view.
    pub fn center_offset(&self, slide_width: f64) -> f64 {
        self.clones as f64 * slide_width
    }

    /// The slot the scroll position rests on, if it is aligned to one.
    pub fn settled_slot(&self, scroll_left: f64, slide_width: f64) -> Option<usize> {
        if slide_width <= 0.0 || self.slot_count() == 0 {
            return None;
        }
        let nearest = (scroll_left / slide_width).round();
        if (scroll_left - nearest * slide_width).abs() > SETTLE_TOLERANCE_PX {
            return None;
        }
        Some((nearest.max(0.0) as usize).min(self.slot_count() - 1))
    }

    /// Feed one scroll offset per frame; reports a slot only after the
    /// offset has held still for a frame.
    pub fn observe_scroll(&mut self, scroll_left: f64, slide_width: f64) -> ScrollCheck {
        let previous = self.last_scroll.replace(scroll_left);
        match previous {
            Some(p) if (p - scroll_left).abs() < REST_TOLERANCE_PX => {}
            _ => return ScrollCheck::Moving,
        }
        self.last_scroll = None;
        match self.settled_slot(scroll_left, slide_width) {
            Some(slot) => ScrollCheck::Settled(slot),
            None => ScrollCheck::Unaligned,
        }
    }

    /// Rotate the window so `slot` becomes the centre. Returns the shift applied.
    pub fn recenter(&mut self, slot: usize) -> Option<i64> {
        if self.len == 0 || slot == self.clones || self.is_recentering() {
            return None;
        }
        let shift = slot as i64 - self.clones as i64;
        self.base += shift;
        self.suppress_snap = true;
        self.compensation = Some(-shift);
        self.last_scroll = None;
        Some(shift)
    }

    /// Pending scroll adjustment in slide widths; taken once.
    pub fn take_compensation(&mut self) -> Option<i64> {
        self.compensation.take()
    }

    pub fn finish_recenter(&mut self) {
        self.compensation = None;
        self.suppress_snap = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(c: &InfiniteCarousel) -> Vec<usize> {
        c.slots().iter().map(|s| s.index).collect()
    }

    #[test]
    fn window_wraps_around_centre() {
        let c = InfiniteCarousel::new(5, 2);
        assert_eq!(c.slot_count(), 5);
        assert_eq!(indices(&c), vec![3, 4, 0, 1, 2]);
        assert_eq!(c.centered_index(), Some(0));
    }

    #[test]
    fn small_collections_repeat() {
        let c = InfiniteCarousel::new(1, 2);
        assert_eq!(indices(&c), vec![0, 0, 0, 0, 0]);
        let c = InfiniteCarousel::new(2, 1);
        assert_eq!(indices(&c), vec![1, 0, 1]);
        let c = InfiniteCarousel::new(0, 2);
        assert!(c.slots().is_empty());
        assert_eq!(c.centered_index(), None);
    }

    #[test]
    fn recenter_rotates_and_compensates_once() {
        let mut c = InfiniteCarousel::new(4, 1);
        assert_eq!(c.recenter(1), None);
        assert_eq!(c.recenter(2), Some(1));
        assert_eq!(c.centered_index(), Some(1));
        assert!(c.suppress_snap());
        // no second rotation until the first one settles
        assert_eq!(c.recenter(2), None);
        assert_eq!(c.take_compensation(), Some(-1));
        assert_eq!(c.take_compensation(), None);
        assert!(c.is_recentering());
        c.finish_recenter();
        assert!(!c.suppress_snap());
        assert_eq!(c.recenter(0), Some(-1));
        assert_eq!(c.centered_index(), Some(0));
        assert_eq!(c.take_compensation(), Some(1));
    }

    #[test]
    fn walking_backwards_past_zero_wraps() {
        let mut c = InfiniteCarousel::new(3, 1);
        for expected in [2, 1, 0, 2] {
            c.recenter(0);
            c.finish_recenter();
            assert_eq!(c.centered_index(), Some(expected));
        }
        assert_eq!(c.real_index(-4), Some(1));
    }

    #[test]
    fn settled_slot_requires_alignment() {
        let c = InfiniteCarousel::new(6, 2);
        assert_eq!(c.settled_slot(600.0, 300.0), Some(2));
        assert_eq!(c.settled_slot(600.5, 300.0), Some(2));
        assert_eq!(c.settled_slot(640.0, 300.0), None);
        assert_eq!(c.settled_slot(6000.0, 300.0), Some(4));
        assert_eq!(c.settled_slot(0.0, 0.0), None);
        assert_eq!(c.center_offset(300.0), 600.0);
    }

    #[test]
    fn passing_a_boundary_mid_scroll_does_not_recenter() {
        let mut c = InfiniteCarousel::new(5, 2);
        // a smooth scroll from slot 2 towards slot 0 crosses 0.6px on its way
        assert_eq!(c.observe_scroll(0.6, 300.0), ScrollCheck::Moving);
        assert_eq!(c.observe_scroll(0.0, 300.0), ScrollCheck::Moving);
        assert_eq!(c.mapping_key(), 0);
        // and only counts once it stops there
        assert_eq!(c.observe_scroll(0.0, 300.0), ScrollCheck::Settled(0));
        assert_eq!(c.recenter(0), Some(-2));
        assert_eq!(c.centered_index(), Some(3));
    }

    #[test]
    fn resting_scroll_reports_slot_or_unaligned() {
        let mut c = InfiniteCarousel::new(6, 2);
        assert_eq!(c.observe_scroll(900.0, 300.0), ScrollCheck::Moving);
        assert_eq!(c.observe_scroll(900.2, 300.0), ScrollCheck::Settled(3));
        // a new burst starts over
        assert_eq!(c.observe_scroll(750.0, 300.0), ScrollCheck::Moving);
        assert_eq!(c.observe_scroll(750.0, 300.0), ScrollCheck::Unaligned);
        assert_eq!(c.observe_scroll(600.0, 0.0), ScrollCheck::Moving);
        assert_eq!(c.observe_scroll(600.0, 0.0), ScrollCheck::Unaligned);
    }

    #[test]
    fn changing_len_resets_window() {
        let mut c = InfiniteCarousel::new(4, 1);
        c.recenter(2);
        c.set_len(7);
        assert_eq!(c.mapping_key(), 0);
        assert!(!c.is_recentering());
        assert_eq!(c.centered_index(), Some(0));
    }
}
