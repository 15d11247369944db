//! Lightbox controller.
//!
//! Owns open/closed state, the current index, the gesture session, zoom and
//! pending transition commits. It never touches the DOM: every operation
//! returns the side effects the component has to carry out.

use crate::config::GalleryConfig;
use crate::model::{GalleryState, Point, Size, SwipeDirection, wrap_index};
use crate::state::gesture::{Axis, GestureOptions, GestureOutcome, GestureRecognizer, GestureUpdate};
use crate::state::pointers::PointerSample;
use crate::state::transition::{Commit, CommitKind, Ticket, TransitionCoordinator};
use crate::state::zoom::ZoomEngine;

/// Extra time given to `transitionend` before the fallback timer commits.
const COMMIT_GRACE_MS: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    LockScroll,
    UnlockScroll,
    CapturePointer(i32),
    ReleasePointer(i32),
    ScheduleCommit { ticket: Ticket, after_ms: u32 },
    CancelCommit(Ticket),
}

#[derive(Clone, Debug)]
pub struct GalleryController {
    config: GalleryConfig,
    len: usize,
    is_open: bool,
    is_opening: bool,
    is_closing: bool,
    current: Option<usize>,
    drag: Point,
    swipe: Option<SwipeDirection>,
    backdrop_opacity: f64,
    animate: bool,
    gestures: GestureRecognizer,
    zoom: ZoomEngine,
    transitions: TransitionCoordinator,
    scroll_locked: bool,
    swipe_ms: u32,
    close_ms: u32,
}

impl GalleryController {
    pub fn new(config: GalleryConfig, len: usize) -> Self {
        let gestures = GestureRecognizer::new(GestureOptions {
            axis_lock_px: config.axis_lock_px,
            drag: config.drag,
            pinch: config.pinch,
        });
        let zoom = ZoomEngine::new(config.min_zoom, config.max_zoom, config.pan_slack_px);
        Self {
            len,
            is_open: false,
            is_opening: false,
            is_closing: false,
            current: None,
            drag: Point::ZERO,
            swipe: None,
            backdrop_opacity: 1.0,
            animate: true,
            gestures,
            zoom,
            transitions: TransitionCoordinator::default(),
            scroll_locked: false,
            swipe_ms: config.swipe_ms,
            close_ms: config.close_ms,
            config,
        }
    }

    pub fn state(&self) -> GalleryState {
        GalleryState {
            is_open: self.is_open,
            is_opening: self.is_opening,
            is_closing: self.is_closing,
            current: self.current,
            zoom: self.zoom.zoom(),
            pan: self.zoom.pan(),
            drag: self.drag,
            swipe: self.swipe,
            backdrop_opacity: self.backdrop_opacity,
            animate: self.animate,
        }
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Open and accepting input.
    pub fn is_interactive(&self) -> bool {
        self.is_open && !self.is_closing
    }

    /// Durations read from the stylesheet; `None` keeps the configured fallback.
    pub fn set_durations(&mut self, swipe_ms: Option<u32>, close_ms: Option<u32>) {
        if let Some(ms) = swipe_ms {
            self.swipe_ms = ms;
        }
        if let Some(ms) = close_ms {
            self.close_ms = ms;
        }
    }

    pub fn set_geometry(&mut self, viewport: Size, content: Size) {
        self.zoom.set_geometry(viewport, content);
    }

    pub fn set_len(&mut self, len: usize) -> Vec<Effect> {
        if len == self.len {
            return Vec::new();
        }
        self.len = len;
        if !self.is_open {
            return Vec::new();
        }
        if len == 0 {
            return self.teardown();
        }
        if let Some(current) = self.current {
            if current >= len {
                self.current = Some(len - 1);
                self.zoom.reset();
            }
        }
        Vec::new()
    }

    pub fn open_at(&mut self, index: usize) -> Vec<Effect> {
        if index >= self.len || self.is_closing {
            return Vec::new();
        }
        let mut fx = self.interrupt();
        if !self.is_open {
            self.is_opening = true;
        }
        self.is_open = true;
        self.current = Some(index);
        self.reset_transient();
        if !self.scroll_locked {
            self.scroll_locked = true;
            fx.push(Effect::LockScroll);
        }
        fx
    }

    /// The start pose of the entry animation has been rendered; let it play.
    /// Returns false when there was nothing to finish.
    pub fn finish_opening(&mut self) -> bool {
        std::mem::replace(&mut self.is_opening, false)
    }

    /// Starts the exit animation; teardown happens when its commit fires.
    pub fn close(&mut self) -> Vec<Effect> {
        if !self.is_interactive() {
            return Vec::new();
        }
        let mut fx = self.interrupt();
        self.is_opening = false;
        self.is_closing = true;
        self.animate = true;
        let (ticket, superseded) = self.transitions.arm(Commit::Close);
        fx.extend(superseded.map(Effect::CancelCommit));
        fx.push(Effect::ScheduleCommit {
            ticket,
            after_ms: self.close_ms + COMMIT_GRACE_MS,
        });
        fx
    }

    pub fn show_prev(&mut self) -> Vec<Effect> {
        self.step(SwipeDirection::Prev)
    }

    pub fn show_next(&mut self) -> Vec<Effect> {
        self.step(SwipeDirection::Next)
    }

    pub fn toggle_zoom(&mut self) -> Vec<Effect> {
        if !self.is_interactive() || self.gestures.is_active() {
            return Vec::new();
        }
        // land a swipe still in flight first, or its commit would reset the zoom
        let fx = self.flush_pending_swipe();
        self.zoom.toggle();
        self.animate = true;
        fx
    }

    /// Keyboard contract; `None` when the key is not handled.
    pub fn handle_key(&mut self, key: &str) -> Option<Vec<Effect>> {
        if !self.is_interactive() {
            return None;
        }
        match key {
            "Escape" | "Esc" => Some(self.close()),
            "ArrowLeft" | "Left" => Some(self.show_prev()),
            "ArrowRight" | "Right" => Some(self.show_next()),
            _ => None,
        }
    }

    pub fn pointer_down(&mut self, sample: PointerSample) -> Vec<Effect> {
        if !self.is_interactive() {
            return Vec::new();
        }
        let mut fx = Vec::new();
        if !self.gestures.is_active() {
            fx.extend(self.flush_pending_swipe());
        }
        match self.gestures.pointer_down(sample, self.zoom.is_zoomed()) {
            GestureUpdate::Started { pointer } => {
                if self.zoom.is_zoomed() {
                    self.zoom.begin_pan();
                }
                fx.push(Effect::CapturePointer(pointer));
            }
            GestureUpdate::PinchStarted { pointer, a, b } => {
                self.drag = Point::ZERO;
                self.backdrop_opacity = 1.0;
                self.animate = false;
                self.zoom.end_pan();
                self.zoom.begin_pinch(a, b);
                fx.push(Effect::CapturePointer(pointer));
            }
            _ => {}
        }
        fx
    }

    /// Returns true when the render state changed.
    pub fn pointer_move(&mut self, id: i32, position: Point) -> bool {
        if !self.is_interactive() {
            return false;
        }
        match self.gestures.pointer_move(id, position) {
            GestureUpdate::Drag {
                axis: Axis::X,
                offset,
            } => {
                self.drag = Point::new(offset, 0.0);
            }
            GestureUpdate::Drag {
                axis: Axis::Y,
                offset,
            } => {
                self.drag = Point::new(0.0, offset);
                self.backdrop_opacity = self.dismiss_opacity(offset);
            }
            GestureUpdate::Pan { displacement } => self.zoom.pan_by(displacement),
            GestureUpdate::Pinch { a, b } => {
                self.zoom.update_pinch(a, b);
            }
            _ => return false,
        }
        self.animate = false;
        true
    }

    pub fn pointer_up(&mut self, id: i32) -> Vec<Effect> {
        let update = self.gestures.pointer_up(id);
        self.resolve(update)
    }

    pub fn pointer_cancel(&mut self, id: i32) -> Vec<Effect> {
        let update = self.gestures.pointer_cancel(id);
        self.resolve(update)
    }

    /// Fallback timer fired.
    pub fn complete(&mut self, ticket: Ticket) -> Vec<Effect> {
        match self.transitions.fire(ticket) {
            Some(commit) => self.apply(commit),
            None => Vec::new(),
        }
    }

    /// A `transitionend` arrived from the given element.
    pub fn complete_signal(&mut self, kind: CommitKind) -> Vec<Effect> {
        match self.transitions.fire_signal(kind) {
            Some((ticket, commit)) => {
                let mut fx = vec![Effect::CancelCommit(ticket)];
                fx.extend(self.apply(commit));
                fx
            }
            None => Vec::new(),
        }
    }

    /// Unconditional teardown, e.g. when the component unmounts.
    pub fn dispose(&mut self) -> Vec<Effect> {
        self.teardown()
    }

    fn step(&mut self, direction: SwipeDirection) -> Vec<Effect> {
        if !self.is_interactive() {
            return Vec::new();
        }
        let mut fx = self.flush_pending_swipe();
        fx.extend(self.gestures.abort().into_iter().map(Effect::ReleasePointer));
        self.navigate_to_delta(direction.delta());
        fx
    }

    fn navigate_to_delta(&mut self, delta: i64) {
        let Some(current) = self.current else {
            return;
        };
        if self.len == 0 {
            return;
        }
        self.current = Some(wrap_index(current as i64 + delta, self.len));
        self.reset_transient();
        // the track is back at its neutral slot; don't animate into it
        self.animate = false;
    }

    fn resolve(&mut self, update: GestureUpdate) -> Vec<Effect> {
        let (outcome, pointer) = match update {
            GestureUpdate::Ended { outcome, pointer } => (outcome, pointer),
            GestureUpdate::Released { pointer } => return vec![Effect::ReleasePointer(pointer)],
            _ => return Vec::new(),
        };
        let mut fx = vec![Effect::ReleasePointer(pointer)];
        if !self.is_interactive() {
            return fx;
        }
        match outcome {
            GestureOutcome::Tap => {}
            GestureOutcome::Pan => self.zoom.end_pan(),
            GestureOutcome::Pinch => {
                self.zoom.end_pinch();
                self.animate = true;
            }
            GestureOutcome::Drag {
                axis: Axis::X,
                offset,
                cancelled,
            } => {
                self.animate = true;
                self.drag = Point::ZERO;
                if !cancelled && offset.abs() > self.config.swipe_commit_px {
                    let direction = SwipeDirection::from_drag(offset);
                    self.swipe = Some(direction);
                    let (ticket, superseded) = self.transitions.arm(Commit::Swipe(direction));
                    fx.extend(superseded.map(Effect::CancelCommit));
                    fx.push(Effect::ScheduleCommit {
                        ticket,
                        after_ms: self.swipe_ms + COMMIT_GRACE_MS,
                    });
                }
            }
            GestureOutcome::Drag {
                axis: Axis::Y,
                offset,
                cancelled,
            } => {
                if !cancelled && offset.abs() > self.config.close_px {
                    fx.extend(self.close());
                } else {
                    self.drag = Point::ZERO;
                    self.backdrop_opacity = 1.0;
                    self.animate = true;
                }
            }
        }
        fx
    }

    fn apply(&mut self, commit: Commit) -> Vec<Effect> {
        match commit {
            Commit::Swipe(direction) => {
                self.navigate_to_delta(direction.delta());
                Vec::new()
            }
            Commit::Close => self.teardown(),
        }
    }

    /// Commit a pending swipe right away so its timer can't fire later.
    fn flush_pending_swipe(&mut self) -> Vec<Effect> {
        match self.transitions.pending() {
            Some((_, Commit::Swipe(_))) => {}
            _ => return Vec::new(),
        }
        let Some((ticket, commit)) = self.transitions.take() else {
            return Vec::new();
        };
        let mut fx = vec![Effect::CancelCommit(ticket)];
        fx.extend(self.apply(commit));
        fx
    }

    /// Abort the gesture and drop any pending commit.
    fn interrupt(&mut self) -> Vec<Effect> {
        let mut fx: Vec<Effect> = self
            .gestures
            .abort()
            .into_iter()
            .map(Effect::ReleasePointer)
            .collect();
        if self.zoom.is_pinching() {
            self.zoom.end_pinch();
        }
        self.zoom.end_pan();
        fx.extend(self.transitions.cancel().map(Effect::CancelCommit));
        fx
    }

    fn teardown(&mut self) -> Vec<Effect> {
        let mut fx: Vec<Effect> = self
            .gestures
            .clear()
            .into_iter()
            .map(Effect::ReleasePointer)
            .collect();
        fx.extend(self.transitions.cancel().map(Effect::CancelCommit));
        self.is_open = false;
        self.is_opening = false;
        self.is_closing = false;
        self.current = None;
        self.reset_transient();
        if self.scroll_locked {
            self.scroll_locked = false;
            fx.push(Effect::UnlockScroll);
        }
        fx
    }

    fn reset_transient(&mut self) {
        self.drag = Point::ZERO;
        self.swipe = None;
        self.backdrop_opacity = 1.0;
        self.animate = true;
        self.zoom.reset();
    }

    fn dismiss_opacity(&self, offset: f64) -> f64 {
        (1.0 - offset.abs() / self.config.dismiss_fade_px).max(self.config.backdrop_floor)
    }
}
