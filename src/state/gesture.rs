// Pointer stream classification: swipe, dismiss drag, pan and pinch.

use crate::model::Point;
use crate::state::pointers::{PointerCache, PointerKind, PointerSample};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    /// One pointer down, axis not decided yet.
    SingleCandidate,
    DragX,
    DragY,
    /// Single-pointer movement while zoomed in.
    Pan,
    Pinch,
    /// Finished; waiting for the remaining participants to lift.
    Resolved,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureOutcome {
    /// Released before any axis was locked.
    Tap,
    Drag {
        axis: Axis,
        offset: f64,
        cancelled: bool,
    },
    Pan,
    Pinch,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GestureUpdate {
    None,
    Started { pointer: i32 },
    Drag { axis: Axis, offset: f64 },
    /// Displacement from the session start point.
    Pan { displacement: Point },
    PinchStarted { pointer: i32, a: Point, b: Point },
    Pinch { a: Point, b: Point },
    /// Session resolved by the lifted `pointer`; any other participant stays captured.
    Ended {
        outcome: GestureOutcome,
        pointer: i32,
    },
    /// A participant of an already resolved session lifted.
    Released { pointer: i32 },
}

#[derive(Clone, Debug)]
struct GestureSession {
    phase: GesturePhase,
    primary: i32,
    secondary: Option<i32>,
    start: Point,
    zoomed: bool,
    /// Participants still pressed, and so still captured.
    down: Vec<i32>,
}

impl GestureSession {
    fn involves(&self, id: i32) -> bool {
        self.down.contains(&id)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GestureOptions {
    pub axis_lock_px: f64,
    pub drag: bool,
    pub pinch: bool,
}

#[derive(Clone, Debug)]
pub struct GestureRecognizer {
    options: GestureOptions,
    pointers: PointerCache,
    session: Option<GestureSession>,
}

impl GestureRecognizer {
    pub fn new(options: GestureOptions) -> Self {
        Self {
            options,
            pointers: PointerCache::default(),
            session: None,
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> Option<GesturePhase> {
        self.session.as_ref().map(|s| s.phase)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// `zoomed` decides whether single-pointer movement pans instead of swiping.
    pub fn pointer_down(&mut self, sample: PointerSample, zoomed: bool) -> GestureUpdate {
        self.pointers.insert(sample);
        let pinch_enabled = self.options.pinch;
        match self.session.as_mut() {
            None => {
                self.session = Some(GestureSession {
                    phase: GesturePhase::SingleCandidate,
                    primary: sample.id,
                    secondary: None,
                    start: sample.position,
                    zoomed,
                    down: vec![sample.id],
                });
                GestureUpdate::Started { pointer: sample.id }
            }
            Some(session) => {
                let promotable = matches!(
                    session.phase,
                    GesturePhase::SingleCandidate
                        | GesturePhase::DragX
                        | GesturePhase::DragY
                        | GesturePhase::Pan
                ) && session.secondary.is_none();
                if !promotable || !pinch_enabled {
                    return GestureUpdate::None;
                }
                let Some(first) = self.pointers.get(session.primary).copied() else {
                    return GestureUpdate::None;
                };
                let qualifies = |s: &PointerSample| s.kind == PointerKind::Touch && s.on_image;
                if !qualifies(&first) || !qualifies(&sample) {
                    return GestureUpdate::None;
                }
                session.phase = GesturePhase::Pinch;
                session.secondary = Some(sample.id);
                session.down.push(sample.id);
                GestureUpdate::PinchStarted {
                    pointer: sample.id,
                    a: first.position,
                    b: sample.position,
                }
            }
        }
    }

    pub fn pointer_move(&mut self, id: i32, position: Point) -> GestureUpdate {
        if self.pointers.update(id, position).is_none() {
            return GestureUpdate::None;
        }
        let options = self.options;
        let Some(session) = self.session.as_mut() else {
            return GestureUpdate::None;
        };
        if !session.involves(id) {
            return GestureUpdate::None;
        }
        let d = position - session.start;
        match session.phase {
            GesturePhase::SingleCandidate => {
                if session.zoomed {
                    session.phase = GesturePhase::Pan;
                    return GestureUpdate::Pan { displacement: d };
                }
                if !options.drag {
                    return GestureUpdate::None;
                }
                if d.x.abs() <= options.axis_lock_px && d.y.abs() <= options.axis_lock_px {
                    return GestureUpdate::None;
                }
                // locked once, never re-evaluated
                if d.x.abs() >= d.y.abs() {
                    session.phase = GesturePhase::DragX;
                    GestureUpdate::Drag {
                        axis: Axis::X,
                        offset: d.x,
                    }
                } else {
                    session.phase = GesturePhase::DragY;
                    GestureUpdate::Drag {
                        axis: Axis::Y,
                        offset: d.y,
                    }
                }
            }
            GesturePhase::DragX => GestureUpdate::Drag {
                axis: Axis::X,
                offset: d.x,
            },
            GesturePhase::DragY => GestureUpdate::Drag {
                axis: Axis::Y,
                offset: d.y,
            },
            GesturePhase::Pan => GestureUpdate::Pan { displacement: d },
            GesturePhase::Pinch => {
                let Some(secondary) = session.secondary else {
                    return GestureUpdate::None;
                };
                match self.pointers.pair(session.primary, secondary) {
                    Some((a, b)) => GestureUpdate::Pinch {
                        a: a.position,
                        b: b.position,
                    },
                    None => GestureUpdate::None,
                }
            }
            GesturePhase::Resolved => GestureUpdate::None,
        }
    }

    pub fn pointer_up(&mut self, id: i32) -> GestureUpdate {
        self.finish(id, false)
    }

    /// Cancellation resolves like a release that never crossed a threshold.
    pub fn pointer_cancel(&mut self, id: i32) -> GestureUpdate {
        self.finish(id, true)
    }

    /// Drop the active session without an outcome; returns the pointers to release.
    pub fn abort(&mut self) -> Vec<i32> {
        self.session.take().map(|s| s.down).unwrap_or_default()
    }

    /// Forget every tracked pointer, e.g. when the lightbox tears down.
    pub fn clear(&mut self) -> Vec<i32> {
        let released = self.abort();
        self.pointers.clear();
        released
    }

    fn finish(&mut self, id: i32, cancelled: bool) -> GestureUpdate {
        let last = self.pointers.remove(id);
        let Some(session) = self.session.as_mut() else {
            return GestureUpdate::None;
        };
        if !session.involves(id) {
            return GestureUpdate::None;
        }
        session.down.retain(|p| *p != id);
        let outcome = match session.phase {
            GesturePhase::Resolved => {
                if session.down.is_empty() {
                    self.session = None;
                }
                return GestureUpdate::Released { pointer: id };
            }
            GesturePhase::Pinch => GestureOutcome::Pinch,
            GesturePhase::SingleCandidate => GestureOutcome::Tap,
            GesturePhase::Pan => GestureOutcome::Pan,
            GesturePhase::DragX | GesturePhase::DragY => {
                let d = last
                    .map(|s| s.position - session.start)
                    .unwrap_or(Point::ZERO);
                let (axis, offset) = if session.phase == GesturePhase::DragX {
                    (Axis::X, d.x)
                } else {
                    (Axis::Y, d.y)
                };
                GestureOutcome::Drag {
                    axis,
                    offset,
                    cancelled,
                }
            }
        };
        if session.down.is_empty() {
            self.session = None;
        } else {
            session.phase = GesturePhase::Resolved;
        }
        GestureUpdate::Ended {
            outcome,
            pointer: id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognizer() -> GestureRecognizer {
        GestureRecognizer::new(GestureOptions {
            axis_lock_px: 10.0,
            drag: true,
            pinch: true,
        })
    }

    fn sample(id: i32, kind: PointerKind, x: f64, y: f64, on_image: bool) -> PointerSample {
        PointerSample {
            id,
            kind,
            position: Point::new(x, y),
            on_image,
        }
    }

    fn touch(id: i32, x: f64, y: f64) -> PointerSample {
        sample(id, PointerKind::Touch, x, y, true)
    }

    #[test]
    fn small_moves_keep_axis_undecided() {
        let mut g = recognizer();
        assert_eq!(
            g.pointer_down(touch(1, 0.0, 0.0), false),
            GestureUpdate::Started { pointer: 1 }
        );
        assert_eq!(g.pointer_move(1, Point::new(6.0, -8.0)), GestureUpdate::None);
        assert_eq!(g.phase(), Some(GesturePhase::SingleCandidate));
        assert_eq!(
            g.pointer_up(1),
            GestureUpdate::Ended {
                outcome: GestureOutcome::Tap,
                pointer: 1
            }
        );
        assert!(!g.is_active());
    }

    #[test]
    fn axis_lock_is_never_reevaluated() {
        let mut g = recognizer();
        g.pointer_down(touch(1, 0.0, 0.0), false);
        assert_eq!(
            g.pointer_move(1, Point::new(15.0, 3.0)),
            GestureUpdate::Drag {
                axis: Axis::X,
                offset: 15.0
            }
        );
        // mostly vertical now, but the lock holds
        assert_eq!(
            g.pointer_move(1, Point::new(20.0, 200.0)),
            GestureUpdate::Drag {
                axis: Axis::X,
                offset: 20.0
            }
        );
        assert_eq!(g.phase(), Some(GesturePhase::DragX));
    }

    #[test]
    fn vertical_drag_reports_offset_on_release() {
        let mut g = recognizer();
        g.pointer_down(touch(7, 5.0, 5.0), false);
        g.pointer_move(7, Point::new(6.0, 40.0));
        g.pointer_move(7, Point::new(8.0, 155.0));
        assert_eq!(
            g.pointer_up(7),
            GestureUpdate::Ended {
                outcome: GestureOutcome::Drag {
                    axis: Axis::Y,
                    offset: 150.0,
                    cancelled: false
                },
                pointer: 7
            }
        );
    }

    #[test]
    fn cancel_marks_drag_as_cancelled() {
        let mut g = recognizer();
        g.pointer_down(touch(1, 0.0, 0.0), false);
        g.pointer_move(1, Point::new(-120.0, 0.0));
        match g.pointer_cancel(1) {
            GestureUpdate::Ended {
                outcome: GestureOutcome::Drag { cancelled, .. },
                ..
            } => assert!(cancelled),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn zoomed_session_pans_immediately() {
        let mut g = recognizer();
        g.pointer_down(touch(1, 0.0, 0.0), true);
        assert_eq!(
            g.pointer_move(1, Point::new(2.0, 3.0)),
            GestureUpdate::Pan {
                displacement: Point::new(2.0, 3.0)
            }
        );
        assert_eq!(g.phase(), Some(GesturePhase::Pan));
    }

    #[test]
    fn two_touches_on_image_promote_to_pinch() {
        let mut g = recognizer();
        g.pointer_down(touch(1, -10.0, 0.0), false);
        assert_eq!(
            g.pointer_down(touch(2, 10.0, 0.0), false),
            GestureUpdate::PinchStarted {
                pointer: 2,
                a: Point::new(-10.0, 0.0),
                b: Point::new(10.0, 0.0)
            }
        );
        assert_eq!(
            g.pointer_move(2, Point::new(30.0, 0.0)),
            GestureUpdate::Pinch {
                a: Point::new(-10.0, 0.0),
                b: Point::new(30.0, 0.0)
            }
        );
        assert_eq!(
            g.pointer_up(1),
            GestureUpdate::Ended {
                outcome: GestureOutcome::Pinch,
                pointer: 1
            }
        );
        // remaining finger is inert, and keeps its capture, until it lifts
        assert_eq!(g.phase(), Some(GesturePhase::Resolved));
        assert_eq!(g.pointer_move(2, Point::new(80.0, 0.0)), GestureUpdate::None);
        assert_eq!(g.pointer_up(2), GestureUpdate::Released { pointer: 2 });
        assert!(!g.is_active());
    }

    #[test]
    fn lost_capture_frees_resolved_session() {
        let mut g = recognizer();
        g.pointer_down(touch(1, 0.0, 0.0), false);
        g.pointer_down(touch(2, 40.0, 0.0), false);
        g.pointer_up(1);
        assert_eq!(g.pointer_cancel(2), GestureUpdate::Released { pointer: 2 });
        assert!(!g.is_active());
        assert_eq!(
            g.pointer_down(touch(3, 0.0, 0.0), false),
            GestureUpdate::Started { pointer: 3 }
        );
    }

    #[test]
    fn abort_after_pinch_releases_only_pressed_pointers() {
        let mut g = recognizer();
        g.pointer_down(touch(1, 0.0, 0.0), false);
        g.pointer_down(touch(2, 40.0, 0.0), false);
        g.pointer_up(1);
        assert_eq!(g.abort(), vec![2]);
    }

    #[test]
    fn vertical_drag_promotes_to_pinch() {
        let mut g = recognizer();
        g.pointer_down(touch(1, 0.0, 0.0), false);
        g.pointer_move(1, Point::new(0.0, 60.0));
        assert_eq!(g.phase(), Some(GesturePhase::DragY));
        assert_eq!(
            g.pointer_down(touch(2, 40.0, 60.0), false),
            GestureUpdate::PinchStarted {
                pointer: 2,
                a: Point::new(0.0, 60.0),
                b: Point::new(40.0, 60.0)
            }
        );
        assert_eq!(g.phase(), Some(GesturePhase::Pinch));
    }

    #[test]
    fn pinch_requires_touch_on_image() {
        let mut g = recognizer();
        g.pointer_down(touch(1, 0.0, 0.0), false);
        assert_eq!(
            g.pointer_down(sample(2, PointerKind::Touch, 50.0, 0.0, false), false),
            GestureUpdate::None
        );
        let mut g = recognizer();
        g.pointer_down(sample(1, PointerKind::Mouse, 0.0, 0.0, true), false);
        assert_eq!(
            g.pointer_down(touch(2, 50.0, 0.0), false),
            GestureUpdate::None
        );
        assert_eq!(g.phase(), Some(GesturePhase::SingleCandidate));
    }

    #[test]
    fn pinch_disabled_ignores_second_pointer() {
        let mut g = GestureRecognizer::new(GestureOptions {
            axis_lock_px: 10.0,
            drag: true,
            pinch: false,
        });
        g.pointer_down(touch(1, 0.0, 0.0), false);
        assert_eq!(g.pointer_down(touch(2, 5.0, 0.0), false), GestureUpdate::None);
    }

    #[test]
    fn drag_disabled_never_locks() {
        let mut g = GestureRecognizer::new(GestureOptions {
            axis_lock_px: 10.0,
            drag: false,
            pinch: true,
        });
        g.pointer_down(touch(1, 0.0, 0.0), false);
        assert_eq!(g.pointer_move(1, Point::new(300.0, 0.0)), GestureUpdate::None);
        assert_eq!(g.phase(), Some(GesturePhase::SingleCandidate));
    }

    #[test]
    fn abort_returns_participants_for_release() {
        let mut g = recognizer();
        g.pointer_down(touch(1, 0.0, 0.0), false);
        g.pointer_down(touch(2, 1.0, 0.0), false);
        assert_eq!(g.abort(), vec![1, 2]);
        assert!(!g.is_active());
        // stale pointer lifting later is harmless
        assert_eq!(g.pointer_up(1), GestureUpdate::None);
        assert!(g.clear().is_empty());
    }
}
