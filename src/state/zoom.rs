//! Zoom and pan state for the foreground image.
//!
//! Coordinates are relative to the stage centre. The image is rendered with
//! `translate(pan) scale(zoom)` about its own centre, so an image-local point
//! `q` appears on screen at `pan + q * zoom`.

use crate::model::{Point, Size};

const ZOOM_EPSILON: f64 = 1e-6;
/// Guards against a degenerate baseline when both fingers land on one spot.
const MIN_PINCH_DISTANCE: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchBaseline {
    pub distance: f64,
    pub zoom: f64,
    /// Image-local point that stays under the pinch centroid.
    pub anchor: Point,
}

#[derive(Clone, Debug)]
pub struct ZoomEngine {
    min_zoom: f64,
    max_zoom: f64,
    slack: f64,
    zoom: f64,
    pan: Point,
    /// Maximum |pan| per axis; `None` while fully zoomed out.
    bounds: Option<Point>,
    baseline: Option<PinchBaseline>,
    pan_origin: Option<Point>,
    viewport: Size,
    content: Size,
}

impl ZoomEngine {
    pub fn new(min_zoom: f64, max_zoom: f64, slack: f64) -> Self {
        Self {
            min_zoom,
            max_zoom,
            slack,
            zoom: min_zoom,
            pan: Point::ZERO,
            bounds: None,
            baseline: None,
            pan_origin: None,
            viewport: Size::default(),
            content: Size::default(),
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    #[cfg(test)]
    pub fn bounds(&self) -> Option<Point> {
        self.bounds
    }

    #[cfg(test)]
    pub fn baseline(&self) -> Option<PinchBaseline> {
        self.baseline
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoom > self.min_zoom + ZOOM_EPSILON
    }

    pub fn is_pinching(&self) -> bool {
        self.baseline.is_some()
    }

    /// Stage size and the fitted (zoom 1) image size, as laid out by the browser.
    pub fn set_geometry(&mut self, viewport: Size, content: Size) {
        self.viewport = viewport;
        self.content = content;
        if self.is_zoomed() && !self.is_pinching() {
            let bounds = self.compute_bounds();
            self.bounds = Some(bounds);
            self.pan = self.pan.clamp_abs(bounds);
        }
    }

    pub fn reset(&mut self) {
        self.zoom = self.min_zoom;
        self.pan = Point::ZERO;
        self.bounds = None;
        self.baseline = None;
        self.pan_origin = None;
    }

    pub fn begin_pinch(&mut self, a: Point, b: Point) {
        let centroid = a.midpoint(b);
        self.pan_origin = None;
        self.baseline = Some(PinchBaseline {
            distance: a.distance(b).max(MIN_PINCH_DISTANCE),
            zoom: self.zoom,
            anchor: (centroid - self.pan) * (1.0 / self.zoom),
        });
    }

    /// Returns false when no pinch is in progress.
    pub fn update_pinch(&mut self, a: Point, b: Point) -> bool {
        let Some(base) = self.baseline else {
            return false;
        };
        let scale = a.distance(b).max(MIN_PINCH_DISTANCE) / base.distance;
        self.zoom = self.clamp_zoom(base.zoom * scale);
        self.pan = a.midpoint(b) - base.anchor * self.zoom;
        true
    }

    pub fn end_pinch(&mut self) {
        if self.baseline.take().is_none() {
            return;
        }
        self.zoom = self.clamp_zoom(self.zoom);
        self.settle();
    }

    pub fn begin_pan(&mut self) {
        self.pan_origin = Some(self.pan);
    }

    /// Move by `displacement` from where the pan began, never past the bounds.
    pub fn pan_by(&mut self, displacement: Point) {
        let (Some(origin), Some(bounds)) = (self.pan_origin, self.bounds) else {
            return;
        };
        self.pan = (origin + displacement).clamp_abs(bounds);
    }

    pub fn end_pan(&mut self) {
        self.pan_origin = None;
    }

    /// Flip between fully zoomed out and fully zoomed in, centred.
    pub fn toggle(&mut self) {
        if self.is_zoomed() {
            self.reset();
        } else {
            self.baseline = None;
            self.pan_origin = None;
            self.zoom = self.max_zoom;
            self.pan = Point::ZERO;
            self.bounds = Some(self.compute_bounds());
        }
    }

    fn settle(&mut self) {
        if self.zoom <= self.min_zoom + ZOOM_EPSILON {
            self.zoom = self.min_zoom;
            self.pan = Point::ZERO;
            self.bounds = None;
        } else {
            let bounds = self.compute_bounds();
            self.bounds = Some(bounds);
            self.pan = self.pan.clamp_abs(bounds);
        }
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            zoom.clamp(self.min_zoom, self.max_zoom)
        } else {
            self.min_zoom
        }
    }

    fn compute_bounds(&self) -> Point {
        let content = if self.content.is_empty() {
            self.viewport
        } else {
            self.content
        };
        let overflow = |scaled: f64, view: f64| ((scaled - view) * 0.5).max(0.0);
        Point::new(
            overflow(content.width * self.zoom, self.viewport.width) + self.slack,
            overflow(content.height * self.zoom, self.viewport.height) + self.slack,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn engine() -> ZoomEngine {
        let mut z = ZoomEngine::new(1.0, 3.0, 16.0);
        z.set_geometry(Size::new(400.0, 800.0), Size::new(400.0, 300.0));
        z
    }

    fn screen_of(z: &ZoomEngine, anchor: Point) -> Point {
        z.pan() + anchor * z.zoom()
    }

    fn assert_near(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS,
            "expected {:?} got {:?}",
            b,
            a
        );
    }

    #[test]
    fn anchor_stays_under_centroid() {
        let mut z = engine();
        let a = Point::new(-40.0, 30.0);
        let b = Point::new(60.0, 50.0);
        z.begin_pinch(a, b);
        let anchor = z.baseline().unwrap().anchor;
        let frames = [
            (Point::new(-60.0, 25.0), Point::new(90.0, 60.0)),
            (Point::new(-120.0, 0.0), Point::new(150.0, 90.0)),
            (Point::new(-400.0, -50.0), Point::new(400.0, 200.0)),
            (Point::new(-5.0, 40.0), Point::new(5.0, 41.0)),
            (Point::new(10.0, 10.0), Point::new(70.0, 90.0)),
        ];
        for (fa, fb) in frames {
            assert!(z.update_pinch(fa, fb));
            assert_near(screen_of(&z, anchor), fa.midpoint(fb));
        }
    }

    #[test]
    fn anchor_holds_from_a_zoomed_and_panned_start() {
        let mut z = engine();
        z.toggle();
        z.begin_pan();
        z.pan_by(Point::new(50.0, -20.0));
        z.end_pan();
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        z.begin_pinch(a, b);
        let anchor = z.baseline().unwrap().anchor;
        assert_near(screen_of(&z, anchor), a.midpoint(b));
        z.update_pinch(Point::new(-20.0, 10.0), Point::new(60.0, 10.0));
        assert_near(screen_of(&z, anchor), Point::new(20.0, 10.0));
    }

    #[test]
    fn zoom_is_clamped_on_every_frame() {
        let mut z = engine();
        z.begin_pinch(Point::new(-10.0, 0.0), Point::new(10.0, 0.0));
        z.update_pinch(Point::new(-500.0, 0.0), Point::new(500.0, 0.0));
        assert_eq!(z.zoom(), 3.0);
        z.update_pinch(Point::new(-1.0, 0.0), Point::new(1.0, 0.0));
        assert_eq!(z.zoom(), 1.0);
        z.update_pinch(Point::new(0.0, 0.0), Point::new(0.0, 0.0));
        assert!(z.zoom() >= 1.0 && z.zoom() <= 3.0);
        z.end_pinch();
        assert_eq!(z.zoom(), 1.0);
    }

    #[test]
    fn zoom_stays_in_range_across_mixed_operations() {
        let mut z = engine();
        let spreads = [5.0, 300.0, 0.5, 40.0, 1000.0, 12.0, 0.0, 77.0];
        for (i, spread) in spreads.iter().enumerate() {
            if i % 3 == 0 {
                z.toggle();
            }
            z.begin_pinch(Point::new(-20.0, 0.0), Point::new(20.0, 0.0));
            z.update_pinch(Point::new(-spread, 3.0), Point::new(*spread, -3.0));
            assert!(z.zoom() >= 1.0 && z.zoom() <= 3.0, "zoom {}", z.zoom());
            z.end_pinch();
            assert!(z.zoom() >= 1.0 && z.zoom() <= 3.0, "zoom {}", z.zoom());
        }
    }

    #[test]
    fn releasing_at_min_zoom_resets_pan() {
        let mut z = engine();
        z.begin_pinch(Point::new(100.0, 100.0), Point::new(140.0, 100.0));
        z.update_pinch(Point::new(110.0, 100.0), Point::new(130.0, 100.0));
        z.end_pinch();
        assert_eq!(z.zoom(), 1.0);
        assert_eq!(z.pan(), Point::ZERO);
        assert!(z.bounds().is_none());
    }

    #[test]
    fn release_commits_pan_within_bounds() {
        let mut z = engine();
        z.begin_pinch(Point::new(150.0, 0.0), Point::new(190.0, 0.0));
        z.update_pinch(Point::new(130.0, 0.0), Point::new(210.0, 0.0));
        assert_eq!(z.zoom(), 2.0);
        z.end_pinch();
        let bounds = z.bounds().unwrap();
        // (400*2 - 400)/2 + 16 and (300*2 - 800)/2 clamps to 0, + 16
        assert_near(bounds, Point::new(216.0, 16.0));
        assert!(z.pan().x.abs() <= bounds.x && z.pan().y.abs() <= bounds.y);
    }

    #[test]
    fn panning_never_exceeds_bounds() {
        let mut z = engine();
        z.toggle();
        let bounds = z.bounds().unwrap();
        z.begin_pan();
        for d in [
            Point::new(10.0, 10.0),
            Point::new(-5000.0, 0.0),
            Point::new(5000.0, -5000.0),
            Point::new(0.0, 9000.0),
        ] {
            z.pan_by(d);
            assert!(z.pan().x.abs() <= bounds.x + EPS);
            assert!(z.pan().y.abs() <= bounds.y + EPS);
        }
        z.end_pan();
    }

    #[test]
    fn pan_is_ignored_when_not_zoomed() {
        let mut z = engine();
        z.begin_pan();
        z.pan_by(Point::new(40.0, 40.0));
        assert_eq!(z.pan(), Point::ZERO);
    }

    #[test]
    fn toggle_flips_between_extremes() {
        let mut z = engine();
        z.toggle();
        assert_eq!(z.zoom(), 3.0);
        assert_eq!(z.pan(), Point::ZERO);
        assert!(z.is_zoomed());
        z.toggle();
        assert_eq!(z.zoom(), 1.0);
        assert!(!z.is_zoomed());
    }

    #[test]
    fn shrinking_viewport_reclamps_pan() {
        let mut z = engine();
        z.toggle();
        z.begin_pan();
        z.pan_by(Point::new(10_000.0, 0.0));
        z.end_pan();
        let before = z.pan().x;
        z.set_geometry(Size::new(400.0, 800.0), Size::new(200.0, 150.0));
        assert!(z.pan().x < before);
        assert!(z.pan().x <= z.bounds().unwrap().x);
    }
}
