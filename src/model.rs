//! Core data models for the lightbox.
//! Images come from the hosting page; everything else here is plain value
//! types shared between the state containers and the components.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    #[serde(alias = "source")]
    pub src: String,
    #[serde(default, alias = "altText")]
    pub alt: Option<String>,
}

impl Image {
    pub fn alt_text(&self) -> &str {
        self.alt.as_deref().unwrap_or("")
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Clamp each axis into `[-bound, bound]`.
    pub fn clamp_abs(self, bound: Point) -> Point {
        Point::new(
            self.x.clamp(-bound.x, bound.x),
            self.y.clamp(-bound.y, bound.y),
        )
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwipeDirection {
    Prev,
    Next,
}

impl SwipeDirection {
    pub fn delta(self) -> i64 {
        match self {
            SwipeDirection::Prev => -1,
            SwipeDirection::Next => 1,
        }
    }

    /// Dragging right reveals the previous slide, dragging left the next one.
    pub fn from_drag(dx: f64) -> Self {
        if dx > 0.0 {
            SwipeDirection::Prev
        } else {
            SwipeDirection::Next
        }
    }
}

/// Render snapshot of the lightbox, produced by the controller.
#[derive(Clone, Debug, PartialEq)]
pub struct GalleryState {
    pub is_open: bool,
    /// First frame after opening; rendered in the entry animation's start pose.
    pub is_opening: bool,
    pub is_closing: bool,
    /// Always `Some` and in range while open, `None` when closed.
    pub current: Option<usize>,
    pub zoom: f64,
    pub pan: Point,
    /// Live drag offset of the slide track (x) or dismiss drag (y).
    pub drag: Point,
    pub swipe: Option<SwipeDirection>,
    pub backdrop_opacity: f64,
    /// Whether transform/opacity changes should animate (false during live drags).
    pub animate: bool,
}

impl Default for GalleryState {
    fn default() -> Self {
        Self {
            is_open: false,
            is_opening: false,
            is_closing: false,
            current: None,
            zoom: 1.0,
            pan: Point::ZERO,
            drag: Point::ZERO,
            swipe: None,
            backdrop_opacity: 1.0,
            animate: true,
        }
    }
}

/// True modulo: wraps negative offsets back into `[0, len)`. `len` must be non-zero.
pub fn wrap_index(index: i64, len: usize) -> usize {
    index.rem_euclid(len as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_index_handles_negative_and_overflow() {
        assert_eq!(wrap_index(-1, 3), 2);
        assert_eq!(wrap_index(3, 3), 0);
        assert_eq!(wrap_index(-7, 3), 2);
        assert_eq!(wrap_index(5, 1), 0);
    }

    #[test]
    fn image_accepts_both_field_spellings() {
        let a: Image = serde_json::from_str(r#"{"src":"a.jpg","alt":"A"}"#).unwrap();
        let b: Image = serde_json::from_str(r#"{"source":"a.jpg","altText":"A"}"#).unwrap();
        assert_eq!(a, b);
        let c: Image = serde_json::from_str(r#"{"src":"c.jpg"}"#).unwrap();
        assert_eq!(c.alt_text(), "");
    }

    #[test]
    fn swipe_direction_follows_drag_sign() {
        assert_eq!(SwipeDirection::from_drag(100.0), SwipeDirection::Prev);
        assert_eq!(SwipeDirection::from_drag(-100.0), SwipeDirection::Next);
        assert_eq!(SwipeDirection::Next.delta(), 1);
    }
}
