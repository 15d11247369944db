//! Gallery configuration and page data, read from the hosting page.

use serde::{Deserialize, Serialize};

use crate::error::GalleryError;
use crate::model::Image;

/// Feature flags and tuning constants for the lightbox and carousel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Swipe navigation and drag-to-close.
    pub drag: bool,
    /// Two-finger pinch zoom.
    pub pinch: bool,
    /// Render the inline infinite-loop carousel.
    pub infinite_loop: bool,
    /// Only realise slide images once they approach the viewport.
    pub lazy_load: bool,
    pub axis_lock_px: f64,
    pub swipe_commit_px: f64,
    pub close_px: f64,
    /// Vertical drag distance over which the backdrop fades to its floor.
    pub dismiss_fade_px: f64,
    pub backdrop_floor: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub pan_slack_px: f64,
    /// Fallback durations when the stylesheet can't be read.
    pub swipe_ms: u32,
    pub close_ms: u32,
    /// `rootMargin` for the visibility observer.
    pub preload_margin: String,
    pub carousel_clones: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            drag: true,
            pinch: true,
            infinite_loop: true,
            lazy_load: true,
            axis_lock_px: 10.0,
            swipe_commit_px: 80.0,
            close_px: 120.0,
            dismiss_fade_px: 300.0,
            backdrop_floor: 0.35,
            min_zoom: 1.0,
            max_zoom: 3.0,
            pan_slack_px: 16.0,
            swipe_ms: 300,
            close_ms: 250,
            preload_margin: "50%".to_string(),
            carousel_clones: 2,
        }
    }
}

impl GalleryConfig {
    /// Normalise out-of-range values coming from page markup.
    pub fn validated(mut self) -> Self {
        let defaults = GalleryConfig::default();
        if !(self.min_zoom.is_finite() && self.min_zoom >= 1.0) {
            self.min_zoom = defaults.min_zoom;
        }
        if !(self.max_zoom.is_finite() && self.max_zoom >= self.min_zoom) {
            self.max_zoom = self.min_zoom.max(defaults.max_zoom);
        }
        for (value, fallback) in [
            (&mut self.axis_lock_px, defaults.axis_lock_px),
            (&mut self.swipe_commit_px, defaults.swipe_commit_px),
            (&mut self.close_px, defaults.close_px),
            (&mut self.dismiss_fade_px, defaults.dismiss_fade_px),
        ] {
            if !(value.is_finite() && *value > 0.0) {
                *value = fallback;
            }
        }
        if !(self.pan_slack_px.is_finite() && self.pan_slack_px >= 0.0) {
            self.pan_slack_px = defaults.pan_slack_px;
        }
        self.backdrop_floor = if self.backdrop_floor.is_finite() {
            self.backdrop_floor.clamp(0.0, 1.0)
        } else {
            defaults.backdrop_floor
        };
        if self.carousel_clones == 0 {
            self.carousel_clones = 1;
        }
        if self.preload_margin.trim().is_empty() {
            self.preload_margin = defaults.preload_margin;
        }
        self
    }
}

/// JSON document embedded by the hosting page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub config: GalleryConfig,
}

impl PageData {
    pub fn from_json(raw: &str) -> Result<Self, GalleryError> {
        let mut data: PageData = serde_json::from_str(raw)?;
        data.config = data.config.validated();
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let data = PageData::from_json(
            r#"{"images":[{"src":"a.jpg"},{"src":"b.jpg","alt":"B"}],"config":{"pinch":false,"max_zoom":4}}"#,
        )
        .unwrap();
        assert_eq!(data.images.len(), 2);
        assert!(!data.config.pinch);
        assert!(data.config.drag);
        assert_eq!(data.config.max_zoom, 4.0);
        assert_eq!(data.config.swipe_commit_px, 80.0);
    }

    #[test]
    fn missing_sections_yield_empty_gallery() {
        let data = PageData::from_json("{}").unwrap();
        assert!(data.images.is_empty());
        assert_eq!(data.config, GalleryConfig::default());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            PageData::from_json("{images: nope"),
            Err(GalleryError::Json(_))
        ));
    }

    #[test]
    fn validated_repairs_inverted_zoom_range() {
        let cfg = GalleryConfig {
            min_zoom: 0.5,
            max_zoom: 0.2,
            close_px: -3.0,
            backdrop_floor: 2.0,
            carousel_clones: 0,
            ..GalleryConfig::default()
        }
        .validated();
        assert_eq!(cfg.min_zoom, 1.0);
        assert_eq!(cfg.max_zoom, 3.0);
        assert_eq!(cfg.close_px, 120.0);
        assert_eq!(cfg.backdrop_floor, 1.0);
        assert_eq!(cfg.carousel_clones, 1);
    }
}
