// Utility helpers shared by the components

pub fn clog(msg: &str) {
    if cfg!(debug_assertions) {
        gloo::console::debug!(msg);
    }
}

pub fn cwarn(msg: &str) {
    gloo::console::warn!(msg);
}

/// Pending-frame flag: at most one queued animation frame per consumer.
#[derive(Debug, Default, Clone)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    /// Returns true when the caller should schedule a frame.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn clear(&mut self) {
        self.pending = false;
    }
}

/// Parse a computed `transition-duration` value ("0.3s", "250ms", "0s, 0.2s")
/// and return the longest entry in milliseconds.
pub fn parse_css_duration_ms(raw: &str) -> Option<u32> {
    raw.split(',')
        .filter_map(|part| {
            let part = part.trim();
            let ms = if let Some(v) = part.strip_suffix("ms") {
                v.trim().parse::<f64>().ok()?
            } else if let Some(v) = part.strip_suffix('s') {
                v.trim().parse::<f64>().ok()? * 1000.0
            } else {
                return None;
            };
            (ms.is_finite() && ms >= 0.0).then(|| ms.round() as u32)
        })
        .max()
}
