/// Transient error message shown above every window.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorBanner {
    message: String,
    shown_at: f32,
    display_seconds: f32,
    fade_seconds: f32,
}

impl ErrorBanner {
    pub fn new(message: String, shown_at: f32, display_seconds: f32, fade_seconds: f32) -> Self {
        Self {
            message,
            shown_at,
            display_seconds,
            fade_seconds: fade_seconds.min(display_seconds),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Opaque until the fade window, then linear down to zero.
    pub fn alpha(&self, now: f32) -> f32 {
        let elapsed = now - self.shown_at;
        if elapsed >= self.display_seconds {
            return 0.0;
        }
        let fade_start = self.display_seconds - self.fade_seconds;
        if elapsed <= fade_start || self.fade_seconds <= 0.0 {
            return 1.0;
        }
        1.0 - (elapsed - fade_start) / self.fade_seconds
    }

    pub fn is_finished(&self, now: f32) -> bool {
        now - self.shown_at >= self.display_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_fades_over_the_last_second() {
        let banner = ErrorBanner::new("Inventory Full.".into(), 10.0, 3.0, 1.0);
        assert_eq!(banner.alpha(11.0), 1.0);
        assert_eq!(banner.alpha(12.0), 1.0);
        assert_eq!(banner.alpha(12.5), 0.5);
        assert_eq!(banner.alpha(13.0), 0.0);
        assert!(!banner.is_finished(12.9));
        assert!(banner.is_finished(13.0));
    }
}
