//! Frame-skip and frame-rate throttling for rendering

use std::time::{Duration, Instant};

/// Decides which steps get drawn and sleeps to hold a frame rate
#[derive(Debug, Clone)]
pub struct FramePacer {
    frame_skip: u32,
    countdown: u32,
    frame_interval: Option<Duration>,
    last_frame: Option<Instant>,
}

impl FramePacer {
    /// Draw every `frame_skip` steps (at least 1), at most `fps` frames per second
    ///
    /// `fps == 0` disables throttling.
    pub fn new(frame_skip: u32, fps: u32) -> Self {
        let frame_skip = frame_skip.max(1);
        Self {
            frame_skip,
            countdown: frame_skip,
            frame_interval: (fps > 0).then(|| Duration::from_secs_f64(1.0 / fps as f64)),
            last_frame: None,
        }
    }

    /// Advance one step; true when this step should be drawn
    pub fn should_draw(&mut self) -> bool {
        self.countdown -= 1;
        if self.countdown > 0 {
            return false;
        }
        self.countdown = self.frame_skip;
        true
    }

    /// Sleep out the remainder of the current frame
    pub fn throttle(&mut self) {
        if let (Some(interval), Some(last)) = (self.frame_interval, self.last_frame) {
            let elapsed = last.elapsed();
            if elapsed < interval {
                std::thread::sleep(interval - elapsed);
            }
        }
        self.last_frame = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_step_without_skip() {
        let mut pacer = FramePacer::new(1, 0);
        assert!((0..5).all(|_| pacer.should_draw()));
    }

    #[test]
    fn test_zero_skip_treated_as_one() {
        let mut pacer = FramePacer::new(0, 0);
        assert!(pacer.should_draw());
        assert!(pacer.should_draw());
    }

    #[test]
    fn test_skip_pattern() {
        let mut pacer = FramePacer::new(2, 0);
        let drawn: Vec<bool> = (0..6).map(|_| pacer.should_draw()).collect();
        assert_eq!(drawn, vec![false, true, false, true, false, true]);
    }

    #[test]
    fn test_throttle_holds_frame_rate() {
        let mut pacer = FramePacer::new(1, 50);
        let start = Instant::now();
        for _ in 0..3 {
            pacer.throttle();
        }
        // first frame is free, the next two wait ~20ms each
        assert!(start.elapsed() >= Duration::from_millis(35));
    }

    #[test]
    fn test_unthrottled_is_fast() {
        let mut pacer = FramePacer::new(1, 0);
        let start = Instant::now();
        for _ in 0..100 {
            pacer.throttle();
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
