use crate::debounce::Debouncer;
use std::fmt;
use std::time::{Duration, Instant};

pub const CAMERA_LOG_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CameraPosition {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for CameraPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}, {:.3}, {:.3}]", self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone)]
pub struct CameraLogger {
    debounce: Debouncer<CameraPosition>,
}

impl Default for CameraLogger {
    fn default() -> Self {
        Self::new(CAMERA_LOG_DELAY)
    }
}

impl CameraLogger {
    pub fn new(delay: Duration) -> Self {
        Self {
            debounce: Debouncer::new(delay),
        }
    }

    pub fn camera_moved(&mut self, now: Instant, position: CameraPosition) {
        self.debounce.call(now, position);
    }

    pub fn tick(&mut self, now: Instant) -> Option<CameraPosition> {
        let position = self.debounce.poll(now)?;
        log::info!("camera position: {position}");
        Some(position)
    }

    pub fn cancel(&mut self) {
        self.debounce.cancel();
    }
}
