//! Shared helpers for the easel demo programs.

use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Directory holding the demo assets: `EASEL_DATA_DIR` if set, otherwise
/// this crate's `data/` directory.
pub fn data_dir() -> PathBuf {
    std::env::var_os("EASEL_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"))
}

/// Path of an asset inside [`data_dir`].
pub fn data_path(name: &str) -> PathBuf {
    data_dir().join(name)
}

/// Average frames per second since creation.
#[derive(Debug)]
pub struct FpsCounter {
    start: Instant,
    frames: u64,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            frames: 0,
        }
    }

    pub fn frame(&mut self) {
        self.frames += 1;
    }

    pub fn fps(&self) -> f64 {
        let secs = self.start.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.frames as f64 / secs
        } else {
            0.0
        }
    }

    pub fn label(&self) -> String {
        format!("FPS: {:.2}", self.fps())
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Sleeps away the rest of a frame so that loops run at most `fps` times
/// per second.
#[derive(Debug)]
pub struct FrameLimiter {
    period: Duration,
    next: Instant,
}

impl FrameLimiter {
    pub fn new(fps: u32) -> Self {
        let period = Duration::from_secs(1) / fps.max(1);
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    pub fn wait(&mut self) {
        let now = Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
            self.next += self.period;
        } else {
            self.next = now + self.period;
        }
    }
}
