//! # Frame Statistics
//!
//! Frame timing for the always-on-top stats overlay: a ring buffer of recent
//! frame times feeding fps / min / max, plus the draw-call and triangle
//! counts of the last frame.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Metrics displayed by the overlay
#[derive(Debug, Clone, Copy)]
pub struct FrameStats {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub min_frame_time_ms: f32,
    pub max_frame_time_ms: f32,
    pub draw_calls: u32,
    pub triangle_count: u32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: f32::MAX,
            max_frame_time_ms: 0.0,
            draw_calls: 0,
            triangle_count: 0,
        }
    }
}

/// Frame timing collector; one begin/end pair per rendered frame
pub struct FrameTimer {
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    frame_start: Option<Instant>,
    stats: FrameStats,
    last_update: Instant,
    update_interval: Duration,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(120), // ~2 seconds at 60fps
            max_samples: 120,
            frame_start: None,
            stats: FrameStats::default(),
            last_update: Instant::now(),
            update_interval: Duration::from_millis(100),
        }
    }

    pub fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    pub fn end_frame(&mut self) {
        if let Some(start) = self.frame_start.take() {
            if self.frame_times.len() >= self.max_samples {
                self.frame_times.pop_front();
            }
            self.frame_times.push_back(start.elapsed());

            // Recompute periodically instead of every frame
            if self.last_update.elapsed() >= self.update_interval {
                self.update_stats();
                self.last_update = Instant::now();
            }
        }
    }

    pub fn set_render_stats(&mut self, draw_calls: u32, triangle_count: u32) {
        self.stats.draw_calls = draw_calls;
        self.stats.triangle_count = triangle_count;
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    fn update_stats(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let total: Duration = self.frame_times.iter().sum();
        let average_ms = total.as_secs_f32() * 1000.0 / self.frame_times.len() as f32;

        self.stats.frame_time_ms = average_ms;
        self.stats.fps = if average_ms > 0.0 {
            1000.0 / average_ms
        } else {
            0.0
        };

        if let (Some(min), Some(max)) =
            (self.frame_times.iter().min(), self.frame_times.iter().max())
        {
            self.stats.min_frame_time_ms = min.as_secs_f32() * 1000.0;
            self.stats.max_frame_time_ms = max.as_secs_f32() * 1000.0;
        }
    }

    /// Renders the compact always-on-top overlay in the top-right corner
    ///
    /// Attached to the display, independent of the configuration panel.
    pub fn render_overlay(&self, ui: &imgui::Ui) {
        let display_size = ui.io().display_size;
        let stats = &self.stats;

        ui.window("Frame Stats")
            .size([150.0, 90.0], imgui::Condition::Always)
            .position([display_size[0] - 160.0, 10.0], imgui::Condition::Always)
            .no_decoration()
            .no_inputs()
            .bg_alpha(0.35)
            .build(|| {
                ui.text(format!("FPS: {:.0}", stats.fps));
                ui.text(format!("{:.2} ms", stats.frame_time_ms));
                ui.text(format!("draws: {}", stats.draw_calls));
                ui.text(format!("tris: {}", stats.triangle_count));
            });
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
