use baize_advisor::Advisor;
use baize_core::Drill;

use crate::cache::{Advice, AdviceCache};
use crate::LoadState;

/// Practice stopwatch. The host calls [`tick`](DrillTimer::tick) once a
/// second; ticks while stopped are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrillTimer {
    running: bool,
    elapsed_secs: u64,
}

impl DrillTimer {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed_secs = 0;
    }

    pub fn tick(&mut self) {
        if self.running {
            self.elapsed_secs += 1;
        }
    }

    /// `m:ss`
    pub fn display(&self) -> String {
        format!("{}:{:02}", self.elapsed_secs / 60, self.elapsed_secs % 60)
    }
}

#[derive(Debug, Default)]
pub struct TrainingView {
    active_drill: Option<String>,
    timer: DrillTimer,
    tips: AdviceCache,
}

impl TrainingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_drill(&self) -> Option<&str> {
        self.active_drill.as_deref()
    }

    /// Expand a drill, or collapse it if it is already open.
    pub fn toggle_drill(&mut self, drill_id: &str) {
        if self.active_drill.as_deref() == Some(drill_id) {
            self.active_drill = None;
        } else {
            self.active_drill = Some(drill_id.to_string());
        }
    }

    pub fn timer(&self) -> &DrillTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut DrillTimer {
        &mut self.timer
    }

    /// Coaching tip for a drill, fetched at most once per session.
    pub async fn tip(&self, advisor: &Advisor, drill: &Drill) -> Advice {
        self.tips
            .get_or_fetch(&drill.id, || advisor.drill_tip(&drill.title))
            .await
    }

    pub fn cached_tip(&self, drill_id: &str) -> Option<String> {
        self.tips.get(drill_id)
    }

    pub fn tip_state(&self, drill_id: &str) -> LoadState {
        self.tips.state(drill_id)
    }
}
