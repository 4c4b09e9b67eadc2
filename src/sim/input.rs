//! Player input as the scene consumes it
//!
//! Touch/keyboard decoding happens outside the core. The decoder queues
//! [`InputEvent`]s on the scene at any time; the scene drains them at the start
//! of its next tick, never mid-tick.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Steering vector, components in [-1, 1]
    Velocity { vx: f32, vy: f32 },
    /// Fire one player shot
    Fire,
    Pause,
    Resume,
    /// Open the quit confirmation while playing
    QuitMenu,
    QuitConfirm,
    QuitCancel,
    /// Acknowledge a screen (skips the result tally)
    Confirm,
}

/// Input state folded from one tick's worth of events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Last steering vector seen this tick, if any
    pub velocity: Option<(f32, f32)>,
    /// Shots requested this tick
    pub fire: u32,
    pub pause: bool,
    pub resume: bool,
    pub quit_menu: bool,
    pub quit_confirm: bool,
    pub quit_cancel: bool,
    pub confirm: bool,
}

impl TickInput {
    /// Fold a batch of events, in arrival order
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a InputEvent>) -> Self {
        let mut input = Self::default();
        for event in events {
            input.apply(event);
        }
        input
    }

    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Velocity { vx, vy } => {
                let clamp = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
                self.velocity = Some((clamp(vx), clamp(vy)));
            }
            InputEvent::Fire => self.fire += 1,
            InputEvent::Pause => self.pause = true,
            InputEvent::Resume => self.resume = true,
            InputEvent::QuitMenu => self.quit_menu = true,
            InputEvent::QuitConfirm => self.quit_confirm = true,
            InputEvent::QuitCancel => self.quit_cancel = true,
            InputEvent::Confirm => self.confirm = true,
        }
    }
}
