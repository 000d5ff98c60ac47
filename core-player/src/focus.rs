//! Audio focus bookkeeping.
//!
//! Focus losses stack: a transient loss remembers whether playback was
//! active, a duck remembers the applied volume factor, and regaining focus
//! undoes the recorded actions newest-first. Draining on every gain makes
//! repeated gain deliveries idempotent.

/// Volume multiplier applied while another application holds transient
/// focus with ducking allowed.
pub const DUCK_VOLUME_FACTOR: f64 = 0.5;

/// One action to perform when audio focus is regained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusRestore {
    /// Resume playback if it was active when focus was lost.
    Resume { was_playing: bool },
    /// Multiply volume by `factor` to undo an earlier duck.
    Unduck { factor: f64 },
}

/// LIFO stack of pending focus-restore actions.
#[derive(Debug, Default)]
pub struct FocusStack {
    actions: Vec<FocusRestore>,
}

impl FocusStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a full or transient loss.
    pub fn push_loss(&mut self, was_playing: bool) {
        self.actions.push(FocusRestore::Resume { was_playing });
    }

    /// Record a duck; the inverse factor restores the original volume.
    pub fn push_duck(&mut self) {
        self.actions.push(FocusRestore::Unduck {
            factor: 1.0 / DUCK_VOLUME_FACTOR,
        });
    }

    /// Take every pending action, newest first. Empty after a drain, so a
    /// second gain without an intervening loss restores nothing.
    pub fn drain(&mut self) -> Vec<FocusRestore> {
        let mut actions = std::mem::take(&mut self.actions);
        actions.reverse();
        actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }
}
