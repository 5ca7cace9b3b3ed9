/// The delay and sound timers.
///
/// Both count down once per [`Timers::tick`], which the host calls at 60 Hz
/// no matter how many instructions it runs in between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Timers {
        Timers::default()
    }

    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// Whether the buzzer should sound.
    pub fn is_sound_active(&self) -> bool {
        self.sound > 0
    }

    pub fn reset(&mut self) {
        *self = Timers::default();
    }
}
