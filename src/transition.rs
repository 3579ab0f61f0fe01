//! Color transition engine.
//!
//! Provides [`Strip`], the single block of state shared between the periodic
//! tick and command dispatch: current and target color, mode, fade rate, the
//! tick countdown and the autosave flag. It also owns the [`RgbOutput`] so that
//! every push to the hardware happens under the same guard as the state it
//! reflects.

use crate::colors::{self, BLACK, Color};
use crate::config::{DEFAULT_FADE_RATE, INITIAL_COUNTDOWN, StartupDefaults};
use crate::hal::RgbOutput;
use crate::storage::PersistentRecord;
use crate::types::{FadeRate, Mode};

/// Outcome of one [`Strip::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Countdown still running, output untouched.
    Waiting,
    /// Fade step performed and pushed to the output.
    Stepped,
    /// Non-fading mode, current color re-pushed unchanged.
    Held,
}

/// The shared state block and the output it drives.
pub struct Strip<O: RgbOutput> {
    output: O,
    mode: Mode,
    current: Color,
    target: Color,
    fade_rate: FadeRate,
    countdown: u16,
    autosave: bool,
}

impl<O: RgbOutput> Strip<O> {
    /// Creates a strip in fading mode at black with the default fade rate.
    ///
    /// Nothing is pushed to the output until [`Strip::restore`],
    /// [`Strip::apply_defaults`] or the first tick.
    pub const fn new(output: O) -> Self {
        Self {
            output,
            mode: Mode::Fading,
            current: BLACK,
            target: BLACK,
            fade_rate: DEFAULT_FADE_RATE,
            countdown: INITIAL_COUNTDOWN,
            autosave: false,
        }
    }

    /// Advances the engine by one timer period.
    ///
    /// In fading mode the countdown is checked first: at zero it reloads from
    /// the fade rate and one step is taken, otherwise it is decremented and
    /// the output is left alone. Any other mode pushes the current color
    /// without stepping.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.mode.is_fading() {
            self.output.set_color(self.current);
            return TickOutcome::Held;
        }

        if self.countdown > 0 {
            self.countdown -= 1;
            return TickOutcome::Waiting;
        }

        self.countdown = self.fade_rate.ticks();
        self.step();
        TickOutcome::Stepped
    }

    /// Moves every channel of the current color one unit toward the target
    /// and pushes the result.
    pub fn step(&mut self) {
        self.current = colors::step_toward(self.current, self.target);
        self.output.set_color(self.current);
    }

    /// Sets the target color.
    ///
    /// In immediate mode the current color jumps to the target and is pushed
    /// right away.
    pub fn set_target(&mut self, target: Color) {
        self.target = target;
        if self.mode == Mode::Immediate {
            self.current = target;
            self.output.set_color(target);
        }
    }

    /// Sets the fade rate and restarts the countdown so the next step lands
    /// `max(rate, 1)` ticks from now.
    pub fn set_fade_rate(&mut self, rate: FadeRate) {
        self.fade_rate = rate;
        self.countdown = rate.ticks().saturating_sub(1);
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn set_autosave(&mut self, enabled: bool) {
        self.autosave = enabled;
    }

    /// Restores a persisted record. The current color starts at the restored
    /// target so there is no fade on power-up.
    pub fn restore(&mut self, record: PersistentRecord) {
        self.mode = record.mode;
        self.target = record.target;
        self.current = record.target;
        self.fade_rate = record.fade_rate;
        self.output.set_color(self.current);
    }

    /// Applies the compiled-in startup defaults.
    pub fn apply_defaults(&mut self, defaults: &StartupDefaults) {
        self.mode = defaults.mode;
        self.current = defaults.current;
        self.target = defaults.target;
        self.fade_rate = defaults.fade_rate;
        self.output.set_color(self.current);
    }

    /// Snapshot of the persisted fields.
    pub fn record(&self) -> PersistentRecord {
        PersistentRecord {
            mode: self.mode,
            target: self.target,
            fade_rate: self.fade_rate,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current(&self) -> Color {
        self.current
    }

    pub fn target(&self) -> Color {
        self.target
    }

    pub fn fade_rate(&self) -> FadeRate {
        self.fade_rate
    }

    pub fn autosave(&self) -> bool {
        self.autosave
    }

    /// Ticks left before the next fade step.
    pub fn countdown(&self) -> u16 {
        self.countdown
    }

    /// Returns true once the current color has reached the target.
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}
