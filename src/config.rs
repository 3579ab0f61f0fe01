//! Compile-time configuration and startup defaults.

use crate::colors::{BLACK, Color, WHITE};
use crate::types::{FadeRate, Mode};

/// Capacity of the serial command line buffer, terminator included.
pub const LINE_CAPACITY: usize = 16;

/// Storage offset of the first byte of the persisted record.
pub const STORAGE_BASE: usize = 0x10;

/// Fade rate used until a command or a stored record sets one.
pub const DEFAULT_FADE_RATE: FadeRate = FadeRate::new(1);

/// Ticks before the first fade step after power-up.
pub const INITIAL_COUNTDOWN: u16 = 100;

/// Ceiling applied to each `RGB:` channel field.
pub const COLOR_CEILING: u16 = 255;

/// Ceiling applied to the `DELAY:` field.
pub const DELAY_CEILING: u16 = FadeRate::MAX;

/// Ceiling applied to the `MODE:` field.
pub const MODE_CEILING: u16 = 255;

/// Ceiling applied to the `SAVE:` field.
pub const SAVE_CEILING: u16 = 999;

/// State applied at startup when storage holds no configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartupDefaults {
    pub mode: Mode,
    pub current: Color,
    pub target: Color,
    pub fade_rate: FadeRate,
}

impl Default for StartupDefaults {
    fn default() -> Self {
        Self {
            mode: Mode::Fading,
            current: BLACK,
            target: WHITE,
            fade_rate: DEFAULT_FADE_RATE,
        }
    }
}

/// Runtime wiring options for a [`Coordinator`](crate::Coordinator).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatorConfig {
    /// Storage offset of the persisted record.
    pub storage_base: usize,

    /// Applied when storage is uninitialized.
    pub defaults: StartupDefaults,

    /// Print the help text and a ready marker from [`Coordinator::start`](crate::Coordinator::start).
    pub banner: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            storage_base: STORAGE_BASE,
            defaults: StartupDefaults::default(),
            banner: true,
        }
    }
}
