//! Core value types shared by the protocol, the fade engine and persistence.

/// How writes to the target color reach the output.
///
/// The protocol stores whatever byte `MODE:` carries, so values other than the
/// two known modes are kept as [`Mode::Other`]. They never step the fade engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Target color is applied to the output as soon as it is set.
    Immediate,

    /// Current color walks toward the target one unit per qualifying tick.
    #[default]
    Fading,

    /// Any other raw mode byte.
    Other(u8),
}

impl Mode {
    /// Raw protocol value of [`Mode::Immediate`].
    pub const IMMEDIATE: u8 = 1;

    /// Raw protocol value of [`Mode::Fading`].
    pub const FADING: u8 = 2;

    /// Decodes a raw mode byte.
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            Self::IMMEDIATE => Mode::Immediate,
            Self::FADING => Mode::Fading,
            other => Mode::Other(other),
        }
    }

    /// Encodes the mode as the byte used on the wire and in storage.
    pub const fn as_raw(self) -> u8 {
        match self {
            Mode::Immediate => Self::IMMEDIATE,
            Mode::Fading => Self::FADING,
            Mode::Other(raw) => raw,
        }
    }

    /// Returns true for the erased (`0xFF`) and never-written (`0x00`) storage markers.
    pub const fn is_uninitialized_marker(raw: u8) -> bool {
        raw == 0x00 || raw == 0xFF
    }

    /// Returns true when the periodic tick should step the current color.
    #[inline]
    pub fn is_fading(self) -> bool {
        self == Mode::Fading
    }
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_raw())
    }
}

/// Number of ticks skipped between two fade steps, `0..=999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FadeRate(u16);

impl FadeRate {
    /// Slowest supported rate.
    pub const MAX: u16 = 999;

    /// Fastest rate: a step on every tick.
    pub const FASTEST: Self = FadeRate(0);

    /// Creates a fade rate, clamping values above [`FadeRate::MAX`].
    #[inline]
    pub const fn new(ticks: u16) -> Self {
        if ticks > Self::MAX {
            FadeRate(Self::MAX)
        } else {
            FadeRate(ticks)
        }
    }

    /// Returns the number of skipped ticks.
    #[inline]
    pub const fn ticks(self) -> u16 {
        self.0
    }

    /// Low byte of the rate, as kept in the single storage byte.
    ///
    /// Rates above 255 do not survive a save/load cycle.
    #[inline]
    pub const fn to_storage_byte(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

impl core::fmt::Display for FadeRate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A command line matched none of the known command markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Unrecognized;

impl core::fmt::Display for Unrecognized {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unrecognized command")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Unrecognized {}
