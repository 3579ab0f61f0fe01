//! 8-bit color helpers.
//!
//! The strip works on plain 8-bit channels with no gamma or color-space
//! correction, so [`Color`] is simply `palette::Srgb<u8>`. The helpers here
//! implement the single-unit convergence step used by the fade engine.

use palette::Srgb;

/// An RGB color with one 8-bit value per channel.
pub type Color = Srgb<u8>;

pub const BLACK: Color = Srgb::new(0, 0, 0);
pub const WHITE: Color = Srgb::new(255, 255, 255);
pub const RED: Color = Srgb::new(255, 0, 0);
pub const GREEN: Color = Srgb::new(0, 255, 0);
pub const BLUE: Color = Srgb::new(0, 0, 255);

/// Moves a single channel one unit toward `target`.
#[inline]
pub fn step_channel(current: u8, target: u8) -> u8 {
    match current.cmp(&target) {
        core::cmp::Ordering::Equal => current,
        core::cmp::Ordering::Greater => current - 1,
        core::cmp::Ordering::Less => current + 1,
    }
}

/// Moves every channel of `current` one unit toward `target`.
///
/// Channels converge independently and never overshoot.
#[inline]
pub fn step_toward(current: Color, target: Color) -> Color {
    Srgb::new(
        step_channel(current.red, target.red),
        step_channel(current.green, target.green),
        step_channel(current.blue, target.blue),
    )
}

/// Number of steps [`step_toward`] needs to turn `from` into `to`.
#[inline]
pub fn steps_between(from: Color, to: Color) -> u8 {
    from.red
        .abs_diff(to.red)
        .max(from.green.abs_diff(to.green))
        .max(from.blue.abs_diff(to.blue))
}
