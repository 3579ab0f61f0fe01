//! Command dispatch against the shared strip state.

use crate::colors::Color;
use crate::command::Command;
use crate::hal::{PowerSense, RgbOutput};
use crate::transition::Strip;
use crate::types::{FadeRate, Mode, Unrecognized};

/// Static command reference returned by `help`.
pub const HELP_TEXT: &str = concat!(
    "RGB strip controller ",
    env!("CARGO_PKG_VERSION"),
    "\r\n",
    "Commands:\r\n",
    "  help\r\n",
    "  status\r\n",
    "  RGB:rrrgggbbb (rgb values 000-255)\r\n",
    "  MODE:mmm (001 immediate, 002 fading)\r\n",
    "  DELAY:ddd (000 fastest, 999 slowest)\r\n",
    "  SAVE:sss (000 disables autosave, anything else enables it. default is disabled.)\r\n",
);

/// Snapshot of the controller state for a `status` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub mode: Mode,
    pub fade_rate: FadeRate,
    pub autosave: bool,
    pub power_present: bool,
    pub current: Color,
    pub target: Color,
}

impl StatusReport {
    pub fn capture<O: RgbOutput, P: PowerSense + ?Sized>(strip: &Strip<O>, power: &P) -> Self {
        Self {
            mode: strip.mode(),
            fade_rate: strip.fade_rate(),
            autosave: strip.autosave(),
            power_present: power.is_power_present(),
            current: strip.current(),
            target: strip.target(),
        }
    }
}

fn enabled(flag: bool) -> &'static str {
    if flag { "enabled" } else { "disabled" }
}

struct Rgb(Color);

impl core::fmt::Display for Rgb {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}/{}", self.0.red, self.0.green, self.0.blue)
    }
}

impl core::fmt::Display for StatusReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Mode: {}\r\n", self.mode)?;
        write!(f, "Delay: {}\r\n", self.fade_rate)?;
        write!(f, "Autosave: {}\r\n", enabled(self.autosave))?;
        write!(f, "Strip power: {}\r\n", enabled(self.power_present))?;
        write!(f, "Current RGB Values: {}\r\n", Rgb(self.current))?;
        write!(f, "Target RGB Values: {}\r\n", Rgb(self.target))
    }
}

/// Payload of a successfully dispatched command.
///
/// Printed before the `OK` marker; setters have no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Ack,
    Status(StatusReport),
    Help,
}

impl core::fmt::Display for Reply {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Reply::Ack => Ok(()),
            Reply::Status(report) => core::fmt::Display::fmt(report, f),
            Reply::Help => f.write_str(HELP_TEXT),
        }
    }
}

/// Parses `line` and applies it to `strip`.
///
/// Must run with the tick suppressed: the setters touch fields the tick
/// reads, and `status` must not observe a half-applied step.
pub fn dispatch<O: RgbOutput, P: PowerSense + ?Sized>(
    line: &[u8],
    strip: &mut Strip<O>,
    power: &P,
) -> Result<Reply, Unrecognized> {
    let command = Command::parse(line).ok_or(Unrecognized)?;

    #[cfg(feature = "defmt")]
    defmt::debug!("dispatch {=str}", command.name());

    Ok(execute(command, strip, power))
}

/// Applies an already parsed command.
pub fn execute<O: RgbOutput, P: PowerSense + ?Sized>(
    command: Command,
    strip: &mut Strip<O>,
    power: &P,
) -> Reply {
    match command {
        Command::SetColor(color) => {
            strip.set_target(color);
            Reply::Ack
        }
        Command::SetDelay(rate) => {
            strip.set_fade_rate(rate);
            Reply::Ack
        }
        Command::SetMode(mode) => {
            strip.set_mode(mode);
            Reply::Ack
        }
        Command::Status => Reply::Status(StatusReport::capture(strip, power)),
        Command::Help => Reply::Help,
        Command::SetAutosave(enabled) => {
            strip.set_autosave(enabled);
            Reply::Ack
        }
    }
}
