//! Command line grammar.
//!
//! Commands are recognised by searching a line for a marker anywhere in it,
//! not only at the start. Markers are tried in a fixed priority order and
//! only the first hit is acted on:
//!
//! | priority | marker   | fields | ceiling |
//! |----------|----------|--------|---------|
//! | 1        | `RGB:`   | 3      | 255     |
//! | 2        | `DELAY:` | 1      | 999     |
//! | 3        | `MODE:`  | 1      | 255     |
//! | 4        | `status` | 0      |         |
//! | 5        | `help`   | 0      |         |
//! | 6        | `SAVE:`  | 1      | 999     |
//!
//! Each field is exactly three raw characters following the marker (or the
//! previous field). Field values above their ceiling are clamped, not
//! rejected. Short or non-numeric fields parse as whatever leading digits
//! are present, which may be none (zero). A leading sign is honoured; byte
//! sized fields then keep the low eight bits, so `-01` becomes 255.

use crate::colors::Color;
use crate::config::{COLOR_CEILING, DELAY_CEILING, MODE_CEILING, SAVE_CEILING};
use crate::types::{FadeRate, Mode};
use palette::Srgb;

/// Width of every numeric field, in characters.
pub const FIELD_WIDTH: usize = 3;

/// A parsed protocol command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `RGB:rrrgggbbb`
    SetColor(Color),
    /// `DELAY:ddd`
    SetDelay(FadeRate),
    /// `MODE:mmm`, raw value kept as-is.
    SetMode(Mode),
    /// `status`
    Status,
    /// `help`
    Help,
    /// `SAVE:sss`, zero disables.
    SetAutosave(bool),
}

/// One row of the command table.
struct CommandEntry {
    marker: &'static [u8],
    ceilings: &'static [u16],
    build: fn(&[i32]) -> Command,
}

fn build_color(fields: &[i32]) -> Command {
    Command::SetColor(Srgb::new(
        channel(fields[0]),
        channel(fields[1]),
        channel(fields[2]),
    ))
}

fn build_delay(fields: &[i32]) -> Command {
    // A tick count cannot go below zero
    Command::SetDelay(FadeRate::new(u16::try_from(fields[0]).unwrap_or(0)))
}

fn build_mode(fields: &[i32]) -> Command {
    Command::SetMode(Mode::from_raw(channel(fields[0])))
}

fn build_status(_: &[i32]) -> Command {
    Command::Status
}

fn build_help(_: &[i32]) -> Command {
    Command::Help
}

fn build_autosave(fields: &[i32]) -> Command {
    Command::SetAutosave(fields[0] != 0)
}

/// Keeps the low byte, so negative values wrap.
fn channel(value: i32) -> u8 {
    value as u8
}

/// Commands in match priority order.
const COMMAND_TABLE: [CommandEntry; 6] = [
    CommandEntry {
        marker: b"RGB:",
        ceilings: &[COLOR_CEILING, COLOR_CEILING, COLOR_CEILING],
        build: build_color,
    },
    CommandEntry {
        marker: b"DELAY:",
        ceilings: &[DELAY_CEILING],
        build: build_delay,
    },
    CommandEntry {
        marker: b"MODE:",
        ceilings: &[MODE_CEILING],
        build: build_mode,
    },
    CommandEntry {
        marker: b"status",
        ceilings: &[],
        build: build_status,
    },
    CommandEntry {
        marker: b"help",
        ceilings: &[],
        build: build_help,
    },
    CommandEntry {
        marker: b"SAVE:",
        ceilings: &[SAVE_CEILING],
        build: build_autosave,
    },
];

impl Command {
    /// Parses a received line.
    ///
    /// The line ends at the first NUL byte, if any. Returns `None` when no
    /// marker is found.
    pub fn parse(line: &[u8]) -> Option<Self> {
        let line = line
            .iter()
            .position(|&b| b == 0)
            .map_or(line, |end| &line[..end]);

        COMMAND_TABLE.iter().find_map(|entry| {
            let start = find(line, entry.marker)? + entry.marker.len();
            let mut fields = [0i32; 3];
            let mut cursor = start;
            for (slot, &ceiling) in fields.iter_mut().zip(entry.ceilings) {
                let end = (cursor + FIELD_WIDTH).min(line.len());
                *slot = parse_field(&line[cursor.min(end)..end], ceiling);
                cursor += FIELD_WIDTH;
            }
            Some((entry.build)(&fields[..entry.ceilings.len()]))
        })
    }

    /// Short name of the command, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetColor(_) => "RGB",
            Command::SetDelay(_) => "DELAY",
            Command::SetMode(_) => "MODE",
            Command::Status => "status",
            Command::Help => "help",
            Command::SetAutosave(_) => "SAVE",
        }
    }
}

/// Parses a fixed-width decimal field, capping it at `ceiling`.
///
/// Follows C `atoi` over at most [`FIELD_WIDTH`] characters: leading
/// whitespace is skipped, an optional sign is accepted, and parsing stops at
/// the first non-digit. Only the upper bound is enforced; a negative field
/// comes back negative.
pub fn parse_field(raw: &[u8], ceiling: u16) -> i32 {
    let raw = &raw[..raw.len().min(FIELD_WIDTH)];
    let mut bytes = raw
        .iter()
        .copied()
        .skip_while(|&b| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C))
        .peekable();

    let negative = match bytes.peek() {
        Some(&b'-') => {
            bytes.next();
            true
        }
        Some(&b'+') => {
            bytes.next();
            false
        }
        _ => false,
    };

    let mut value: i32 = 0;
    for byte in bytes.take_while(u8::is_ascii_digit) {
        value = value * 10 + i32::from(byte - b'0');
    }

    let value = if negative { -value } else { value };
    value.min(i32::from(ceiling))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
