//! Azimuth trajectory of the moving source.
//!
//! A sweep starts at the end angle, moves `move_width` angle units away from it,
//! turns, and comes back, `repeat_times` times. One trajectory step moves the
//! source by one unit, so a full sweep visits `2 * move_angle - 1` angles where
//! `move_angle = move_width * repeat_times + 1`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// Number of angle units in a full turn (tenths of a degree).
pub const FULL_TURN: i64 = 3600;

/// Azimuth in tenths of a degree, always in `[0, 3600)`.
///
/// Serialized as a bare integer; deserializing a value outside the range fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Angle(u16);

impl Angle {
    /// Wraps an arbitrary signed angle into `[0, 3600)`.
    pub fn wrapping(tenths: i64) -> Self {
        Angle(tenths.rem_euclid(FULL_TURN) as u16)
    }

    /// Accepts `tenths` only if it is already below a full turn.
    ///
    /// `name` is the parameter reported in the error.
    pub fn checked(name: &str, tenths: u32) -> RenderResult<Self> {
        if i64::from(tenths) >= FULL_TURN {
            return Err(RenderError::invalid_param(
                name,
                format!("must be below {}, got {}", FULL_TURN, tenths),
            ));
        }
        Ok(Angle::wrapping(i64::from(tenths)))
    }

    /// Angle in tenths of a degree.
    pub fn tenths(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for Angle {
    type Error = RenderError;

    fn try_from(tenths: u16) -> RenderResult<Self> {
        Angle::checked("angle", u32::from(tenths))
    }
}

impl From<Angle> for u16 {
    fn from(angle: Angle) -> u16 {
        angle.0
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sweep direction as seen from above the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Angles increase away from the end angle.
    Clockwise,
    /// Angles decrease away from the end angle.
    Counterclockwise,
}

impl Direction {
    /// Both directions, in render order.
    pub const ALL: [Direction; 2] = [Direction::Clockwise, Direction::Counterclockwise];

    /// Short tag used in output file names.
    pub fn tag(self) -> &'static str {
        match self {
            Direction::Clockwise => "c",
            Direction::Counterclockwise => "cc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Ear channel of a transfer function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Left ear.
    #[serde(rename = "L")]
    Left,
    /// Right ear.
    #[serde(rename = "R")]
    Right,
}

impl Channel {
    /// Both channels, in render order.
    pub const ALL: [Channel; 2] = [Channel::Left, Channel::Right];

    /// Tag used in transfer function and output file names.
    pub fn tag(self) -> &'static str {
        match self {
            Channel::Left => "L",
            Channel::Right => "R",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Shape of one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepParams {
    /// Sweep width in angle units.
    pub move_width: u32,
    /// Number of out-and-back cycles.
    pub repeat_times: u32,
    /// Which way the source leaves the end angle.
    pub direction: Direction,
    /// Angle the sweep starts and finishes at.
    pub end_angle: Angle,
}

impl SweepParams {
    /// `move_width * repeat_times + 1`.
    pub fn move_angle(&self) -> usize {
        self.move_width as usize * self.repeat_times as usize + 1
    }

    /// Number of trajectory steps, `2 * move_angle - 1`.
    pub fn step_count(&self) -> usize {
        2 * self.move_angle() - 1
    }

    /// Angles of every step, in order.
    pub fn trajectory(&self) -> Trajectory {
        Trajectory {
            params: *self,
            next: 0,
        }
    }
}

/// Signed distance of the source from the end angle at `step`.
///
/// The fold runs on the doubled step index so that the triangle has a single
/// peak sample at `move_width` and the halving below is always exact.
pub fn angle_offset(step: usize, params: &SweepParams) -> i64 {
    let width = i64::from(params.move_width);
    if width == 0 {
        return 0;
    }

    let period = 4 * width;
    let mut raw = (2 * step as i64) % period;
    if raw > 2 * width {
        raw = period - raw;
    }
    if params.direction == Direction::Counterclockwise {
        raw = -raw;
    }
    raw / 2
}

/// Azimuth of the source at `step`.
pub fn angle_at(step: usize, params: &SweepParams) -> Angle {
    Angle::wrapping(i64::from(params.end_angle.tenths()) + angle_offset(step, params))
}

/// Iterator over the angles of a sweep.
#[derive(Debug, Clone)]
pub struct Trajectory {
    params: SweepParams,
    next: usize,
}

impl Iterator for Trajectory {
    type Item = Angle;

    fn next(&mut self) -> Option<Angle> {
        if self.next >= self.params.step_count() {
            return None;
        }
        let angle = angle_at(self.next, &self.params);
        self.next += 1;
        Some(angle)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.params.step_count().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Trajectory {}
