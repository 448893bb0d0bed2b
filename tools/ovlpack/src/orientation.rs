//! Cabinet orientation classes and the layout -> screen coordinate transform.

use std::collections::HashMap;

use crate::overlay::{ScreenRect, WIDTH};

bitflags::bitflags! {
    /// How a game's monitor is mounted in the cabinet.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Orientation: u8 {
        /// Rotated 90 degrees.
        const VERTICAL = 0b0000_0001;
        /// Mirrored horizontally on top of the rotation. Ignored without `VERTICAL`.
        const FLIP     = 0b0000_0010;
    }
}

const BUILTIN: &[(&str, Orientation)] = &[
    ("invad2ct", Orientation::VERTICAL),
    ("invaders", Orientation::VERTICAL.union(Orientation::FLIP)),
    ("escmars", Orientation::VERTICAL.union(Orientation::FLIP)),
    ("galactic", Orientation::VERTICAL.union(Orientation::FLIP)),
    ("yosakdon", Orientation::VERTICAL.union(Orientation::FLIP)),
];

/// Game name -> orientation lookup. Unknown games are unrotated.
#[derive(Debug, Clone)]
pub struct OrientationTable {
    games: HashMap<String, Orientation>,
}

impl Default for OrientationTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl OrientationTable {
    pub fn empty() -> Self {
        Self { games: HashMap::new() }
    }

    pub fn builtin() -> Self {
        let games = BUILTIN
            .iter()
            .map(|(name, orientation)| (name.to_string(), *orientation))
            .collect();
        Self { games }
    }

    /// Add flags for `game`, keeping whatever it already had.
    pub fn insert(&mut self, game: impl Into<String>, orientation: Orientation) {
        *self.games.entry(game.into()).or_insert(Orientation::empty()) |= orientation;
    }

    pub fn get(&self, game: &str) -> Orientation {
        self.games.get(game).copied().unwrap_or(Orientation::empty())
    }
}

/// Bounds as declared in a layout, in the unrotated landscape space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayoutBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Round half to even, like the layout tooling these files come from.
fn round(v: f64) -> i32 {
    v.round_ties_even() as i32
}

/// Map declared bounds into logical screen space for a game mounted as `orientation`.
///
/// The result is not clamped; the rasterizer does that.
pub fn transform(bounds: LayoutBounds, orientation: Orientation) -> ScreenRect {
    let LayoutBounds { left, top, right, bottom } = bounds;
    let width = WIDTH as f64;

    if !orientation.contains(Orientation::VERTICAL) {
        return ScreenRect::new(round(left), round(top), round(right), round(bottom));
    }

    if orientation.contains(Orientation::FLIP) {
        ScreenRect::new(round(width - bottom), round(left), round(width - top), round(right))
    } else {
        ScreenRect::new(round(top), round(left), round(bottom), round(right))
    }
}
