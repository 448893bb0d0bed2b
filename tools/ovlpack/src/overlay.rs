//! Packed color-plane overlay buffer and the rectangle rasterizer.
//!
//! The logical screen is 256x224. Eight horizontal pixels share one color
//! byte, and eight rows share one 32-byte stripe, so the whole color plane
//! fits in 28 stripes (896 bytes) after the 128-byte reserved plane.

use crate::error::BufferSizeError;

pub const WIDTH: i32 = 256;
pub const HEIGHT: i32 = 224;

pub const OVERLAY_SIZE: usize = 1024;
/// Bytes at the start of the buffer that belong to a separate plane and are never painted.
pub const RESERVED_PLANE: usize = 128;

pub const STRIPE_BYTES: usize = 32;
pub const STRIPES: usize = (OVERLAY_SIZE - RESERVED_PLANE) / STRIPE_BYTES;

bitflags::bitflags! {
    /// Per-pixel color bits as stored in the color plane.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct ColorBits: u8 {
        const RED   = 0b0000_0001;
        const BLUE  = 0b0000_0010;
        const GREEN = 0b0000_0100;
    }
}

impl ColorBits {
    /// Threshold each channel independently. Comparisons are strict.
    pub fn from_rgb(rgb: Rgb) -> Self {
        let mut bits = ColorBits::empty();
        if rgb.red > 0.49 {
            bits |= ColorBits::RED;
        }
        if rgb.green > 0.48 {
            bits |= ColorBits::GREEN;
        }
        if rgb.blue > 0.48 {
            bits |= ColorBits::BLUE;
        }
        bits
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

/// Integer rectangle in logical screen space. May extend off-screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScreenRect {
    pub const FULL: ScreenRect = ScreenRect { left: 0, top: 0, right: WIDTH, bottom: HEIGHT };

    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Pin every edge onto the screen. Keeps `right - 1` and `bottom - 1` from overflowing.
    fn clamped(self) -> Self {
        Self {
            left: self.left.clamp(0, WIDTH),
            top: self.top.clamp(0, HEIGHT),
            right: self.right.clamp(0, WIDTH),
            bottom: self.bottom.clamp(0, HEIGHT),
        }
    }
}

/// Maps a pixel to its index in the color plane (not counting the reserved plane).
///
/// Always in `0..896` for on-screen pixels.
pub fn packed_index(x: i32, y: i32) -> usize {
    let offset = ((y * WIDTH + x) >> 3) as usize;
    let index = ((offset >> 8) << 5) | (offset & 0x1F);
    debug_assert!(index < OVERLAY_SIZE - RESERVED_PLANE);
    index
}

#[derive(Clone, PartialEq, Eq)]
pub struct OverlayBuffer {
    bytes: [u8; OVERLAY_SIZE],
}

impl Default for OverlayBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OverlayBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let painted = self.color_plane().iter().filter(|b| **b != 0).count();
        f.debug_struct("OverlayBuffer").field("painted", &painted).finish()
    }
}

impl OverlayBuffer {
    pub fn new() -> Self {
        Self { bytes: [0; OVERLAY_SIZE] }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BufferSizeError> {
        let bytes: [u8; OVERLAY_SIZE] = bytes.try_into().map_err(|_| BufferSizeError {
            expected: OVERLAY_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; OVERLAY_SIZE] {
        &self.bytes
    }

    pub fn color_plane(&self) -> &[u8] {
        &self.bytes[RESERVED_PLANE..]
    }

    /// Color byte covering pixel `(x, y)`.
    pub fn pixel(&self, x: i32, y: i32) -> u8 {
        self.bytes[RESERVED_PLANE + packed_index(x, y)]
    }

    /// Paint `color` into every cell the rectangle covers.
    ///
    /// Bounds are clamped to the screen first. The last row and the last column
    /// (`bottom - 1`, `right - 1`) are left unpainted, so a rect needs to be at
    /// least 2 pixels wide and tall to touch anything. Later fills overwrite earlier ones.
    pub fn fill_rect(&mut self, rect: ScreenRect, color: ColorBits) {
        let rect = rect.clamped();

        for y in rect.top..rect.bottom - 1 {
            for x in rect.left..rect.right - 1 {
                self.bytes[RESERVED_PLANE + packed_index(x, y)] = color.bits();
            }
        }
    }

    /// Space-separated lowercase hex, two digits per byte, no trailing newline.
    pub fn to_hex_text(&self) -> String {
        self.bytes
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// One line per stripe, one character per color byte.
    pub fn stripe_map(&self) -> String {
        let mut out = String::with_capacity(STRIPES * (STRIPE_BYTES + 1));
        for stripe in self.color_plane().chunks(STRIPE_BYTES) {
            out.extend(stripe.iter().map(|b| color_char(*b)));
            out.push('\n');
        }
        out
    }
}

fn color_char(byte: u8) -> char {
    match byte & 0x07 {
        0 => '.',
        1 => 'R',
        2 => 'B',
        3 => 'M',
        4 => 'G',
        5 => 'Y',
        6 => 'C',
        _ => 'W',
    }
}
