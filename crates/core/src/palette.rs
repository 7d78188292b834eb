//! Keyword → colour palette lookup and theme detection for placeholder
//! wallpapers.
//!
//! The table is ordered: the first keyword contained in the lower-cased
//! prompt wins. Lookup is total; unmatched prompts get [`DEFAULT_PALETTE`].

/// An sRGB colour.
pub type Rgb = [u8; 3];

/// Four gradient stops.
pub type Palette = [Rgb; 4];

const FIRE: Palette = [[0xcc, 0x00, 0x00], [0xff, 0x33, 0x00], [0xff, 0x66, 0x00], [0xff, 0xaa, 0x00]];
const WATER: Palette = [[0x00, 0x66, 0xcc], [0x00, 0x99, 0xff], [0x66, 0xcc, 0xff], [0x99, 0xdd, 0xff]];
const FOREST: Palette = [[0x22, 0x88, 0x33], [0x44, 0xaa, 0x44], [0x66, 0xcc, 0x66], [0x88, 0xdd, 0x88]];
const SUN: Palette = [[0xff, 0x66, 0x00], [0xff, 0x99, 0x00], [0xff, 0xcc, 0x00], [0xff, 0xdd, 0x44]];
const SPACE: Palette = [[0x00, 0x00, 0x33], [0x33, 0x00, 0x66], [0x66, 0x00, 0x99], [0x99, 0x00, 0xcc]];
const ICE: Palette = [[0x66, 0xcc, 0xff], [0x99, 0xdd, 0xff], [0xcc, 0xee, 0xee], [0xff, 0xff, 0xff]];
const ABSTRACT: Palette = [[0x63, 0x66, 0xf1], [0x8b, 0x5c, 0xf6], [0xec, 0x48, 0x99], [0xf5, 0x9e, 0x0b]];
const NEON: Palette = [[0xff, 0x00, 0xff], [0x00, 0xff, 0xff], [0xff, 0xff, 0x00], [0xff, 0x00, 0x80]];

/// Palette used when no keyword matches.
pub const DEFAULT_PALETTE: Palette = ABSTRACT;

/// Ordered keyword table.
pub const PALETTE_TABLE: &[(&str, Palette)] = &[
    ("dragon", [[0xff, 0x44, 0x44], [0xff, 0x88, 0x00], [0xff, 0xaa, 0x00], [0xff, 0x66, 0x00]]),
    ("fire", FIRE),
    ("flame", FIRE),
    ("burn", FIRE),
    ("ocean", WATER),
    ("water", WATER),
    ("sea", WATER),
    ("wave", WATER),
    ("forest", FOREST),
    ("nature", FOREST),
    ("tree", FOREST),
    ("sunset", SUN),
    ("sunrise", SUN),
    ("space", SPACE),
    ("cosmic", SPACE),
    ("galaxy", SPACE),
    ("star", SPACE),
    ("ice", ICE),
    ("snow", ICE),
    ("mountain", [[0x66, 0x66, 0x66], [0x88, 0x88, 0x88], [0xaa, 0xaa, 0xaa], [0xcc, 0xcc, 0xcc]]),
    ("desert", [[0xcc, 0x99, 0x66], [0xdd, 0xaa, 0x77], [0xee, 0xbb, 0x88], [0xff, 0xcc, 0x99]]),
    ("purple", [[0x66, 0x00, 0xcc], [0x88, 0x33, 0xdd], [0xaa, 0x66, 0xee], [0xcc, 0x99, 0xff]]),
    ("blue", [[0x00, 0x66, 0xcc], [0x33, 0x88, 0xdd], [0x66, 0xaa, 0xee], [0x99, 0xcc, 0xff]]),
    ("red", [[0xcc, 0x00, 0x00], [0xdd, 0x33, 0x33], [0xee, 0x66, 0x66], [0xff, 0x99, 0x99]]),
    ("green", [[0x00, 0xcc, 0x00], [0x33, 0xdd, 0x33], [0x66, 0xee, 0x66], [0x99, 0xff, 0x99]]),
    ("abstract", ABSTRACT),
    ("geometric", ABSTRACT),
    ("minimal", [[0xf8, 0xfa, 0xfc], [0xe2, 0xe8, 0xf0], [0xcb, 0xd5, 0xe1], [0x94, 0xa3, 0xb8]]),
    ("neon", NEON),
    ("cyberpunk", NEON),
];

/// Pick the palette for `prompt`.
pub fn palette_for_prompt(prompt: &str) -> Palette {
    let lower = prompt.to_lowercase();
    PALETTE_TABLE
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, palette)| *palette)
        .unwrap_or(DEFAULT_PALETTE)
}

// ---------------------------------------------------------------------------
// Themes
// ---------------------------------------------------------------------------

/// Shape overlays drawn on top of the gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Scattered bright dots.
    Starfield,
    /// Rotated translucent squares.
    Geometric,
    /// Horizontal sine strokes.
    Waves,
}

const THEME_KEYWORDS: &[(Theme, &[&str])] = &[
    (Theme::Starfield, &["space", "cosmic", "star"]),
    (Theme::Geometric, &["abstract", "geometric"]),
    (Theme::Waves, &["wave", "ocean", "water"]),
];

/// All themes whose keywords appear in `prompt`, in drawing order.
pub fn themes_for_prompt(prompt: &str) -> Vec<Theme> {
    let lower = prompt.to_lowercase();
    THEME_KEYWORDS
        .iter()
        .filter(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(theme, _)| *theme)
        .collect()
}
