//! Color utilities for plots

use egui::Color32;

/// Dry compounds in stint order, then wet-weather tyres
pub const COMPOUNDS: [&str; 5] = ["SOFT", "MEDIUM", "HARD", "INTERMEDIATE", "WET"];

pub const ACCENT: Color32 = Color32::from_rgb(0xe9, 0x45, 0x60);
pub const LAP_GREEN: Color32 = Color32::from_rgb(0x2c, 0xa0, 0x2c);
pub const AXIS_BLUE: Color32 = Color32::from_rgb(0x1f, 0x77, 0xb4);
pub const BRUSH_RED: Color32 = Color32::from_rgb(0xe3, 0x1a, 0x1c);
pub const MUTED_GRAY: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);

/// Colour of a tyre compound; unknown values fall back to gray
pub fn compound_color(compound: &str) -> Color32 {
    match compound {
        "SOFT" => Color32::from_rgb(0xff, 0x33, 0x33),
        "MEDIUM" => Color32::from_rgb(0xff, 0xff, 0x00),
        "HARD" => Color32::from_rgb(0xff, 0xff, 0xff),
        "INTERMEDIATE" => Color32::from_rgb(0x33, 0xcc, 0x33),
        "WET" => Color32::from_rgb(0x00, 0x66, 0xff),
        _ => Color32::from_gray(0x88),
    }
}

/// Compound colour on a light background, where white hards vanish
pub fn strip_compound_color(compound: &str) -> Color32 {
    match compound {
        "HARD" => Color32::from_rgb(0xd9, 0xd9, 0xd9),
        other => compound_color(other),
    }
}

/// Get a categorical color from a palette
pub fn categorical_color(index: usize) -> Color32 {
    const PALETTE: &[Color32] = &[
        Color32::from_rgb(100, 150, 250),
        Color32::from_rgb(250, 150, 100),
        Color32::from_rgb(150, 250, 100),
        Color32::from_rgb(250, 100, 150),
        Color32::from_rgb(150, 100, 250),
        Color32::from_rgb(250, 250, 100),
        Color32::from_rgb(100, 250, 250),
        Color32::from_rgb(250, 100, 100),
    ];
    PALETTE[index % PALETTE.len()]
}

/// Hex notation for logs and the terminal panel
pub fn to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}
