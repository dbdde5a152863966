use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::state::NoticeLevel;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Teal used for bars and lines.
pub const SERIES_COLOR: Color32 = Color32::from_rgb(32, 178, 170);

// ---------------------------------------------------------------------------
// Notice colours
// ---------------------------------------------------------------------------

pub fn notice_color(level: NoticeLevel) -> Color32 {
    match level {
        NoticeLevel::Info => Color32::GRAY,
        NoticeLevel::Success => Color32::from_rgb(46, 160, 67),
        NoticeLevel::Warning => Color32::from_rgb(230, 160, 20),
        NoticeLevel::Error => Color32::RED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
