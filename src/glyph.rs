//! Zodiac symbols standing in for tile numerals.

const ZODIAC: [(u32, &str); 12] = [
    (2, "🐭"),
    (4, "🐮"),
    (8, "🐯"),
    (16, "🐰"),
    (32, "🐲"),
    (64, "🐍"),
    (128, "🐎"),
    (256, "🐑"),
    (512, "🐒"),
    (1024, "🐔"),
    (2048, "🐕"),
    (4096, "🐷"),
];

/// Symbol for a tile value; empty for 0 and anything past 4096.
pub fn tile_glyph(value: u32) -> &'static str {
    ZODIAC
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, glyph)| *glyph)
        .unwrap_or("")
}

/// Shown on the game-over screen for the best merged tile. Falls back to the
/// rat when nothing merged.
pub fn celebration_glyph(max_tile: u32) -> &'static str {
    match tile_glyph(max_tile) {
        "" => ZODIAC[0].1,
        glyph => glyph,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mapped_value_has_a_distinct_glyph() {
        let mut glyphs: Vec<&str> = ZODIAC.iter().map(|(v, _)| tile_glyph(*v)).collect();
        glyphs.sort();
        glyphs.dedup();
        assert_eq!(glyphs.len(), 12);
    }

    #[test]
    fn unmapped_values_are_blank() {
        assert_eq!(tile_glyph(0), "");
        assert_eq!(tile_glyph(3), "");
        assert_eq!(tile_glyph(8192), "");
    }

    #[test]
    fn celebration_defaults_to_rat() {
        assert_eq!(celebration_glyph(0), "🐭");
        assert_eq!(celebration_glyph(2048), "🐕");
    }
}
