//! Width tables for the standard Helvetica faces used in the summary table.
//!
//! The standard 14 PDF fonts carry no embedded metrics, so centering and
//! right-alignment need the AFM advance widths. Values are in 1/1000 em,
//! straight from the Adobe AFM files. Helvetica-Oblique shares the regular
//! widths.

/// The Helvetica faces the summary renderer draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

/// Advance widths for ASCII 0x20..=0x7E.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278,
    278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584,
    584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667,
    556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556, 278, 556, 556, 222,
    222, 500, 222, 833, 556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500,
    500, 500, 334, 260, 334, 584,
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278,
    278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584,
    584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611,
    833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333,
    278, 333, 584, 556, 333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278,
    556, 278, 889, 611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556,
    500, 389, 280, 389, 584,
];

/// Width of the Helvetica digit/letter block, used for characters the
/// tables do not cover.
const FALLBACK_WIDTH: u16 = 556;

/// All Helvetica ascenders are 718/1000 in the AFM data.
const ASCENDER: f64 = 718.0;

impl Font {
    pub const ALL: [Font; 3] = [Font::Helvetica, Font::HelveticaBold, Font::HelveticaOblique];

    /// The /BaseFont name in the PDF font dictionary.
    pub fn base_name(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
            Font::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    /// The resource name content streams select the font by.
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
            Font::HelveticaOblique => "F3",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            Font::Helvetica | Font::HelveticaOblique => &HELVETICA_WIDTHS,
            Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Distance from the top of the text box down to the baseline.
    pub fn ascent(self, size: f64) -> f64 {
        ASCENDER / 1000.0 * size
    }

    /// Advance width of a single character in points.
    pub fn char_width(self, ch: char, size: f64) -> f64 {
        let table = self.widths();
        let width = (ch as u32)
            .checked_sub(0x20)
            .and_then(|index| table.get(index as usize))
            .copied()
            .unwrap_or(FALLBACK_WIDTH);
        width as f64 / 1000.0 * size
    }

    /// Advance width of a string in points.
    pub fn text_width(self, text: &str, size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, size)).sum()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_space_width_matches_afm() {
        let w = Font::Helvetica.char_width(' ', 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = Font::Helvetica.text_width("Avenue", 12.0);
        let bold = Font::HelveticaBold.text_width("Avenue", 12.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_oblique_shares_regular_widths() {
        let regular = Font::Helvetica.text_width("Preview unavailable", 9.0);
        let oblique = Font::HelveticaOblique.text_width("Preview unavailable", 9.0);
        assert_eq!(regular, oblique);
    }

    #[test]
    fn test_unmapped_character_uses_fallback() {
        let w = Font::Helvetica.char_width('\u{2014}', 10.0);
        assert!((w - 5.56).abs() < 0.001);
    }

    #[test]
    fn test_text_width_sums_characters() {
        // H 722, i 222 at 10pt
        let w = Font::Helvetica.text_width("Hi", 10.0);
        assert!((w - 9.44).abs() < 0.001);
    }

    #[test]
    fn test_ascent_scales_with_size() {
        assert!((Font::HelveticaBold.ascent(16.0) - 11.488).abs() < 0.001);
    }
}
