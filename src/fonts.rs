/// The built-in Type1 fonts the composer can select. These are among
/// the 14 standard PDF fonts, available in every viewer without
/// embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    Courier,
    CourierBold,
}

impl Font {
    /// Every font the document registers, in resource-name order.
    pub const ALL: [Font; 4] = [
        Font::Helvetica,
        Font::HelveticaBold,
        Font::Courier,
        Font::CourierBold,
    ];

    /// Resource name used in content streams (`/F1 12 Tf`).
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
            Font::Courier => "F3",
            Font::CourierBold => "F4",
        }
    }

    /// The PDF BaseFont name.
    pub fn base_name(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
            Font::Courier => "Courier",
            Font::CourierBold => "Courier-Bold",
        }
    }

    /// Resolve a user-facing family name plus weight. "Arial" is an
    /// alias for Helvetica, matching what FPDF-style generators do.
    pub fn from_family(family: &str, bold: bool) -> Option<Font> {
        let family = family.trim();
        if family.eq_ignore_ascii_case("arial") || family.eq_ignore_ascii_case("helvetica") {
            Some(if bold { Font::HelveticaBold } else { Font::Helvetica })
        } else if family.eq_ignore_ascii_case("courier") {
            Some(if bold { Font::CourierBold } else { Font::Courier })
        } else {
            None
        }
    }

    /// Width of one character in 1/1000 em units.
    pub fn char_width(self, ch: char) -> u16 {
        match self {
            // Courier variants are monospaced.
            Font::Courier | Font::CourierBold => COURIER_WIDTH,
            Font::Helvetica | Font::HelveticaBold => {
                let code = ch as u32;
                if !(32..=126).contains(&code) {
                    return DEFAULT_WIDTH;
                }
                let index = (code - 32) as usize;
                match self {
                    Font::Helvetica => HELVETICA_WIDTHS[index],
                    _ => HELVETICA_BOLD_WIDTHS[index],
                }
            }
        }
    }

    /// Width of a string in points at the given size.
    pub fn text_width(self, text: &str, size_pt: f64) -> f64 {
        let total: u32 = text.chars().map(|ch| self.char_width(ch) as u32).sum();
        total as f64 * size_pt / 1000.0
    }
}

/// Helvetica character widths for ASCII 32..=126, in 1/1000 em.
/// Adobe Helvetica AFM data.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333,
    389, 584, 278, 333, 278, 278, 556, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 278, 278, 584, 584,
    584, 556, 1015, 667, 667, 722, 722, 667, 611, 778,
    722, 278, 500, 667, 556, 833, 722, 778, 667, 778,
    722, 667, 611, 722, 667, 944, 667, 667, 611, 278,
    278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500,
    500, 334, 260, 334, 584,
];

/// Helvetica-Bold character widths for ASCII 32..=126, in 1/1000 em.
/// Adobe Helvetica-Bold AFM data.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333,
    389, 584, 278, 333, 278, 278, 556, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 333, 333, 584, 584,
    584, 611, 975, 722, 722, 722, 722, 667, 611, 778,
    722, 278, 556, 722, 611, 833, 722, 778, 667, 778,
    722, 667, 611, 722, 667, 944, 667, 667, 611, 333,
    278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556,
    500, 389, 280, 389, 584,
];

const COURIER_WIDTH: u16 = 600;

/// Fallback for characters outside the mapped range.
const DEFAULT_WIDTH: u16 = 278;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arial_maps_to_helvetica() {
        assert_eq!(Font::from_family("Arial", false), Some(Font::Helvetica));
        assert_eq!(Font::from_family("arial", true), Some(Font::HelveticaBold));
        assert_eq!(Font::from_family("Helvetica", true), Some(Font::HelveticaBold));
        assert_eq!(Font::from_family("Courier", false), Some(Font::Courier));
        assert_eq!(Font::from_family("Comic Sans", false), None);
    }

    #[test]
    fn known_helvetica_widths() {
        assert_eq!(Font::Helvetica.char_width(' '), 278);
        assert_eq!(Font::Helvetica.char_width('W'), 944);
        assert_eq!(Font::Helvetica.char_width('i'), 222);
        assert_eq!(Font::HelveticaBold.char_width('i'), 278);
    }

    #[test]
    fn courier_is_monospaced() {
        assert_eq!(Font::Courier.char_width('W'), Font::Courier.char_width('i'));
        assert_eq!(Font::CourierBold.char_width('m'), 600);
    }

    #[test]
    fn out_of_range_chars_use_default_width() {
        assert_eq!(Font::Helvetica.char_width('✅'), 278);
        assert_eq!(Font::Helvetica.char_width('\u{7f}'), 278);
    }

    #[test]
    fn text_width_scales_with_size() {
        // "Hi" = 722 + 222 = 944/1000 em.
        let w12 = Font::Helvetica.text_width("Hi", 12.0);
        let w24 = Font::Helvetica.text_width("Hi", 24.0);
        assert!((w12 - 11.328).abs() < 1e-9);
        assert!((w24 - 2.0 * w12).abs() < 1e-9);
    }

    #[test]
    fn resource_names_are_unique() {
        let mut names: Vec<&str> = Font::ALL.iter().map(|f| f.resource_name()).collect();
        names.dedup();
        assert_eq!(names.len(), Font::ALL.len());
    }
}
