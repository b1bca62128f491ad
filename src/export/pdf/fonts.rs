//! Standard Type1 fonts and text measurement
//!
//! The PDF uses the base-14 Times and Courier faces, which every reader
//! ships, so no font program is embedded. Text is encoded as WinAnsi.

/// A font face used by the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
    Italic,
    BoldItalic,
    Mono,
}

impl FontFace {
    pub fn all() -> &'static [FontFace] {
        &[
            FontFace::Regular,
            FontFace::Bold,
            FontFace::Italic,
            FontFace::BoldItalic,
            FontFace::Mono,
        ]
    }

    /// Pick the serif face for the given emphasis.
    pub fn serif(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => FontFace::Regular,
            (true, false) => FontFace::Bold,
            (false, true) => FontFace::Italic,
            (true, true) => FontFace::BoldItalic,
        }
    }

    /// Name of the font in the page resource dictionary.
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
            FontFace::Italic => "F3",
            FontFace::BoldItalic => "F4",
            FontFace::Mono => "F5",
        }
    }

    /// PostScript name of the base-14 font.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontFace::Regular => "Times-Roman",
            FontFace::Bold => "Times-Bold",
            FontFace::Italic => "Times-Italic",
            FontFace::BoldItalic => "Times-BoldItalic",
            FontFace::Mono => "Courier",
        }
    }

    /// Advance width of one WinAnsi byte, in 1/1000 em.
    fn advance(&self, byte: u8) -> u16 {
        let table = match self {
            FontFace::Mono => return 600,
            // Upright metrics are used for the slanted faces too.
            FontFace::Regular | FontFace::Italic => &TIMES_ROMAN,
            FontFace::Bold | FontFace::BoldItalic => &TIMES_BOLD,
        };
        match byte {
            0x20..=0x7e => table[usize::from(byte - 0x20)],
            _ => 500,
        }
    }
}

/// Times-Roman widths for 0x20..=0x7E.
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 333, 333, 333, 500, 564, 250, 333, 250, 278, // sp - /
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444, // 0 - ?
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722, // @ - O
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500, // P - _
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500, // ` - o
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541, // p - ~
];

/// Times-Bold widths for 0x20..=0x7E.
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 333, 333, 333, 500, 570, 250, 333, 250, 278, // sp - /
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500, // 0 - ?
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778, // @ - O
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500, // P - _
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500, // ` - o
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520, // p - ~
];

/// Width of `text` in points when set in `face` at `size`.
pub fn text_width(face: FontFace, size: f32, text: &str) -> f32 {
    let units: u32 = to_win_ansi(text)
        .into_iter()
        .map(|b| u32::from(face.advance(b)))
        .sum();
    units as f32 * size / 1000.0
}

/// Encode text as WinAnsi (CP-1252) bytes.
///
/// Characters outside the code page become `?`; a few common symbols are
/// spelled out instead.
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\t' | '\n' | '\r' => out.push(b' '),
            ' '..='~' => out.push(c as u8),
            '\u{a0}'..='\u{ff}' => out.push(c as u32 as u8),
            '→' => out.extend_from_slice(b"->"),
            '←' => out.extend_from_slice(b"<-"),
            '✓' | '✔' => out.extend_from_slice(b"v"),
            _ => out.push(win_ansi_special(c).unwrap_or(b'?')),
        }
    }
    out
}

fn win_ansi_special(c: char) -> Option<u8> {
    let byte = match c {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => return None,
    };
    Some(byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passes_through() {
        assert_eq!(to_win_ansi("Hello, World!"), b"Hello, World!");
    }

    #[test]
    fn test_typographic_punctuation_maps_to_code_page() {
        assert_eq!(to_win_ansi("“a” – b — c…"), vec![
            0x93, b'a', 0x94, b' ', 0x96, b' ', b'b', b' ', 0x97, b' ', b'c', 0x85
        ]);
        assert_eq!(to_win_ansi("it’s"), vec![b'i', b't', 0x92, b's']);
    }

    #[test]
    fn test_latin1_and_unmapped_characters() {
        assert_eq!(to_win_ansi("é"), vec![0xe9]);
        assert_eq!(to_win_ansi("日"), b"?");
        assert_eq!(to_win_ansi("a → b"), b"a -> b");
    }

    #[test]
    fn test_courier_is_monospaced() {
        assert_eq!(text_width(FontFace::Mono, 10.0, "iiii"), 24.0);
        assert_eq!(text_width(FontFace::Mono, 10.0, "WWWW"), 24.0);
    }

    #[test]
    fn test_times_widths() {
        // "Hi" = H(722) + i(278)
        assert_eq!(text_width(FontFace::Regular, 10.0, "Hi"), 10.0);
        assert!(text_width(FontFace::Bold, 12.0, "Hello") > text_width(FontFace::Regular, 12.0, "Hello"));
    }

    #[test]
    fn test_resource_names_are_unique() {
        let mut names: Vec<_> = FontFace::all().iter().map(|f| f.resource_name()).collect();
        names.dedup();
        assert_eq!(names.len(), FontFace::all().len());
    }
}
