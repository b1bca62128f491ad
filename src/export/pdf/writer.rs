//! PDF encoding with lopdf
//!
//! Builds the document object graph (fonts, shared resources, one content
//! stream per page, page tree, catalog, info) and serializes it.

use super::fonts::{to_win_ansi, FontFace};
use super::layout::{DrawOp, Page};
use super::stylesheet::{PrintStyle, Rgb};
use super::PdfError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

/// Encode laid-out pages into PDF bytes.
pub fn encode_pdf(pages: &[Page], style: &PrintStyle, title: &str) -> Result<Vec<u8>, PdfError> {
    let mut document = Document::with_version("1.5");
    let pages_id = document.new_object_id();

    let mut fonts = Dictionary::new();
    for face in FontFace::all() {
        let font_id = document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), font_id);
    }
    let resources_id = document.add_object(dictionary! {
        "Font" => fonts,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = page_content(page);
        let bytes = content
            .encode()
            .map_err(|e| PdfError::Encoding(e.to_string()))?;
        let content_id = document.add_object(Stream::new(Dictionary::new(), bytes));

        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), style.page_width.into(), style.page_height.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = document.add_object(dictionary! {
        "Title" => Object::String(to_win_ansi(title), StringFormat::Literal),
        "Producer" => Object::string_literal("mdconvert"),
    });
    document.trailer.set("Root", catalog_id);
    document.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    document
        .save_to(&mut bytes)
        .map_err(|e| PdfError::Encoding(e.to_string()))?;
    Ok(bytes)
}

/// Tracks graphics state so redundant operators are skipped.
#[derive(Default)]
struct PageWriter {
    operations: Vec<Operation>,
    font: Option<(FontFace, f32)>,
    fill: Option<Rgb>,
}

impl PageWriter {
    fn set_fill(&mut self, color: Rgb) {
        if self.fill != Some(color) {
            let [r, g, b] = color.to_pdf();
            self.operations
                .push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
            self.fill = Some(color);
        }
    }

    fn set_stroke(&mut self, color: Rgb, width: f32) {
        let [r, g, b] = color.to_pdf();
        self.operations
            .push(Operation::new("RG", vec![r.into(), g.into(), b.into()]));
        self.operations.push(Operation::new("w", vec![width.into()]));
    }

    fn set_font(&mut self, face: FontFace, size: f32) {
        if self.font != Some((face, size)) {
            self.operations.push(Operation::new(
                "Tf",
                vec![Object::Name(face.resource_name().as_bytes().to_vec()), size.into()],
            ));
            self.font = Some((face, size));
        }
    }

    fn draw(&mut self, op: &DrawOp) {
        match op {
            DrawOp::Text {
                x,
                y,
                face,
                size,
                color,
                text,
            } => {
                self.operations.push(Operation::new("BT", vec![]));
                self.set_font(*face, *size);
                self.set_fill(*color);
                self.operations
                    .push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                self.operations.push(Operation::new(
                    "Tj",
                    vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
                ));
                self.operations.push(Operation::new("ET", vec![]));
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                color,
            } => {
                self.set_fill(*color);
                self.operations.push(Operation::new(
                    "re",
                    vec![(*x).into(), (*y).into(), (*width).into(), (*height).into()],
                ));
                self.operations.push(Operation::new("f", vec![]));
            }
            DrawOp::StrokeRect {
                x,
                y,
                width,
                height,
                color,
                line_width,
            } => {
                self.set_stroke(*color, *line_width);
                self.operations.push(Operation::new(
                    "re",
                    vec![(*x).into(), (*y).into(), (*width).into(), (*height).into()],
                ));
                self.operations.push(Operation::new("S", vec![]));
            }
            DrawOp::Line {
                from,
                to,
                color,
                line_width,
            } => {
                self.set_stroke(*color, *line_width);
                self.operations
                    .push(Operation::new("m", vec![from.0.into(), from.1.into()]));
                self.operations
                    .push(Operation::new("l", vec![to.0.into(), to.1.into()]));
                self.operations.push(Operation::new("S", vec![]));
            }
        }
    }
}

fn page_content(page: &Page) -> Content {
    let mut writer = PageWriter::default();
    for op in &page.ops {
        writer.draw(op);
    }
    Content {
        operations: writer.operations,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text_page(text: &str) -> Page {
        Page {
            ops: vec![DrawOp::Text {
                x: 36.0,
                y: 800.0,
                face: FontFace::Regular,
                size: 11.0,
                color: Rgb::hex(0x333333),
                text: text.to_string(),
            }],
        }
    }

    #[test]
    fn test_encoded_pdf_reloads_with_all_pages() {
        let style = PrintStyle::default();
        let pages = vec![text_page("one"), text_page("two"), Page::default()];
        let bytes = encode_pdf(&pages, &style, "Test").unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let document = Document::load_mem(&bytes).unwrap();
        assert_eq!(document.get_pages().len(), 3);
    }

    #[test]
    fn test_text_is_written_uncompressed() {
        let bytes = encode_pdf(&[text_page("Hello")], &PrintStyle::default(), "T").unwrap();
        assert!(bytes.windows(7).any(|w| w == b"(Hello)"));
        assert!(bytes.windows(11).any(|w| w == b"Times-Roman"));
    }

    #[test]
    fn test_page_content_skips_redundant_fill_changes() {
        let color = Rgb::hex(0xf4f4f4);
        let rect = DrawOp::Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            color,
        };
        let content = page_content(&Page {
            ops: vec![rect.clone(), rect],
        });
        let fills = content
            .operations
            .iter()
            .filter(|op| op.operator == "rg")
            .count();
        assert_eq!(fills, 1);
    }
}
