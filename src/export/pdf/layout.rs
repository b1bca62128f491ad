//! Print layout
//!
//! Turns the wrapped print document into positioned drawing operations on
//! A4 pages. The document is parsed with html5ever, flattened into blocks
//! (paragraphs, headings, list items, code, rules, table rows) and then
//! flowed onto pages with greedy word wrapping.

use super::fonts::{text_width, FontFace};
use super::stylesheet::{PrintStyle, Rgb};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::mem;

const QUOTE_INDENT: f32 = 16.0;
const QUOTE_BAR_WIDTH: f32 = 3.0;
const LIST_INDENT: f32 = 18.0;
const MARKER_GAP: f32 = 4.0;
const CODE_PADDING: f32 = 6.0;
const CELL_PADDING: f32 = 4.0;
/// Deepest quote or list nesting that still moves the indent.
const MAX_VISUAL_NESTING: usize = 6;
const STROKE_WIDTH: f32 = 0.75;
/// Baseline offset below the top of the em box.
const ASCENT: f32 = 0.8;

// ─────────────────────────────────────────────────────────────────────────────
// Output
// ─────────────────────────────────────────────────────────────────────────────

/// A positioned drawing operation in PDF user space (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// A run of text; `y` is the baseline
    Text {
        x: f32,
        y: f32,
        face: FontFace,
        size: f32,
        color: Rgb,
        text: String,
    },
    /// A filled rectangle
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    /// A stroked rectangle outline
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
        line_width: f32,
    },
    /// A straight line
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Rgb,
        line_width: f32,
    },
}

/// One laid-out page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

/// Lay out an HTML document onto pages. Always yields at least one page.
pub fn layout_document(html: &str, style: &PrintStyle) -> Vec<Page> {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    let mut collector = Collector::default();
    collector.walk(&dom.document);
    collector.flush();

    let mut paginator = Paginator::new(style);
    for block in &collector.blocks {
        paginator.block(block);
    }
    paginator.finish()
}

// ─────────────────────────────────────────────────────────────────────────────
// Block collection
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
struct Span {
    text: String,
    bold: bool,
    italic: bool,
    mono: bool,
    link: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Inline {
    Text(Span),
    Break,
}

#[derive(Debug, Clone, PartialEq)]
struct Cell {
    inline: Vec<Inline>,
    header: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum TextRole {
    Paragraph,
    Heading(u8),
    ListItem(String),
}

#[derive(Debug, Clone, PartialEq)]
enum BlockKind {
    Text { role: TextRole, inline: Vec<Inline> },
    Code(String),
    Rule,
    Row(Vec<Cell>),
    /// Vertical space in multiples of the body size
    Gap(f32),
}

#[derive(Debug, Clone, PartialEq)]
struct Block {
    kind: BlockKind,
    quote: u8,
    depth: u8,
}

#[derive(Debug, Clone, Copy)]
struct ListContext {
    ordered: bool,
    next: u32,
}

#[derive(Debug, Default)]
struct Collector {
    blocks: Vec<Block>,
    inline: Vec<Inline>,
    bold: u32,
    italic: u32,
    mono: u32,
    link: u32,
    quote: u32,
    lists: Vec<ListContext>,
    pending_marker: Option<String>,
    heading: Option<u8>,
    code: Option<String>,
    row: Option<Vec<Cell>>,
}

impl Collector {
    fn walk(&mut self, node: &Handle) {
        match node.data {
            NodeData::Document => self.children(node),
            NodeData::Text { ref contents } => self.text(&contents.borrow()),
            NodeData::Element {
                ref name,
                ref attrs,
                ..
            } => {
                let alt = attrs
                    .borrow()
                    .iter()
                    .find(|a| &*a.name.local == "alt")
                    .map(|a| a.value.to_string());
                self.element(&name.local, node, alt);
            }
            _ => {}
        }
    }

    fn children(&mut self, node: &Handle) {
        for child in node.children.borrow().iter() {
            self.walk(child);
        }
    }

    fn element(&mut self, tag: &str, node: &Handle, alt: Option<String>) {
        match tag {
            "head" | "script" | "style" | "title" | "template" | "noscript" => {}
            "p" | "div" => {
                self.flush();
                self.children(node);
                self.flush();
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.flush();
                self.heading = Some(tag.as_bytes()[1] - b'0');
                self.children(node);
                self.flush();
                self.heading = None;
            }
            "br" => self.inline.push(Inline::Break),
            "strong" | "b" => {
                self.bold += 1;
                self.children(node);
                self.bold -= 1;
            }
            "em" | "i" => {
                self.italic += 1;
                self.children(node);
                self.italic -= 1;
            }
            "code" | "kbd" | "samp" if self.code.is_none() => {
                self.mono += 1;
                self.children(node);
                self.mono -= 1;
            }
            "a" => {
                self.link += 1;
                self.children(node);
                self.link -= 1;
            }
            "img" => {
                if let Some(alt) = alt.filter(|a| !a.trim().is_empty()) {
                    self.text(&format!("[{}]", alt));
                }
            }
            "ul" | "ol" => {
                self.flush();
                self.lists.push(ListContext {
                    ordered: tag == "ol",
                    next: 1,
                });
                self.children(node);
                self.flush();
                self.lists.pop();
            }
            "li" => {
                self.flush();
                let marker = match self.lists.last_mut() {
                    Some(list) if list.ordered => {
                        let marker = format!("{}.", list.next);
                        list.next += 1;
                        marker
                    }
                    _ => "•".to_string(),
                };
                self.pending_marker = Some(marker);
                self.children(node);
                self.flush();
                self.pending_marker = None;
            }
            "blockquote" => {
                self.flush();
                let outer = self.quote;
                self.quote = outer.saturating_add(1);
                self.children(node);
                self.flush();
                self.quote = outer;
            }
            "pre" => {
                self.flush();
                self.code = Some(String::new());
                self.children(node);
                if let Some(code) = self.code.take() {
                    self.push(BlockKind::Code(code.trim_end_matches('\n').to_string()));
                }
            }
            "hr" => {
                self.flush();
                self.push(BlockKind::Rule);
            }
            "table" => {
                self.flush();
                self.children(node);
                self.inline.clear();
                self.push(BlockKind::Gap(0.6));
            }
            "tr" => {
                self.row = Some(Vec::new());
                self.children(node);
                if let Some(cells) = self.row.take().filter(|c| !c.is_empty()) {
                    self.push(BlockKind::Row(cells));
                }
            }
            "th" | "td" => {
                let outer = mem::take(&mut self.inline);
                self.children(node);
                let inline = mem::replace(&mut self.inline, outer);
                if let Some(row) = self.row.as_mut() {
                    row.push(Cell {
                        inline,
                        header: tag == "th",
                    });
                }
            }
            _ => self.children(node),
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = self.code.as_mut() {
            code.push_str(text);
            return;
        }
        self.inline.push(Inline::Text(Span {
            text: text.to_string(),
            bold: self.bold > 0,
            italic: self.italic > 0,
            mono: self.mono > 0,
            link: self.link > 0,
        }));
    }

    /// Close the pending inline content as a text block.
    fn flush(&mut self) {
        if is_blank(&self.inline) {
            self.inline.clear();
            return;
        }
        let inline = mem::take(&mut self.inline);
        let role = match (self.heading, self.pending_marker.take()) {
            (Some(level), _) => TextRole::Heading(level),
            (None, Some(marker)) => TextRole::ListItem(marker),
            (None, None) => TextRole::Paragraph,
        };
        self.push(BlockKind::Text { role, inline });
    }

    fn push(&mut self, kind: BlockKind) {
        self.blocks.push(Block {
            kind,
            quote: (self.quote as usize).min(MAX_VISUAL_NESTING) as u8,
            depth: self.lists.len().min(MAX_VISUAL_NESTING) as u8,
        });
    }
}

fn is_blank(inline: &[Inline]) -> bool {
    inline.iter().all(|item| match item {
        Inline::Text(span) => span.text.trim().is_empty(),
        Inline::Break => true,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Line breaking
// ─────────────────────────────────────────────────────────────────────────────

/// A run of text on a line, `x` relative to the line start.
#[derive(Debug, Clone, PartialEq)]
struct Fragment {
    x: f32,
    face: FontFace,
    size: f32,
    color: Rgb,
    text: String,
}

type Line = Vec<Fragment>;

/// Resolves span styling into concrete faces and colors.
#[derive(Debug, Clone, Copy)]
struct TextLook {
    size: f32,
    code_size: f32,
    bold: bool,
    color: Rgb,
    link: Rgb,
}

impl TextLook {
    fn resolve(&self, span: &Span) -> (FontFace, f32, Rgb) {
        let color = if span.link { self.link } else { self.color };
        if span.mono {
            (FontFace::Mono, self.code_size, color)
        } else {
            (
                FontFace::serif(self.bold || span.bold, span.italic),
                self.size,
                color,
            )
        }
    }
}

#[derive(Default)]
struct LineBuilder {
    lines: Vec<Line>,
    line: Line,
    width: f32,
}

impl LineBuilder {
    fn break_line(&mut self) {
        self.lines.push(mem::take(&mut self.line));
        self.width = 0.0;
    }

    fn append(&mut self, face: FontFace, size: f32, color: Rgb, space: bool, text: &str) {
        let space_width = if space && !self.line.is_empty() {
            text_width(face, size, " ")
        } else {
            0.0
        };
        let width = text_width(face, size, text);

        if let Some(last) = self.line.last_mut() {
            if last.face == face && last.size == size && last.color == color {
                if space_width > 0.0 {
                    last.text.push(' ');
                }
                last.text.push_str(text);
                self.width += space_width + width;
                return;
            }
        }
        self.line.push(Fragment {
            x: self.width + space_width,
            face,
            size,
            color,
            text: text.to_string(),
        });
        self.width += space_width + width;
    }

    fn word(&mut self, word: &str, face: FontFace, size: f32, color: Rgb, space: bool, max: f32) {
        let space_width = if space && !self.line.is_empty() {
            text_width(face, size, " ")
        } else {
            0.0
        };
        let width = text_width(face, size, word);
        if !self.line.is_empty() && self.width + space_width + width > max {
            self.break_line();
        }
        if width <= max {
            self.append(face, size, color, space, word);
            return;
        }

        // Split words wider than the line at character boundaries.
        let mut chunk = String::new();
        for c in word.chars() {
            chunk.push(c);
            if self.width + text_width(face, size, &chunk) > max && chunk.chars().count() > 1 {
                chunk.pop();
                self.append(face, size, color, false, &chunk);
                self.break_line();
                chunk.clear();
                chunk.push(c);
            }
        }
        if !chunk.is_empty() {
            self.append(face, size, color, false, &chunk);
        }
    }

    fn finish(mut self) -> Vec<Line> {
        if !self.line.is_empty() {
            self.lines.push(self.line);
        }
        self.lines
    }
}

/// Greedy word wrap of inline content into lines no wider than `max`.
fn wrap(inline: &[Inline], look: &TextLook, max: f32) -> Vec<Line> {
    let mut builder = LineBuilder::default();
    let mut pending_space = false;

    for item in inline {
        let span = match item {
            Inline::Break => {
                builder.break_line();
                pending_space = false;
                continue;
            }
            Inline::Text(span) => span,
        };
        let (face, size, color) = look.resolve(span);
        if span.text.starts_with(char::is_whitespace) {
            pending_space = true;
        }
        let mut any = false;
        for word in span.text.split_whitespace() {
            builder.word(word, face, size, color, pending_space, max);
            pending_space = true;
            any = true;
        }
        if any {
            pending_space = span.text.ends_with(char::is_whitespace);
        }
    }
    builder.finish()
}

/// Split a code line into chunks that fit `max` points in Courier.
fn wrap_code_line(line: &str, size: f32, max: f32) -> Vec<String> {
    let per_line = ((max / text_width(FontFace::Mono, size, " ")).floor() as usize).max(1);
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(per_line)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Pagination
// ─────────────────────────────────────────────────────────────────────────────

struct Paginator<'a> {
    style: &'a PrintStyle,
    pages: Vec<Page>,
    ops: Vec<DrawOp>,
    /// Top of the next line box
    cursor: f32,
}

impl<'a> Paginator<'a> {
    fn new(style: &'a PrintStyle) -> Self {
        Self {
            style,
            pages: Vec::new(),
            ops: Vec::new(),
            cursor: style.page_height - style.margin,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Page {
            ops: mem::take(&mut self.ops),
        });
        self.cursor = self.style.page_height - self.style.margin;
    }

    /// Start a new page unless `height` still fits. A fresh page always accepts.
    fn ensure(&mut self, height: f32) {
        if self.cursor - height < self.style.margin && !self.ops.is_empty() {
            self.new_page();
        }
    }

    fn gap(&mut self, height: f32) {
        if !self.ops.is_empty() {
            self.cursor -= height;
        }
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.new_page();
        }
        self.pages
    }

    fn baseline(&self, line_height: f32, size: f32) -> f32 {
        self.cursor - (line_height - size) / 2.0 - size * ASCENT
    }

    fn block(&mut self, block: &Block) {
        let style = self.style;
        let left = style.margin
            + f32::from(block.quote) * QUOTE_INDENT
            + f32::from(block.depth) * LIST_INDENT;
        let width = (style.page_width - style.margin - left).max(LIST_INDENT);

        match &block.kind {
            BlockKind::Text { role, inline } => {
                self.text_block(role, inline, block.quote, left, width)
            }
            BlockKind::Code(code) => self.code_block(code, block.quote, left, width),
            BlockKind::Rule => self.rule(left, width),
            BlockKind::Row(cells) => self.table_row(cells, left, width),
            BlockKind::Gap(em) => self.gap(em * style.body_size),
        }
    }

    fn quote_bars(&mut self, quote: u8, height: f32) {
        for depth in 0..quote {
            self.ops.push(DrawOp::Rect {
                x: self.style.margin + f32::from(depth) * QUOTE_INDENT,
                y: self.cursor - height,
                width: QUOTE_BAR_WIDTH,
                height,
                color: self.style.quote_border,
            });
        }
    }

    fn text_block(&mut self, role: &TextRole, inline: &[Inline], quote: u8, left: f32, width: f32) {
        let style = self.style;
        let (size, bold, color) = match role {
            TextRole::Heading(level) => (style.heading_size(*level), true, style.heading),
            _ if quote > 0 => (style.body_size, false, style.quote_text),
            _ => (style.body_size, false, style.text),
        };
        let look = TextLook {
            size,
            code_size: style.code_size().min(size),
            bold,
            color,
            link: style.link,
        };
        let line_height = size * style.line_height;

        if let TextRole::Heading(_) = role {
            self.gap(size * 0.6);
        }

        for (index, line) in wrap(inline, &look, width).iter().enumerate() {
            self.ensure(line_height);
            let baseline = self.baseline(line_height, size);
            self.quote_bars(quote, line_height);

            if let (0, TextRole::ListItem(marker)) = (index, role) {
                let face = FontFace::serif(bold, false);
                let marker_width = text_width(face, size, marker);
                self.ops.push(DrawOp::Text {
                    x: left - MARKER_GAP - marker_width,
                    y: baseline,
                    face,
                    size,
                    color,
                    text: marker.clone(),
                });
            }
            for fragment in line {
                self.ops.push(DrawOp::Text {
                    x: left + fragment.x,
                    y: baseline,
                    face: fragment.face,
                    size: fragment.size,
                    color: fragment.color,
                    text: fragment.text.clone(),
                });
            }
            self.cursor -= line_height;
        }

        let after = match role {
            TextRole::Heading(_) => size * 0.3,
            TextRole::ListItem(_) => style.body_size * 0.2,
            TextRole::Paragraph => style.body_size * 0.6,
        };
        self.gap(after);
    }

    fn code_block(&mut self, code: &str, quote: u8, left: f32, width: f32) {
        let style = self.style;
        let size = style.code_size();
        let line_height = size * 1.4;
        let inner = width - 2.0 * CODE_PADDING;

        self.ensure(CODE_PADDING + line_height);
        self.quote_bars(quote, CODE_PADDING);
        self.ops.push(DrawOp::Rect {
            x: left,
            y: self.cursor - CODE_PADDING,
            width,
            height: CODE_PADDING,
            color: style.code_background,
        });
        self.cursor -= CODE_PADDING;

        for source_line in code.replace('\t', "    ").lines() {
            for chunk in wrap_code_line(source_line, size, inner) {
                self.ensure(line_height);
                self.quote_bars(quote, line_height);
                self.ops.push(DrawOp::Rect {
                    x: left,
                    y: self.cursor - line_height,
                    width,
                    height: line_height,
                    color: style.code_background,
                });
                if !chunk.trim().is_empty() {
                    let baseline = self.baseline(line_height, size);
                    self.ops.push(DrawOp::Text {
                        x: left + CODE_PADDING,
                        y: baseline,
                        face: FontFace::Mono,
                        size,
                        color: style.text,
                        text: chunk,
                    });
                }
                self.cursor -= line_height;
            }
        }

        self.ensure(CODE_PADDING);
        self.quote_bars(quote, CODE_PADDING);
        self.ops.push(DrawOp::Rect {
            x: left,
            y: self.cursor - CODE_PADDING,
            width,
            height: CODE_PADDING,
            color: style.code_background,
        });
        self.cursor -= CODE_PADDING;
        self.gap(style.body_size * 0.6);
    }

    fn rule(&mut self, left: f32, width: f32) {
        let height = self.style.body_size;
        self.ensure(height);
        let y = self.cursor - height / 2.0;
        self.ops.push(DrawOp::Line {
            from: (left, y),
            to: (left + width, y),
            color: self.style.rule,
            line_width: STROKE_WIDTH,
        });
        self.cursor -= height;
    }

    fn table_row(&mut self, cells: &[Cell], left: f32, width: f32) {
        let style = self.style;
        let size = style.body_size;
        let line_height = size * 1.3;
        let column_width = width / cells.len().max(1) as f32;

        let wrapped: Vec<Vec<Line>> = cells
            .iter()
            .map(|cell| {
                let look = TextLook {
                    size,
                    code_size: style.code_size(),
                    bold: cell.header,
                    color: style.text,
                    link: style.link,
                };
                wrap(&cell.inline, &look, column_width - 2.0 * CELL_PADDING)
            })
            .collect();
        let rows = wrapped.iter().map(Vec::len).max().unwrap_or(0).max(1);
        let height = rows as f32 * line_height + 2.0 * CELL_PADDING;

        self.ensure(height);
        let top = self.cursor;
        for (index, (cell, lines)) in cells.iter().zip(&wrapped).enumerate() {
            let x = left + index as f32 * column_width;
            if cell.header {
                self.ops.push(DrawOp::Rect {
                    x,
                    y: top - height,
                    width: column_width,
                    height,
                    color: style.code_background,
                });
            }
            self.ops.push(DrawOp::StrokeRect {
                x,
                y: top - height,
                width: column_width,
                height,
                color: style.table_border,
                line_width: STROKE_WIDTH,
            });
            for (row, line) in lines.iter().enumerate() {
                let line_top = top - CELL_PADDING - row as f32 * line_height;
                let baseline = line_top - (line_height - size) / 2.0 - size * ASCENT;
                for fragment in line {
                    self.ops.push(DrawOp::Text {
                        x: x + CELL_PADDING + fragment.x,
                        y: baseline,
                        face: fragment.face,
                        size: fragment.size,
                        color: fragment.color,
                        text: fragment.text.clone(),
                    });
                }
            }
        }
        self.cursor -= height;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
