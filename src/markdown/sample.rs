//! Built-in sample document and preview placeholder.

/// Markup shown in the preview while the document is empty.
pub const PREVIEW_PLACEHOLDER: &str =
    r#"<p class="text-muted-foreground">Preview will appear here...</p>"#;

/// Sample document loaded on request to show off the supported syntax.
pub const SAMPLE_MARKDOWN: &str = r#"# Markdown → PDF / Word Converter

**Welcome to the markdown converter!** Write in Markdown and export to PDF or Word format.

## Features

### Core Functionality
- **Live Preview**: See your markdown rendered as sanitized HTML
- **PDF Export**: Generate A4 portrait PDFs with a print stylesheet
- **Word Export**: Create .doc files compatible with Microsoft Word
- **Copy HTML**: Put the sanitized HTML on the clipboard

### Markdown Support
- **Bold** and *italic* text
- [Links](https://commonmark.org) and bare URLs like https://example.com
- `inline code` and code blocks
- Lists, tables, and blockquotes

### Code Example

```rust
fn greet_user(name: &str) -> String {
    format!("Hello, {name}! Welcome to the Markdown converter.")
}
```

### Styling Features

> **Tip**: Blockquotes use a warm yellow accent bar in exported documents.
>
> Perfect for callouts, tips, or important notes.

#### Lists Work Great

1. **Numbered lists** for step-by-step instructions
2. **Bullet points** for feature lists
3. **Nested items** for detailed breakdowns
   - Sub-item one
   - Sub-item two
   - Sub-item three

---

### Export Options

| Format | File Type | Use Case |
|--------|-----------|----------|
| PDF | .pdf | Sharing, printing, archiving |
| Word | .doc | Collaborative editing |
| HTML | Copy to clipboard | Web publishing |

**Ready to start?** Clear this sample and begin writing your own content!

---

*Made for productivity and clean document creation.*
"#;
