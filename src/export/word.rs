//! Word-compatible document export
//!
//! Word opens HTML documents carrying the Office namespaces and the
//! `WordDocument` conditional comment as native documents, in print layout.

use crate::sanitize::SanitizedHtml;

/// Content type of the generated file, including the charset.
pub const CONTENT_TYPE: &str = "application/msword;charset=utf-8";

/// Title embedded in every Word document.
pub const DOCUMENT_TITLE: &str = "Markdown Document";

const OFFICE_DIRECTIVES: &str = r#"<!--[if gte mso 9]>
<xml>
  <w:WordDocument>
    <w:View>Print</w:View>
    <w:Zoom>90</w:Zoom>
    <w:DoNotPromptForConvert/>
    <w:DoNotShowInsertionsAndDeletions/>
  </w:WordDocument>
</xml>
<![endif]-->"#;

const WORD_CSS: &str = r#"
@page { margin: 1in; }
body {
    font-family: 'Times New Roman', serif;
    font-size: 12pt;
    line-height: 1.5;
    color: #000;
}
h1, h2, h3, h4, h5, h6 { color: #2c3e50; }
pre, code {
    font-family: 'Courier New', monospace;
    background-color: #f5f5f5;
}
blockquote {
    border-left: 3px solid #ffd24a;
    margin: 1em 0;
    padding-left: 1em;
}
"#;

/// Wrap sanitized HTML in the Word envelope.
pub fn word_document(body: &SanitizedHtml) -> String {
    format!(
        r#"<html xmlns:o='urn:schemas-microsoft-com:office:office'
      xmlns:w='urn:schemas-microsoft-com:office:word'
      xmlns='http://www.w3.org/TR/REC-html40'>
<head>
<meta charset='utf-8'>
<title>{title}</title>
{directives}
<style>{css}</style>
</head>
<body>{body}</body>
</html>
"#,
        title = DOCUMENT_TITLE,
        directives = OFFICE_DIRECTIVES,
        css = WORD_CSS,
        body = body.as_str(),
    )
}
