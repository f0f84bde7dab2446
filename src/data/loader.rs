// ============================================================
// Layer 4 — Document Loader
// ============================================================
// Extracts the plain text of one .docx file using docx-rs.
//
// A .docx file is a ZIP archive of XML parts; docx-rs parses it
// into a typed tree:
//
//   Document
//     └── children: Vec<DocumentChild>
//           └── Paragraph
//                 └── children: Vec<ParagraphChild>
//                       ├── Run
//                       │     └── children: Vec<RunChild>
//                       │           ├── Text   → its string
//                       │           ├── Tab    → '\t'
//                       │           └── Break  → '\n' for line breaks,
//                       │                        nothing for page and
//                       │                        column breaks
//                       └── Hyperlink
//                             └── children: Vec<ParagraphChild> (recursive)
//
// Offset stability rules:
//   - every top-level paragraph contributes, EMPTY ONES INCLUDED
//   - paragraphs are joined with exactly one '\n'
//   - no trimming or whitespace normalisation
// The gold offsets were produced against text built this way;
// dropping a blank paragraph would shift every later span by one.
//
// Tables, headers, footers and text boxes are not part of the
// body paragraph list and are ignored.
//
// Reference: docx-rs crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};
use docx_rs::{read_docx, Break, DocumentChild, Paragraph, ParagraphChild, RunChild};

use crate::domain::document::Document;
use crate::domain::traits::DocumentSource;

/// Loads a single .docx file.
/// Implements the DocumentSource trait from Layer 3.
pub struct DocxLoader {
    path: PathBuf,
}

impl DocxLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for DocxLoader {
    fn load(&self) -> Result<Document> {
        let doc = load_single_docx(&self.path)?;
        tracing::debug!(
            "Loaded: {} ({} chars)",
            doc.source,
            doc.char_len()
        );
        Ok(doc)
    }
}

/// Parse a .docx file and return its body text as a Document.
fn load_single_docx(path: &Path) -> Result<Document> {
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    let docx = read_docx(&bytes)
        .map_err(|e| {
            anyhow::anyhow!("docx-rs parse error in '{}': {:?}", path.display(), e)
        })?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(extract_paragraph_text(para)),
            _ => None,
        })
        .collect();

    let source = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    Ok(Document::new(source, paragraphs.join("\n")))
}

/// Concatenate the text of every run in a paragraph.
fn extract_paragraph_text(para: &Paragraph) -> String {
    let mut out = String::new();
    push_children_text(&para.children, &mut out);
    out
}

fn push_children_text(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t)  => out.push_str(&t.text),
                        RunChild::Tab(_)   => out.push('\t'),
                        RunChild::Break(b) if is_line_break(b) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children_text(&link.children, out),
            _ => {}
        }
    }
}

/// True for a text-wrapping `w:br`. docx-rs keeps the break type
/// private, so it is read from the element's JSON form, where a
/// missing type means a line break.
fn is_line_break(br: &Break) -> bool {
    serde_json::to_value(br)
        .ok()
        .and_then(|v| v.get("breakType").and_then(|t| t.as_str()).map(|t| t == "textWrapping"))
        .unwrap_or(true)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{BreakType, Docx, Hyperlink, HyperlinkType, Run};
    use std::fs::File;

    fn write_docx(dir: &Path, paragraphs: Vec<Paragraph>) -> PathBuf {
        let path = dir.join("doc.docx");
        let file = File::create(&path).unwrap();
        let mut docx = Docx::new();
        for p in paragraphs {
            docx = docx.add_paragraph(p);
        }
        docx.build().pack(file).unwrap();
        path
    }

    fn para(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    #[test]
    fn test_paragraphs_joined_with_single_newline() {
        let dir  = tempfile::tempdir().unwrap();
        let path = write_docx(dir.path(), vec![para("Стефан Немања"), para("Хиландар")]);

        let doc = DocxLoader::new(&path).load().unwrap();
        assert_eq!(doc.text, "Стефан Немања\nХиландар");
        assert_eq!(doc.source, "doc.docx");
    }

    #[test]
    fn test_empty_paragraphs_are_kept() {
        let dir  = tempfile::tempdir().unwrap();
        let path = write_docx(
            dir.path(),
            vec![para("прво"), Paragraph::new(), para("друго")],
        );

        let doc = DocxLoader::new(&path).load().unwrap();
        assert_eq!(doc.text, "прво\n\nдруго");
    }

    #[test]
    fn test_runs_are_concatenated() {
        let dir  = tempfile::tempdir().unwrap();
        let p    = Paragraph::new()
            .add_run(Run::new().add_text("Дубров"))
            .add_run(Run::new().add_text("ник"));
        let path = write_docx(dir.path(), vec![p]);

        let doc = DocxLoader::new(&path).load().unwrap();
        assert_eq!(doc.text, "Дубровник");
    }

    #[test]
    fn test_tab_becomes_tab_character() {
        let dir  = tempfile::tempdir().unwrap();
        let p    = Paragraph::new().add_run(Run::new().add_text("лист").add_tab().add_text("7"));
        let path = write_docx(dir.path(), vec![p]);

        let doc = DocxLoader::new(&path).load().unwrap();
        assert_eq!(doc.text, "лист\t7");
    }

    #[test]
    fn test_only_line_breaks_become_newlines() {
        let dir  = tempfile::tempdir().unwrap();
        let p    = Paragraph::new().add_run(
            Run::new()
                .add_text("прво")
                .add_break(BreakType::TextWrapping)
                .add_text("друго")
                .add_break(BreakType::Page)
                .add_text("треће"),
        );
        let path = write_docx(dir.path(), vec![p]);

        let doc = DocxLoader::new(&path).load().unwrap();
        assert_eq!(doc.text, "прво\nдруготреће");
    }

    #[test]
    fn test_hyperlink_text_is_included() {
        let dir  = tempfile::tempdir().unwrap();
        let p    = Paragraph::new()
            .add_run(Run::new().add_text("у "))
            .add_hyperlink(
                Hyperlink::new("dubrovnik", HyperlinkType::Anchor)
                    .add_run(Run::new().add_text("Дубровнику")),
            )
            .add_run(Run::new().add_text("."));
        let path = write_docx(dir.path(), vec![p]);

        let doc = DocxLoader::new(&path).load().unwrap();
        assert_eq!(doc.text, "у Дубровнику.");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = DocxLoader::new("/nonexistent/file.docx").load().unwrap_err();
        assert!(err.to_string().contains("Cannot read"));
    }

    #[test]
    fn test_non_docx_bytes_are_an_error() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        fs::write(&path, b"not a zip archive").unwrap();

        let err = DocxLoader::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("docx-rs parse error"));
    }
}
