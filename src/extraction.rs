//! PDF text extraction backed by `lopdf`.
//!
//! Pages are visited in ascending page number and their text is concatenated as-is, so the
//! output preserves document order and whatever line breaks the content streams produce.

use lopdf::Document;
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading text out of a PDF.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The file could not be read from disk.
    #[error("failed to read PDF: {0}")]
    Io(#[from] std::io::Error),
    /// The bytes are not a PDF `lopdf` can parse.
    #[error("failed to parse PDF: {0}")]
    Parse(#[source] lopdf::Error),
    /// A page was present but its text could not be decoded.
    #[error("failed to extract text from page {page}: {source}")]
    Page {
        /// One-based page number.
        page: u32,
        /// Underlying `lopdf` failure.
        #[source]
        source: lopdf::Error,
    },
}

/// Text pulled out of a PDF document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    /// Concatenated page text in document order.
    pub text: String,
    /// Number of pages visited.
    pub page_count: usize,
}

impl ExtractedText {
    /// Whether no printable text was found.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Open the PDF at `path` and extract its text.
pub fn extract_text(path: &Path) -> Result<ExtractedText, ExtractionError> {
    let bytes = std::fs::read(path)?;
    extract_text_from_mem(&bytes)
}

/// Extract text from an in-memory PDF.
pub fn extract_text_from_mem(bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
    let document = Document::load_mem(bytes).map_err(ExtractionError::Parse)?;
    let pages = document.get_pages();

    let mut text = String::new();
    for page in pages.keys().copied() {
        let page_text = document
            .extract_text(&[page])
            .map_err(|source| ExtractionError::Page { page, source })?;
        text.push_str(&page_text);
    }

    Ok(ExtractedText {
        text,
        page_count: pages.len(),
    })
}

/// In-memory PDF builders shared by the unit and integration tests.
#[doc(hidden)]
pub mod fixtures {
    use super::ExtractionError;
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    /// Build a PDF with one page per entry, each showing its line of text in Courier.
    pub fn build_pdf(pages: &[&str]) -> Result<Vec<u8>, ExtractionError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for line in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().map_err(ExtractionError::Parse)?,
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|error| std::io::Error::other(error.to_string()))?;
        Ok(bytes)
    }
}
