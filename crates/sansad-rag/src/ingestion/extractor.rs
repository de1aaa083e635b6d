//! Best-effort PDF text and metadata extraction
//!
//! Extraction never fails the pipeline: parse errors yield an empty result
//! with `Failed` confidence so the document gets flagged for a downstream
//! OCR step instead of aborting ingestion.

use lopdf::{Document as PdfDocument, Object};
use std::collections::HashMap;

use crate::types::{ExtractionConfidence, ExtractionResult};

/// Text below this length downgrades confidence to `Low`
const LOW_CONFIDENCE_CHARS: usize = 100;

/// Language detection is skipped for text at or below this length
const LANGUAGE_MIN_CHARS: usize = 30;

/// PDF text extractor
#[derive(Debug, Default)]
pub struct TextExtractor;

impl TextExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract text and metadata from PDF bytes
    pub fn extract(&self, bytes: &[u8]) -> ExtractionResult {
        let doc = match PdfDocument::load_mem(bytes) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("PDF extraction failed: {}", e);
                return ExtractionResult::failed();
            }
        };

        let mut pages = Vec::new();
        for page_number in doc.get_pages().keys() {
            // Page-level failures degrade to an empty page, not an error.
            let page_text = doc.extract_text(&[*page_number]).unwrap_or_default();
            pages.push(page_text);
        }

        let text = pages.join("\n\n").trim().to_string();
        let metadata = extract_metadata(&doc);

        let confidence = if text.len() < LOW_CONFIDENCE_CHARS {
            ExtractionConfidence::Low
        } else {
            ExtractionConfidence::Ok
        };

        let language = detect_language(&text);

        ExtractionResult {
            text,
            metadata,
            confidence,
            language,
        }
    }
}

/// Best-effort metadata from the PDF Info dictionary
///
/// Absence of metadata is not an error.
fn extract_metadata(doc: &PdfDocument) -> HashMap<String, String> {
    let mut metadata = HashMap::new();

    let info = match doc.trailer.get(b"Info") {
        Ok(obj) => obj,
        Err(_) => return metadata,
    };

    let dict = match info {
        Object::Reference(id) => match doc.get_object(*id).and_then(Object::as_dict) {
            Ok(dict) => dict,
            Err(_) => return metadata,
        },
        Object::Dictionary(dict) => dict,
        _ => return metadata,
    };

    for (key, value) in dict.iter() {
        if let Object::String(bytes, _) = value {
            metadata.insert(
                String::from_utf8_lossy(key).to_string(),
                String::from_utf8_lossy(bytes).to_string(),
            );
        }
    }

    metadata
}

/// Detect the document language, restricted to the corpus languages
///
/// Returns "en" or "hi"; anything else, detector failure included, is
/// "unknown". Detection is attempted only when there is enough text to be
/// meaningful.
pub(crate) fn detect_language(text: &str) -> String {
    if text.len() <= LANGUAGE_MIN_CHARS {
        return "unknown".to_string();
    }

    match whatlang::detect(text).map(|info| info.lang()) {
        Some(whatlang::Lang::Eng) => "en".to_string(),
        Some(whatlang::Lang::Hin) => "hi".to_string(),
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_softly() {
        let extractor = TextExtractor::new();
        let result = extractor.extract(b"this is not a pdf at all");

        assert_eq!(result.confidence, ExtractionConfidence::Failed);
        assert!(result.text.is_empty());
        assert!(result.metadata.is_empty());
        assert_eq!(result.language, "unknown");
    }

    #[test]
    fn english_text_detected() {
        let text = "The parliamentary session discussed the annual budget allocation \
                    for rural development programs across several states.";
        assert_eq!(detect_language(text), "en");
    }

    #[test]
    fn hindi_text_detected() {
        let text = "संसद के सत्र में ग्रामीण विकास कार्यक्रमों के लिए वार्षिक बजट आवंटन पर चर्चा हुई।";
        assert_eq!(detect_language(text), "hi");
    }

    #[test]
    fn short_text_is_unknown() {
        assert_eq!(detect_language("too short"), "unknown");
        assert_eq!(detect_language(""), "unknown");
    }

    #[test]
    fn other_languages_are_unknown() {
        let text = "Le gouvernement a présenté le budget annuel devant l'assemblée \
                    nationale pendant la session parlementaire.";
        assert_eq!(detect_language(text), "unknown");
    }
}
