//! Turns an uploaded file into the markdown stored as document content.
//!
//! Only plain text and markdown are decoded; binary formats get a summary
//! page naming the file until real PDF/DOCX parsing lands.

use crate::upload::validation::{is_pdf_file, is_text_file};

const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Document title derived from a file name: everything before the final
/// extension. Names without an extension are kept whole.
pub fn title_from_file_name(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < file_name.len() && !file_name[idx + 1..].contains('/') => {
            file_name[..idx].to_string()
        }
        _ => file_name.to_string(),
    }
}

fn size_in_mb(size: usize) -> String {
    format!("{:.2}", size as f64 / 1024.0 / 1024.0)
}

fn pdf_summary(title: &str, file_name: &str, size: usize) -> String {
    format!(
        "# {title}

This is placeholder content extracted from the PDF file \"{file_name}\".

## Executive Summary

This document contains important information about the topic at hand. The content has been automatically extracted and is ready for transformation through our lens system.

## Key Points

- Document uploaded successfully
- Ready for lens generation
- Content extraction completed
- File size: {size} MB

## Content Overview

The original document contains detailed information that can be transformed into various lenses:

- **Slide Lens**: Key concepts in presentation format
- **Study Lens**: Detailed notes and examples
- **Story Lens**: Narrative, engaging format
",
        size = size_in_mb(size)
    )
}

fn docx_summary(title: &str, file_name: &str) -> String {
    format!(
        "# {title}

This is placeholder content extracted from the Word document \"{file_name}\".

## Document Summary

This Word document has been processed and is ready for lens transformation. The content includes structured information that can be presented in multiple formats.

### Main Sections

1. **Introduction**: Overview of the document's purpose
2. **Content Analysis**: Key findings and insights
3. **Recommendations**: Action items and next steps
"
    )
}

fn generic_summary(title: &str, file_name: &str, mime: &str, size: usize) -> String {
    format!(
        "# {title}\n\nContent extracted from {file_name}\n\nFile type: {mime}\nSize: {} MB\n\nThis file has been uploaded successfully and is ready for processing.",
        size_in_mb(size)
    )
}

/// Markdown content for an uploaded file.
pub fn extract_text(file_name: &str, mime: &str, bytes: &[u8]) -> String {
    let title = title_from_file_name(file_name);

    if is_text_file(file_name, mime) {
        return String::from_utf8_lossy(bytes).into_owned();
    }

    if is_pdf_file(file_name, mime) {
        return pdf_summary(&title, file_name, bytes.len());
    }

    if mime == MIME_DOCX || file_name.ends_with(".docx") {
        return docx_summary(&title, file_name);
    }

    generic_summary(&title, file_name, mime, bytes.len())
}
