//! # ragkb-extract
//!
//! Document text extraction for RAGKB.
//!
//! Supported formats: plain text (`txt`), markdown (`md`), PDF (`pdf`) and
//! DOCX (`docx`). Extraction yields raw text in document order with
//! page/paragraph breaks joined by a blank line; [`normalize`] then cleans
//! it up for chunking.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TextExtractor`] | Plain text and markdown |
//! | [`PdfExtractor`] | PDF text via `pdf-extract` |
//! | [`DocxExtractor`] | DOCX body text via `zip` + `quick-xml` |
//! | [`ExtractorRegistry`] | Extension-based dispatch over the above |

pub mod docx;
pub mod normalize;
pub mod pdf;
pub mod registry;
pub mod text;

pub use docx::DocxExtractor;
pub use normalize::normalize;
pub use pdf::PdfExtractor;
pub use registry::ExtractorRegistry;
pub use text::TextExtractor;
