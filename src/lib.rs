//! # ChordPro Processor
//!
//! A parser for ChordPro-style song sheets: curly-brace directives,
//! inline `[chord]` annotations, section markers with automatic
//! numbering, and merging of chords-only lines into the lyric line
//! below them.
//!
//! Parsing is total. Malformed input never produces an error; it
//! degrades to plain text and leaves a note in
//! [`ParsedDocument::warnings`].
//!
//! ## Example
//!
//! ```rust
//! use chordpro_processor::parse_chordpro;
//!
//! let source = "{title: Amazing Grace}\n{verse}\n[G]Amazing [C]grace";
//! let doc = parse_chordpro(source);
//!
//! assert_eq!(doc.title.as_deref(), Some("Amazing Grace"));
//! assert_eq!(doc.sections.len(), 1);
//! assert_eq!(doc.sections[0].label, "Verse");
//!
//! let first = &doc.sections[0].lines[0];
//! assert_eq!(first.text(), "Amazing grace");
//! assert_eq!(first.segments[0].chord.as_deref(), Some("G"));
//! ```

pub mod error;
pub mod parser;
pub mod types;

pub use error::{ParseCanonicalDirectiveKeyError, ParseSectionTypeError};
pub use parser::parse_chordpro;
pub use types::{
    CanonicalDirectiveKey, Line, LineKind, LineSegment, ParsedDocument, Section, SectionType,
};
