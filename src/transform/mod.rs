//! Text transformation — display text → pronounceable text + index map.
//!
//! # Architecture
//!
//! ```text
//! SourceText ──▶ transform() ──▶ TransformResult
//!                    │              ├─ full_spoken_text   (what could be spoken)
//!    ReadingDictionary              ├─ sliced_spoken_text (what is submitted)
//!    (built-in + user overrides)    ├─ index_map          (spoken → source offsets)
//!                                   └─ spoken/safe start indices
//! ```
//!
//! # Quick start
//!
//! ```
//! use read_along::transform::{transform, ReadingDictionary};
//!
//! let dict = ReadingDictionary::built_in();
//! let result = transform("1.小明有5×3顆糖", 0, &dict);
//! assert_eq!(result.full_spoken_text, "第1題，小明有5成以3顆糖");
//! assert_eq!(result.index_map.len(), result.full_spoken_text.chars().count());
//! ```

pub mod dictionary;
mod patterns;
pub mod processor;
pub mod source;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use dictionary::{DictionaryError, ReadingDictionary};
pub use processor::{transform, TransformResult};
pub use source::SourceText;
