//! Visualizers for tokenized and tagged text corpora.
pub mod postag;

pub use postag::{postag, PosTagVisualizer, TaggedDocument, TaggedSentence};
