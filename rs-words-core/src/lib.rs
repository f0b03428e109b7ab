//! Word-level Markov chain text generation library.
//!
//! This crate provides a fixed-order word Markov model including:
//! - A sliding context window of the last `N` words
//! - Per-context word frequency buckets with Laplace-smoothed sampling
//! - A fixed-capacity chained hash table keyed by context
//! - Streaming training from text or corpus files
//! - Byte-budgeted text generation driven by an explicit random source

/// Core Markov model, training and generation logic.
pub mod model;

/// Corpus I/O utilities (tokenizer, chunked file reading).
pub mod io;

/// Number of preceding words used as the model key.
pub const CONTEXT_SIZE: usize = 4;

/// Hash table capacity used when none is configured.
pub const DEFAULT_CAPACITY: usize = 100_000;

/// Markov model with the production context window size.
pub type WordModel = model::markov_model::MarkovModel<CONTEXT_SIZE>;
