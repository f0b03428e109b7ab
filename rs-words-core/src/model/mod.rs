//! Top-level module for the word Markov chain.
//!
//! - Sliding word window used as the lookup key (`Context`)
//! - Per-context successor counts (`FrequencyBucket`)
//! - Fixed-capacity chained hash table (`MarkovModel`)
//! - Streaming model construction (`Trainer`)
//! - Budgeted text sampling (`Generator`)

/// Fixed-size window of the most recent words.
///
/// Provides DJB2-style order-sensitive hashing and window advancement.
pub mod context;

/// Successor word counts for a single context.
///
/// Tracks occurrences and supports smoothed weighted random sampling.
pub mod bucket;

/// Fixed-capacity hash table mapping contexts to frequency buckets.
///
/// Collisions are resolved by chains stored in an index arena.
pub mod markov_model;

/// Single-pass model construction from token streams and files.
pub mod trainer;

/// Text generation by walking the model with a caller-supplied RNG.
pub mod generator;
