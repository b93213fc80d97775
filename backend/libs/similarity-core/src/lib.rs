//! Similarity primitives
//!
//! Pure scoring helpers shared by the recommendation engines and the search
//! ranker:
//! - **Cosine similarity** over numeric score vectors
//! - **Jaccard similarity** over tag sets
//! - **Levenshtein distance** and its normalized similarity for fuzzy title matching
//!
//! Every function is total: degenerate inputs (empty sets, zero vectors,
//! mismatched lengths) produce `0.0` instead of an error.

mod text;
mod vector;

pub use text::{levenshtein_distance, normalized_similarity};
pub use vector::{cosine_similarity, jaccard_similarity};
