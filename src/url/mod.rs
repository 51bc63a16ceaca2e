//! URL handling module for Sumi-Scroll
//!
//! This module provides link canonicalization, site membership checks and
//! the mapping from canonical URLs to file names in the offline mirror.

mod filename;
mod normalize;

// Re-export main functions
pub use filename::page_file_stem;
pub use normalize::{belongs_to_site, is_usable_link, normalize};
