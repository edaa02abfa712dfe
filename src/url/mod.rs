//! URL handling module for Sift-Crawl
//!
//! This module provides URL normalization and host extraction. Every URL that
//! enters the frontier or the visited set passes through [`normalize_url`].

mod domain;
mod normalize;

pub use domain::{extract_domain, is_same_host};
pub use normalize::{normalize_url, resolve_and_normalize};
