//! The two statistics sources: the public stats site (HTML tables over HTTP)
//! and locally downloaded CSV exports. Both yield `RawRow`s for the
//! normalizer; neither does any normalization of its own.

pub mod file;
pub mod web;
