//! Document-store transpilers.

pub mod document;
