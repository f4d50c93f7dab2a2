//! Text and JSON front-ends for [`tagbf`] documents.
//!
//! [`stf`] is the stringified text form (STF): a human-readable mirror of
//! the TBF binary codec, parsed and emitted as plain [`tagbf::Tag`] trees.
//! [`json`] is the `{ name, type, value }` JSON view described in the
//! format's specification, plus ingest that rebuilds a [`tagbf::Document`]
//! via [`tagbf`]'s native-value type inference.

mod json;
mod stf;

pub use json::{from_json, to_json};
pub use stf::{document_to_stf, from_stf, from_stf_tag, to_stf};

pub mod error;
pub use error::{Error, Result};

#[cfg(test)]
mod tests;
