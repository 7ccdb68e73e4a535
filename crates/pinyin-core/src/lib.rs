//! Core of the Pinyin input session: the input-mode encoder, the decoding
//! engine seam with an in-memory engine, and the decoding session that owns
//! the spelling buffer, composition and paged candidate cache.

pub mod decoder;
pub mod decoding;
mod error;
pub mod mode;
pub mod settings;
pub mod unicode;

pub use error::ImeError;
