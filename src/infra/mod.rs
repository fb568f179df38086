//! Infrastructure layer: byte-level codecs with no protocol knowledge.
pub mod codec;
