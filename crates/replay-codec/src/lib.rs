#![warn(clippy::pedantic)]

pub mod decoder;
pub mod error;
pub mod frames;
pub mod streaming;

pub use decoder::{Decode, ReplayDecoder};
pub use error::CodecError;
pub use streaming::FrameStream;
