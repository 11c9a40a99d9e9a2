pub mod codec;
pub mod document;
pub mod manager;
pub mod recovery;


pub use codec::{DecodeError, EncodeError};
pub use document::*;
pub use manager::*;
pub use recovery::*;
