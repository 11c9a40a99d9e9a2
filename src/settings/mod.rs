pub mod file;
pub mod policy;
pub mod store;

pub use file::*;
pub use policy::*;
pub use store::*;
