mod error;
pub use error::{Error, IntoError};

pub mod graph;
pub use graph::Unit;

pub mod mapping;
pub use mapping::Mapping;

pub mod options;
pub use options::{Capability, Database, Options, SchemaFormat};

pub mod visit;

/// A Result type alias that uses relgen's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
