//! Directive schemas and their binding engine.

mod datasize;
mod directives;
mod duration;
mod error;
mod map;
mod node;
mod value;

pub use datasize::{parse_data_size, DataSizeError};
pub use duration::{parse_duration, DurationError};
pub use error::{ConfigError, ErrorKind};
pub use map::{default_value, DefaultFn, Map, Slot};
pub use node::{Location, Node};
pub use value::{FromValue, Globals, Value};
