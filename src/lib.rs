pub mod config;

pub use config::{
    default_value, parse_data_size, parse_duration, ConfigError, DataSizeError, DefaultFn,
    DurationError, ErrorKind, FromValue, Globals, Location, Map, Node, Slot, Value,
};
