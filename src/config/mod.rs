pub mod conf_file;
pub mod entry;
pub mod slot;
pub mod streams;

pub use conf_file::{ConfError, available_configs, read_conf, write_conf};
pub use entry::{Choice, ConfigEntry, ConfigSnapshot, WriteEntry, WriteRequest, parse_choices};
pub use slot::{BadSlot, StreamDir, StreamSlot};
pub use streams::{ConfigError, StreamConfig};
