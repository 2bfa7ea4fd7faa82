pub mod config;
pub mod finder;

pub use config::{Config, SearchConfig};
pub use finder::{find, find_streaming, FindStream, Finder};
