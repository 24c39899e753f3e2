//! Declarations file parsing and validation

pub mod declarations_toml;

pub use declarations_toml::{
    AssertionConfig, ColorOption, Config, DEFAULT_CONFIG_FILE, InputsConfig, NamespaceConfig,
    OutputConfig, OutputFormat, Settings,
};
