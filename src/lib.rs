pub mod ast;
pub mod config;
pub mod error;
pub mod export;
pub mod resolver;
pub mod yaml;

pub use ast::Value;
pub use config::SigilConfig;
pub use error::SigilError;
pub use resolver::{EnvAdapter, EnvLookup, ProcessEnv, DEFAULT_VALUE, RESERVED_KEY};
