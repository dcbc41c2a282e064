//! Dark-variant stylesheet generation.
//!
//! Parses a stylesheet into a value tree, recolors every reachable color
//! literal with a lightness-inversion policy, scopes the surviving rules
//! under a root-level `dark-theme="true"` attribute, and appends the compact
//! result after a sentinel marker so recompilation is idempotent.

pub mod ast;
pub mod color;
pub mod compiler;
pub mod config;
pub mod emitter;
pub mod error;
pub mod parser;
pub mod policy;
pub mod recolor;
pub mod value;

pub use compiler::{Compiler, MARKER};
pub use config::Config;
pub use error::{Error, Result};
