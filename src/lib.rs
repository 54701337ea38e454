//! Whole Program LLVM: compiler wrappers that build a bitcode file next to
//! every object file and record its path inside the object

/// Command-line argument classifier for compilers
pub mod arg_parser;

/// Bitcode path attachment
pub mod attach;

/// Compiler backends, the build orchestrator and the archive patcher
pub mod compiler_wrapper;

/// Process-wide configuration
pub mod config;

/// Colored diagnostics
pub mod diagnostics;

/// Error Type
pub mod error;

/// Logging set-up
pub mod logging;

/// Utility functions
pub mod utils;

/// Internal constants
pub(crate) mod constants;

pub use compiler_wrapper::wcompile;
