//! Compiler wrapper

/// Backend selection and command construction
mod backend;
pub use backend::*;

/// Static-library member patching
mod archive;
pub use archive::*;

/// Build orchestrator
mod wrapper;
pub use wrapper::*;
