//! Filepath-related utility functions

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::Error;

/// The artifacts one source file yields during bitcode generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    pub src_filepath: PathBuf,
    pub object_filepath: PathBuf,
    pub bitcode_filepath: PathBuf,
}

impl CompilationUnit {
    /// Input is already bitcode; there is nothing to compile
    pub fn is_bitcode_input(&self) -> bool {
        self.src_filepath.extension().is_some_and(|ext| ext == "bc")
    }

    /// Input is a Rust crate root
    pub fn is_rust_input(&self) -> bool {
        self.src_filepath.extension().is_some_and(|ext| ext == "rs")
    }
}

/// Derive the object and bitcode filepaths for `src_filepath`.
///
/// When `is_compile_only`, the object is the one the driver itself writes:
/// `<stem>.o` in the working directory. Otherwise the object only exists to
/// be linked again and is hidden next to the source as `.<stem>.o`. The
/// bitcode file is always hidden next to the source as `.<stem>.o.bc`.
pub fn derive_object_and_bitcode_filepath<P>(
    src_filepath: P,
    is_compile_only: bool,
) -> Result<(PathBuf, PathBuf), Error>
where
    P: AsRef<Path>,
{
    let src_filepath = src_filepath.as_ref();

    let parent_dir = src_filepath.parent().unwrap_or(Path::new(""));
    // Without extension
    let file_stem = src_filepath
        .file_stem()
        .ok_or_else(|| {
            Error::InvalidArguments(format!(
                "Failed to obtain the file stem: {:?}",
                src_filepath
            ))
        })?
        .to_str()
        .ok_or_else(|| {
            Error::InvalidArguments(format!(
                "Failed to convert OsStr to str: {:?}",
                src_filepath
            ))
        })?;

    let object_filepath = if is_compile_only {
        PathBuf::from(format!("{file_stem}.o"))
    } else {
        parent_dir.join(format!(".{file_stem}.o"))
    };
    let bitcode_filepath = parent_dir.join(format!(".{file_stem}.o.bc"));

    Ok((object_filepath, bitcode_filepath))
}

pub fn derive_compilation_unit<P>(
    src_filepath: P,
    is_compile_only: bool,
) -> Result<CompilationUnit, Error>
where
    P: AsRef<Path>,
{
    let src_filepath = src_filepath.as_ref();
    let (object_filepath, bitcode_filepath) =
        derive_object_and_bitcode_filepath(src_filepath, is_compile_only)?;

    Ok(CompilationUnit {
        src_filepath: src_filepath.to_path_buf(),
        object_filepath,
        bitcode_filepath,
    })
}

/// Lowercase hex SHA-256 of the path string; names bitcode store entries
pub fn calculate_filepath_hash<P>(filepath: P) -> String
where
    P: AsRef<Path>,
{
    let filepath = filepath.as_ref();
    format!(
        "{:x}",
        Sha256::digest(filepath.to_string_lossy().as_bytes())
    )
}

/// Absolute form of `filepath`, without resolving symlinks
pub fn absolute_filepath<P>(filepath: P) -> Result<PathBuf, Error>
where
    P: AsRef<Path>,
{
    Ok(std::path::absolute(filepath.as_ref())?)
}
