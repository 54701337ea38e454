//! Bitcode path attachment
//!
//! The absolute path of a bitcode file is written, newline-terminated, into a
//! dedicated section of the matching object file: `.llvm_bc` for ELF, the
//! `__WLLVM,__llvm_bc` segment/section pair for Mach-O. The section is added
//! by the platform binutils, so the rest of the object is left untouched.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::{
    arg_parser::CompileMode,
    config::WllvmConfig,
    constants::{DARWIN_SECTION_NAME, DARWIN_SEGMENT_NAME, ELF_SECTION_NAME},
    error::Error,
    utils::{FileType, absolute_filepath, calculate_filepath_hash, execute_command_checked},
};

/// What [`attach_bitcode_path_to_object`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// The bitcode path now lives in the object
    Embedded,
    /// Not a relocatable object; the file was left alone
    NotAnObject(FileType),
    /// The object disappeared or was truncated before we could edit it
    Vanished,
}

/// Inserts a payload as a new section of an object file, in place
pub trait SectionEmbedder {
    fn embed_pointer(&self, object_filepath: &Path, payload: &[u8]) -> Result<(), Error>;
}

/// `objcopy --add-section`
#[derive(Debug, Clone)]
pub struct ElfEmbedder {
    objcopy: String,
}

impl ElfEmbedder {
    pub fn new(config: &WllvmConfig) -> Self {
        Self {
            objcopy: config.binutils_program("objcopy"),
        }
    }
}

impl SectionEmbedder for ElfEmbedder {
    fn embed_pointer(&self, object_filepath: &Path, payload: &[u8]) -> Result<(), Error> {
        let scratch = write_scratch_file(payload)?;
        let args = [
            self.objcopy.clone(),
            "--add-section".to_string(),
            format!("{}={}", ELF_SECTION_NAME, scratch.path().to_string_lossy()),
            object_filepath.to_string_lossy().into_owned(),
        ];

        execute_command_checked(&args, CompileMode::Attaching)
    }
}

/// `ld -r -sectcreate`
#[derive(Debug, Clone)]
pub struct MachOEmbedder {
    ld: String,
}

impl MachOEmbedder {
    pub fn new(config: &WllvmConfig) -> Self {
        Self {
            ld: config.binutils_program("ld"),
        }
    }
}

impl SectionEmbedder for MachOEmbedder {
    fn embed_pointer(&self, object_filepath: &Path, payload: &[u8]) -> Result<(), Error> {
        let scratch = write_scratch_file(payload)?;
        let object_filepath = object_filepath.to_string_lossy().into_owned();
        let args = [
            self.ld.clone(),
            "-r".to_string(),
            "-keep_private_externs".to_string(),
            object_filepath.clone(),
            "-sectcreate".to_string(),
            DARWIN_SEGMENT_NAME.to_string(),
            DARWIN_SECTION_NAME.to_string(),
            scratch.path().to_string_lossy().into_owned(),
            "-o".to_string(),
            object_filepath,
        ];

        execute_command_checked(&args, CompileMode::Attaching)
    }
}

/// The embedder for objects of `file_type`, if they can carry a bitcode path
pub fn embedder_for(file_type: FileType, config: &WllvmConfig) -> Option<Box<dyn SectionEmbedder>> {
    match file_type {
        FileType::ElfObject => Some(Box::new(ElfEmbedder::new(config))),
        FileType::MachObject => Some(Box::new(MachOEmbedder::new(config))),
        _ => None,
    }
}

/// Payload is flushed to disk before any tool reads it; the file is removed
/// when the returned handle drops
fn write_scratch_file(payload: &[u8]) -> Result<NamedTempFile, Error> {
    let mut scratch = NamedTempFile::new()?;
    scratch.write_all(payload)?;
    scratch.as_file().sync_all()?;
    tracing::debug!(
        "Wrote {:?} to {:?}",
        String::from_utf8_lossy(payload).trim_end(),
        scratch.path()
    );
    Ok(scratch)
}

/// Copy the bitcode file into the store, named after the hash of its
/// absolute path
pub fn store_bitcode_file<P, Q>(bitcode_filepath: P, store_dir: Q) -> Result<PathBuf, Error>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let bitcode_filepath = absolute_filepath(bitcode_filepath)?;
    let store_dir = store_dir.as_ref();
    fs::create_dir_all(store_dir)?;

    let stored_filepath = store_dir.join(calculate_filepath_hash(&bitcode_filepath));
    fs::copy(&bitcode_filepath, &stored_filepath)?;
    tracing::debug!("Stored {:?} as {:?}", bitcode_filepath, stored_filepath);

    Ok(stored_filepath)
}

/// Embed the absolute path of `bitcode_filepath` into `object_filepath`
pub fn attach_bitcode_path_to_object<P, Q>(
    bitcode_filepath: P,
    object_filepath: Q,
    config: &WllvmConfig,
) -> Result<Attachment, Error>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let bitcode_filepath = bitcode_filepath.as_ref();
    let object_filepath = object_filepath.as_ref();
    tracing::debug!(
        "attach_bitcode_path_to_object: {:?} ===> {:?}",
        bitcode_filepath,
        object_filepath
    );

    // configure scripts love to delete their probe objects right away
    match fs::metadata(object_filepath) {
        Ok(metadata) if metadata.len() > 0 => {}
        _ => {
            tracing::warn!("{:?} vanished before attachment", object_filepath);
            return Ok(Attachment::Vanished);
        }
    }

    // Executables and shared objects cannot take the section
    let file_type = FileType::of(object_filepath);
    let Some(embedder) = embedder_for(file_type, config) else {
        tracing::warn!(
            "Cannot attach bitcode path to {:?} of type {}",
            object_filepath,
            file_type
        );
        return Ok(Attachment::NotAnObject(file_type));
    };

    let absolute_bitcode_filepath = absolute_filepath(bitcode_filepath)?;
    let payload = format!("{}\n", absolute_bitcode_filepath.to_string_lossy());

    if let Some(store_dir) = config.bitcode_store_path() {
        store_bitcode_file(&absolute_bitcode_filepath, store_dir)?;
    }

    embedder.embed_pointer(object_filepath, payload.as_bytes())?;

    Ok(Attachment::Embedded)
}
