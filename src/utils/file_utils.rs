//! File-related, especially object-file-related, utility functions

use std::{fmt, fs, path::Path};

use object::{BinaryFormat, Object, ObjectKind, read::archive::ArchiveFile};

/// Binary file types we care about when attaching bitcode paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    ElfObject,
    ElfExecutable,
    ElfShared,
    MachObject,
    MachExecutable,
    MachShared,
    Archive,
    Unknown,
}

impl FileType {
    /// Detect the type of the file at `filepath`.
    ///
    /// Missing, empty and unparsable files are [`FileType::Unknown`].
    pub fn of<P>(filepath: P) -> Self
    where
        P: AsRef<Path>,
    {
        let filepath = filepath.as_ref();
        if !is_plain_file(filepath) {
            return Self::Unknown;
        }

        match fs::read(filepath) {
            Ok(data) => Self::from_bytes(&data),
            Err(err) => {
                tracing::debug!("Failed to read {:?}: {}", filepath, err);
                Self::Unknown
            }
        }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        if data.is_empty() {
            return Self::Unknown;
        }

        if let Ok(obj_file) = object::File::parse(data) {
            return match (obj_file.format(), obj_file.kind()) {
                (BinaryFormat::Elf, ObjectKind::Relocatable) => Self::ElfObject,
                (BinaryFormat::Elf, ObjectKind::Executable) => Self::ElfExecutable,
                (BinaryFormat::Elf, ObjectKind::Dynamic) => Self::ElfShared,
                (BinaryFormat::MachO, ObjectKind::Relocatable) => Self::MachObject,
                (BinaryFormat::MachO, ObjectKind::Executable) => Self::MachExecutable,
                (BinaryFormat::MachO, ObjectKind::Dynamic) => Self::MachShared,
                _ => Self::Unknown,
            };
        }

        if ArchiveFile::parse(data).is_ok() {
            return Self::Archive;
        }

        Self::Unknown
    }

    /// Plain relocatable objects, the only files a bitcode path may be attached to
    pub fn is_object(&self) -> bool {
        matches!(self, Self::ElfObject | Self::MachObject)
    }

    /// Anything a linker accepts as an input
    pub fn is_linkable(&self) -> bool {
        !matches!(
            self,
            Self::Unknown | Self::ElfExecutable | Self::MachExecutable
        )
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            Self::ElfObject => "ELF object",
            Self::ElfExecutable => "ELF executable",
            Self::ElfShared => "ELF shared object",
            Self::MachObject => "Mach-O object",
            Self::MachExecutable => "Mach-O executable",
            Self::MachShared => "Mach-O dynamic library",
            Self::Archive => "archive",
            Self::Unknown => "unknown",
        };
        write!(f, "{description}")
    }
}

pub fn is_plain_file<P>(file: P) -> bool
where
    P: AsRef<Path>,
{
    file.as_ref().is_file()
}

pub fn is_object_file<P>(file: P) -> bool
where
    P: AsRef<Path>,
{
    FileType::of(file).is_object()
}
