//! Backend selection and command construction
//!
//! A [`Builder`] is selected once per invocation from the compiler mode and
//! the configuration. It knows how to spell the native compile, the bitcode
//! compile and the archiver for its backend; the orchestrator never looks at
//! the backend itself.

use std::{
    env,
    fmt,
    path::{Path, PathBuf},
};

use crate::{
    arg_parser::CompilerArgsInfo,
    config::WllvmConfig,
    constants::{COMPILER_ENV_NAME, DRAGONEGG_AS_DIR_NAME},
    error::Error,
};

/// Language personality of a wrapper binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerMode {
    C,
    Cxx,
    Fortran,
    Rust,
}

impl fmt::Display for CompilerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompilerMode::C => "wllvm",
            CompilerMode::Cxx => "wllvm++",
            CompilerMode::Fortran => "wfortran",
            CompilerMode::Rust => "wllvmrs",
        };
        f.write_str(name)
    }
}

/// Compiler family doing the actual work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// clang/clang++/flang with `-emit-llvm`
    Clang,
    /// gcc with the dragonegg plugin
    Dragonegg,
    /// rustc with `--emit=llvm-bc`
    Rustc,
}

impl Backend {
    /// Pick the backend for `mode`; rustc only takes over Rust builds
    /// when it is configured as the mixed compiler
    pub fn select(mode: CompilerMode, config: &WllvmConfig) -> Result<Self, Error> {
        if mode == CompilerMode::Rust && config.mixed_compiler() == Some("rustc") {
            return Ok(Backend::Rustc);
        }

        match config.compiler() {
            Some("clang") => Ok(Backend::Clang),
            Some("dragonegg") => Ok(Backend::Dragonegg),
            None => Err(Error::Config(format!(
                "No compiler set. Please set environment variable {}",
                COMPILER_ENV_NAME
            ))),
            Some(compiler) => Err(Error::Config(format!(
                "{} = {} : Invalid compiler type",
                COMPILER_ENV_NAME, compiler
            ))),
        }
    }

    pub fn supports(&self, mode: CompilerMode) -> bool {
        match self {
            Backend::Clang | Backend::Dragonegg => mode != CompilerMode::Rust,
            Backend::Rustc => mode == CompilerMode::Rust,
        }
    }

    fn program_name(&self, mode: CompilerMode, config: &WllvmConfig) -> Result<String, Error> {
        let name = match (self, mode) {
            (Backend::Clang, CompilerMode::C) => config.cc_name().to_string(),
            (Backend::Clang, CompilerMode::Cxx) => config.cxx_name().to_string(),
            (Backend::Clang, CompilerMode::Fortran) => config.f77_name().to_string(),
            (Backend::Dragonegg, CompilerMode::C) => format!("{}gcc", config.gcc_prefix()),
            (Backend::Dragonegg, CompilerMode::Cxx) => format!("{}g++", config.gcc_prefix()),
            (Backend::Dragonegg, CompilerMode::Fortran) => {
                format!("{}gfortran", config.gcc_prefix())
            }
            (Backend::Rustc, CompilerMode::Rust) => config.rustc_name().to_string(),
            (backend, mode) => {
                return Err(Error::Config(format!(
                    "Unknown mode {} for the {:?} backend",
                    mode, backend
                )));
            }
        };

        Ok(name)
    }

    /// Flags that switch the native command to bitcode emission
    fn bitcode_flags(&self, config: &WllvmConfig) -> Result<Vec<String>, Error> {
        let mut flags = match self {
            Backend::Clang => vec!["-emit-llvm".to_string()],
            Backend::Dragonegg => {
                let plugin = config.dragonegg_plugin().ok_or_else(|| {
                    Error::Config("The dragonegg backend needs LLVM_DRAGONEGG_PLUGIN".to_string())
                })?;
                // gcc must pick up our assembler, not the GNU one
                vec![
                    "-B".to_string(),
                    dragonegg_as_dir()?.to_string_lossy().into_owned(),
                    format!("-fplugin={}", plugin.to_string_lossy()),
                    "-fplugin-arg-dragonegg-emit-ir".to_string(),
                ]
            }
            Backend::Rustc => vec!["--emit=llvm-bc".to_string()],
        };
        flags.extend(config.bitcode_generation_flags().iter().cloned());

        Ok(flags)
    }

    fn is_rustc(&self) -> bool {
        *self == Backend::Rustc
    }
}

fn dragonegg_as_dir() -> Result<PathBuf, Error> {
    let current_exe = env::current_exe()?;
    let exe_dir = current_exe.parent().unwrap_or(Path::new(""));
    Ok(exe_dir.join(DRAGONEGG_AS_DIR_NAME))
}

/// Resolve `name` under the optional toolchain prefix, which must exist
fn resolve_program(prefix: Option<&Path>, name: &str) -> Result<PathBuf, Error> {
    match prefix {
        Some(prefix) if !prefix.exists() => Err(Error::Config(format!(
            "Path to compiler {:?} does not exist",
            prefix
        ))),
        Some(prefix) => Ok(prefix.join(name)),
        None => Ok(PathBuf::from(name)),
    }
}

/// Commands of the selected backend
#[derive(Debug, Clone)]
pub struct Builder {
    backend: Backend,
    mode: CompilerMode,
    compiler: PathBuf,
    bitcode_flags: Vec<String>,
    archiver: PathBuf,
}

impl Builder {
    pub fn new(mode: CompilerMode, config: &WllvmConfig) -> Result<Self, Error> {
        let backend = Backend::select(mode, config)?;
        if !backend.supports(mode) {
            return Err(Error::Config(format!(
                "The {:?} backend cannot build in {} mode",
                backend, mode
            )));
        }
        tracing::debug!("WLLVM compiler using {:?}", backend);

        let prefix = if backend.is_rustc() {
            config.rustc_path()
        } else {
            config.compiler_path()
        };
        if let Some(prefix) = prefix {
            tracing::debug!("WLLVM compiler path prefix {:?}", prefix);
        }

        let compiler = resolve_program(prefix, &backend.program_name(mode, config)?)?;
        let archiver = resolve_program(prefix, &config.binutils_program(config.ar_name()))?;
        let bitcode_flags = backend.bitcode_flags(config)?;

        Ok(Self {
            backend,
            mode,
            compiler,
            bitcode_flags,
            archiver,
        })
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn mode(&self) -> CompilerMode {
        self.mode
    }

    /// The native compiler program
    pub fn compiler_filepath(&self) -> &Path {
        &self.compiler
    }

    fn compiler_command(&self) -> Vec<String> {
        vec![self.compiler.to_string_lossy().into_owned()]
    }

    /// The original invocation, minus one occurrence of each forbidden flag
    pub fn native_command(&self, args_info: &CompilerArgsInfo) -> Vec<String> {
        let mut args = args_info.input_args().clone();
        for forbidden in args_info.forbidden_flags() {
            if let Some(index) = args.iter().position(|arg| arg == forbidden) {
                args.remove(index);
            }
        }

        let mut command = self.compiler_command();
        command.extend(args);
        command
    }

    /// The compiler in IR-emission mode
    pub fn bitcode_command(&self) -> Vec<String> {
        let mut command = self.compiler_command();
        command.extend(self.bitcode_flags.iter().cloned());
        command
    }

    pub fn archiver_command(&self) -> Vec<String> {
        vec![self.archiver.to_string_lossy().into_owned()]
    }

    /// Compile `src_filepath` alone into `object_filepath`
    pub fn object_file_command(
        &self,
        args_info: &CompilerArgsInfo,
        src_filepath: &Path,
        object_filepath: &Path,
    ) -> Vec<String> {
        let mut command = self.compiler_command();
        command.extend(args_info.compile_args().iter().cloned());
        command.push(src_filepath.to_string_lossy().into_owned());
        if self.backend.is_rustc() {
            command.push("--emit=obj".to_string());
        } else {
            command.push("-c".to_string());
        }
        command.push("-o".to_string());
        command.push(object_filepath.to_string_lossy().into_owned());
        command
    }

    /// Compile `src_filepath` alone into `bitcode_filepath`
    pub fn bitcode_file_command(
        &self,
        args_info: &CompilerArgsInfo,
        src_filepath: &Path,
        bitcode_filepath: &Path,
    ) -> Vec<String> {
        let mut command = self.bitcode_command();
        command.extend(args_info.compile_args().iter().cloned());
        if !self.backend.is_rustc() {
            command.push("-c".to_string());
        }
        command.push(src_filepath.to_string_lossy().into_owned());
        command.push("-o".to_string());
        command.push(bitcode_filepath.to_string_lossy().into_owned());
        command
    }

    /// Link the objects into the command's output with the native driver
    pub fn link_command<S>(&self, args_info: &CompilerArgsInfo, object_filepaths: &[S]) -> Vec<String>
    where
        S: AsRef<Path>,
    {
        let mut command = self.compiler_command();
        command.extend(
            object_filepaths
                .iter()
                .map(|object| object.as_ref().to_string_lossy().into_owned()),
        );
        command.extend(args_info.object_files().iter().cloned());
        command.extend(args_info.link_args().iter().cloned());
        command.push("-o".to_string());
        command.push(args_info.output_filename());
        command
    }

    /// Create or update the command's output archive with the objects
    pub fn archive_command<S>(&self, args_info: &CompilerArgsInfo, object_filepaths: &[S]) -> Vec<String>
    where
        S: AsRef<Path>,
    {
        let mut command = self.archiver_command();
        command.push("-rcs".to_string());
        command.push(args_info.output_filename());
        command.extend(
            object_filepaths
                .iter()
                .map(|object| object.as_ref().to_string_lossy().into_owned()),
        );
        command.extend(args_info.object_files().iter().cloned());
        command
    }
}
