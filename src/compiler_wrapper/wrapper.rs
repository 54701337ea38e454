//! Build orchestrator
//!
//! One invocation runs in two phases. Phase 1 is the native command exactly
//! as the build system asked for it. Phase 2 only runs when phase 1
//! succeeded and produced objects: every source file gets a bitcode file
//! whose path is attached to its object, and commands that link are
//! re-linked from the attached objects.
//!
//! ```text
//! compile only:      -c foo.c -o foo.o   =>  foo.o + .foo.o.bc
//! compile and link:  foo.c bar.c -o app  =>  .foo.o .bar.o (+ .bc), relinked into app
//! link only:         foo.o bar.o -o app  =>  nothing to do after phase 1
//! ```

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::{
    arg_parser::{CompileMode, CompilerArgsInfo},
    attach::{Attachment, attach_bitcode_path_to_object},
    compiler_wrapper::{Builder, CompilerMode, patch_archive_members},
    config::WllvmConfig,
    constants::CCACHE_GUARD_EXIT_CODE,
    error::Error,
    utils::{
        CompilationUnit, execute_command, execute_command_checked, is_invoked_from_ccache,
    },
};

/// Drives one wrapped compiler invocation
#[derive(Debug)]
pub struct CompilerWrapper<'a> {
    builder: Builder,
    args: CompilerArgsInfo,
    config: &'a WllvmConfig,
}

impl<'a> CompilerWrapper<'a> {
    /// Select the backend and classify `args`
    pub fn new<S>(mode: CompilerMode, args: &[S], config: &'a WllvmConfig) -> Result<Self, Error>
    where
        S: AsRef<str>,
    {
        let builder = Builder::new(mode, config)?;

        let mut args_info = CompilerArgsInfo::default();
        if mode == CompilerMode::Rust {
            args_info.parse_rustc_args(args)?;
        } else {
            args_info.parse_args(args)?;
        }

        Ok(Self {
            builder,
            args: args_info,
            config,
        })
    }

    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    pub fn args(&self) -> &CompilerArgsInfo {
        &self.args
    }

    /// Run both phases; the result is the exit code of the invocation
    pub fn run(&self) -> Result<i32, Error> {
        let code = self.build_object()?;
        tracing::debug!("build_object rc = {}", code);
        if code != 0 {
            return Ok(code);
        }

        if let Some(reason) = self.args.bitcode_skip_reason() {
            tracing::debug!("No bitcode generation: {}", reason);
            return Ok(code);
        }

        self.build_and_attach_bitcode()
    }

    /// Phase 1: the native command, minus forbidden flags
    pub fn build_object(&self) -> Result<i32, Error> {
        let command = self.builder.native_command(&self.args);
        execute_command(&command, self.args.mode())
    }

    /// Phase 2
    pub fn build_and_attach_bitcode(&self) -> Result<i32, Error> {
        let is_compile_only = self.args.is_compile_only();
        let units = self.args.artifact_filepaths()?;

        if let ([unit], true) = (units.as_slice(), is_compile_only) {
            tracing::debug!("Compile only case: {:?}", unit.src_filepath);
            // The driver wrote the object where `-o` said
            let (object_filepath, bitcode_filepath) = match self.args.explicit_output_filename() {
                Some(output_filename) => (
                    PathBuf::from(output_filename),
                    self.args.output_bitcode_filepath(),
                ),
                None => (unit.object_filepath.clone(), unit.bitcode_filepath.clone()),
            };

            self.build_and_attach(unit, &object_filepath, &bitcode_filepath)?;
            return Ok(0);
        }

        // Archive members are extracted here and repacked by the link step
        let work_dir = if self.args.is_static_library() {
            Some(TempDir::new()?)
        } else {
            None
        };

        let mut new_object_filepaths = vec![];
        for unit in &units {
            tracing::debug!("Not compile only case: {:?}", unit.src_filepath);

            if let (true, Some(work_dir)) = (unit.is_rust_input(), &work_dir) {
                let patched_members = self.patch_static_library(unit, work_dir.path())?;
                new_object_filepaths.extend(patched_members);
                break;
            }

            if !is_compile_only {
                self.build_object_file(&unit.src_filepath, &unit.object_filepath)?;
                new_object_filepaths.push(unit.object_filepath.clone());
            }

            let attachment =
                self.build_and_attach(unit, &unit.object_filepath, &unit.bitcode_filepath)?;
            if attachment == Attachment::Vanished {
                return Ok(0);
            }
        }

        if !is_compile_only {
            tracing::debug!("Link all files: {:?}", new_object_filepaths);
            self.link_files(&new_object_filepaths)?;
        }

        Ok(0)
    }

    /// Attach the bitcode of `unit` to `object_filepath`, compiling it first
    /// unless the source already is bitcode
    fn build_and_attach(
        &self,
        unit: &CompilationUnit,
        object_filepath: &Path,
        bitcode_filepath: &Path,
    ) -> Result<Attachment, Error> {
        if unit.is_bitcode_input() {
            tracing::debug!(
                "Attaching {:?} to {:?}",
                unit.src_filepath,
                object_filepath
            );
            return attach_bitcode_path_to_object(&unit.src_filepath, object_filepath, self.config);
        }

        tracing::debug!(
            "Building and attaching {:?} to {:?}",
            bitcode_filepath,
            object_filepath
        );
        self.build_bitcode_file(&unit.src_filepath, bitcode_filepath)?;
        attach_bitcode_path_to_object(bitcode_filepath, object_filepath, self.config)
    }

    /// Build the crate bitcode next to the static library, then attach it
    /// to the library's own members
    fn patch_static_library(
        &self,
        unit: &CompilationUnit,
        work_dir: &Path,
    ) -> Result<Vec<PathBuf>, Error> {
        let crate_name = self.args.crate_name().ok_or_else(|| {
            Error::InvalidArguments(format!(
                "Failed to determine the crate name of {:?}",
                unit.src_filepath
            ))
        })?;
        let bitcode_filepath = self.args.output_bitcode_filepath();
        self.build_bitcode_file(&unit.src_filepath, &bitcode_filepath)?;

        patch_archive_members(
            &self.builder,
            self.args.output_filename(),
            crate_name,
            &bitcode_filepath,
            work_dir,
            self.config,
        )
    }

    pub fn build_bitcode_file<P, Q>(&self, src_filepath: P, bitcode_filepath: Q) -> Result<(), Error>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let src_filepath = src_filepath.as_ref();
        let bitcode_filepath = bitcode_filepath.as_ref();
        let command =
            self.builder
                .bitcode_file_command(&self.args, src_filepath, bitcode_filepath);
        tracing::debug!("build_bitcode_file: {:?}", command);

        execute_command_checked(&command, CompileMode::BitcodeGeneration).inspect_err(|_| {
            tracing::warn!(
                "Failed to generate bitcode {:?} for {:?}",
                bitcode_filepath,
                src_filepath
            )
        })
    }

    pub fn build_object_file<P, Q>(&self, src_filepath: P, object_filepath: Q) -> Result<(), Error>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let src_filepath = src_filepath.as_ref();
        let object_filepath = object_filepath.as_ref();
        let command = self
            .builder
            .object_file_command(&self.args, src_filepath, object_filepath);
        tracing::debug!("build_object_file: {:?}", command);

        execute_command_checked(&command, CompileMode::Compiling).inspect_err(|_| {
            tracing::warn!(
                "Failed to generate object {:?} for {:?}",
                object_filepath,
                src_filepath
            )
        })
    }

    /// Link, or for static libraries repack, the objects into the output
    pub fn link_files<P>(&self, object_filepaths: &[P]) -> Result<(), Error>
    where
        P: AsRef<Path>,
    {
        let (command, mode) = if self.args.is_static_library() {
            (
                self.builder.archive_command(&self.args, object_filepaths),
                CompileMode::Archiving,
            )
        } else {
            (
                self.builder.link_command(&self.args, object_filepaths),
                CompileMode::Linking,
            )
        };

        execute_command_checked(&command, mode)
            .inspect_err(|_| tracing::warn!("Failed to link {:?}", command))
    }
}

/// Run one wrapped compiler invocation and return its exit code
pub fn wcompile<S>(mode: CompilerMode, args: &[S], config: &WllvmConfig) -> i32
where
    S: AsRef<str>,
{
    // Under ccache's preprocessor mode we would recurse into ourselves
    if is_invoked_from_ccache() {
        tracing::error!("Should not be invoked from ccache");
        return CCACHE_GUARD_EXIT_CODE;
    }

    let args: Vec<&str> = args.iter().map(|arg| arg.as_ref()).collect();
    tracing::info!("Entering CC [{}]", args.join(" "));

    let result =
        CompilerWrapper::new(mode, args.as_slice(), config).and_then(|wrapper| wrapper.run());
    let code = match result {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{}: {}", mode, err);
            err.exit_code()
        }
    };
    tracing::debug!("Calling {:?} returned {}", args, code);

    code
}
