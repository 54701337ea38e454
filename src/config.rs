//! Process-wide configuration
//!
//! Read once at start-up into an immutable [`WllvmConfig`] and passed by
//! reference from then on. Values come from an optional TOML file (named by
//! `WLLVM_CONFIG`) overlaid with environment variables.

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::{constants::*, error::Error};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct WllvmConfig {
    /// Backend selector: `clang` or `dragonegg`
    compiler: Option<String>,

    /// Secondary compiler for foreign-language builds: `rustc`
    mixed_compiler: Option<String>,

    /// Directory holding the native toolchain binaries
    compiler_path: Option<PathBuf>,

    /// Directory holding the rustc binary
    rustc_path: Option<PathBuf>,

    /// Program name overrides
    cc_name: Option<String>,
    cxx_name: Option<String>,
    f77_name: Option<String>,
    rustc_name: Option<String>,
    ar_name: Option<String>,

    /// Prefix of `gcc`/`g++`/`gfortran` for the dragonegg backend
    gcc_prefix: Option<String>,

    /// The dragonegg plugin
    dragonegg_plugin: Option<PathBuf>,

    /// Cross-compilation binutils target, e.g., `aarch64-linux-gnu`
    binutils_target_prefix: Option<String>,

    /// Extra flags for bitcode generation, e.g., "-flto -fwhole-program-vtables"
    bitcode_generation_flags: Vec<String>,

    /// The path of the directory that stores copies of generated bitcode files
    bitcode_store_path: Option<PathBuf>,

    /// `ERROR`, `WARNING`, `INFO` or `DEBUG`
    output_level: Option<String>,

    /// Log file; stderr when unset
    output_file: Option<PathBuf>,
}

impl WllvmConfig {
    pub fn compiler(&self) -> Option<&str> {
        self.compiler.as_deref()
    }

    pub fn mixed_compiler(&self) -> Option<&str> {
        self.mixed_compiler.as_deref()
    }

    pub fn compiler_path(&self) -> Option<&Path> {
        self.compiler_path.as_deref()
    }

    pub fn rustc_path(&self) -> Option<&Path> {
        self.rustc_path.as_deref()
    }

    pub fn cc_name(&self) -> &str {
        self.cc_name.as_deref().unwrap_or(DEFAULT_CC_NAME)
    }

    pub fn cxx_name(&self) -> &str {
        self.cxx_name.as_deref().unwrap_or(DEFAULT_CXX_NAME)
    }

    pub fn f77_name(&self) -> &str {
        self.f77_name.as_deref().unwrap_or(DEFAULT_F77_NAME)
    }

    pub fn rustc_name(&self) -> &str {
        self.rustc_name.as_deref().unwrap_or(DEFAULT_RUSTC_NAME)
    }

    pub fn ar_name(&self) -> &str {
        self.ar_name.as_deref().unwrap_or(DEFAULT_AR_NAME)
    }

    pub fn gcc_prefix(&self) -> &str {
        self.gcc_prefix.as_deref().unwrap_or_default()
    }

    pub fn dragonegg_plugin(&self) -> Option<&Path> {
        self.dragonegg_plugin.as_deref()
    }

    pub fn binutils_target_prefix(&self) -> Option<&str> {
        self.binutils_target_prefix.as_deref()
    }

    pub fn bitcode_generation_flags(&self) -> &[String] {
        &self.bitcode_generation_flags
    }

    pub fn bitcode_store_path(&self) -> Option<&Path> {
        self.bitcode_store_path.as_deref()
    }

    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    pub fn log_level(&self) -> Level {
        match self
            .output_level
            .as_deref()
            .map(|level| level.trim().to_ascii_uppercase())
            .as_deref()
        {
            Some("DEBUG") => Level::DEBUG,
            Some("INFO") => Level::INFO,
            Some("WARNING" | "WARN") => Level::WARN,
            _ => Level::ERROR,
        }
    }

    /// Binutils program name, with the cross-compilation target prepended
    pub fn binutils_program(&self, name: &str) -> String {
        match self.binutils_target_prefix() {
            Some(target) => format!("{target}-{name}"),
            None => name.to_string(),
        }
    }
}

impl WllvmConfig {
    /// Load the configuration of this process: the file named by
    /// `WLLVM_CONFIG` (if any), overlaid with the environment
    pub fn load() -> Result<Self, Error> {
        let base = match env::var_os(CONFIG_FILEPATH_ENV_NAME) {
            Some(config_filepath) if !config_filepath.is_empty() => {
                Self::load_path(config_filepath)?
            }
            _ => Self::default(),
        };

        Ok(base.with_vars(unicode_vars(env::vars_os())))
    }

    pub fn load_path<P>(config_filepath: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let config_filepath = config_filepath.as_ref();
        // `confy` would create a missing file; a typo should not go unnoticed
        if !config_filepath.is_file() {
            return Err(Error::Config(format!(
                "Configuration file does not exist: {:?}",
                config_filepath
            )));
        }
        Ok(confy::load_path(config_filepath)?)
    }

    /// Build a configuration from key/value pairs alone
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::default().with_vars(vars)
    }

    /// Override fields with the recognized variables in `vars`; empty
    /// values count as unset
    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let value = value.as_ref();
            if value.is_empty() {
                continue;
            }
            let string = || Some(value.to_string());
            let path = || Some(PathBuf::from(value));

            match key.as_ref() {
                COMPILER_ENV_NAME => self.compiler = string(),
                MIXED_COMPILER_ENV_NAME => self.mixed_compiler = string(),
                COMPILER_PATH_ENV_NAME => self.compiler_path = path(),
                RUSTC_PATH_ENV_NAME => self.rustc_path = path(),
                CC_NAME_ENV_NAME => self.cc_name = string(),
                CXX_NAME_ENV_NAME => self.cxx_name = string(),
                F77_NAME_ENV_NAME => self.f77_name = string(),
                RUSTC_NAME_ENV_NAME => self.rustc_name = string(),
                AR_NAME_ENV_NAME => self.ar_name = string(),
                GCC_PREFIX_ENV_NAME => self.gcc_prefix = string(),
                DRAGONEGG_PLUGIN_ENV_NAME => self.dragonegg_plugin = path(),
                BINUTILS_TARGET_PREFIX_ENV_NAME => self.binutils_target_prefix = string(),
                BITCODE_GENERATION_FLAGS_ENV_NAME => {
                    self.bitcode_generation_flags =
                        value.split_whitespace().map(String::from).collect()
                }
                BITCODE_STORE_ENV_NAME => self.bitcode_store_path = path(),
                OUTPUT_LEVEL_ENV_NAME => self.output_level = string(),
                OUTPUT_FILE_ENV_NAME => self.output_file = path(),
                _ => {}
            }
        }

        self
    }
}

/// Keep the variables that are valid unicode; the others cannot name or
/// hold any setting
fn unicode_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                tracing::debug!("Ignoring non-unicode environment variable {:?}", key);
                None
            }
        })
}
