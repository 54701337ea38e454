use std::{
    io,
    path::Path,
    process,
};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use owo_colors::OwoColorize;
use wllvm::{
    compiler_wrapper::{Builder, CompilerMode},
    config::WllvmConfig,
    diagnostics::{print_error, print_found_tool, print_missing_tool_error, print_warning},
};

/// Compiler personality to check
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Cc,
    Cxx,
    Fortran,
    Rustc,
}

impl From<Mode> for CompilerMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Cc => CompilerMode::C,
            Mode::Cxx => CompilerMode::Cxx,
            Mode::Fortran => CompilerMode::Fortran,
            Mode::Rustc => CompilerMode::Rust,
        }
    }
}

/// Check that the wllvm environment resolves to working tools
#[derive(Parser, Debug)]
#[command(
    name = "wllvm-sanity",
    about = "Check the wllvm configuration and the tools it resolves to",
    version
)]
struct SanityArgs {
    /// Wrappers to check; all C-family wrappers by default
    #[arg(short, long, value_enum)]
    mode: Vec<Mode>,

    #[command(subcommand)]
    command: Option<SanityCommand>,
}

#[derive(Subcommand, Debug)]
enum SanityCommand {
    /// Print shell completions for wllvm-sanity
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Resolve a program the way `Command` would, printing the outcome
fn check_tool(tool: &Path) -> bool {
    let tool_name = tool.to_string_lossy();
    match which::which(tool) {
        Ok(resolved) => {
            print_found_tool(&tool_name, &resolved);
            true
        }
        Err(_) => {
            let searched = tool.parent().filter(|dir| !dir.as_os_str().is_empty());
            print_missing_tool_error(&tool_name, searched);
            false
        }
    }
}

fn check_mode(mode: CompilerMode, config: &WllvmConfig) -> bool {
    eprintln!("{} {}", "checking".bold(), mode);

    let builder = match Builder::new(mode, config) {
        Ok(builder) => builder,
        Err(err) => {
            print_error(&err.to_string());
            return false;
        }
    };
    eprintln!("  backend: {:?}", builder.backend());

    let mut is_ok = check_tool(builder.compiler_filepath());
    for program in builder.archiver_command() {
        is_ok &= check_tool(Path::new(&program));
    }
    is_ok
}

/// Section editors for both object formats; only the host's is required
fn check_binutils(config: &WllvmConfig) -> bool {
    let objcopy = config.binutils_program("objcopy");
    let ld = config.binutils_program("ld");
    let (required, optional) = if cfg!(target_os = "macos") {
        (ld, objcopy)
    } else {
        (objcopy, ld)
    };

    if which::which(&optional).is_err() {
        print_warning(&format!(
            "`{}` not found; objects of the other format cannot be tagged",
            optional
        ));
    } else {
        check_tool(Path::new(&optional));
    }
    check_tool(Path::new(&required))
}

fn print_config(config: &WllvmConfig) {
    eprintln!("{}", "=== Effective configuration ===".bold());
    eprintln!("{:#?}", config);
    if let Some(store) = config.bitcode_store_path() {
        if !store.is_dir() {
            print_warning(&format!(
                "bitcode store {:?} does not exist yet; it will be created",
                store
            ));
        }
    }
}

fn main() {
    let args = SanityArgs::parse();

    if let Some(SanityCommand::Completions { shell }) = args.command {
        let mut cmd = SanityArgs::command();
        let bin_name = cmd.get_name().to_string();
        generate(shell, &mut cmd, &bin_name, &mut io::stdout());
        return;
    }

    let config = match WllvmConfig::load() {
        Ok(config) => config,
        Err(err) => {
            print_error(&err.to_string());
            process::exit(err.exit_code());
        }
    };
    print_config(&config);

    let modes = if args.mode.is_empty() {
        vec![Mode::Cc, Mode::Cxx]
    } else {
        args.mode
    };

    let mut is_ok = check_binutils(&config);
    for mode in modes {
        is_ok &= check_mode(mode.into(), &config);
    }

    if is_ok {
        eprintln!("{}", "All tools found".green().bold());
    } else {
        process::exit(1);
    }
}
