use std::{env, path::Path};

use wllvm::compiler_wrapper::CompilerMode;

pub mod wllvm_cc;

/// As `RUSTC_WRAPPER`, cargo passes the real rustc first: `wllvm-rustc rustc <args...>`.
/// The rustc we run is the configured one, so that argument is dropped.
fn is_wrapped_rustc(arg: &str) -> bool {
    !arg.starts_with('-')
        && !arg.ends_with(".rs")
        && Path::new(arg)
            .file_stem()
            .is_some_and(|stem| stem.to_string_lossy().starts_with("rustc"))
}

pub fn main() {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.first().is_some_and(|arg| is_wrapped_rustc(arg)) {
        args.remove(0);
    }

    wllvm_cc::wllvm_main(CompilerMode::Rust, &args)
}
