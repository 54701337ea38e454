use std::{env, process};

use wllvm::{
    compiler_wrapper::CompilerMode, config::WllvmConfig, logging::init_logging, wcompile,
};

pub fn wllvm_main(mode: CompilerMode, args: &[String]) -> ! {
    let config = match WllvmConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}: {}", mode, err);
            process::exit(err.exit_code());
        }
    };

    // Still compile without logs
    if let Err(err) = init_logging(&config) {
        eprintln!("{}: {}", mode, err);
    }

    process::exit(wcompile(mode, args, &config))
}

#[allow(dead_code)]
pub fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    wllvm_main(CompilerMode::C, &args)
}
