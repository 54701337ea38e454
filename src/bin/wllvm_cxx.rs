use std::env;

use wllvm::compiler_wrapper::CompilerMode;

pub mod wllvm_cc;

pub fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    wllvm_cc::wllvm_main(CompilerMode::Cxx, &args)
}
