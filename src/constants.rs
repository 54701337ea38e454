//! Internal constants: environment variable names, embedded section names,
//! default program names, exit codes and the C-family argument tables.
//!
//! This module is `pub(crate)` and not part of the public API.

use std::{collections::HashMap, sync::OnceLock};

use crate::arg_parser::{ArgInfo, ArgPatternInfo, CompilerArgsInfo};

type CallbackMap = HashMap<&'static str, ArgInfo<String>>;
type PatternCallbackVec = Vec<ArgPatternInfo<String>>;

/// ELF section name for the embedded bitcode path.
pub const ELF_SECTION_NAME: &str = ".llvm_bc";

/// Mach-O segment name for the embedded bitcode path. `__LLVM` is taken by
/// the system linker.
pub const DARWIN_SEGMENT_NAME: &str = "__WLLVM";

/// Mach-O section name for the embedded bitcode path.
pub const DARWIN_SECTION_NAME: &str = "__llvm_bc";

/// Exit code for setup faults and other failures without a child status.
pub const GENERIC_FAILURE_EXIT_CODE: i32 = 1;

/// Exit code when invoked from ccache's preprocessor mode.
pub const CCACHE_GUARD_EXIT_CODE: i32 = -1;

/// Parent command name that triggers the ccache guard.
pub const CCACHE_COMMAND_NAME: &str = "ccache";

/// Directory next to the executables holding the assembler shim used by the
/// plugin backend.
pub const DRAGONEGG_AS_DIR_NAME: &str = "dragonegg_as";

pub const COMPILER_ENV_NAME: &str = "LLVM_COMPILER";
pub const MIXED_COMPILER_ENV_NAME: &str = "LLVM_MIXED_COMPILER";
pub const COMPILER_PATH_ENV_NAME: &str = "LLVM_COMPILER_PATH";
pub const RUSTC_PATH_ENV_NAME: &str = "RUSTC_PATH";
pub const CC_NAME_ENV_NAME: &str = "LLVM_CC_NAME";
pub const CXX_NAME_ENV_NAME: &str = "LLVM_CXX_NAME";
pub const F77_NAME_ENV_NAME: &str = "LLVM_F77_NAME";
pub const RUSTC_NAME_ENV_NAME: &str = "LLVM_RUSTC_NAME";
pub const AR_NAME_ENV_NAME: &str = "LLVM_AR_NAME";
pub const GCC_PREFIX_ENV_NAME: &str = "LLVM_GCC_PREFIX";
pub const DRAGONEGG_PLUGIN_ENV_NAME: &str = "LLVM_DRAGONEGG_PLUGIN";
pub const BINUTILS_TARGET_PREFIX_ENV_NAME: &str = "BINUTILS_TARGET_PREFIX";
pub const BITCODE_GENERATION_FLAGS_ENV_NAME: &str = "LLVM_BITCODE_GENERATION_FLAGS";
pub const BITCODE_STORE_ENV_NAME: &str = "WLLVM_BC_STORE";
pub const OUTPUT_LEVEL_ENV_NAME: &str = "WLLVM_OUTPUT_LEVEL";
pub const OUTPUT_FILE_ENV_NAME: &str = "WLLVM_OUTPUT_FILE";

/// Environment variable naming an optional TOML configuration file.
pub const CONFIG_FILEPATH_ENV_NAME: &str = "WLLVM_CONFIG";

pub const DEFAULT_CC_NAME: &str = "clang";
pub const DEFAULT_CXX_NAME: &str = "clang++";
pub const DEFAULT_F77_NAME: &str = "flang";
pub const DEFAULT_RUSTC_NAME: &str = "rustc";
pub const DEFAULT_AR_NAME: &str = "llvm-ar";

/// Returns the lazily-initialized map of exact compiler flag matches to their handlers.
pub fn arg_exact_match_map() -> &'static CallbackMap {
    static ARG_EXACT_MATCH_MAP: OnceLock<CallbackMap> = OnceLock::new();

    ARG_EXACT_MATCH_MAP.get_or_init(|| {
        let mut m = HashMap::new();

        m.insert("/dev/null", ArgInfo::new(0, CompilerArgsInfo::input_file));
        m.insert("-", ArgInfo::new(0, CompilerArgsInfo::print_only));

        m.insert("-o", ArgInfo::new(1, CompilerArgsInfo::output_file));
        m.insert("-c", ArgInfo::new(0, CompilerArgsInfo::compile_only));
        m.insert("-E", ArgInfo::new(0, CompilerArgsInfo::preprocess_only));
        m.insert("-S", ArgInfo::new(0, CompilerArgsInfo::assemble_only));
        m.insert("--verbose", ArgInfo::new(0, CompilerArgsInfo::verbose));

        // The driver treats these like `-c`: no link step follows
        m.insert("--version", ArgInfo::new(0, CompilerArgsInfo::compile_only));
        m.insert("-v", ArgInfo::new(0, CompilerArgsInfo::compile_only));

        m.insert("-emit-llvm", ArgInfo::new(0, CompilerArgsInfo::emit_llvm));
        m.insert("-flto", ArgInfo::new(0, CompilerArgsInfo::lto));

        for flag in ["--param", "-aux-info", "-Xpreprocessor", "-Xassembler", "-Xlinker"] {
            m.insert(flag, ArgInfo::new(1, CompilerArgsInfo::default_binary));
        }

        for flag in [
            "-w", "-W", "-pipe", "-undef", "-nostdinc", "-nostdinc++", "-nostdlibinc",
            "-Qunused-arguments", "-no-integrated-as", "-integrated-as", "-no-cpp-precomp",
            "-ansi", "-pedantic", "-p", "-pg", "-mno-omit-leaf-frame-pointer", "-mno-red-zone",
            "-msoft-float", "-mstackrealign", "-mno-global-merge", "-mno-80387",
            "-mretpoline-external-thunk", "-mno-fp-ret-in-387", "-mskip-rax-setup",
            "-mindirect-branch-register",
        ] {
            m.insert(flag, ArgInfo::new(0, CompilerArgsInfo::compile_unary));
        }

        // Instruction set toggles
        for flag in [
            "-maes", "-mno-aes", "-mavx", "-mno-avx", "-mavx2", "-mno-avx2", "-mmmx", "-mno-mmx",
            "-mbmi", "-mbmi2", "-mf16c", "-mfma", "-msse", "-mno-sse", "-msse2", "-mno-sse2",
            "-msse3", "-mno-sse3", "-mssse3", "-mno-ssse3", "-msse4", "-mno-sse4", "-msse4.1",
            "-mno-sse4.1", "-msse4.2", "-mno-sse4.2", "-m3dnow", "-mno-3dnow",
        ] {
            m.insert(flag, ArgInfo::new(0, CompilerArgsInfo::compile_unary));
        }

        for flag in [
            "-g", "-g0", "-g1", "-g2", "-g3", "-ggdb", "-ggdb0", "-ggdb1", "-ggdb2", "-ggdb3",
            "-gdwarf", "-gdwarf-2", "-gdwarf-3", "-gdwarf-4", "-gdwarf-5", "-gline-tables-only",
            "-grecord-gcc-switches", "-ggnu-pubnames",
        ] {
            m.insert(flag, ArgInfo::new(0, CompilerArgsInfo::compile_unary));
        }

        for flag in ["-O", "-O0", "-O1", "-O2", "-O3", "-Os", "-Ofast", "-Og", "-Oz"] {
            m.insert(flag, ArgInfo::new(0, CompilerArgsInfo::compile_unary));
        }

        for flag in [
            "-m16", "-m32", "-m64", "-no-canonical-prefixes", "-fprofile-arcs", "-coverage",
            "--coverage", "-fopenmp",
        ] {
            m.insert(flag, ArgInfo::new(0, CompilerArgsInfo::compile_link_unary));
        }
        m.insert("--sysroot", ArgInfo::new(1, CompilerArgsInfo::compile_link_binary));

        for flag in [
            "-mllvm", "-A", "-D", "-U", "-arch", "-I", "-idirafter", "-include", "-imacros",
            "-iprefix", "-iwithprefix", "-iwithprefixbefore", "-isystem", "-isysroot",
            "-iquote", "-imultilib", "-x", "-Xclang",
        ] {
            m.insert(flag, ArgInfo::new(1, CompilerArgsInfo::compile_binary));
        }

        for flag in ["-M", "-MM", "-MG", "-MP", "-MD", "-MMD", "-MV"] {
            m.insert(flag, ArgInfo::new(0, CompilerArgsInfo::dependency_only));
        }
        for flag in ["-MF", "-MJ", "-MT", "-MQ"] {
            m.insert(flag, ArgInfo::new(1, CompilerArgsInfo::dependency_binary));
        }

        for flag in [
            "-pthread", "-shared", "-static", "-static-libgcc", "-pie", "-nostdlib",
            "-nodefaultlibs", "-rdynamic", "-dynamiclib",
        ] {
            m.insert(flag, ArgInfo::new(0, CompilerArgsInfo::link_unary));
        }
        for flag in [
            "-l", "-L", "-T", "-u", "-e", "-rpath", "-install_name", "-current_version",
            "-compatibility_version", "-framework",
        ] {
            m.insert(flag, ArgInfo::new(1, CompilerArgsInfo::link_binary));
        }

        // Meaningful only to the native linker; stripped from the native command
        m.insert("-dead_strip", ArgInfo::new(0, CompilerArgsInfo::forbidden_link_unary));
        m.insert(
            "-Wl,-dead_strip",
            ArgInfo::new(0, CompilerArgsInfo::forbidden_link_unary),
        );

        m
    })
}

/// Returns the lazily-initialized list of regex patterns to their handlers.
///
/// Patterns are tried in order; the first match wins.
pub fn arg_patterns() -> &'static PatternCallbackVec {
    static ARG_PATTERNS: OnceLock<PatternCallbackVec> = OnceLock::new();

    ARG_PATTERNS.get_or_init(|| {
        vec![
            ArgPatternInfo::new(r"^-MF.*$", 0, CompilerArgsInfo::compile_unary),
            ArgPatternInfo::new(r"^-MJ.*$", 0, CompilerArgsInfo::compile_unary),
            ArgPatternInfo::new(r"^-MQ.*$", 0, CompilerArgsInfo::compile_unary),
            ArgPatternInfo::new(r"^-MT.*$", 0, CompilerArgsInfo::compile_unary),
            ArgPatternInfo::new(r"^-Wl,.+$", 0, CompilerArgsInfo::link_unary),
            ArgPatternInfo::new(r"^-W[^l].*$", 0, CompilerArgsInfo::compile_unary),
            ArgPatternInfo::new(r"^-W[l][^,].*$", 0, CompilerArgsInfo::compile_unary),
            ArgPatternInfo::new(r"^-(l|L).+$", 0, CompilerArgsInfo::link_unary),
            ArgPatternInfo::new(r"^-I.+$", 0, CompilerArgsInfo::compile_unary),
            ArgPatternInfo::new(r"^-D.+$", 0, CompilerArgsInfo::compile_unary),
            ArgPatternInfo::new(r"^-U.+$", 0, CompilerArgsInfo::compile_unary),
            ArgPatternInfo::new(r"^-B.+$", 0, CompilerArgsInfo::compile_link_unary),
            ArgPatternInfo::new(r"^-isystem.+$", 0, CompilerArgsInfo::compile_link_unary),
            ArgPatternInfo::new(r"^-fsanitize=.+$", 0, CompilerArgsInfo::compile_link_unary),
            ArgPatternInfo::new(r"^-fuse-ld=.+$", 0, CompilerArgsInfo::link_unary),
            ArgPatternInfo::new(r"^-flto=.+$", 0, CompilerArgsInfo::lto),
            ArgPatternInfo::new(r"^-f.+$", 0, CompilerArgsInfo::compile_unary),
            ArgPatternInfo::new(r"^-rtlib=.+$", 0, CompilerArgsInfo::link_unary),
            ArgPatternInfo::new(r"^-std=.+$", 0, CompilerArgsInfo::compile_unary),
            ArgPatternInfo::new(r"^-stdlib=.+$", 0, CompilerArgsInfo::compile_link_unary),
            ArgPatternInfo::new(r"^--sysroot=.+$", 0, CompilerArgsInfo::compile_link_unary),
            ArgPatternInfo::new(r"^-print-.*$", 0, CompilerArgsInfo::print_only),
            ArgPatternInfo::new(r"^-m.+=.+$", 0, CompilerArgsInfo::compile_unary),
            ArgPatternInfo::new(r"^--param=.+$", 0, CompilerArgsInfo::compile_unary),
            ArgPatternInfo::new(
                r"^.+\.(c|cc|cpp|C|cxx|i|ii|s|S|bc)$",
                0,
                CompilerArgsInfo::input_file,
            ),
            ArgPatternInfo::new(
                r"^.+\.([fF](|[0-9][0-9]|or|OR|pp|PP))$",
                0,
                CompilerArgsInfo::input_file,
            ),
            ArgPatternInfo::new(
                r"^.+\.(o|lo|So|so|po|a|dylib|pico|nossppico)$",
                0,
                CompilerArgsInfo::object_file,
            ),
            ArgPatternInfo::new(r"^.+\.dylib(\.\d+)+$", 0, CompilerArgsInfo::object_file),
            ArgPatternInfo::new(r"^.+\.(So|so)(\.\d+)+$", 0, CompilerArgsInfo::object_file),
        ]
    })
}
