//! Command-line argument classifier
//!
//! Turns the raw argument list of a compiler invocation into a
//! [`CompilerArgsInfo`]: input and output files, compile-only status, the
//! flags to forward to compilation and linking, forbidden flags and, for
//! rustc, the crate identity. The result is read-only once parsed.

use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use regex::Regex;

use crate::{
    constants::{arg_exact_match_map, arg_patterns},
    error::Error,
    utils::{CompilationUnit, FileType, derive_compilation_unit},
};

/// Compile mode, used to label the commands we run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileMode {
    /// Compiling mode
    Compiling,
    /// Linking mode
    Linking,
    /// Archiving mode
    Archiving,
    /// Bitcode Generation mode
    BitcodeGeneration,
    /// Embedding a bitcode path into an object
    Attaching,
}

/// Compiler argument information
#[derive(Debug, Default, Clone)]
pub struct CompilerArgsInfo {
    input_args: Vec<String>,
    input_files: Vec<String>,
    object_files: Vec<String>,
    output_filename: Option<String>,
    output_dir: Option<String>,
    compile_args: Vec<String>,
    link_args: Vec<String>,
    forbidden_flags: Vec<String>,
    crate_name: Option<String>,
    crate_types: Vec<String>,
    extra_filename: Option<String>,
    emit_kinds: Option<Vec<String>>,
    is_rustc: bool,
    is_verbose: bool,
    is_dependency_only: bool,
    is_preprocess_only: bool,
    is_assemble_only: bool,
    is_assembly: bool,
    is_compile_only: bool,
    is_emit_llvm: bool,
    is_lto: bool,
    is_print_only: bool,
}

pub type CallbackFn<S> = for<'a> fn(&'a mut CompilerArgsInfo, S, &[S]) -> &'a mut CompilerArgsInfo;

pub struct ArgInfo<S>
where
    S: AsRef<str>,
{
    pub arity: usize,
    pub handler: CallbackFn<S>,
}

impl<S> ArgInfo<S>
where
    S: AsRef<str>,
{
    pub fn new(arity: usize, handler: CallbackFn<S>) -> Self {
        Self { arity, handler }
    }
}

pub struct ArgPatternInfo<S>
where
    S: AsRef<str>,
{
    pub pattern: Regex,
    pub arg_info: ArgInfo<S>,
}

impl<S> ArgPatternInfo<S>
where
    S: AsRef<str>,
{
    /// Patterns are compile-time literals in the argument tables.
    pub fn new(pattern: &str, arity: usize, handler: CallbackFn<S>) -> Self {
        let pattern = Regex::new(pattern).expect("invalid argument pattern");
        let arg_info = ArgInfo::new(arity, handler);
        Self { pattern, arg_info }
    }
}

fn assembly_file_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.(s|S)$").expect("invalid assembly file pattern"))
}

/// rustc flags that take their value as the next argument
const RUSTC_BINARY_FLAGS: &[&str] = &[
    "--cfg",
    "--check-cfg",
    "-L",
    "-l",
    "--extern",
    "--edition",
    "--target",
    "--cap-lints",
    "--error-format",
    "--json",
    "--sysroot",
    "--color",
    "--diagnostic-width",
    "--remap-path-prefix",
    "-Z",
    "-A",
    "-W",
    "-D",
    "-F",
    "--force-warn",
];

impl CompilerArgsInfo {
    pub fn input_file<S>(&mut self, flag: S, _args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        self.input_files.push(flag.as_ref().to_string());

        if assembly_file_regex().is_match(flag.as_ref()) {
            self.is_assembly = true;
        }

        self
    }

    pub fn output_file<S>(&mut self, _flag: S, args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        self.output_filename = Some(args[0].as_ref().to_string());
        self
    }

    pub fn object_file<S>(&mut self, flag: S, _args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        self.object_files.push(flag.as_ref().to_string());
        self
    }

    pub fn linker_group<S>(&mut self, _start: S, count: usize, args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        let group: Vec<String> = args[0..count]
            .iter()
            .map(|x| x.as_ref().to_string())
            .collect();
        self.link_args.extend(group);
        self
    }

    pub fn preprocess_only<S>(&mut self, _flag: S, _args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        self.is_preprocess_only = true;
        self
    }

    pub fn dependency_only<S>(&mut self, flag: S, _args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        self.is_dependency_only = true;
        self.compile_args.push(flag.as_ref().to_string());
        self
    }

    pub fn print_only<S>(&mut self, _flag: S, _args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        self.is_print_only = true;
        self
    }

    pub fn assemble_only<S>(&mut self, _flag: S, _args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        self.is_assemble_only = true;
        self
    }

    pub fn verbose<S>(&mut self, _flag: S, _args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        self.is_verbose = true;
        self
    }

    pub fn compile_only<S>(&mut self, _flag: S, _args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        self.is_compile_only = true;
        self
    }

    pub fn emit_llvm<S>(&mut self, _flag: S, _args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        self.is_emit_llvm = true;
        self.is_compile_only = true;
        self
    }

    pub fn lto<S>(&mut self, _flag: S, _args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        self.is_lto = true;
        self
    }

    pub fn link_unary<S>(&mut self, flag: S, _args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        self.link_args.push(flag.as_ref().to_string());
        self
    }

    pub fn compile_unary<S>(&mut self, flag: S, _args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        self.compile_args.push(flag.as_ref().to_string());
        self
    }

    pub fn forbidden_link_unary<S>(&mut self, flag: S, _args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        // NOTE: the flag cannot be used with this tool
        tracing::warn!("Dropping unsupported linker flag: {}", flag.as_ref());
        self.forbidden_flags.push(flag.as_ref().to_string());
        self
    }

    pub fn default_binary<S>(&mut self, _flag: S, _args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        // NOTE: do nothing
        self
    }

    pub fn dependency_binary<S>(&mut self, flag: S, args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        self.compile_args.push(flag.as_ref().to_string());
        self.compile_args.push(args[0].as_ref().to_string());
        self.is_dependency_only = true;
        self
    }

    pub fn compile_binary<S>(&mut self, flag: S, args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        self.compile_args.push(flag.as_ref().to_string());
        self.compile_args.push(args[0].as_ref().to_string());
        self
    }

    pub fn link_binary<S>(&mut self, flag: S, args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        self.link_args.push(flag.as_ref().to_string());
        self.link_args.push(args[0].as_ref().to_string());
        self
    }

    pub fn compile_link_unary<S>(&mut self, flag: S, _args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        self.compile_args.push(flag.as_ref().to_string());
        self.link_args.push(flag.as_ref().to_string());
        self
    }

    pub fn compile_link_binary<S>(&mut self, flag: S, args: &[S]) -> &'_ mut Self
    where
        S: AsRef<str>,
    {
        self.compile_args.push(flag.as_ref().to_string());
        self.compile_args.push(args[0].as_ref().to_string());

        self.link_args.push(flag.as_ref().to_string());
        self.link_args.push(args[0].as_ref().to_string());

        self
    }

    fn consume_params<S>(
        &mut self,
        i: usize,
        arg: S,
        arg_info: &ArgInfo<S>,
        args: &[S],
    ) -> Result<usize, Error>
    where
        S: AsRef<str>,
    {
        // Exclude the current argument
        let param_start = i + 1;
        let param_end = param_start + arg_info.arity;
        if param_end > args.len() {
            return Err(Error::InvalidArguments(format!(
                "`{}` expects {} parameter(s)",
                arg.as_ref(),
                arg_info.arity
            )));
        }
        let params = &args[param_start..param_end];
        (arg_info.handler)(self, arg, params);

        Ok(arg_info.arity)
    }

    /// Classify a C-family (clang/gcc driver) argument list
    pub fn parse_args<S>(&mut self, args: &[S]) -> Result<&'_ mut Self, Error>
    where
        S: AsRef<str>,
    {
        let args: Vec<String> = args.iter().map(|x| x.as_ref().to_string()).collect();
        self.input_args = args.clone();

        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            // Consume the current argument, by default
            let mut offset = 1;

            if let Some(arg_info) = arg_exact_match_map().get(arg.as_str()) {
                offset += self.consume_params(i, arg.to_string(), arg_info, &args)?;
            } else if arg == "-Wl,--start-group" {
                // N-ary grouping flag
                if let Some(group_end) = args[i..].iter().position(|x| x == "-Wl,--end-group") {
                    offset += group_end;

                    // Keep the group, including both start and end markers
                    let params = &args[i..(i + offset)];
                    self.linker_group(arg.to_string(), group_end + 1, params);
                } else {
                    // No "-Wl,--end-group": only consume "-Wl,--start-group"
                    self.compile_unary(arg, &[]);
                }
            } else {
                let mut matched = false;
                for arg_pattern in arg_patterns().iter() {
                    if arg_pattern.pattern.is_match(arg.as_str()) {
                        offset +=
                            self.consume_params(i, arg.to_string(), &arg_pattern.arg_info, &args)?;
                        matched = true;
                        break;
                    }
                }
                if !matched {
                    if FileType::of(arg).is_linkable() {
                        self.object_file(arg, &[]);
                    } else {
                        // Failed to recognize the compiler flag
                        self.compile_unary(arg, &[]);
                    }
                }
            }

            i += offset;
        }

        Ok(self)
    }

    /// Classify a rustc argument list
    pub fn parse_rustc_args<S>(&mut self, args: &[S]) -> Result<&'_ mut Self, Error>
    where
        S: AsRef<str>,
    {
        let args: Vec<String> = args.iter().map(|x| x.as_ref().to_string()).collect();
        self.input_args = args.clone();
        self.is_rustc = true;

        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_str();
            let (flag, inline_value) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
                _ => (arg, None),
            };

            // Fetch the flag value, either inline (`--flag=v`) or as the next argument
            let take_value = |i: &mut usize| -> Result<String, Error> {
                if let Some(value) = inline_value.clone() {
                    return Ok(value);
                }
                *i += 1;
                args.get(*i).cloned().ok_or_else(|| {
                    Error::InvalidArguments(format!("`{}` expects a parameter", flag))
                })
            };

            match flag {
                "--version" | "-V" | "-vV" => self.is_print_only = true,
                "--print" | "--explain" => {
                    take_value(&mut i)?;
                    self.is_print_only = true;
                }
                "-o" => self.output_filename = Some(take_value(&mut i)?),
                "--out-dir" => self.output_dir = Some(take_value(&mut i)?),
                "--emit" => {
                    let kinds = take_value(&mut i)?
                        .split(',')
                        .map(|kind| kind.split('=').next().unwrap_or(kind).to_string())
                        .collect::<Vec<_>>();
                    self.emit_kinds.get_or_insert_with(Vec::new).extend(kinds);
                }
                "--crate-name" => {
                    let value = take_value(&mut i)?;
                    self.compile_args.push(flag.to_string());
                    self.compile_args.push(value.clone());
                    self.crate_name = Some(value);
                }
                "--crate-type" => {
                    let value = take_value(&mut i)?;
                    self.compile_args.push(flag.to_string());
                    // Repeated flags and comma-separated lists both accumulate
                    self.crate_types.extend(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|kind| !kind.is_empty())
                            .map(String::from),
                    );
                    self.compile_args.push(value);
                }
                "-C" => {
                    let value = take_value(&mut i)?;
                    self.codegen_option(&value);
                    self.compile_args.push(flag.to_string());
                    self.compile_args.push(value);
                }
                _ if RUSTC_BINARY_FLAGS.contains(&flag) => {
                    let value = take_value(&mut i)?;
                    self.compile_args.push(flag.to_string());
                    self.compile_args.push(value);
                }
                _ if arg.starts_with("-C") => {
                    self.codegen_option(&arg[2..]);
                    self.compile_args.push(arg.to_string());
                }
                _ if !arg.starts_with('-') && arg.ends_with(".rs") => {
                    self.input_files.push(arg.to_string())
                }
                _ => self.compile_args.push(arg.to_string()),
            }

            i += 1;
        }

        if let Some(kinds) = &self.emit_kinds {
            let has = |name: &str| kinds.iter().any(|kind| kind == name);
            self.is_compile_only = has("obj") && !has("link");
        }

        if self.crate_name.is_none() {
            self.crate_name = self.input_files.first().and_then(|src| {
                Path::new(src)
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().replace('-', "_"))
            });
        }

        Ok(self)
    }

    fn codegen_option(&mut self, option: &str) {
        if let Some(extra) = option.strip_prefix("extra-filename=") {
            self.extra_filename = Some(extra.to_string());
        }
    }
}

impl CompilerArgsInfo {
    pub fn input_args(&self) -> &Vec<String> {
        self.input_args.as_ref()
    }

    pub fn input_files(&self) -> &Vec<String> {
        self.input_files.as_ref()
    }

    pub fn object_files(&self) -> &Vec<String> {
        self.object_files.as_ref()
    }

    /// The output named on the command line, if any
    pub fn explicit_output_filename(&self) -> Option<&str> {
        self.output_filename.as_deref()
    }

    pub fn compile_args(&self) -> &Vec<String> {
        self.compile_args.as_ref()
    }

    pub fn link_args(&self) -> &Vec<String> {
        self.link_args.as_ref()
    }

    pub fn forbidden_flags(&self) -> &Vec<String> {
        self.forbidden_flags.as_ref()
    }

    pub fn crate_name(&self) -> Option<&str> {
        self.crate_name.as_deref()
    }

    pub fn crate_types(&self) -> &[String] {
        &self.crate_types
    }

    fn has_crate_type(&self, kinds: &[&str]) -> bool {
        self.crate_types.iter().any(|kind| kinds.contains(&kind.as_str()))
    }

    pub fn is_rustc(&self) -> bool {
        self.is_rustc
    }

    pub fn is_static_library(&self) -> bool {
        self.has_crate_type(&["staticlib"])
    }

    pub fn is_verbose(&self) -> bool {
        self.is_verbose
    }

    pub fn is_dependency_only(&self) -> bool {
        self.is_dependency_only
    }

    pub fn is_preprocess_only(&self) -> bool {
        self.is_preprocess_only
    }

    pub fn is_assemble_only(&self) -> bool {
        self.is_assemble_only
    }

    pub fn is_assembly(&self) -> bool {
        self.is_assembly
    }

    pub fn is_compile_only(&self) -> bool {
        self.is_compile_only
    }

    pub fn is_emit_llvm(&self) -> bool {
        self.is_emit_llvm
    }

    pub fn is_lto(&self) -> bool {
        self.is_lto
    }

    pub fn is_print_only(&self) -> bool {
        self.is_print_only
    }

    /// Why no bitcode should be generated for this command, if anything
    pub fn bitcode_skip_reason(&self) -> Option<&'static str> {
        let emits_object = self.emit_kinds.as_ref().is_none_or(|kinds| {
            kinds.iter().any(|kind| kind == "obj" || kind == "link")
        });

        let conditions = [
            (
                self.is_print_only,
                "we are in print-only mode, so cannot embed the path of the bitcode",
            ),
            (
                self.input_files.is_empty(),
                "the list of input files is empty",
            ),
            (
                self.is_emit_llvm,
                "the compiler will generate bitcode in emit-llvm mode",
            ),
            (
                self.is_lto,
                "the compiler will generate bitcode during the link-time optimization",
            ),
            (
                self.is_assembly,
                "the input file(s) are written in assembly",
            ),
            (
                self.is_assemble_only,
                "we are only assembling, so cannot embed the path of the bitcode",
            ),
            (
                self.is_dependency_only && !self.is_compile_only,
                "we are only computing dependencies",
            ),
            (self.is_preprocess_only, "we are only preprocessing"),
            (
                self.is_rustc && self.has_crate_type(&["proc-macro", "proc_macro"]),
                "proc-macro crates are loaded by the compiler, never linked",
            ),
            (
                self.is_rustc && !emits_object,
                "the compiler does not emit an object file",
            ),
            (
                self.is_rustc && !self.is_compile_only && !self.is_static_library(),
                "rustc links this crate type itself; only static libraries are repacked",
            ),
        ];

        conditions
            .into_iter()
            .find(|(condition, _)| *condition)
            .map(|(_, reason)| reason)
    }

    pub fn is_bitcode_generation_skipped(&self) -> bool {
        self.bitcode_skip_reason().is_some()
    }

    pub fn mode(&self) -> CompileMode {
        if self.input_files.is_empty() && !self.is_compile_only {
            CompileMode::Linking
        } else {
            CompileMode::Compiling
        }
    }

    /// The file the command produces, named explicitly or by driver defaults
    pub fn output_filename(&self) -> String {
        if let Some(output_filename) = &self.output_filename {
            return output_filename.clone();
        }

        if self.is_rustc && self.is_static_library() {
            if let Some(crate_name) = &self.crate_name {
                let file_name = format!(
                    "lib{}{}.a",
                    crate_name,
                    self.extra_filename.as_deref().unwrap_or_default()
                );
                return match &self.output_dir {
                    Some(dir) => PathBuf::from(dir).join(file_name).to_string_lossy().into_owned(),
                    None => file_name,
                };
            }
        }

        if self.is_compile_only {
            if let Some(stem) = self
                .input_files
                .first()
                .and_then(|src| Path::new(src).file_stem())
            {
                return format!("{}.o", stem.to_string_lossy());
            }
        }

        "a.out".to_string()
    }

    /// Hidden bitcode file next to the command's output: `<dir>/.<name>.bc`
    pub fn output_bitcode_filepath(&self) -> PathBuf {
        let output_filename = self.output_filename();
        let output_filepath = Path::new(&output_filename);
        let file_name = output_filepath
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(output_filename.clone());
        let parent_dir = output_filepath.parent().unwrap_or(Path::new(""));

        parent_dir.join(format!(".{file_name}.bc"))
    }

    /// One compilation unit per input file
    pub fn artifact_filepaths(&self) -> Result<Vec<CompilationUnit>, Error> {
        self.input_files
            .iter()
            .map(|src_file| derive_compilation_unit(src_file, self.is_compile_only))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> CompilerArgsInfo {
        let mut args_info = CompilerArgsInfo::default();
        let args: Vec<&str> = input.split_ascii_whitespace().collect();
        args_info.parse_args(&args).unwrap();
        args_info
    }

    fn parse_rustc(input: &str) -> CompilerArgsInfo {
        let mut args_info = CompilerArgsInfo::default();
        let args: Vec<&str> = input.split_ascii_whitespace().collect();
        args_info.parse_rustc_args(&args).unwrap();
        args_info
    }

    #[test]
    fn test_compile_only_single_file() {
        let args = parse("-c foo.c -o foo.o -O2");
        assert!(args.is_compile_only());
        assert_eq!(args.input_files(), &vec!["foo.c".to_string()]);
        assert_eq!(args.explicit_output_filename(), Some("foo.o"));
        assert_eq!(args.compile_args(), &vec!["-O2".to_string()]);
        assert_eq!(args.bitcode_skip_reason(), None);
    }

    #[test]
    fn test_version_flag_is_skipped() {
        let args = parse("-v");
        assert!(args.is_compile_only());
        assert_eq!(
            args.bitcode_skip_reason(),
            Some("the list of input files is empty")
        );
    }

    #[test]
    fn test_link_only_is_skipped() {
        let args = parse("foo.o bar.o -o prog -lm");
        assert!(args.input_files().is_empty());
        assert_eq!(args.object_files().len(), 2);
        assert_eq!(args.link_args(), &vec!["-lm".to_string()]);
        assert_eq!(args.mode(), CompileMode::Linking);
        assert!(args.is_bitcode_generation_skipped());
    }

    #[test]
    fn test_print_flags_are_skipped() {
        let args = parse("-print-search-dirs");
        assert!(args.is_print_only());
        assert!(args.is_bitcode_generation_skipped());
    }

    #[test]
    fn test_preprocess_and_assembly_are_skipped() {
        assert_eq!(
            parse("-E foo.c").bitcode_skip_reason(),
            Some("we are only preprocessing")
        );
        assert_eq!(
            parse("-c start.S").bitcode_skip_reason(),
            Some("the input file(s) are written in assembly")
        );
    }

    #[test]
    fn test_forbidden_flags_are_recorded() {
        let args = parse("foo.c -Wl,-dead_strip -o foo");
        assert_eq!(args.forbidden_flags(), &vec!["-Wl,-dead_strip".to_string()]);
        assert!(!args.link_args().contains(&"-Wl,-dead_strip".to_string()));
    }

    #[test]
    fn test_missing_parameter_is_an_error() {
        let mut args_info = CompilerArgsInfo::default();
        assert!(args_info.parse_args(&["foo.c", "-o"]).is_err());
    }

    #[test]
    fn test_default_output_filename() {
        assert_eq!(parse("-c dir/foo.c").output_filename(), "foo.o");
        assert_eq!(parse("foo.c bar.c").output_filename(), "a.out");
        assert_eq!(parse("-c foo.c -o out/x.o").output_filename(), "out/x.o");
    }

    #[test]
    fn test_output_bitcode_filepath() {
        assert_eq!(
            parse("-c foo.c -o out/x.o").output_bitcode_filepath(),
            PathBuf::from("out/.x.o.bc")
        );
        assert_eq!(
            parse("-c foo.c").output_bitcode_filepath(),
            PathBuf::from(".foo.o.bc")
        );
    }

    #[test]
    fn test_rustc_staticlib() {
        let args = parse_rustc(
            "--crate-name mylib --edition=2021 src/lib.rs --crate-type staticlib \
             --emit=dep-info,link -C opt-level=3 -C extra-filename=-1a2b --out-dir target/deps \
             -L dependency=target/deps",
        );
        assert!(args.is_rustc());
        assert!(args.is_static_library());
        assert!(!args.is_compile_only());
        assert_eq!(args.crate_name(), Some("mylib"));
        assert_eq!(args.input_files(), &vec!["src/lib.rs".to_string()]);
        assert_eq!(args.output_filename(), "target/deps/libmylib-1a2b.a");
        assert!(!args.compile_args().iter().any(|arg| arg.starts_with("--emit")));
        assert_eq!(args.bitcode_skip_reason(), None);
    }

    #[test]
    fn test_rustc_queries_and_binaries_are_skipped() {
        assert!(parse_rustc("-vV").is_bitcode_generation_skipped());
        assert!(parse_rustc("- --crate-name ___ --print=file-names").is_bitcode_generation_skipped());
        assert!(parse_rustc("src/main.rs --crate-type bin -o app").is_bitcode_generation_skipped());
        assert!(
            parse_rustc("src/lib.rs --crate-type proc-macro").is_bitcode_generation_skipped()
        );
        assert!(
            parse_rustc("src/lib.rs --crate-type staticlib --emit=metadata")
                .is_bitcode_generation_skipped()
        );
    }

    #[test]
    fn test_rustc_multiple_crate_types() {
        for crate_type_args in [
            "--crate-type staticlib --crate-type rlib",
            "--crate-type rlib --crate-type=staticlib",
            "--crate-type rlib,staticlib",
        ] {
            let args = parse_rustc(&format!(
                "--crate-name mylib src/lib.rs {crate_type_args} --emit=dep-info,metadata,link \
                 --out-dir target/deps"
            ));
            assert!(args.is_static_library(), "{crate_type_args}");
            assert_eq!(args.crate_types().len(), 2, "{crate_type_args}");
            assert_eq!(args.output_filename(), "target/deps/libmylib.a");
            assert_eq!(args.bitcode_skip_reason(), None, "{crate_type_args}");
        }

        let args = parse_rustc("src/lib.rs --crate-type rlib --crate-type proc-macro");
        assert!(args.is_bitcode_generation_skipped());
        assert!(!args.is_static_library());
    }

    #[test]
    fn test_rustc_emit_obj_is_compile_only() {
        let args = parse_rustc("my-crate.rs --emit=obj -o my.o");
        assert!(args.is_compile_only());
        assert_eq!(args.crate_name(), Some("my_crate"));
        assert_eq!(args.bitcode_skip_reason(), None);
    }
}
