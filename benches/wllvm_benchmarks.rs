use std::fs;
use std::path::Path;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use object::{BinaryFormat, SectionKind, write};
use wllvm::arg_parser::CompilerArgsInfo;
use wllvm::compiler_wrapper::{Builder, CompilerMode};
use wllvm::config::WllvmConfig;
use wllvm::utils::{FileType, calculate_filepath_hash, derive_object_and_bitcode_filepath};

/// A typical autotools compile line
const COMPILE_LINE: &str = "-DHAVE_CONFIG_H -I. -I../include -g -O2 -Wall -fPIC -MT foo.lo -MD -MP \
                            -MF .deps/foo.Tpo -c ../src/foo.c -o foo.o";

/// A typical rustc invocation from cargo
const RUSTC_LINE: &str = "--crate-name demo --edition=2021 src/lib.rs --error-format=json \
                          --json=diagnostic-rendered-ansi --crate-type staticlib \
                          --emit=dep-info,metadata,link -C opt-level=3 -C embed-bitcode=no \
                          -C metadata=0f1e2d3c -C extra-filename=-0f1e2d3c \
                          --out-dir /build/target/release/deps -L dependency=/build/target/release/deps";

/// Create a minimal ELF object file for benchmarking.
fn create_minimal_elf_object(path: &Path) {
    let mut obj = write::Object::new(
        BinaryFormat::Elf,
        object::Architecture::X86_64,
        object::Endianness::Little,
    );
    let section_id = obj.add_section(vec![], b".text".to_vec(), SectionKind::Text);
    let section = obj.section_mut(section_id);
    section.set_data(&[0xc3], 1);
    let data = obj.write().expect("failed to write ELF object");
    fs::write(path, data).expect("failed to write object file");
}

// ---------------------------------------------------------------------------
// Argument classification benchmarks
// ---------------------------------------------------------------------------

fn bench_arg_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("arg_parsing");

    let args: Vec<&str> = COMPILE_LINE.split_ascii_whitespace().collect();
    group.bench_function("parse_args", |b| {
        b.iter(|| {
            let mut args_info = CompilerArgsInfo::default();
            args_info.parse_args(black_box(&args)).unwrap();
            black_box(args_info.bitcode_skip_reason());
        })
    });

    let rustc_args: Vec<&str> = RUSTC_LINE.split_ascii_whitespace().collect();
    group.bench_function("parse_rustc_args", |b| {
        b.iter(|| {
            let mut args_info = CompilerArgsInfo::default();
            args_info.parse_rustc_args(black_box(&rustc_args)).unwrap();
            black_box(args_info.output_filename());
        })
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Command construction benchmarks
// ---------------------------------------------------------------------------

fn bench_commands(c: &mut Criterion) {
    let mut group = c.benchmark_group("commands");

    let config = WllvmConfig::from_vars([
        ("LLVM_COMPILER", "clang"),
        ("LLVM_BITCODE_GENERATION_FLAGS", "-g -fno-inline"),
    ]);
    let builder = Builder::new(CompilerMode::C, &config).unwrap();
    let mut args_info = CompilerArgsInfo::default();
    let args: Vec<&str> = COMPILE_LINE.split_ascii_whitespace().collect();
    args_info.parse_args(&args).unwrap();

    group.bench_function("native_command", |b| {
        b.iter(|| black_box(builder.native_command(black_box(&args_info))))
    });
    group.bench_function("bitcode_file_command", |b| {
        b.iter(|| {
            black_box(builder.bitcode_file_command(
                black_box(&args_info),
                Path::new("../src/foo.c"),
                Path::new("../src/.foo.o.bc"),
            ))
        })
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Path and file type benchmarks
// ---------------------------------------------------------------------------

fn bench_paths_and_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("paths_and_types");

    group.bench_function("derive_object_and_bitcode_filepath", |b| {
        b.iter(|| derive_object_and_bitcode_filepath(black_box("/src/project/lib/foo.c"), false))
    });

    group.bench_function("calculate_filepath_hash", |b| {
        b.iter(|| calculate_filepath_hash(black_box("/src/project/lib/.foo.o.bc")))
    });

    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let object_filepath = dir.path().join("foo.o");
    create_minimal_elf_object(&object_filepath);
    group.bench_function("file_type_of", |b| {
        b.iter(|| FileType::of(black_box(&object_filepath)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_arg_parsing,
    bench_commands,
    bench_paths_and_types
);
criterion_main!(benches);
