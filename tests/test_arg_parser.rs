#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use wllvm::arg_parser::{CompileMode, CompilerArgsInfo};

    fn test_parsing<F>(input: &str, check_func: F)
    where
        F: Fn(&CompilerArgsInfo) -> bool,
    {
        let mut args_info = CompilerArgsInfo::default();
        let args: Vec<&str> = input.split_ascii_whitespace().collect();
        let ret = args_info.parse_args(&args);
        assert!(ret.is_ok());
        assert!(check_func(ret.unwrap()));
    }

    fn test_parsing_lto_internal(input: &str) {
        test_parsing(input, |args| args.is_lto());
    }

    #[test]
    fn test_parsing_lto() {
        let input = r#"-pthread -c -Wno-unused-result -Wsign-compare -Wunreachable-code -DNDEBUG -g -fwrapv -O3 -Wall -march=x86-64 -mtune=generic -O3 -pipe -fno-plt -g -fdebug-prefix-map=/home/legend/makepkgs/python/src=/usr/src/debug -fno-semantic-interposition -march=x86-64 -mtune=generic -O3 -pipe -fno-plt -g -fdebug-prefix-map=/home/legend/makepkgs/python/src=/usr/src/debug -fno-semantic-interposition -march=x86-64 -mtune=generic -O3 -pipe -fno-plt -g -fdebug-prefix-map=/home/legend/makepkgs/python/src=/usr/src/debug -fno-semantic-interposition -flto -g -std=c99 -Wextra -Wno-unused-result -Wno-unused-parameter -Wno-missing-field-initializers -Wstrict-prototypes -Werror=implicit-function-declaration -fprofile-instr-use=code.profclangd -I./Include/internal  -I. -I./Include -D_FORTIFY_SOURCE=2 -D_FORTIFY_SOURCE=2 -fPIC -DPy_BUILD_CORE -DSOABI='"cpython-38-x86_64-linux-gnu"'	-o Python/dynload_shlib.o ./Python/dynload_shlib.c"#;
        test_parsing_lto_internal(input);

        let input = r#"-pthread -c -Wno-unused-result -Wsign-compare -Wunreachable-code -DNDEBUG -g -fwrapv -O3 -Wall -march=x86-64 -mtune=generic -O3 -pipe -fno-plt -g -fdebug-prefix-map=/home/legend/makepkgs/python/src=/usr/src/debug -fno-semantic-interposition -march=x86-64 -mtune=generic -O3 -pipe -fno-plt -g -fdebug-prefix-map=/home/legend/makepkgs/python/src=/usr/src/debug -fno-semantic-interposition -march=x86-64 -mtune=generic -O3 -pipe -fno-plt -g -fdebug-prefix-map=/home/legend/makepkgs/python/src=/usr/src/debug -fno-semantic-interposition -flto=thin -g -std=c99 -Wextra -Wno-unused-result -Wno-unused-parameter -Wno-missing-field-initializers -Wstrict-prototypes -Werror=implicit-function-declaration -fprofile-instr-use=code.profclangd -I./Include/internal  -I. -I./Include -D_FORTIFY_SOURCE=2 -D_FORTIFY_SOURCE=2 -fPIC -DPy_BUILD_CORE -DSOABI='"cpython-38-x86_64-linux-gnu"'	-o Python/dynload_shlib.o ./Python/dynload_shlib.c"#;
        test_parsing_lto_internal(input);
    }

    fn test_parsing_link_args_internal(input: &str, expected: usize) {
        test_parsing(input, |args| args.link_args().len() == expected);
    }

    #[test]
    fn test_parsing_link_args() {
        let input = r#"-Wl,--fatal-warnings -Wl,--build-id=sha1 -fPIC -Wl,-z,noexecstack -Wl,-z,relro -Wl,-z,now -Wl,-z,defs -Wl,--as-needed -fuse-ld=lld -Wl,--icf=all -Wl,--color-diagnostics -flto=thin -Wl,--thinlto-jobs=8 -Wl,--thinlto-cache-dir=thinlto-cache -Wl,--thinlto-cache-policy,cache_size=10\%:cache_size_bytes=10g:cache_size_files=100000 -Wl,--lto-O0 -fwhole-program-vtables -Wl,--no-call-graph-profile-sort -m64 -Wl,-O2 -Wl,--gc-sections -Wl,--gdb-index -rdynamic -fsanitize=cfi-vcall -fsanitize=cfi-icall -pie -Wl,--disable-new-dtags -Wl,-O1,--sort-common,--as-needed,-z,relro,-z,now -o "./brotli" -Wl,--start-group @"./brotli.rsp"  -Wl,--end-group  -latomic -ldl -lpthread -lrt"#;
        test_parsing_link_args_internal(input, 32);

        let input = r#"1.c 2.c 3.c 4.c 5.c -Wl,--start-group 7.o 8.o 9.o -Wl,--end-group 10.c 11.c 12.c 13.c"#;
        test_parsing_link_args_internal(input, 5);
    }

    fn test_rustc_parsing<F>(input: &str, check_func: F)
    where
        F: Fn(&CompilerArgsInfo) -> bool,
    {
        let mut args_info = CompilerArgsInfo::default();
        let args: Vec<&str> = input.split_ascii_whitespace().collect();
        let ret = args_info.parse_rustc_args(&args);
        assert!(ret.is_ok());
        assert!(check_func(ret.unwrap()));
    }

    #[test]
    fn test_parsing_compile_only() {
        test_parsing("-c -O2 -Wall foo.c", |args| {
            args.is_compile_only()
                && args.input_files() == &vec!["foo.c".to_string()]
                && args.explicit_output_filename().is_none()
                && args.output_filename() == "foo.o"
                && args.mode() == CompileMode::Compiling
                && !args.is_bitcode_generation_skipped()
        });
    }

    #[test]
    fn test_parsing_compile_and_link() {
        test_parsing("foo.c bar.cpp prebuilt.o -lm -o app", |args| {
            !args.is_compile_only()
                && args.input_files().len() == 2
                && args.object_files() == &vec!["prebuilt.o".to_string()]
                && args.link_args() == &vec!["-lm".to_string()]
                && args.output_filename() == "app"
                && !args.is_bitcode_generation_skipped()
        });
    }

    #[test]
    fn test_parsing_skip_reasons() {
        let skipped = [
            "-v",
            "--version",
            "-print-prog-name=ld",
            "-E foo.c",
            "-S foo.c",
            "-c start.s",
            "-c -emit-llvm foo.c",
            "-c -flto foo.c",
            "-MM foo.c",
            "foo.o bar.o -o app",
        ];
        for input in skipped {
            test_parsing(input, |args| args.is_bitcode_generation_skipped());
        }

        // Dependency generation alongside compilation still produces an object
        test_parsing("-c -MD -MF foo.d foo.c", |args| {
            args.is_dependency_only() && !args.is_bitcode_generation_skipped()
        });
    }

    #[test]
    fn test_parsing_forbidden_flags() {
        test_parsing("foo.c -dead_strip -Wl,-dead_strip -o app", |args| {
            args.forbidden_flags().len() == 2
                && args.link_args().is_empty()
                && args.input_args().len() == 5
        });
    }

    #[test]
    fn test_parsing_rustc() {
        test_rustc_parsing(
            "--crate-name demo --edition=2021 src/lib.rs --crate-type staticlib \
             --emit=dep-info,metadata,link -C embed-bitcode=no -C extra-filename=-0f1e \
             --out-dir /build/deps -L dependency=/build/deps --cap-lints allow",
            |args| {
                args.is_rustc()
                    && args.is_static_library()
                    && args.crate_name() == Some("demo")
                    && args.output_filename() == "/build/deps/libdemo-0f1e.a"
                    && args.output_bitcode_filepath() == PathBuf::from("/build/deps/.libdemo-0f1e.a.bc")
                    && args.compile_args().contains(&"--cap-lints".to_string())
                    && !args.is_bitcode_generation_skipped()
            },
        );

        test_rustc_parsing("src/main.rs --crate-type bin --emit=link -o app", |args| {
            args.bitcode_skip_reason()
                == Some("rustc links this crate type itself; only static libraries are repacked")
        });

        test_rustc_parsing("--crate-type lib --emit=obj lib.rs", |args| {
            args.is_compile_only() && args.output_filename() == "lib.o"
        });
    }
}
