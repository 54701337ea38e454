mod common;

#[cfg(test)]
mod tests {
    use std::fs;

    use wllvm::{
        attach::{Attachment, attach_bitcode_path_to_object},
        config::WllvmConfig,
        utils::{FileType, is_object_file},
    };

    use crate::common::{elf_object, elf_with_type};

    #[test]
    fn test_file_type_detection() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = [
            ("foo.o", elf_object("foo"), FileType::ElfObject),
            ("app", elf_with_type(2), FileType::ElfExecutable),
            ("libfoo.so", elf_with_type(3), FileType::ElfShared),
            ("empty.o", vec![], FileType::Unknown),
            ("notes.txt", b"plain text".to_vec(), FileType::Unknown),
        ];

        for (name, data, expected) in inputs {
            let filepath = dir.path().join(name);
            fs::write(&filepath, data).unwrap();
            assert_eq!(FileType::of(&filepath), expected, "{name}");
        }

        assert!(is_object_file(dir.path().join("foo.o")));
        assert!(!is_object_file(dir.path().join("app")));
        assert_eq!(FileType::of(dir.path().join("missing.o")), FileType::Unknown);
        assert_eq!(FileType::of(dir.path()), FileType::Unknown);
    }

    #[test]
    fn test_attach_to_final_binaries_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let bitcode_filepath = dir.path().join(".main.o.bc");
        fs::write(&bitcode_filepath, b"BC\xc0\xde").unwrap();
        let config = WllvmConfig::default();

        for (name, e_type, file_type) in [
            ("app", 2, FileType::ElfExecutable),
            ("libapp.so", 3, FileType::ElfShared),
        ] {
            let filepath = dir.path().join(name);
            let original = elf_with_type(e_type);
            fs::write(&filepath, &original).unwrap();

            let attachment =
                attach_bitcode_path_to_object(&bitcode_filepath, &filepath, &config).unwrap();
            assert_eq!(attachment, Attachment::NotAnObject(file_type));
            assert_eq!(fs::read(&filepath).unwrap(), original);
        }
    }
}
