//! Fixtures shared by the integration tests
#![allow(dead_code)]

use std::{fs, path::Path};

use object::{
    Architecture, BinaryFormat, Endianness, Object, ObjectSection, SectionKind, SymbolFlags,
    SymbolKind, SymbolScope, write,
};

pub fn host_architecture() -> Architecture {
    if cfg!(target_arch = "aarch64") {
        Architecture::Aarch64
    } else {
        Architecture::X86_64
    }
}

/// A relocatable ELF object for the host with one function, `symbol`
pub fn elf_object(symbol: &str) -> Vec<u8> {
    let mut obj = write::Object::new(BinaryFormat::Elf, host_architecture(), Endianness::Little);
    let text = obj.add_section(vec![], b".text".to_vec(), SectionKind::Text);
    let offset = obj.append_section_data(text, &[0xc3, 0x90, 0x90, 0x90], 16);
    obj.add_symbol(write::Symbol {
        name: symbol.as_bytes().to_vec(),
        value: offset,
        size: 4,
        kind: SymbolKind::Text,
        scope: SymbolScope::Linkage,
        weak: false,
        section: write::SymbolSection::Section(text),
        flags: SymbolFlags::None,
    });
    obj.write().unwrap()
}

/// [`elf_object`] with its `e_type` patched: 2 for executables, 3 for shared objects
pub fn elf_with_type(e_type: u16) -> Vec<u8> {
    let mut data = elf_object("main");
    data[16..18].copy_from_slice(&e_type.to_le_bytes());
    data
}

/// Contents of `section_name` in the object at `object_filepath`
pub fn section_contents<P>(object_filepath: P, section_name: &str) -> Option<Vec<u8>>
where
    P: AsRef<Path>,
{
    let data = fs::read(object_filepath).ok()?;
    section_contents_of(&data, section_name)
}

pub fn section_contents_of(data: &[u8], section_name: &str) -> Option<Vec<u8>> {
    let obj = object::File::parse(data).ok()?;
    let section = obj.section_by_name(section_name)?;
    section.data().ok().map(|data| data.to_vec())
}

/// Tests that drive binutils only run where ELF is the native format
pub fn has_tools(tools: &[&str]) -> bool {
    if !cfg!(target_os = "linux") {
        return false;
    }
    tools.iter().all(|tool| {
        let found = which::which(tool).is_ok();
        if !found {
            eprintln!("skipping: `{tool}` not found");
        }
        found
    })
}
