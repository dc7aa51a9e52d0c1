//! Linux ELF container (spec.md §4.4): a 64-byte `ET_EXEC` header, two
//! `PT_LOAD` program headers (code RX at `0x400000`, data RW at
//! `0x401000`), code at file offset `0x1000`, and four section headers
//! (null, `.text`, `.data`, `.shstrtab`) starting at `0x2000`.

use super::{pad_to, push_bytes, push_u16, push_u32, push_u64};

pub const EM_X86_64: u16 = 62;
pub const EM_AARCH64: u16 = 183;

const CODE_VADDR: u64 = 0x400000;
const DATA_VADDR: u64 = 0x401000;
const CODE_OFFSET: u64 = 0x1000;
const SHOFF: u64 = 0x2000;
const DATA_OFFSET: u64 = 0x3000;

const SHSTRTAB: &[u8] = b"\0.text\0.data\0.shstrtab\0";

pub fn build(code: &[u8], data: &[u8], machine: u16) -> Vec<u8> {
    let mut out = Vec::new();

    // e_ident.
    push_bytes(&mut out, &[0x7f, b'E', b'L', b'F']);
    out.push(2); // EI_CLASS: ELFCLASS64
    out.push(1); // EI_DATA: ELFDATA2LSB
    out.push(1); // EI_VERSION
    out.push(0); // EI_OSABI: System V
    out.resize(16, 0); // EI_ABIVERSION + padding

    push_u16(&mut out, 2); // e_type: ET_EXEC
    push_u16(&mut out, machine);
    push_u32(&mut out, 1); // e_version
    push_u64(&mut out, CODE_VADDR + CODE_OFFSET); // e_entry
    push_u64(&mut out, 64); // e_phoff
    push_u64(&mut out, SHOFF); // e_shoff
    push_u32(&mut out, 0); // e_flags
    push_u16(&mut out, 64); // e_ehsize
    push_u16(&mut out, 56); // e_phentsize
    push_u16(&mut out, 2); // e_phnum
    push_u16(&mut out, 64); // e_shentsize
    push_u16(&mut out, 4); // e_shnum
    push_u16(&mut out, 3); // e_shstrndx

    debug_assert_eq!(out.len(), 64);

    // Program header: code segment (R+X).
    push_program_header(&mut out, 1 | 4, CODE_OFFSET, CODE_VADDR, code.len() as u64);
    // Program header: data segment (R+W).
    push_program_header(&mut out, 2 | 4, DATA_OFFSET, DATA_VADDR, data.len().max(1) as u64);

    pad_to(&mut out, CODE_OFFSET as usize);
    push_bytes(&mut out, code);
    pad_to(&mut out, SHOFF as usize);

    let shstrtab_off = SHOFF as usize + 4 * 64;
    push_section_header(&mut out, 0, 0, 0, 0, 0); // SHT_NULL
    push_section_header(&mut out, 1, 1, CODE_VADDR + CODE_OFFSET, CODE_OFFSET, code.len() as u64); // .text
    push_section_header(&mut out, 7, 1, DATA_VADDR + DATA_OFFSET, DATA_OFFSET, data.len() as u64); // .data
    push_section_header(&mut out, 13, 3, 0, shstrtab_off as u64, SHSTRTAB.len() as u64); // .shstrtab

    push_bytes(&mut out, SHSTRTAB);
    pad_to(&mut out, DATA_OFFSET as usize);
    push_bytes(&mut out, data);
    out
}

fn push_program_header(buf: &mut Vec<u8>, flags: u32, offset: u64, vaddr: u64, filesz: u64) {
    push_u32(buf, 1); // p_type: PT_LOAD
    push_u32(buf, flags);
    push_u64(buf, offset);
    push_u64(buf, vaddr);
    push_u64(buf, vaddr); // p_paddr
    push_u64(buf, filesz);
    push_u64(buf, filesz); // p_memsz
    push_u64(buf, 0x1000); // p_align
}

fn push_section_header(buf: &mut Vec<u8>, name_off: u32, sh_type: u32, addr: u64, offset: u64, size: u64) {
    push_u32(buf, name_off);
    push_u32(buf, sh_type);
    push_u64(buf, if sh_type == 0 { 0 } else { 2 }); // sh_flags: SHF_ALLOC unless null
    push_u64(buf, addr);
    push_u64(buf, offset);
    push_u64(buf, size);
    push_u32(buf, 0); // sh_link
    push_u32(buf, 0); // sh_info
    push_u64(buf, 1); // sh_addralign
    push_u64(buf, 0); // sh_entsize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_elf_magic() {
        let blob = build(&[0x90], &[], EM_X86_64);
        assert_eq!(&blob[0..4], &[0x7f, b'E', b'L', b'F']);
    }

    #[test]
    fn machine_field_reflects_requested_architecture() {
        let blob = build(&[0x90], &[], EM_AARCH64);
        assert_eq!(u16::from_le_bytes(blob[18..20].try_into().unwrap()), EM_AARCH64);
    }

    #[test]
    fn code_lands_at_file_offset_0x1000() {
        let code = vec![0x0f, 0x05];
        let blob = build(&code, &[], EM_X86_64);
        let start = CODE_OFFSET as usize;
        assert_eq!(&blob[start..start + code.len()], code.as_slice());
    }

    #[test]
    fn section_headers_start_at_file_offset_0x2000() {
        let blob = build(&[0x90], &[0x01], EM_X86_64);
        let e_shoff = u64::from_le_bytes(blob[40..48].try_into().unwrap());
        assert_eq!(e_shoff, 0x2000);
        // SHT_NULL's name_off and sh_type both sit at the very front of
        // the section header table.
        assert_eq!(&blob[0x2000..0x2000 + 8], &[0u8; 8][..]);
    }
}
