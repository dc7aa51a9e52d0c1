//! macOS Mach-O container (spec.md §4.4): magic `0xfeedfacf`, `MH_EXECUTE`,
//! a `__TEXT`/`__DATA` segment pair plus an `LC_MAIN` entry point at file
//! offset `0xf50`, with code at `0xf50` and data at `0x1000`.

use super::{pad_to, push_bytes, push_name, push_u32};

fn push_u64(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

const CPU_TYPE_X86_64: u32 = 0x0100_0007;
const CPU_TYPE_ARM64: u32 = 0x0100_000c;
const MH_EXECUTE: u32 = 2;
const LC_SEGMENT_64: u32 = 0x19;
const LC_MAIN: u32 = 0x8000_0028;

const CODE_OFFSET: u64 = 0xf50;
const DATA_OFFSET: u64 = 0x1000;
const TEXT_VMADDR: u64 = 0x1_0000_0000;

pub fn build(code: &[u8], data: &[u8], cpu_type: CpuType) -> Vec<u8> {
    let cputype = match cpu_type {
        CpuType::X86_64 => CPU_TYPE_X86_64,
        CpuType::Arm64 => CPU_TYPE_ARM64,
    };

    let text_filesize = CODE_OFFSET + code.len() as u64;
    let data_filesize = data.len().max(1) as u64;

    let mut cmds = Vec::new();
    push_segment(&mut cmds, "__TEXT", TEXT_VMADDR, DATA_OFFSET.max(text_filesize), 0, text_filesize, 7, 5, "__text", TEXT_VMADDR + CODE_OFFSET, code.len() as u64, CODE_OFFSET as u32, 0x8000_0400);
    push_segment(&mut cmds, "__DATA", TEXT_VMADDR + DATA_OFFSET, data_filesize, DATA_OFFSET, data_filesize, 3, 3, "__data", TEXT_VMADDR + DATA_OFFSET, data.len() as u64, DATA_OFFSET as u32, 0);
    push_main(&mut cmds);

    let mut out = Vec::new();
    push_u32(&mut out, 0xfeedfacf); // MH_MAGIC_64
    push_u32(&mut out, cputype);
    push_u32(&mut out, 0); // cpusubtype (ALL)
    push_u32(&mut out, MH_EXECUTE);
    push_u32(&mut out, 3); // ncmds
    push_u32(&mut out, cmds.len() as u32); // sizeofcmds
    push_u32(&mut out, 0); // flags
    push_u32(&mut out, 0); // reserved
    push_bytes(&mut out, &cmds);

    pad_to(&mut out, CODE_OFFSET as usize);
    push_bytes(&mut out, code);
    pad_to(&mut out, DATA_OFFSET as usize);
    push_bytes(&mut out, data);
    out
}

#[derive(Clone, Copy)]
pub enum CpuType {
    X86_64,
    Arm64,
}

#[allow(clippy::too_many_arguments)]
fn push_segment(
    buf: &mut Vec<u8>,
    segname: &str,
    vmaddr: u64,
    vmsize: u64,
    fileoff: u64,
    filesize: u64,
    maxprot: u32,
    initprot: u32,
    sectname: &str,
    sect_addr: u64,
    sect_size: u64,
    sect_offset: u32,
    sect_flags: u32,
) {
    let cmdsize = 72 + 80; // segment_command_64 + one section_64
    push_u32(buf, LC_SEGMENT_64);
    push_u32(buf, cmdsize);
    push_name(buf, segname, 16);
    push_u64(buf, vmaddr);
    push_u64(buf, vmsize);
    push_u64(buf, fileoff);
    push_u64(buf, filesize);
    push_u32(buf, maxprot);
    push_u32(buf, initprot);
    push_u32(buf, 1); // nsects
    push_u32(buf, 0); // flags

    push_name(buf, sectname, 16);
    push_name(buf, segname, 16);
    push_u64(buf, sect_addr);
    push_u64(buf, sect_size);
    push_u32(buf, sect_offset);
    push_u32(buf, 2); // align (2^2 = 4 bytes)
    push_u32(buf, 0); // reloff
    push_u32(buf, 0); // nreloc
    push_u32(buf, sect_flags);
    push_u32(buf, 0); // reserved1
    push_u32(buf, 0); // reserved2
    push_u32(buf, 0); // reserved3
}

fn push_main(buf: &mut Vec<u8>) {
    push_u32(buf, LC_MAIN);
    push_u32(buf, 24); // cmdsize
    push_u64(buf, CODE_OFFSET); // entryoff
    push_u64(buf, 0); // stacksize (0 = default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_mach_o_64_magic() {
        let blob = build(&[0xc3], &[], CpuType::X86_64);
        assert_eq!(u32::from_le_bytes(blob[0..4].try_into().unwrap()), 0xfeedfacf);
    }

    #[test]
    fn cpu_type_follows_the_requested_target() {
        let blob = build(&[0xc3], &[], CpuType::Arm64);
        assert_eq!(u32::from_le_bytes(blob[4..8].try_into().unwrap()), CPU_TYPE_ARM64);
    }

    #[test]
    fn code_lands_at_entry_offset() {
        let code = vec![0xd6, 0x5f, 0x03, 0xc0];
        let blob = build(&code, &[], CpuType::Arm64);
        let start = CODE_OFFSET as usize;
        assert_eq!(&blob[start..start + code.len()], code.as_slice());
    }
}
