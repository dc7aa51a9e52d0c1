//! Native executable emission: picks the per-target encoder and
//! container writer, builds the code segment (encoded IR, then the
//! fixed `exit(0)` stub so execution always terminates cleanly), and
//! returns the finished container bytes.

use gdsc_ir::Module;
use tracing::debug;

use crate::emit::container::{elf, macho, pe};
use crate::emit::encode::encode_module;
use crate::emit::exit_stub::exit_stub;
use crate::target::{Arch, Os, Platform};

/// A fixed, empty placeholder data segment: nothing in this minimum
/// implementation's IR lowering produces addressable static data.
const DATA_SEGMENT: &[u8] = &[];

pub fn emit_executable(module: &Module, platform: Platform) -> Vec<u8> {
    let mut code = encode_module(module, platform.arch());
    debug!(encoded_len = code.len(), ?platform, "assembling executable code segment");
    code.extend_from_slice(&exit_stub(platform));

    match (platform.os(), platform.arch()) {
        (Os::Windows, _) => pe::build(&code, DATA_SEGMENT),
        (Os::Macos, Arch::X86_64) => macho::build(&code, DATA_SEGMENT, macho::CpuType::X86_64),
        (Os::Macos, Arch::Aarch64) => macho::build(&code, DATA_SEGMENT, macho::CpuType::Arm64),
        (Os::Linux, Arch::X86_64) => elf::build(&code, DATA_SEGMENT, elf::EM_X86_64),
        (Os::Linux, Arch::Aarch64) => elf::build(&code, DATA_SEGMENT, elf::EM_AARCH64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_platform_emits_a_correctly_magicked_container() {
        let module = Module { functions: vec![] };
        let cases: [(Platform, &[u8]); 5] = [
            (Platform::WindowsX64, b"MZ"),
            (Platform::MacosX64, &[0xcf, 0xfa, 0xed, 0xfe]),
            (Platform::MacosArm64, &[0xcf, 0xfa, 0xed, 0xfe]),
            (Platform::LinuxX64, &[0x7f, b'E', b'L', b'F']),
            (Platform::LinuxArm64, &[0x7f, b'E', b'L', b'F']),
        ];
        for (platform, magic) in cases {
            let blob = emit_executable(&module, platform);
            assert_eq!(&blob[0..magic.len()], magic, "platform {:?}", platform);
        }
    }
}
