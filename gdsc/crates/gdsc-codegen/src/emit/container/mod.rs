//! Minimal stand-alone container writers for the three native-executable
//! formats spec.md §4.4 fixes the layout of. None of these produce a
//! binary a real OS loader is guaranteed to run end to end — spec.md §1
//! lists "producing fully working executables" as an explicit Non-goal —
//! but each one opens with the prescribed magic bytes and lays out the
//! headers/sections the spec describes.

pub mod elf;
pub mod macho;
pub mod pe;

/// Right-pads `buf` with zero bytes until its length is `target`. Used
/// to land the next structure at a fixed file offset the spec names
/// explicitly (e.g. PE code at `0x400`).
pub(crate) fn pad_to(buf: &mut Vec<u8>, target: usize) {
    if buf.len() < target {
        buf.resize(target, 0);
    }
}

pub(crate) fn push_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(bytes);
}

pub(crate) fn push_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub(crate) fn push_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub(crate) fn push_u64(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// A fixed-size ASCII name field padded with zero bytes (section/segment
/// names in all three formats are fixed-width, NUL-padded byte arrays).
pub(crate) fn push_name(buf: &mut Vec<u8>, name: &str, width: usize) {
    let bytes = name.as_bytes();
    let take = bytes.len().min(width);
    buf.extend_from_slice(&bytes[..take]);
    buf.resize(buf.len() + (width - take), 0);
}
