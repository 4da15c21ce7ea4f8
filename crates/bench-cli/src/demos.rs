//! A fixed table of hand-assembled snippets.
//!
//! This stands in for a real assembler front-end (textual asm → bytes),
//! which `bench-core` treats as an external collaborator and this repo does
//! not implement. Every entry here is just raw machine code for the host
//! architecture, written by hand — nothing here parses text.

use bench_core::Id;

/// One demo candidate: a stable id, a human-readable label for the
/// dashboard, and its raw machine code.
pub struct Demo {
    pub id: Id,
    pub label: &'static str,
    pub bytes: &'static [u8],
}

#[cfg(target_arch = "aarch64")]
pub fn table() -> Vec<Demo> {
    vec![
        Demo {
            id: 1,
            label: "ret-only",
            bytes: &[0xc0, 0x03, 0x5f, 0xd6], // ret
        },
        Demo {
            id: 2,
            label: "add-then-ret",
            // add x0, x0, x1 ; ret
            bytes: &[0x00, 0x00, 0x01, 0x8b, 0xc0, 0x03, 0x5f, 0xd6],
        },
        Demo {
            id: 3,
            label: "nop-pad-then-ret",
            // nop x8 ; ret
            bytes: &[
                0x1f, 0x20, 0x03, 0xd5, 0x1f, 0x20, 0x03, 0xd5, 0x1f, 0x20, 0x03, 0xd5, 0x1f, 0x20,
                0x03, 0xd5, 0x1f, 0x20, 0x03, 0xd5, 0x1f, 0x20, 0x03, 0xd5, 0x1f, 0x20, 0x03, 0xd5,
                0x1f, 0x20, 0x03, 0xd5, 0xc0, 0x03, 0x5f, 0xd6,
            ],
        },
    ]
}

#[cfg(target_arch = "x86_64")]
pub fn table() -> Vec<Demo> {
    vec![
        Demo {
            id: 1,
            label: "ret-only",
            bytes: &[0xc3], // ret
        },
        Demo {
            id: 2,
            label: "add-then-ret",
            // add rax, rdi ; ret
            bytes: &[0x48, 0x01, 0xf8, 0xc3],
        },
        Demo {
            id: 3,
            label: "nop-pad-then-ret",
            bytes: &[0x90, 0x90, 0x90, 0x90, 0x90, 0x90, 0x90, 0x90, 0xc3],
        },
    ]
}

#[cfg(not(any(target_arch = "aarch64", target_arch = "x86_64")))]
pub fn table() -> Vec<Demo> {
    vec![Demo {
        id: 1,
        label: "fallback-noop",
        bytes: &bench_core::trampoline::RET_ONLY,
    }]
}
