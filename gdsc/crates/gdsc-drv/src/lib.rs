//! gdsc-drv — the command-line driver binary `gdscript-compiler`:
//! flag parsing, file I/O, phase orchestration, diagnostic rendering,
//! and the exit-code policy of spec.md §6/§7.
//!
//! This crate is the "external collaborator" spec.md §1 calls out as
//! out of scope for the core passes; SPEC_FULL.md §0 brings it into
//! scope since a runnable compiler needs one.

mod config;
mod pipeline;

pub use config::{parse_args, Action, Config, ConfigError, HELP_TEXT, USAGE};
pub use pipeline::{run, CompileError};

/// Initializes the `tracing-subscriber` `EnvFilter` once at startup
/// (SPEC_FULL.md §10.2), reading `RUST_LOG` with a default of `info`.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
