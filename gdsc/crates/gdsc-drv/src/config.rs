//! Command-line configuration (SPEC_FULL.md §10.3): hand-rolled parsing
//! over `std::env::args()`, recognizing `--platform`/`--format`/`--help`
//! and the two positional arguments `<input> <output>` from spec.md §6.

use std::path::PathBuf;

use gdsc_codegen::{EmitFormat, Platform};

pub const USAGE: &str = "gdscript-compiler <input> <output> [--platform P] [--format F] [--help]";

pub const HELP_TEXT: &str = "\
gdscript-compiler <input> <output> [--platform P] [--format F] [--help]

Platforms (P), default macos/x64:
  windows, win64            Windows x64
  macos, mac64               macOS x64
  macos-arm, mac-arm          macOS ARM64
  linux, linux64              Linux x64
  linux-arm, linux-arm64      Linux ARM64

Formats (F), default object:
  assembly, asm               textual assembly listing (<output>.s)
  object, obj                  assembly plus the GDOBJ object blob (<output>.o)
  executable, exe               assembly, object blob, and a native executable

Flags:
  --platform P    select the target platform
  --format F      select the emitted format
  --help          print this message and exit
";

#[derive(Clone, Debug)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub platform: Platform,
    pub format: EmitFormat,
}

pub enum Action {
    Help,
    Run(Config),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unrecognized platform '{0}'")]
    UnknownPlatform(String),
    #[error("unrecognized format '{0}'")]
    UnknownFormat(String),
    #[error("missing value for flag '{0}'")]
    MissingFlagValue(String),
    #[error("unrecognized flag '{0}'")]
    UnknownFlag(String),
    #[error("missing required argument(s): <input> <output>")]
    MissingPositional,
}

/// Parses CLI arguments (excluding argv[0]). `--help` short-circuits to
/// [`Action::Help`] regardless of its position among the other flags.
pub fn parse_args(args: &[String]) -> Result<Action, ConfigError> {
    let mut platform = Platform::default_platform();
    let mut format = EmitFormat::default_format();
    let mut positionals = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--help" | "-h" => return Ok(Action::Help),
            "--platform" => {
                i += 1;
                let value = args.get(i).ok_or_else(|| ConfigError::MissingFlagValue("--platform".into()))?;
                platform = Platform::from_flag(value).ok_or_else(|| ConfigError::UnknownPlatform(value.clone()))?;
            }
            "--format" => {
                i += 1;
                let value = args.get(i).ok_or_else(|| ConfigError::MissingFlagValue("--format".into()))?;
                format = EmitFormat::from_flag(value).ok_or_else(|| ConfigError::UnknownFormat(value.clone()))?;
            }
            other if other.starts_with("--") => return Err(ConfigError::UnknownFlag(other.to_string())),
            other => positionals.push(other.to_string()),
        }
        i += 1;
    }

    if positionals.len() < 2 {
        return Err(ConfigError::MissingPositional);
    }

    Ok(Action::Run(Config {
        input: PathBuf::from(&positionals[0]),
        output: PathBuf::from(&positionals[1]),
        platform,
        format,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_to_macos_x64_object() {
        let action = parse_args(&args(&["in.gd", "out"])).unwrap();
        match action {
            Action::Run(cfg) => {
                assert_eq!(cfg.platform, Platform::MacosX64);
                assert_eq!(cfg.format, EmitFormat::Object);
            }
            Action::Help => panic!("expected Run"),
        }
    }

    #[test]
    fn parses_platform_and_format_flags() {
        let action = parse_args(&args(&["in.gd", "out", "--platform", "linux-arm", "--format", "asm"])).unwrap();
        match action {
            Action::Run(cfg) => {
                assert_eq!(cfg.platform, Platform::LinuxArm64);
                assert_eq!(cfg.format, EmitFormat::Assembly);
            }
            Action::Help => panic!("expected Run"),
        }
    }

    #[test]
    fn help_flag_short_circuits() {
        let action = parse_args(&args(&["--help"])).unwrap();
        assert!(matches!(action, Action::Help));
    }

    #[test]
    fn missing_positional_is_an_error() {
        let err = parse_args(&args(&["only-one"])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPositional));
    }

    #[test]
    fn unknown_platform_is_an_error() {
        let err = parse_args(&args(&["in.gd", "out", "--platform", "amiga"])).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPlatform(_)));
    }
}
