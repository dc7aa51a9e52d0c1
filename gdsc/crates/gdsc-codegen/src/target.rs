//! The (OS, architecture) pairs this backend knows how to encode for,
//! plus the flag-string aliases `gdsc-drv` accepts on the command line
//! (spec.md §6).

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arch {
    X86_64,
    Aarch64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Os {
    Windows,
    Macos,
    Linux,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    WindowsX64,
    MacosX64,
    MacosArm64,
    LinuxX64,
    LinuxArm64,
}

impl Platform {
    /// Default platform when `--platform` is not given (spec.md §6: macOS/x64).
    pub fn default_platform() -> Platform {
        Platform::MacosX64
    }

    pub fn arch(self) -> Arch {
        match self {
            Platform::WindowsX64 | Platform::MacosX64 | Platform::LinuxX64 => Arch::X86_64,
            Platform::MacosArm64 | Platform::LinuxArm64 => Arch::Aarch64,
        }
    }

    pub fn os(self) -> Os {
        match self {
            Platform::WindowsX64 => Os::Windows,
            Platform::MacosX64 | Platform::MacosArm64 => Os::Macos,
            Platform::LinuxX64 | Platform::LinuxArm64 => Os::Linux,
        }
    }

    /// Parses the CLI aliases from spec.md §6. `None` on an unrecognized
    /// string; the driver turns that into a usage error.
    pub fn from_flag(s: &str) -> Option<Platform> {
        match s {
            "windows" | "win64" => Some(Platform::WindowsX64),
            "macos" | "mac64" => Some(Platform::MacosX64),
            "macos-arm" | "mac-arm" => Some(Platform::MacosArm64),
            "linux" | "linux64" => Some(Platform::LinuxX64),
            "linux-arm" | "linux-arm64" => Some(Platform::LinuxArm64),
            _ => None,
        }
    }

    /// Executable filename extension per spec.md §6: `.exe` on Windows,
    /// `.app` on macOS, none on Linux.
    pub fn executable_extension(self) -> &'static str {
        match self.os() {
            Os::Windows => ".exe",
            Os::Macos => ".app",
            Os::Linux => "",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmitFormat {
    Assembly,
    Object,
    Executable,
}

impl EmitFormat {
    /// Default format when `--format` is not given (spec.md §6: object).
    pub fn default_format() -> EmitFormat {
        EmitFormat::Object
    }

    pub fn from_flag(s: &str) -> Option<EmitFormat> {
        match s {
            "assembly" | "asm" => Some(EmitFormat::Assembly),
            "object" | "obj" => Some(EmitFormat::Object),
            "executable" | "exe" => Some(EmitFormat::Executable),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_platform_is_macos_x64() {
        assert_eq!(Platform::default_platform(), Platform::MacosX64);
    }

    #[test]
    fn platform_aliases_resolve() {
        assert_eq!(Platform::from_flag("win64"), Some(Platform::WindowsX64));
        assert_eq!(Platform::from_flag("mac-arm"), Some(Platform::MacosArm64));
        assert_eq!(Platform::from_flag("linux64"), Some(Platform::LinuxX64));
        assert_eq!(Platform::from_flag("bogus"), None);
    }

    #[test]
    fn arch_follows_platform() {
        assert_eq!(Platform::LinuxArm64.arch(), Arch::Aarch64);
        assert_eq!(Platform::WindowsX64.arch(), Arch::X86_64);
    }

    #[test]
    fn executable_extension_matches_os() {
        assert_eq!(Platform::WindowsX64.executable_extension(), ".exe");
        assert_eq!(Platform::MacosArm64.executable_extension(), ".app");
        assert_eq!(Platform::LinuxX64.executable_extension(), "");
    }
}
