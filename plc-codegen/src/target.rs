use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Architecture the generated program is written for. Only affects how
/// registers, operands and comments are spelled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetArch {
    #[default]
    X86_64,
    Arm64,
    Mips,
}

impl TargetArch {
    pub fn name(self) -> &'static str {
        match self {
            TargetArch::X86_64 => "x86_64",
            TargetArch::Arm64 => "arm64",
            TargetArch::Mips => "mips",
        }
    }

    pub fn comment_leader(self) -> &'static str {
        match self {
            TargetArch::X86_64 => ";",
            TargetArch::Arm64 => "//",
            TargetArch::Mips => "#",
        }
    }
}

impl fmt::Display for TargetArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown target architecture '{0}', expected one of x86_64, arm64, mips")]
pub struct UnknownTarget(pub String);

impl FromStr for TargetArch {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x86_64" | "x86-64" | "amd64" => Ok(TargetArch::X86_64),
            "arm64" | "aarch64" => Ok(TargetArch::Arm64),
            "mips" => Ok(TargetArch::Mips),
            _ => Err(UnknownTarget(s.to_string())),
        }
    }
}
