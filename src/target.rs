//! Target platform definitions.

use crate::error::BootError;
use std::fmt;
use std::str::FromStr;

/// Capability: whether a platform can enter storage recovery mode.
pub trait SupportsRecovery {
    /// Whether a failed mount should enter recovery instead of booting normally.
    fn supports_recovery(&self) -> bool;
}

/// The hardware platforms the firmware is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// TYT MD-380/390.
    Md3x0,
    /// TYT MD-UV380/390.
    MdUv3x0,
    /// TYT MD-9600.
    Md9600,
    /// Radioddity GD-77.
    Gd77,
    /// Baofeng DM-1801.
    Dm1801,
    /// Module17 modem board.
    Mod17,
    /// Linux emulator.
    Linux,
}

impl Target {
    /// All known targets.
    pub const ALL: [Target; 7] = [
        Target::Md3x0,
        Target::MdUv3x0,
        Target::Md9600,
        Target::Gd77,
        Target::Dm1801,
        Target::Mod17,
        Target::Linux,
    ];

    /// Short lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Target::Md3x0 => "md3x0",
            Target::MdUv3x0 => "mduv3x0",
            Target::Md9600 => "md9600",
            Target::Gd77 => "gd77",
            Target::Dm1801 => "dm1801",
            Target::Mod17 => "mod17",
            Target::Linux => "linux",
        }
    }
}

impl SupportsRecovery for Target {
    fn supports_recovery(&self) -> bool {
        // No serial dump channel on these.
        !matches!(self, Target::Mod17 | Target::Linux)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = BootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Target::ALL
            .into_iter()
            .find(|target| target.name() == wanted)
            .ok_or_else(|| BootError::UnknownTarget(s.to_string()))
    }
}
