//! Error types for the boot orchestrator.

/// Errors produced at the configuration and status-code boundaries.
///
/// The boot flow itself never returns these: a mount failure is routed to
/// recovery and everything else is logged.
#[derive(Debug, thiserror::Error)]
pub enum BootError {
    /// A setting value was outside the valid range.
    #[error("Invalid value {value} for {setting} (expected {min}-{max})")]
    InvalidSetting {
        /// The setting name.
        setting: &'static str,
        /// The invalid value provided.
        value: u8,
        /// Minimum allowed value.
        min: u8,
        /// Maximum allowed value.
        max: u8,
    },

    /// The target name does not match any known platform.
    #[error("Unknown target platform '{0}'")]
    UnknownTarget(String),

    /// The filesystem could not be mounted.
    #[error("Filesystem mount failed (status: {0})")]
    MountFailed(i32),

    /// The filesystem could not be formatted.
    #[error("Filesystem format failed (status: {0})")]
    FormatFailed(i32),
}
