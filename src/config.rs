//! Boot configuration.

use crate::error::BootError;
use crate::target::{SupportsRecovery, Target};
use log::debug;
use std::time::Duration;

/// Delay between the first render and enabling the backlight, hiding panel
/// power-up garbage.
pub const BACKLIGHT_SETTLE: Duration = Duration::from_millis(30);

/// How long the format-failed screen stays up before reset.
pub const FAILURE_HOLD: Duration = Duration::from_secs(3);

/// Environment variable naming the target platform for [`BootConfig::from_env`].
pub const TARGET_ENV: &str = "RTX_TARGET";

/// Polling cadence for the recovery confirmation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollPolicy {
    /// Sleep between polls. Zero means a pure busy poll.
    pub interval: Duration,
    /// Give up after this many polls and reset without formatting or
    /// shutting down. `None` polls forever.
    pub max_polls: Option<u64>,
}

impl PollPolicy {
    /// Poll forever with no sleep between reads.
    pub fn indefinite() -> Self {
        Self::default()
    }

    /// Poll at most `max_polls` times.
    pub fn bounded(max_polls: u64) -> Self {
        Self {
            interval: Duration::ZERO,
            max_polls: Some(max_polls),
        }
    }

    /// Sleep `interval` between polls.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// What to do when the destructive format reports failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatPolicy {
    /// Log the failure and reset; the next boot sees the mount fail again.
    AcceptAsIs,
    /// Format a second time, then reset whatever the result.
    #[default]
    RetryOnce,
    /// Show the format-failed screen, hold it, then reset.
    Report,
}

/// Everything the dispatcher and recovery machine need to know about the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootConfig {
    /// Platform the firmware runs on.
    pub target: Target,
    /// Wait before enabling the backlight after the first render.
    pub settle_delay: Duration,
    /// Confirmation loop cadence.
    pub poll: PollPolicy,
    /// Handling of a failed reformat.
    pub format_policy: FormatPolicy,
    /// Hold time of the format-failed screen under [`FormatPolicy::Report`].
    pub failure_hold: Duration,
}

impl BootConfig {
    /// Default configuration for a target.
    pub fn for_target(target: Target) -> Self {
        Self {
            target,
            settle_delay: BACKLIGHT_SETTLE,
            poll: PollPolicy::indefinite(),
            format_policy: FormatPolicy::default(),
            failure_hold: FAILURE_HOLD,
        }
    }

    /// Read the target from `RTX_TARGET`, defaulting to MD-3x0.
    ///
    /// # Errors
    /// Returns [`BootError::UnknownTarget`] if the variable names no known target.
    pub fn from_env() -> Result<Self, BootError> {
        let name = std::env::var(TARGET_ENV).ok();
        Self::from_target_name(name.as_deref())
    }

    /// Configuration for an optional target name, defaulting to MD-3x0.
    ///
    /// # Errors
    /// Returns [`BootError::UnknownTarget`] if `name` is not a known target.
    pub fn from_target_name(name: Option<&str>) -> Result<Self, BootError> {
        let target = match name {
            Some(name) => name.parse()?,
            None => Target::Md3x0,
        };
        debug!("boot config for target {}", target);
        Ok(Self::for_target(target))
    }

    /// Override the confirmation loop cadence.
    pub fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Override the format failure handling.
    pub fn with_format_policy(mut self, policy: FormatPolicy) -> Self {
        self.format_policy = policy;
        self
    }

    /// Override the backlight settle delay.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Whether this build participates in recovery mode.
    pub fn supports_recovery(&self) -> bool {
        self.target.supports_recovery()
    }
}

impl Default for BootConfig {
    fn default() -> Self {
        Self::for_target(Target::Md3x0)
    }
}
