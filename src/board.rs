//! Collaborator boundary: the driver calls the boot core makes.
//!
//! Each trait groups one driver family. Real firmware implements them on top
//! of its platform layer; tests use [`MockBoard`](crate::MockBoard).

use crate::error::BootError;
use std::time::Duration;

// =============================================================================
// Driver Traits
// =============================================================================

/// Platform driver layer: power, backlight, inputs and reset.
pub trait Platform {
    /// Bring up the platform drivers.
    fn init(&self);

    /// Shut the platform drivers down.
    fn terminate(&self);

    /// Set the backlight on the application brightness scale (0-100).
    fn set_backlight_level(&self, level: u8);

    /// Whether the push-to-talk control is pressed.
    fn ptt_status(&self) -> bool;

    /// Whether the power control is held on.
    fn power_button_status(&self) -> bool;

    /// Issue a hardware system reset.
    fn system_reset(&self) -> !;
}

/// Graphics and display panel driver.
pub trait Display {
    /// Initialize the display and graphics driver.
    fn init(&self);

    /// Flush the framebuffer to the panel.
    fn render(&self);

    /// Set the panel contrast.
    fn set_contrast(&self, contrast: u8);
}

/// Persistent storage driver.
pub trait Storage {
    /// Mount the filesystem. Returns `0` on success.
    fn mount(&self) -> i32;

    /// Destructively format the filesystem. Returns `0` on success.
    fn format(&self) -> i32;

    /// Dump the whole flash over the serial link, blocking until done.
    fn dump_over_serial(&self);
}

/// User interface screens and task.
pub trait Screens {
    /// Initialize the user interface.
    fn init(&self);

    /// Draw the splash screen.
    fn draw_splash(&self);

    /// Draw the backup-mode screen.
    fn draw_backup(&self);

    /// Draw the flash reinitialization confirmation screen.
    fn draw_flash_init(&self);

    /// Draw the screen shown when reformatting failed.
    fn draw_format_failed(&self);

    /// Run the UI task. Not expected to return during normal operation.
    fn run_task(&self);
}

/// Blocking delays.
pub trait Delay {
    /// Sleep for the given duration (millisecond granularity).
    fn sleep_for(&self, duration: Duration);
}

/// Worker thread creation.
pub trait Threads {
    /// Start the device worker threads.
    fn create_threads(&self);
}

/// A complete board: every collaborator the boot core needs.
pub trait Board: Platform + Display + Storage + Screens + Delay + Threads {}

impl<T> Board for T where T: Platform + Display + Storage + Screens + Delay + Threads {}

// =============================================================================
// Status Codes
// =============================================================================

/// Raw status returned by [`Storage::mount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountStatus(pub i32);

impl MountStatus {
    /// Whether the mount succeeded.
    pub fn is_ok(self) -> bool {
        self.0 == 0
    }

    /// Convert into a result.
    ///
    /// # Errors
    /// Returns [`BootError::MountFailed`] for any nonzero status.
    pub fn into_result(self) -> Result<(), BootError> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(BootError::MountFailed(self.0))
        }
    }
}

/// Result of a destructive format, named so callers cannot discard it silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOutcome {
    /// The format call returned `0`.
    Succeeded,
    /// The format call returned the given nonzero status.
    Failed(i32),
}

impl FormatOutcome {
    /// Classify a raw format status.
    pub fn from_status(status: i32) -> Self {
        match status {
            0 => Self::Succeeded,
            code => Self::Failed(code),
        }
    }

    /// Whether the format succeeded.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Convert into a result.
    ///
    /// # Errors
    /// Returns [`BootError::FormatFailed`] when the format failed.
    pub fn into_result(self) -> Result<(), BootError> {
        match self {
            Self::Succeeded => Ok(()),
            Self::Failed(code) => Err(BootError::FormatFailed(code)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_status_zero_is_success() {
        assert!(MountStatus(0).is_ok());
        assert!(MountStatus(0).into_result().is_ok());

        let err = MountStatus(-5).into_result().unwrap_err();
        assert!(matches!(err, BootError::MountFailed(-5)));
    }

    #[test]
    fn test_format_outcome_classification() {
        assert_eq!(FormatOutcome::from_status(0), FormatOutcome::Succeeded);
        assert_eq!(FormatOutcome::from_status(-28), FormatOutcome::Failed(-28));
        assert!(!FormatOutcome::Failed(1).is_success());
        assert!(matches!(
            FormatOutcome::Failed(1).into_result(),
            Err(BootError::FormatFailed(1))
        ));
    }
}
