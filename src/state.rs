//! Device state shared across boot components.

use crate::error::BootError;

/// Display settings applied during boot.
///
/// Values are range-checked by [`Settings::new`] and cannot be changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    brightness: u8,
    contrast: u8,
}

impl Settings {
    /// Maximum brightness on the application scale.
    pub const MAX_BRIGHTNESS: u8 = 100;

    /// Create settings with the given brightness and contrast.
    ///
    /// # Errors
    /// Returns an error if brightness > 100.
    pub fn new(brightness: u8, contrast: u8) -> Result<Self, BootError> {
        if brightness > Self::MAX_BRIGHTNESS {
            return Err(BootError::InvalidSetting {
                setting: "brightness",
                value: brightness,
                min: 0,
                max: Self::MAX_BRIGHTNESS,
            });
        }
        Ok(Self {
            brightness,
            contrast,
        })
    }

    /// Backlight brightness on the application scale (0-100).
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Display contrast (raw panel value).
    pub fn contrast(&self) -> u8 {
        self.contrast
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            brightness: 100,
            contrast: 84,
        }
    }
}

/// In-memory device record, built once per boot by the initializer.
///
/// Lives until the next reset. Readiness is only written by the mount step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceState {
    settings: Settings,
    filesystem_ready: bool,
}

impl DeviceState {
    /// Create a state record with storage not yet mounted.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            filesystem_ready: false,
        }
    }

    /// Display settings recorded at construction.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether the filesystem mount reported success.
    pub fn filesystem_ready(&self) -> bool {
        self.filesystem_ready
    }

    pub(crate) fn set_filesystem_ready(&mut self, ready: bool) {
        self.filesystem_ready = ready;
    }
}
