//! Boot orchestrator for handheld radio firmware.
//!
//! This crate brings the device's subsystems online in dependency order and
//! then decides how to boot:
//!
//! - **Normal path**: splash screen, backlight, worker threads, UI task.
//! - **Recovery path**: taken when the filesystem cannot be mounted on a
//!   target that supports it. The flash is dumped over serial, the user is
//!   asked to confirm a reformat with PTT (or to cancel by releasing power),
//!   and the device is reset.
//!
//! All hardware access goes through the traits in [`Board`], so the whole
//! sequence runs on a host against [`MockBoard`].
//!
//! # Example
//!
//! ```no_run
//! use rtx_boot_core::{BootConfig, Firmware, MockBoard};
//!
//! fn main() -> Result<(), rtx_boot_core::BootError> {
//!     let board = MockBoard::new();
//!     let firmware = Firmware::new(&board, BootConfig::from_env()?);
//!
//!     // Bring up platform, state, graphics, filesystem and UI
//!     let state = firmware.init();
//!
//!     // Recovery or normal boot; does not return on real hardware
//!     firmware.run(state);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! [`MockBoard`] records every driver call and replaces the hardware reset
//! with an unwind that [`MockBoard::catch_reset`] turns into a value:
//!
//! ```
//! use rtx_boot_core::{BoardEvent, BootConfig, Firmware, MockBoard};
//!
//! let board = MockBoard::new().with_mount_status(-1).with_ptt([true]);
//! let firmware = Firmware::new(&board, BootConfig::default());
//! let state = firmware.init();
//!
//! let reset = MockBoard::catch_reset(|| firmware.run(state));
//! assert!(reset.is_err());
//! assert_eq!(board.count(BoardEvent::Format(0)), 1);
//! ```

#![warn(missing_docs)]

mod board;
mod config;
mod dispatch;
mod error;
mod init;
mod mock;
mod normal;
mod recovery;
mod state;
mod target;

// Re-export public API
pub use board::{
    Board, Delay, Display, FormatOutcome, MountStatus, Platform, Screens, Storage, Threads,
};
pub use config::{BACKLIGHT_SETTLE, BootConfig, FAILURE_HOLD, FormatPolicy, PollPolicy, TARGET_ENV};
pub use dispatch::{BootPath, Firmware, select_path};
pub use error::BootError;
pub use init::{init, init_with_settings};
pub use mock::{BoardEvent, MockBoard, ResetIssued};
pub use normal::run_normal;
pub use recovery::{Branch, RecoveryMachine, RecoveryOutcome, RecoveryState, enter_recovery};
pub use state::{DeviceState, Settings};
pub use target::{SupportsRecovery, Target};

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn boot(board: &MockBoard, config: BootConfig) -> Result<(), ResetIssued> {
        let firmware = Firmware::new(board, config);
        let state = firmware.init();
        MockBoard::catch_reset(|| firmware.run(state))
    }

    #[test]
    fn test_scenario_normal_boot() {
        init_logger();
        let board = MockBoard::new();

        assert!(boot(&board, BootConfig::default()).is_ok());

        let events = board.events();
        let settle = board
            .position(BoardEvent::Sleep(Duration::from_millis(30)))
            .unwrap();
        assert_eq!(events[settle - 1], BoardEvent::Render);
        assert_eq!(events[settle - 2], BoardEvent::SplashScreen);
        assert_eq!(
            &events[settle + 1..],
            &[
                BoardEvent::Backlight(100),
                BoardEvent::ThreadsCreated,
                BoardEvent::UiTask,
            ]
        );
    }

    #[test]
    fn test_scenario_recovery_confirmed() {
        init_logger();
        let board = MockBoard::new()
            .with_mount_status(-19)
            .with_ptt([false, false, true]);

        assert_eq!(boot(&board, BootConfig::default()), Err(ResetIssued));

        let events = board.events();
        let dump = board.position(BoardEvent::SerialDump).unwrap();
        let confirm = board.position(BoardEvent::FlashInitScreen).unwrap();
        let format = board.position(BoardEvent::Format(0)).unwrap();
        assert!(dump < confirm && confirm < format);
        assert_eq!(events.last(), Some(&BoardEvent::Reset));
        assert_eq!(events[events.len() - 2], BoardEvent::Format(0));
        assert_eq!(board.count(BoardEvent::PlatformTerminate), 0);
        assert_eq!(board.count(BoardEvent::ThreadsCreated), 0);
    }

    #[test]
    fn test_scenario_recovery_reset_despite_format_failure() {
        init_logger();
        let board = MockBoard::new()
            .with_mount_status(-19)
            .with_ptt([true])
            .with_format_statuses([-5]);
        let config = BootConfig::default().with_format_policy(FormatPolicy::AcceptAsIs);

        assert_eq!(boot(&board, config), Err(ResetIssued));
        assert_eq!(board.count(BoardEvent::Format(-5)), 1);
        assert_eq!(board.events().last(), Some(&BoardEvent::Reset));
    }

    #[test]
    fn test_scenario_recovery_cancelled() {
        init_logger();
        let board = MockBoard::new()
            .with_mount_status(-19)
            .with_power([true, false]);

        assert_eq!(boot(&board, BootConfig::default()), Err(ResetIssued));

        let events = board.events();
        assert_eq!(
            &events[events.len() - 2..],
            &[BoardEvent::PlatformTerminate, BoardEvent::Reset]
        );
        assert!(!events.iter().any(|e| matches!(e, BoardEvent::Format(_))));
        assert_eq!(board.input_reads(), (2, 2));
    }

    #[test]
    fn test_scenario_no_recovery_target() {
        init_logger();
        let board = MockBoard::new().with_mount_status(-19);

        assert!(boot(&board, BootConfig::for_target(Target::Linux)).is_ok());
        assert_eq!(board.count(BoardEvent::SerialDump), 0);
        assert_eq!(board.count(BoardEvent::UiTask), 1);
    }

    #[test]
    fn test_recovery_backlight_waits_for_settle() {
        let board = MockBoard::new().with_mount_status(-1).with_ptt([true]);
        let firmware = Firmware::new(&board, BootConfig::default());
        let state = init_with_settings(&board, Settings::new(20, 84).unwrap());

        let _ = MockBoard::catch_reset(|| firmware.run(state));

        let settle = board
            .position(BoardEvent::Sleep(BACKLIGHT_SETTLE))
            .unwrap();
        let backlight = board.position(BoardEvent::Backlight(20)).unwrap();
        assert_eq!(backlight, settle + 1);
        assert!(board.position(BoardEvent::BackupScreen).unwrap() < settle);
    }
}
