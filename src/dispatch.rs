//! Boot dispatch and firmware entry points.

use crate::board::Board;
use crate::config::BootConfig;
use crate::init::init;
use crate::normal::run_normal;
use crate::recovery::enter_recovery;
use crate::state::DeviceState;
use log::{info, warn};

/// The path chosen once initialization is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootPath {
    /// Storage is unusable: enter the recovery machine.
    Recovery,
    /// Boot into the user interface.
    Normal,
}

/// Choose the boot path.
///
/// Recovery is taken only when the platform supports it and the mount failed.
pub fn select_path(supports_recovery: bool, filesystem_ready: bool) -> BootPath {
    if supports_recovery && !filesystem_ready {
        BootPath::Recovery
    } else {
        BootPath::Normal
    }
}

// =============================================================================
// Firmware
// =============================================================================

/// The boot orchestrator, as called by the platform launcher.
///
/// # Example
///
/// ```
/// use rtx_boot_core::{BoardEvent, BootConfig, Firmware, MockBoard, Target};
///
/// // Mod17 never enters recovery, even with a broken filesystem.
/// let board = MockBoard::new().with_mount_status(-1);
/// let firmware = Firmware::new(&board, BootConfig::for_target(Target::Mod17));
///
/// let state = firmware.init();
/// assert!(!state.filesystem_ready());
///
/// firmware.run(state);
/// assert_eq!(board.count(BoardEvent::SerialDump), 0);
/// assert_eq!(board.count(BoardEvent::UiTask), 1);
/// ```
pub struct Firmware<'b, B: Board + ?Sized> {
    board: &'b B,
    config: BootConfig,
}

impl<'b, B: Board + ?Sized> Firmware<'b, B> {
    /// Create the orchestrator for a board.
    pub fn new(board: &'b B, config: BootConfig) -> Self {
        Self { board, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    /// Bring all subsystems online.
    pub fn init(&self) -> DeviceState {
        info!("booting on {}", self.config.target);
        init(self.board)
    }

    /// Dispatch on the state produced by [`init`](Self::init).
    ///
    /// Enters recovery (and never returns) when storage is unusable on a
    /// recovery-capable target; otherwise runs the normal path and returns
    /// only if the UI task does.
    ///
    /// Takes the state by value and reads [`DeviceState::filesystem_ready`]
    /// once, so the boot decision cannot be re-evaluated on the same state:
    ///
    /// ```compile_fail
    /// use rtx_boot_core::{BootConfig, Firmware, MockBoard};
    ///
    /// let board = MockBoard::new();
    /// let firmware = Firmware::new(&board, BootConfig::default());
    /// let state = firmware.init();
    /// firmware.run(state);
    /// firmware.run(state); // state was moved into the first run
    /// ```
    pub fn run(&self, state: DeviceState) {
        let ready = state.filesystem_ready();
        match select_path(self.config.supports_recovery(), ready) {
            BootPath::Recovery => {
                warn!("filesystem unusable, entering recovery mode");
                enter_recovery(self.board, &state, self.config)
            }
            BootPath::Normal => {
                if !ready {
                    warn!("filesystem unusable, {} has no recovery mode", self.config.target);
                }
                run_normal(self.board, &state, &self.config);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{BoardEvent, MockBoard, ResetIssued};
    use crate::target::Target;

    #[test]
    fn test_select_path_truth_table() {
        assert_eq!(select_path(true, true), BootPath::Normal);
        assert_eq!(select_path(true, false), BootPath::Recovery);
        assert_eq!(select_path(false, true), BootPath::Normal);
        assert_eq!(select_path(false, false), BootPath::Normal);
    }

    #[test]
    fn test_run_decides_from_init_state() {
        let board = MockBoard::new().with_mount_status(-3).with_power([false]);
        let firmware = Firmware::new(&board, BootConfig::default());

        let state = firmware.init();
        let decision = select_path(
            firmware.config().supports_recovery(),
            state.filesystem_ready(),
        );
        assert_eq!(decision, BootPath::Recovery);

        let result: Result<(), ResetIssued> = MockBoard::catch_reset(|| firmware.run(state));
        assert!(result.is_err());
        assert_eq!(board.count(BoardEvent::Mount(-3)), 1);
        assert_eq!(board.count(BoardEvent::BackupScreen), 1);
        assert_eq!(board.count(BoardEvent::SplashScreen), 0);
    }

    #[test]
    fn test_run_with_ready_filesystem_returns_after_ui() {
        let board = MockBoard::new();
        let firmware = Firmware::new(&board, BootConfig::default());

        let state = firmware.init();
        firmware.run(state);

        assert_eq!(board.count(BoardEvent::BackupScreen), 0);
        assert_eq!(board.events().last(), Some(&BoardEvent::UiTask));
    }

    #[test]
    fn test_run_enters_recovery_on_mount_failure() {
        let board = MockBoard::new().with_mount_status(-2).with_power([false]);
        let firmware = Firmware::new(&board, BootConfig::for_target(Target::Gd77));

        let state = firmware.init();
        let result: Result<(), ResetIssued> = MockBoard::catch_reset(|| firmware.run(state));

        assert!(result.is_err());
        assert_eq!(board.count(BoardEvent::SerialDump), 1);
        assert_eq!(board.count(BoardEvent::ThreadsCreated), 0);
        assert_eq!(board.count(BoardEvent::UiTask), 0);
        assert_eq!(board.count(BoardEvent::SplashScreen), 0);
    }

    #[test]
    fn test_targets_without_recovery_always_boot_normally() {
        for target in [Target::Mod17, Target::Linux] {
            let board = MockBoard::new().with_mount_status(-1);
            let firmware = Firmware::new(&board, BootConfig::for_target(target));

            let state = firmware.init();
            firmware.run(state);

            assert_eq!(board.count(BoardEvent::BackupScreen), 0);
            assert_eq!(board.count(BoardEvent::Reset), 0);
            assert_eq!(board.count(BoardEvent::UiTask), 1);
        }
    }
}
