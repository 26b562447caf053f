//! Subsystem bring-up.

use crate::board::{Board, Display, MountStatus, Platform, Screens};
use crate::state::{DeviceState, Settings};
use log::{debug, info, warn};

/// Bring every subsystem online in dependency order and build the device state.
///
/// Steps run exactly once each: platform, state, graphics, contrast,
/// filesystem mount, user interface. Only the mount may fail, and its
/// outcome is recorded in [`DeviceState::filesystem_ready`].
pub fn init<B: Board + ?Sized>(board: &B) -> DeviceState {
    init_with_settings(board, Settings::default())
}

/// Same as [`init`], starting from the given settings instead of the defaults.
pub fn init_with_settings<B: Board + ?Sized>(board: &B, settings: Settings) -> DeviceState {
    debug!("platform init");
    Platform::init(board);

    let mut state = DeviceState::new(settings);
    debug!("state init: {:?}", state.settings());

    debug!("graphics init");
    Display::init(board);
    board.set_contrast(state.settings().contrast());

    let mount = MountStatus(board.mount());
    match mount.into_result() {
        Ok(()) => info!("filesystem mounted"),
        Err(e) => warn!("{}", e),
    }
    state.set_filesystem_ready(mount.is_ok());

    debug!("ui init");
    Screens::init(board);

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{BoardEvent, MockBoard};

    #[test]
    fn test_init_order() {
        let board = MockBoard::new();
        let state = init(&board);

        assert!(state.filesystem_ready());
        assert_eq!(
            board.events(),
            vec![
                BoardEvent::PlatformInit,
                BoardEvent::DisplayInit,
                BoardEvent::Contrast(84),
                BoardEvent::Mount(0),
                BoardEvent::UiInit,
            ]
        );
    }

    #[test]
    fn test_mount_failure_clears_readiness() {
        for status in [-1, 1, -19] {
            let board = MockBoard::new().with_mount_status(status);
            let state = init(&board);
            assert!(!state.filesystem_ready());
            assert_eq!(board.count(BoardEvent::Mount(status)), 1);
            assert_eq!(board.events().last(), Some(&BoardEvent::UiInit));
        }
    }

    #[test]
    fn test_contrast_uses_constructed_settings() {
        let board = MockBoard::new();
        let state = init_with_settings(&board, Settings::new(40, 120).unwrap());

        assert_eq!(state.settings().brightness(), 40);
        assert_eq!(board.count(BoardEvent::Contrast(120)), 1);
    }
}
