//! Normal run path.

use crate::board::Board;
use crate::config::BootConfig;
use crate::state::DeviceState;
use log::{debug, info};

/// Show the splash screen, light the backlight, start the worker threads
/// and hand control to the UI task.
///
/// Returns only if the UI task does.
pub fn run_normal<B: Board + ?Sized>(board: &B, state: &DeviceState, config: &BootConfig) {
    board.draw_splash();
    board.render();

    board.sleep_for(config.settle_delay);
    board.set_backlight_level(state.settings().brightness());

    debug!("starting worker threads");
    board.create_threads();

    info!("boot complete, entering ui task");
    board.run_task();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{BoardEvent, MockBoard};
    use crate::state::Settings;
    use std::time::Duration;

    #[test]
    fn test_normal_sequence() {
        let board = MockBoard::new();
        let state = DeviceState::new(Settings::new(75, 84).unwrap());

        run_normal(&board, &state, &BootConfig::default());

        assert_eq!(
            board.events(),
            vec![
                BoardEvent::SplashScreen,
                BoardEvent::Render,
                BoardEvent::Sleep(Duration::from_millis(30)),
                BoardEvent::Backlight(75),
                BoardEvent::ThreadsCreated,
                BoardEvent::UiTask,
            ]
        );
    }

    #[test]
    fn test_custom_settle_delay() {
        let board = MockBoard::new();
        let state = DeviceState::default();
        let config = BootConfig::default().with_settle_delay(Duration::from_millis(50));

        run_normal(&board, &state, &config);

        let sleep = board
            .position(BoardEvent::Sleep(Duration::from_millis(50)))
            .unwrap();
        let backlight = board.position(BoardEvent::Backlight(100)).unwrap();
        assert_eq!(backlight, sleep + 1);
    }
}
