//! Example: Boot the orchestrator on a simulated board.
//!
//! Run with: `RUST_LOG=debug cargo run --example host_boot`
//!
//! Set `RTX_TARGET` to pick a platform (e.g. `mod17`) and `RTX_FAIL_MOUNT=1`
//! to simulate a broken filesystem.

use rtx_boot_core::{BoardEvent, BootConfig, BootError, Firmware, MockBoard};

fn main() -> Result<(), BootError> {
    // Initialize logging (optional)
    env_logger::init();

    let config = BootConfig::from_env()?;
    let fail_mount = std::env::var("RTX_FAIL_MOUNT").is_ok_and(|v| v == "1");

    // Broken storage; the simulated user confirms the reformat on the third poll
    let board = if fail_mount {
        MockBoard::new()
            .with_mount_status(-19)
            .with_ptt([false, false, true])
    } else {
        MockBoard::new()
    };

    let firmware = Firmware::new(&board, config);
    let state = firmware.init();
    println!(
        "Target {}: filesystem ready = {}",
        firmware.config().target,
        state.filesystem_ready()
    );

    match MockBoard::catch_reset(|| firmware.run(state)) {
        Ok(()) => println!("UI task returned"),
        Err(_) => println!("Device reset"),
    }

    for event in board.events() {
        match event {
            BoardEvent::Sleep(d) => println!("  sleep {} ms", d.as_millis()),
            other => println!("  {:?}", other),
        }
    }

    Ok(())
}
