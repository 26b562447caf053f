//! Storage recovery state machine.
//!
//! Entered when the filesystem cannot be mounted. The machine dumps the
//! flash over serial, asks the user to confirm a reformat, then either
//! formats or shuts down. Every run ends in a hardware reset.
//!
//! ```text
//! DUMP -> CONFIRM -+-> FORMAT -+-> RESET
//!                  +-> CANCEL -'     ^
//!                  '-----------------'  (bounded poll ran out)
//! ```
//!
//! CANCEL is only entered after the power control is seen released.

use crate::board::{Board, FormatOutcome};
use crate::config::{BootConfig, FormatPolicy};
use crate::state::DeviceState;
use log::{debug, info, trace, warn};

/// States of the recovery machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryState {
    /// Show the backup screen and dump the flash over serial.
    Dump,
    /// Ask for reformat confirmation and poll the controls.
    Confirm,
    /// Destructively format the filesystem.
    Format,
    /// Shut the platform down.
    Cancel,
    /// Hardware reset. Terminal.
    Reset,
}

/// How the machine left the confirmation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// The user confirmed; the filesystem was formatted with this outcome.
    Formatted(FormatOutcome),
    /// The user released the power control; the platform was shut down.
    Cancelled,
    /// A bounded poll ran out with no input. Nothing was formatted or shut down.
    TimedOut,
}

/// Summary of a recovery run up to the reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryOutcome {
    /// Branch taken out of the confirmation state.
    pub branch: Branch,
    /// Number of confirmation polls performed.
    pub polls: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Confirmation {
    Confirmed,
    Declined,
    TimedOut,
}

/// Drives the recovery sequence against a board.
pub struct RecoveryMachine<'b, B: Board + ?Sized> {
    board: &'b B,
    brightness: u8,
    config: BootConfig,
    polls: u64,
    branch: Option<Branch>,
}

impl<'b, B: Board + ?Sized> RecoveryMachine<'b, B> {
    /// Create a machine in the [`RecoveryState::Dump`] state.
    pub fn new(board: &'b B, state: &DeviceState, config: BootConfig) -> Self {
        Self {
            board,
            brightness: state.settings().brightness(),
            config,
            polls: 0,
            branch: None,
        }
    }

    /// Perform `state`'s entry action and return the next state.
    ///
    /// [`RecoveryState::Confirm`] leads to `Format` on PTT, to `Cancel` on
    /// power release, and straight to `Reset` if a bounded poll runs out.
    ///
    /// Stepping [`RecoveryState::Reset`] does nothing; only [`enter`](Self::enter)
    /// issues the reset.
    pub fn step(&mut self, state: RecoveryState) -> RecoveryState {
        debug!("recovery: {:?}", state);
        match state {
            RecoveryState::Dump => {
                self.dump();
                RecoveryState::Confirm
            }
            RecoveryState::Confirm => match self.await_confirmation() {
                Confirmation::Confirmed => RecoveryState::Format,
                Confirmation::Declined => {
                    self.branch = Some(Branch::Cancelled);
                    RecoveryState::Cancel
                }
                Confirmation::TimedOut => {
                    self.branch = Some(Branch::TimedOut);
                    RecoveryState::Reset
                }
            },
            RecoveryState::Format => {
                let outcome = self.format();
                self.branch = Some(Branch::Formatted(outcome));
                RecoveryState::Reset
            }
            RecoveryState::Cancel => {
                info!("recovery cancelled, shutting down");
                self.board.terminate();
                RecoveryState::Reset
            }
            RecoveryState::Reset => RecoveryState::Reset,
        }
    }

    /// Run from [`RecoveryState::Dump`] until the machine reaches
    /// [`RecoveryState::Reset`], without resetting.
    pub fn run_to_reset(&mut self) -> RecoveryOutcome {
        let mut state = RecoveryState::Dump;
        while state != RecoveryState::Reset {
            state = self.step(state);
        }

        // Every transition into Reset records the branch first.
        let branch = self.branch.unwrap_or(Branch::TimedOut);
        RecoveryOutcome {
            branch,
            polls: self.polls,
        }
    }

    /// Run the whole sequence and reset the device.
    pub fn enter(mut self) -> ! {
        let outcome = self.run_to_reset();
        info!("recovery finished ({:?}), resetting", outcome.branch);
        self.board.system_reset()
    }

    fn dump(&self) {
        self.board.draw_backup();
        self.board.render();
        self.board.sleep_for(self.config.settle_delay);
        self.board.set_backlight_level(self.brightness);

        info!("waiting for serial flash dump");
        self.board.dump_over_serial();
        info!("flash dump complete");
    }

    fn await_confirmation(&mut self) -> Confirmation {
        self.board.draw_flash_init();
        self.board.render();

        let poll = self.config.poll;
        loop {
            if poll.max_polls.is_some_and(|max| self.polls >= max) {
                warn!("no confirmation after {} polls", self.polls);
                return Confirmation::TimedOut;
            }
            self.polls += 1;

            if self.board.ptt_status() {
                info!("reformat confirmed");
                return Confirmation::Confirmed;
            }
            if !self.board.power_button_status() {
                info!("power released, reformat declined");
                return Confirmation::Declined;
            }

            trace!("poll {}: no input", self.polls);
            if !poll.interval.is_zero() {
                self.board.sleep_for(poll.interval);
            }
        }
    }

    fn format(&self) -> FormatOutcome {
        info!("formatting filesystem");
        let outcome = FormatOutcome::from_status(self.board.format());
        let Err(e) = outcome.into_result() else {
            return outcome;
        };
        warn!("{}", e);

        match self.config.format_policy {
            FormatPolicy::AcceptAsIs => outcome,
            FormatPolicy::RetryOnce => {
                info!("retrying format");
                let retry = FormatOutcome::from_status(self.board.format());
                if let Err(e) = retry.into_result() {
                    warn!("{} on retry", e);
                }
                retry
            }
            FormatPolicy::Report => {
                self.board.draw_format_failed();
                self.board.render();
                self.board.sleep_for(self.config.failure_hold);
                outcome
            }
        }
    }
}

/// Enter recovery for `state` and reset the device.
pub fn enter_recovery<B: Board + ?Sized>(board: &B, state: &DeviceState, config: BootConfig) -> ! {
    RecoveryMachine::new(board, state, config).enter()
}
