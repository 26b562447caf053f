//! Mock board for testing.

use crate::board::{Delay, Display, Platform, Screens, Storage, Threads};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;
use std::time::Duration;

/// A driver call observed by [`MockBoard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    /// `Platform::init`.
    PlatformInit,
    /// `Platform::terminate`.
    PlatformTerminate,
    /// `Platform::set_backlight_level`.
    Backlight(u8),
    /// `Display::init`.
    DisplayInit,
    /// `Display::render`.
    Render,
    /// `Display::set_contrast`.
    Contrast(u8),
    /// `Storage::mount` with the status it returned.
    Mount(i32),
    /// `Storage::format` with the status it returned.
    Format(i32),
    /// `Storage::dump_over_serial`.
    SerialDump,
    /// `Screens::init`.
    UiInit,
    /// `Screens::draw_splash`.
    SplashScreen,
    /// `Screens::draw_backup`.
    BackupScreen,
    /// `Screens::draw_flash_init`.
    FlashInitScreen,
    /// `Screens::draw_format_failed`.
    FormatFailedScreen,
    /// `Screens::run_task`.
    UiTask,
    /// `Delay::sleep_for`.
    Sleep(Duration),
    /// `Threads::create_threads`.
    ThreadsCreated,
    /// `Platform::system_reset`.
    Reset,
}

/// Panic payload raised by [`MockBoard`] in place of a hardware reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetIssued;

struct Inner {
    events: Vec<BoardEvent>,
    mount_status: i32,
    format_statuses: VecDeque<i32>,
    ptt: VecDeque<bool>,
    power: VecDeque<bool>,
    ptt_reads: u64,
    power_reads: u64,
}

/// A scripted board that records every driver call.
///
/// Input scripts are consumed one value per read; the last value repeats
/// once the script runs out. By default the mount succeeds, formats
/// succeed, PTT is released and the power control is held on.
///
/// [`Platform::system_reset`] records [`BoardEvent::Reset`] and unwinds with
/// [`ResetIssued`]; wrap diverging calls in [`MockBoard::catch_reset`].
///
/// # Example
///
/// ```
/// use rtx_boot_core::{BoardEvent, BootConfig, Firmware, MockBoard};
///
/// let board = MockBoard::new();
/// let firmware = Firmware::new(&board, BootConfig::default());
/// let state = firmware.init();
/// firmware.run(state);
/// assert_eq!(board.events().last(), Some(&BoardEvent::UiTask));
/// ```
pub struct MockBoard {
    inner: Mutex<Inner>,
}

impl MockBoard {
    /// Create a mock board whose drivers all succeed.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                events: Vec::new(),
                mount_status: 0,
                format_statuses: VecDeque::from([0]),
                ptt: VecDeque::from([false]),
                power: VecDeque::from([true]),
                ptt_reads: 0,
                power_reads: 0,
            }),
        }
    }

    /// Make the mount call return `status`.
    pub fn with_mount_status(self, status: i32) -> Self {
        self.inner.lock().unwrap().mount_status = status;
        self
    }

    /// Script the statuses returned by successive format calls.
    pub fn with_format_statuses(self, statuses: impl IntoIterator<Item = i32>) -> Self {
        Self::replace_script(&mut self.inner.lock().unwrap().format_statuses, statuses);
        self
    }

    /// Script successive PTT reads.
    pub fn with_ptt(self, samples: impl IntoIterator<Item = bool>) -> Self {
        Self::replace_script(&mut self.inner.lock().unwrap().ptt, samples);
        self
    }

    /// Script successive power control reads.
    pub fn with_power(self, samples: impl IntoIterator<Item = bool>) -> Self {
        Self::replace_script(&mut self.inner.lock().unwrap().power, samples);
        self
    }

    /// All driver calls so far, in order.
    pub fn events(&self) -> Vec<BoardEvent> {
        self.inner.lock().unwrap().events.clone()
    }

    /// How many times `event` was recorded.
    pub fn count(&self, event: BoardEvent) -> usize {
        self.inner
            .lock()
            .unwrap()
            .events
            .iter()
            .filter(|&&e| e == event)
            .count()
    }

    /// Index of the first occurrence of `event`.
    pub fn position(&self, event: BoardEvent) -> Option<usize> {
        self.inner
            .lock()
            .unwrap()
            .events
            .iter()
            .position(|&e| e == event)
    }

    /// Number of PTT and power reads so far.
    pub fn input_reads(&self) -> (u64, u64) {
        let inner = self.inner.lock().unwrap();
        (inner.ptt_reads, inner.power_reads)
    }

    /// Run `f`, turning a mock reset into `Err(ResetIssued)`.
    ///
    /// Other panics propagate unchanged.
    pub fn catch_reset<R>(f: impl FnOnce() -> R) -> Result<R, ResetIssued> {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => Ok(value),
            Err(payload) => match payload.downcast::<ResetIssued>() {
                Ok(reset) => Err(*reset),
                Err(other) => panic::resume_unwind(other),
            },
        }
    }

    fn replace_script<T>(script: &mut VecDeque<T>, values: impl IntoIterator<Item = T>) {
        let values: VecDeque<T> = values.into_iter().collect();
        if !values.is_empty() {
            *script = values;
        }
    }

    fn next_sample<T: Copy>(script: &mut VecDeque<T>) -> T {
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script[0]
        }
    }

    fn record(&self, event: BoardEvent) {
        self.inner.lock().unwrap().events.push(event);
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for MockBoard {
    fn init(&self) {
        self.record(BoardEvent::PlatformInit);
    }

    fn terminate(&self) {
        self.record(BoardEvent::PlatformTerminate);
    }

    fn set_backlight_level(&self, level: u8) {
        self.record(BoardEvent::Backlight(level));
    }

    fn ptt_status(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        inner.ptt_reads += 1;
        Self::next_sample(&mut inner.ptt)
    }

    fn power_button_status(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        inner.power_reads += 1;
        Self::next_sample(&mut inner.power)
    }

    fn system_reset(&self) -> ! {
        self.record(BoardEvent::Reset);
        panic::panic_any(ResetIssued)
    }
}

impl Display for MockBoard {
    fn init(&self) {
        self.record(BoardEvent::DisplayInit);
    }

    fn render(&self) {
        self.record(BoardEvent::Render);
    }

    fn set_contrast(&self, contrast: u8) {
        self.record(BoardEvent::Contrast(contrast));
    }
}

impl Storage for MockBoard {
    fn mount(&self) -> i32 {
        let mut inner = self.inner.lock().unwrap();
        let status = inner.mount_status;
        inner.events.push(BoardEvent::Mount(status));
        status
    }

    fn format(&self) -> i32 {
        let mut inner = self.inner.lock().unwrap();
        let status = Self::next_sample(&mut inner.format_statuses);
        inner.events.push(BoardEvent::Format(status));
        status
    }

    fn dump_over_serial(&self) {
        self.record(BoardEvent::SerialDump);
    }
}

impl Screens for MockBoard {
    fn init(&self) {
        self.record(BoardEvent::UiInit);
    }

    fn draw_splash(&self) {
        self.record(BoardEvent::SplashScreen);
    }

    fn draw_backup(&self) {
        self.record(BoardEvent::BackupScreen);
    }

    fn draw_flash_init(&self) {
        self.record(BoardEvent::FlashInitScreen);
    }

    fn draw_format_failed(&self) {
        self.record(BoardEvent::FormatFailedScreen);
    }

    fn run_task(&self) {
        self.record(BoardEvent::UiTask);
    }
}

impl Delay for MockBoard {
    fn sleep_for(&self, duration: Duration) {
        self.record(BoardEvent::Sleep(duration));
    }
}

impl Threads for MockBoard {
    fn create_threads(&self) {
        self.record(BoardEvent::ThreadsCreated);
    }
}
