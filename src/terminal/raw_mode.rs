//! Raw mode and alternate screen management with panic-safe cleanup.

use crossterm::cursor::{Hide, Show};
use crossterm::style::ResetColor;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use std::io;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

/// Static flag to track if raw mode is active (for panic handler)
pub(crate) static RAW_MODE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Guard that owns the terminal for the lifetime of a viewing session.
///
/// Entering switches to raw mode and the alternate screen with the cursor
/// hidden. Dropping the guard (or calling [`TerminalGuard::restore`])
/// puts the terminal back, including after a panic.
pub struct TerminalGuard {
    /// Whether this guard is responsible for cleanup
    active: bool,
}

impl TerminalGuard {
    /// Take over the terminal.
    ///
    /// # Errors
    /// Returns an error if raw mode or the alternate screen cannot be entered.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        RAW_MODE_ACTIVE.store(true, Ordering::SeqCst);

        if let Err(e) = crossterm::execute!(
            io::stdout(),
            EnterAlternateScreen,
            Hide,
            Clear(ClearType::All)
        ) {
            RAW_MODE_ACTIVE.store(false, Ordering::SeqCst);
            let _ = disable_raw_mode();
            return Err(e);
        }

        Ok(Self { active: true })
    }

    /// Restore the terminal now. Later drops are no-ops.
    pub fn restore(&mut self) -> io::Result<()> {
        if self.active {
            self.active = false;
            leave_terminal()?;
        }
        Ok(())
    }

    /// Check if the guard still owns the terminal.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.active {
            self.active = false;
            let _ = leave_terminal();
        }
    }
}

/// Undo everything `enter` did, in reverse order.
fn leave_terminal() -> io::Result<()> {
    RAW_MODE_ACTIVE.store(false, Ordering::SeqCst);
    let screen = crossterm::execute!(io::stdout(), ResetColor, Show, LeaveAlternateScreen);
    // Raw mode goes even if the screen couldn't be restored
    disable_raw_mode()?;
    screen
}

/// Install a panic hook that restores terminal state before panicking.
pub(crate) fn install_panic_hook() {
    static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

    if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        if RAW_MODE_ACTIVE.load(Ordering::SeqCst) {
            let _ = leave_terminal();
        }

        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_enter_and_restore() {
        // Raw mode requires a real TTY
        match TerminalGuard::enter() {
            Ok(mut guard) => {
                assert!(guard.is_active());
                guard.restore().expect("Should restore terminal");
                assert!(!guard.is_active());
                assert!(!RAW_MODE_ACTIVE.load(Ordering::SeqCst));
            }
            Err(e) => {
                eprintln!("Skipping test (no TTY): {}", e);
            }
        }
    }

    #[test]
    fn test_panic_hook_installation() {
        install_panic_hook();
        install_panic_hook(); // Second call should be no-op
    }
}
