//! User-visible notices: one capability, two presentations.
//!
//! - [`DialogNotifier`]: blocking dialog (alert-style), written synchronously.
//! - [`FlashBoard`]: transient flash messages that expire on their own.
//!
//! Call sites pick which one they hold; tests observe either without a real
//! dialog.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Somewhere to show a notice to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

/// Blocking dialog: each notice is written out in full before returning.
pub struct DialogNotifier {
    out: Mutex<Box<dyn Write + Send>>,
}

impl DialogNotifier {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl Notifier for DialogNotifier {
    fn notify(&self, notice: Notice) {
        tracing::debug!(level = notice.level.as_str(), text = %notice.text, "dialog");
        let Ok(mut out) = self.out.lock() else {
            tracing::warn!(text = %notice.text, "dialog writer poisoned; notice dropped");
            return;
        };
        if let Err(e) = writeln!(out, "{}", notice.text).and_then(|_| out.flush()) {
            tracing::warn!(error = %e, text = %notice.text, "failed to show dialog");
        }
    }
}

impl core::fmt::Debug for DialogNotifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DialogNotifier").finish_non_exhaustive()
    }
}

/// Flash messages held for a time-to-live, then dropped.
#[derive(Debug)]
pub struct FlashBoard {
    ttl: Duration,
    entries: Mutex<Vec<FlashEntry>>,
}

#[derive(Debug)]
struct FlashEntry {
    notice: Notice,
    /// `None` when the ttl is too large to represent.
    expires_at: Option<Instant>,
}

impl FlashBoard {
    /// Default lifetime of a flash message.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

    pub fn new() -> Self {
        Self::with_ttl(Self::DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Notices that have not expired yet, oldest first.
    pub fn visible(&self) -> Vec<Notice> {
        let now = Instant::now();
        let Ok(mut entries) = self.entries.lock() else {
            return Vec::new();
        };
        entries.retain(|e| e.expires_at.is_none_or(|at| at > now));
        entries.iter().map(|e| e.notice.clone()).collect()
    }

    /// Text of the visible notices, oldest first.
    pub fn texts(&self) -> Vec<String> {
        self.visible().into_iter().map(|n| n.text).collect()
    }

    pub fn dismiss_all(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl Default for FlashBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for FlashBoard {
    fn notify(&self, notice: Notice) {
        tracing::info!(level = notice.level.as_str(), text = %notice.text, "flash");
        let now = Instant::now();
        let expires_at = now.checked_add(self.ttl);
        if let Ok(mut entries) = self.entries.lock() {
            entries.retain(|e| e.expires_at.is_none_or(|at| at > now));
            entries.push(FlashEntry { notice, expires_at });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn dialog_writes_each_notice_on_its_own_line() {
        let buf = SharedBuf::default();
        let dialog = DialogNotifier::new(buf.clone());

        dialog.notify(Notice::success("Login successful!"));
        dialog.notify(Notice::error("Login failed: Invalid credentials"));

        let written = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, "Login successful!\nLogin failed: Invalid credentials\n");
    }

    #[test]
    fn flash_messages_expire() {
        let board = FlashBoard::with_ttl(Duration::from_millis(20));
        board.notify(Notice::success("Registration successful!"));
        assert_eq!(board.texts(), ["Registration successful!"]);

        std::thread::sleep(Duration::from_millis(40));
        assert!(board.visible().is_empty());
    }

    #[test]
    fn writing_drops_expired_entries() {
        let board = FlashBoard::with_ttl(Duration::from_millis(10));
        for _ in 0..3 {
            board.notify(Notice::info("old"));
        }
        std::thread::sleep(Duration::from_millis(30));

        board.notify(Notice::info("new"));

        assert_eq!(board.entries.lock().unwrap().len(), 1);
    }

    #[test]
    fn huge_ttl_never_expires() {
        let board = FlashBoard::with_ttl(Duration::MAX);
        board.notify(Notice::info("kept"));
        assert_eq!(board.visible(), vec![Notice::info("kept")]);

        board.dismiss_all();
        assert!(board.visible().is_empty());
    }

    #[test]
    fn shared_notifier_forwards() {
        let board = Arc::new(FlashBoard::with_ttl(Duration::MAX));
        let as_dyn: Arc<dyn Notifier> = board.clone();
        as_dyn.notify(Notice::error("boom"));
        assert_eq!(board.texts(), ["boom"]);
    }
}
