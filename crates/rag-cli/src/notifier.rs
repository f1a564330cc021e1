use rag_session::{Notice, NoticeLevel, Notifier};

use crate::ui;

/// Prints notices to stderr so stdout stays machine-readable.
/// `--quiet` hides everything except errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        if notice.level != NoticeLevel::Error && !ui::prefs().notices {
            return;
        }
        eprintln!("{}", render_notice(&notice));
    }
}

fn render_notice(notice: &Notice) -> String {
    let marker = match notice.level {
        NoticeLevel::Success => "✓",
        NoticeLevel::Info => "•",
        NoticeLevel::Error => "✗",
    };
    format!("{marker} {}", notice.message)
}
