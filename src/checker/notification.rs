//! Update notification message and delivery.
//!
//! The message format is fixed:
//!
//! ```text
//!
//! >>> New version 0.14.9 -> 0.15.0 available. <<<
//! >>> Run 'npm install --global xpm' to update. <<<
//! ```
//!
//! Where it goes is decided by a [`NotificationSink`]. The default,
//! [`LogNotificationSink`], writes it with `tracing::info!`, so hosts can
//! silence it through their log filter. Any `Fn(&str)` closure is a sink too.

use std::fmt;
use tracing::info;

/// Receives the composed notification message.
pub trait NotificationSink: Send + Sync {
    /// Deliver `message` to the user.
    fn send(&self, message: &str);
}

impl<F> NotificationSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn send(&self, message: &str) {
        self(message);
    }
}

/// Sends notifications to the log at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn send(&self, message: &str) {
        info!("{}", message);
    }
}

/// The pieces of an update notification.
///
/// Formatting with [`Display`](fmt::Display) produces the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification<'a> {
    /// Package name as published.
    pub package_name: &'a str,
    /// Version currently running.
    pub current_version: &'a str,
    /// Latest published version.
    pub latest_version: &'a str,
    /// Command that installs a package, e.g. `npm install`.
    pub install_command: &'a str,
    /// Add `--global` to the suggested command.
    pub is_installed_globally: bool,
    /// Prefix the suggested command with `sudo`.
    pub is_installed_as_root: bool,
}

impl Notification<'_> {
    /// The suggested update command, e.g. `sudo npm install --global xpm`.
    pub fn update_command(&self) -> String {
        let sudo = if self.is_installed_as_root { "sudo " } else { "" };
        let global = if self.is_installed_globally { " --global" } else { "" };

        format!("{sudo}{}{global} {}", self.install_command, self.package_name)
    }
}

impl fmt::Display for Notification<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\n>>> New version {} -> {} available. <<<\n>>> Run '{}' to update. <<<",
            self.current_version,
            self.latest_version,
            self.update_command()
        )
    }
}
