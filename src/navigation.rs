use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Location of the dashboard's main view.
pub const ROOT: &str = "/";

/// Requests full (non client-routed) navigations.
///
/// The host decides what a navigation means: the CLI treats a navigation to
/// [`ROOT`] as the hand-off to the main view once login finished, tests simply
/// record it.
#[derive(Debug, Clone)]
pub struct Navigator {
    tx: UnboundedSender<String>,
}

pub type Navigations = UnboundedReceiver<String>;

impl Navigator {
    /// Creates a navigator and the receiving end the host listens on.
    pub fn channel() -> (Self, Navigations) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Requests a full navigation to `location`.
    ///
    /// Never fails: a request sent after the host stopped listening is dropped.
    pub fn navigate(&self, location: &str) {
        // nobody is listening anymore once the host shut down
        let _ = self.tx.send(location.to_string());
    }
}
