//! Cross-thread plumbing between the settings UI and the frame loop.
//!
//! Publishers send whole [`ViewPersonalizationSettings`] snapshots; the frame
//! loop drains the channel once per frame and keeps only the newest one, so a
//! frame never observes a half-applied edit.

use crossbeam_channel::{unbounded, Receiver, Sender};
use personalization::ViewPersonalizationSettings;

/// Sending half handed to whoever edits settings.
#[derive(Clone, Debug)]
pub struct SettingsPublisher {
    sender: Sender<ViewPersonalizationSettings>,
}

impl SettingsPublisher {
    /// Publishes a full snapshot. Returns `false` once the renderer has gone.
    pub fn publish(&self, settings: ViewPersonalizationSettings) -> bool {
        self.sender.send(settings).is_ok()
    }
}

/// Receiving half owned by the frame loop.
#[derive(Debug)]
pub struct SettingsFeed {
    receiver: Receiver<ViewPersonalizationSettings>,
    sender: Sender<ViewPersonalizationSettings>,
}

impl SettingsFeed {
    pub fn new() -> (SettingsPublisher, SettingsFeed) {
        let (sender, receiver) = unbounded();
        let publisher = SettingsPublisher {
            sender: sender.clone(),
        };
        (publisher, SettingsFeed { receiver, sender })
    }

    /// A feed nobody outside the renderer publishes to.
    pub fn detached() -> Self {
        Self::new().1
    }

    /// Another publisher for the same feed.
    pub fn publisher(&self) -> SettingsPublisher {
        SettingsPublisher {
            sender: self.sender.clone(),
        }
    }

    /// Drains everything queued and returns the newest snapshot, if any.
    pub fn latest(&self) -> Option<ViewPersonalizationSettings> {
        self.receiver.try_iter().last()
    }
}
