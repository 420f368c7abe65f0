use std::sync::mpsc;

use smithay::utils::{Logical, Rectangle};

use crate::workspace::{WorkspaceId, WorkspaceSwitch};

/// Change in screen state, sent to subscribers after the state is fully updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Restacked,
    MonitorsChanged { generation: u64 },
    WorkAreasChanged,
    WorkspaceSwitched(WorkspaceSwitch),
    WorkspaceAdded(WorkspaceId),
    WorkspaceRemoved(WorkspaceId),
    ShowingDesktopChanged(bool),
    /// Area of the tile preview, or `None` when it was hidden.
    TilePreviewChanged(Option<Rectangle<i32, Logical>>),
    InFullscreenChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Default)]
pub struct Observers {
    subscribers: Vec<(SubscriptionId, mpsc::Sender<Notification>)>,
    id_counter: u64,
}

impl Observers {
    pub fn subscribe(&mut self) -> (SubscriptionId, mpsc::Receiver<Notification>) {
        self.id_counter += 1;
        let id = SubscriptionId(self.id_counter);
        let (tx, rx) = mpsc::channel();
        self.subscribers.push((id, tx));
        (id, rx)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != len
    }

    pub fn clear(&mut self) {
        self.subscribers.clear();
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Sends a notification to every subscriber, dropping the ones whose receiver is gone.
    pub fn emit(&mut self, notification: Notification) {
        trace!("emitting {notification:?}");
        self.subscribers.retain(|(id, tx)| {
            let alive = tx.send(notification.clone()).is_ok();
            if !alive {
                debug!("dropping disconnected subscriber {id:?}");
            }
            alive
        });
    }
}
