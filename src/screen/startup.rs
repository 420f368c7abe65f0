use super::{Screen, ScreenData, WindowId};
use crate::window::ScreenWindow;

/// Pending launch of an application, as announced over startup notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupSequence {
    pub id: String,
    /// Expected `WM_CLASS` of the launched window, matched against both parts.
    pub wm_class: Option<String>,
    pub pid: Option<u32>,
    /// Workspace index the window should open on.
    pub workspace: Option<usize>,
    /// Timestamp of the user action that started the launch.
    pub timestamp: u32,
}

impl StartupSequence {
    fn matches_class<W: ScreenWindow>(&self, window: &W) -> bool {
        let Some(wm_class) = &self.wm_class else {
            return false;
        };

        window.wm_class() == Some(wm_class.as_str()) || window.wm_instance() == Some(wm_class.as_str())
    }
}

impl<D: ScreenData> Screen<D> {
    pub fn startup_sequences(&self) -> &[StartupSequence] {
        &self.startup_sequences
    }

    pub fn add_startup_sequence(&mut self, sequence: StartupSequence) {
        debug!("startup sequence added: {}", sequence.id);
        self.startup_sequences.retain(|seq| seq.id != sequence.id);
        self.startup_sequences.push(sequence);
    }

    pub fn remove_startup_sequence(&mut self, id: &str) -> bool {
        let len = self.startup_sequences.len();
        self.startup_sequences.retain(|seq| seq.id != id);
        let removed = self.startup_sequences.len() != len;
        if removed {
            debug!("startup sequence removed: {id}");
        }
        removed
    }

    /// Applies the properties of the matching startup sequence to a managed window.
    ///
    /// The sequence is found by the window's startup id, else by its `WM_CLASS`, else by its
    /// process id. Initial workspace and timestamp are only set when not already set. Returns
    /// whether anything changed.
    pub fn apply_startup_properties(&mut self, id: &WindowId<D>) -> bool {
        let _span = tracy_client::span!("Screen::apply_startup_properties");

        let Some(managed) = self.windows.iter_mut().find(|m| m.window.id() == id) else {
            return false;
        };
        let window = &managed.window;

        let sequence = match window.startup_id() {
            Some(startup_id) => self.startup_sequences.iter().find(|seq| seq.id == startup_id),
            None => self
                .startup_sequences
                .iter()
                .find(|seq| seq.matches_class(window))
                .or_else(|| {
                    let pid = window.pid()?;
                    self.startup_sequences.iter().find(|seq| seq.pid == Some(pid))
                }),
        };

        let Some(sequence) = sequence else {
            trace!("no startup sequence for window {id:?}");
            return false;
        };

        let mut changed = false;
        if managed.initial_workspace.is_none() {
            if let Some(workspace) = sequence.workspace {
                debug!(
                    "window {id:?} opens on workspace {workspace} from startup sequence {}",
                    sequence.id
                );
                managed.initial_workspace = Some(workspace);
                changed = true;
            }
        }
        if managed.initial_timestamp.is_none() {
            managed.initial_timestamp = Some(sequence.timestamp);
            changed = true;
        }

        changed
    }
}
