//! Global stacking order.
//!
//! The order is kept bottom to top. Client windows keep their position in the order while
//! hidden (minimized, or while the desktop is shown), so that they come back exactly where they
//! were. The server-side stack additionally contains the auxiliary windows owned by the screen:
//! hidden clients go below the guard window, corner windows and the overlay go above all clients.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use crate::window::WindowType;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, PartialEq, Eq)]
struct StackEntry<Id> {
    id: Id,
    window_type: WindowType,
    minimized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenCorner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuxKind {
    /// Separates hidden windows from visible ones.
    Guard,
    /// Input-only hot zone in a screen corner.
    Corner(ScreenCorner),
    /// Topmost compositing overlay.
    Overlay,
}

/// Handle to an auxiliary window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuxWindow {
    pub kind: AuxKind,
    serial: u32,
}

/// Element of the complete server-side stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackItem<Id> {
    Client(Id),
    Aux(AuxWindow),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RestackError<Id: Debug> {
    #[error("window {0:?} is not in the stack")]
    UnknownWindow(Id),
    #[error("window {0:?} appears more than once")]
    Duplicate(Id),
    #[error("window {0:?} is missing from the new order")]
    Missing(Id),
}

#[derive(Debug)]
pub struct Stack<Id> {
    /// Client windows, bottom to top.
    entries: Vec<StackEntry<Id>>,
    showing_desktop: bool,
    aux: Vec<AuxWindow>,
    aux_serial: u32,
}

impl<Id> Default for Stack<Id> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            showing_desktop: false,
            aux: Vec::new(),
            aux_serial: 0,
        }
    }
}

impl<Id: Clone + Eq + Hash + Debug> Stack<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: &Id) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == *id)
    }

    /// Adds a window on top of the stack.
    ///
    /// Returns `false` if the window was already present.
    pub fn add(&mut self, id: Id, window_type: WindowType, minimized: bool) -> bool {
        if self.contains(&id) {
            return false;
        }

        self.entries.push(StackEntry {
            id,
            window_type,
            minimized,
        });
        true
    }

    pub fn remove(&mut self, id: &Id) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        self.entries.remove(idx);
        true
    }

    /// Moves a window to the top. Returns whether the order changed.
    pub fn raise(&mut self, id: &Id) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        if idx + 1 == self.entries.len() {
            return false;
        }

        let entry = self.entries.remove(idx);
        self.entries.push(entry);
        true
    }

    /// Moves a window to the bottom. Returns whether the order changed.
    pub fn lower(&mut self, id: &Id) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        if idx == 0 {
            return false;
        }

        let entry = self.entries.remove(idx);
        self.entries.insert(0, entry);
        true
    }

    pub fn set_minimized(&mut self, id: &Id, minimized: bool) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        let entry = &mut self.entries[idx];
        if entry.minimized == minimized {
            return false;
        }
        entry.minimized = minimized;
        true
    }

    pub fn is_minimized(&self, id: &Id) -> bool {
        self.position(id)
            .is_some_and(|idx| self.entries[idx].minimized)
    }

    /// Replaces the order with a permutation of the current windows.
    ///
    /// On error the order is left unchanged.
    pub fn restack(&mut self, new_order: &[Id]) -> Result<(), RestackError<Id>> {
        let _span = tracy_client::span!("Stack::restack");

        let mut seen = HashSet::with_capacity(new_order.len());
        let mut entries = Vec::with_capacity(self.entries.len());
        for id in new_order {
            let Some(idx) = self.position(id) else {
                return Err(RestackError::UnknownWindow(id.clone()));
            };
            if !seen.insert(id) {
                return Err(RestackError::Duplicate(id.clone()));
            }
            entries.push(self.entries[idx].clone());
        }

        if let Some(missing) = self.entries.iter().find(|entry| !seen.contains(&entry.id)) {
            return Err(RestackError::Missing(missing.id.clone()));
        }

        self.entries = entries;
        Ok(())
    }

    pub fn showing_desktop(&self) -> bool {
        self.showing_desktop
    }

    /// Hides all normal windows. Returns `false` if the desktop was already shown.
    pub fn show_desktop(&mut self) -> bool {
        !std::mem::replace(&mut self.showing_desktop, true)
    }

    /// Undoes [`Stack::show_desktop()`]. Returns `false` if the desktop was not shown.
    pub fn unshow_desktop(&mut self) -> bool {
        std::mem::replace(&mut self.showing_desktop, false)
    }

    fn entry_visible(&self, entry: &StackEntry<Id>) -> bool {
        !entry.minimized && !(self.showing_desktop && !entry.window_type.is_desktop_or_dock())
    }

    pub fn is_visible(&self, id: &Id) -> bool {
        self.position(id)
            .is_some_and(|idx| self.entry_visible(&self.entries[idx]))
    }

    /// Visible client windows, bottom to top.
    pub fn stacking(&self) -> impl DoubleEndedIterator<Item = &Id> + '_ {
        self.entries
            .iter()
            .filter(|entry| self.entry_visible(entry))
            .map(|entry| &entry.id)
    }

    /// All client windows including hidden ones, bottom to top.
    pub fn order(&self) -> impl DoubleEndedIterator<Item = &Id> + ExactSizeIterator + '_ {
        self.entries.iter().map(|entry| &entry.id)
    }

    fn aux_of_kind(&self, kind: AuxKind) -> Option<AuxWindow> {
        self.aux.iter().copied().find(|aux| aux.kind == kind)
    }

    fn create_aux(&mut self, kind: AuxKind) -> AuxWindow {
        if let Some(existing) = self.aux_of_kind(kind) {
            return existing;
        }

        self.aux_serial += 1;
        let aux = AuxWindow {
            kind,
            serial: self.aux_serial,
        };
        debug!("created auxiliary window {aux:?}");
        self.aux.push(aux);
        aux
    }

    /// Creates the guard window, or returns the existing one.
    pub fn create_guard_window(&mut self) -> AuxWindow {
        self.create_aux(AuxKind::Guard)
    }

    /// Creates the hot-zone window for a corner, or returns the existing one.
    pub fn create_corner_window(&mut self, corner: ScreenCorner) -> AuxWindow {
        self.create_aux(AuxKind::Corner(corner))
    }

    /// Creates the compositing overlay window, or returns the existing one.
    pub fn create_overlay_window(&mut self) -> AuxWindow {
        self.create_aux(AuxKind::Overlay)
    }

    pub fn guard_window(&self) -> Option<AuxWindow> {
        self.aux_of_kind(AuxKind::Guard)
    }

    /// Complete stack, bottom to top.
    pub fn server_stack(&self) -> Vec<StackItem<Id>> {
        let mut stack = Vec::with_capacity(self.entries.len() + self.aux.len());

        stack.extend(
            self.entries
                .iter()
                .filter(|entry| !self.entry_visible(entry))
                .map(|entry| StackItem::Client(entry.id.clone())),
        );
        if let Some(guard) = self.guard_window() {
            stack.push(StackItem::Aux(guard));
        }
        stack.extend(self.stacking().cloned().map(StackItem::Client));
        stack.extend(
            self.aux
                .iter()
                .filter(|aux| matches!(aux.kind, AuxKind::Corner(_)))
                .copied()
                .map(StackItem::Aux),
        );
        if let Some(overlay) = self.aux_of_kind(AuxKind::Overlay) {
            stack.push(StackItem::Aux(overlay));
        }

        stack
    }

    #[cfg(test)]
    pub fn verify_invariants(&self) {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            assert!(seen.insert(&entry.id), "window {:?} is stacked twice", entry.id);
        }

        let mut kinds = HashSet::new();
        for aux in &self.aux {
            assert!(kinds.insert(aux.kind), "auxiliary window {aux:?} created twice");
            assert!(aux.serial <= self.aux_serial);
        }

        let server = self.server_stack();
        assert_eq!(server.len(), self.entries.len() + self.aux.len());
        if let Some(overlay) = self.aux_of_kind(AuxKind::Overlay) {
            assert_eq!(server.last(), Some(&StackItem::Aux(overlay)));
        }
    }
}
