//! The ordered set of workspaces and the active one.

use std::fmt;

use crate::utils::Direction;

pub mod layout;

pub use layout::{LayoutAxis, LayoutPolicy, Orientation, StartingCorner, WorkspaceLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkspaceId(u64);

impl WorkspaceId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    id: WorkspaceId,
    name: Option<String>,
}

impl Workspace {
    pub fn id(&self) -> WorkspaceId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// A change of the active workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkspaceSwitch {
    pub from: WorkspaceId,
    pub to: WorkspaceId,
    /// Direction of motion on the workspace grid. Horizontal motion takes precedence for
    /// diagonal switches.
    pub direction: Option<Direction>,
}

/// Outcome of removing a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkspaceRemoval {
    pub removed: WorkspaceId,
    /// Workspace that receives the windows of the removed one.
    pub windows_to: WorkspaceId,
    /// Set when the removed workspace was active.
    pub switch: Option<WorkspaceSwitch>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkspaceError {
    #[error("workspace {0} does not exist")]
    Unknown(WorkspaceId),
    #[error("the last workspace cannot be removed")]
    LastWorkspace,
}

#[derive(Debug, Default)]
pub struct Workspaces {
    workspaces: Vec<Workspace>,
    active: usize,
    policy: LayoutPolicy,
    id_counter: u64,
}

impl Workspaces {
    pub fn new(policy: LayoutPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.workspaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Workspace> + '_ {
        self.workspaces.iter()
    }

    pub fn policy(&self) -> &LayoutPolicy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: LayoutPolicy) {
        self.policy = policy;
    }

    pub fn active(&self) -> Option<&Workspace> {
        self.workspaces.get(self.active)
    }

    pub fn active_id(&self) -> Option<WorkspaceId> {
        self.active().map(Workspace::id)
    }

    pub fn active_index(&self) -> Option<usize> {
        (!self.workspaces.is_empty()).then_some(self.active)
    }

    pub fn by_id(&self, id: WorkspaceId) -> Option<&Workspace> {
        self.workspaces.iter().find(|ws| ws.id == id)
    }

    pub fn by_index(&self, index: usize) -> Option<&Workspace> {
        self.workspaces.get(index)
    }

    pub fn by_name(&self, name: &str) -> Option<&Workspace> {
        self.workspaces
            .iter()
            .find(|ws| ws.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }

    pub fn index_of(&self, id: WorkspaceId) -> Option<usize> {
        self.workspaces.iter().position(|ws| ws.id == id)
    }

    /// Adds a workspace at the end of the sequence.
    ///
    /// The first workspace added becomes active.
    pub fn append(&mut self, name: Option<String>) -> WorkspaceId {
        self.id_counter += 1;
        let id = WorkspaceId(self.id_counter);
        self.workspaces.push(Workspace { id, name });
        id
    }

    pub fn set_name(&mut self, id: WorkspaceId, name: Option<String>) -> Result<(), WorkspaceError> {
        let ws = self
            .workspaces
            .iter_mut()
            .find(|ws| ws.id == id)
            .ok_or(WorkspaceError::Unknown(id))?;
        ws.name = name;
        Ok(())
    }

    /// Removes a workspace.
    ///
    /// Its windows belong on the preceding workspace afterwards, or on the following one when
    /// the first workspace is removed.
    pub fn remove(&mut self, id: WorkspaceId) -> Result<WorkspaceRemoval, WorkspaceError> {
        let index = self.index_of(id).ok_or(WorkspaceError::Unknown(id))?;
        if self.workspaces.len() == 1 {
            return Err(WorkspaceError::LastWorkspace);
        }

        let target_index = if index == 0 { 1 } else { index - 1 };
        let windows_to = self.workspaces[target_index].id;

        let was_active = index == self.active;
        let switch = was_active.then(|| self.switch_between(index, target_index));

        self.workspaces.remove(index);
        if index < self.active {
            self.active -= 1;
        } else if was_active {
            self.active = index.saturating_sub(1);
        }

        Ok(WorkspaceRemoval {
            removed: id,
            windows_to,
            switch,
        })
    }

    /// Makes the workspace active.
    ///
    /// Returns `None` when it already was.
    pub fn activate(&mut self, id: WorkspaceId) -> Result<Option<WorkspaceSwitch>, WorkspaceError> {
        let index = self.index_of(id).ok_or(WorkspaceError::Unknown(id))?;
        if index == self.active {
            return Ok(None);
        }

        let switch = self.switch_between(self.active, index);
        self.active = index;
        Ok(Some(switch))
    }

    pub fn layout(&self) -> WorkspaceLayout {
        WorkspaceLayout::calc(&self.policy, self.workspaces.len(), self.active)
    }

    /// Workspace adjacent to the active one on the grid.
    pub fn neighbor(&self, direction: Direction) -> Option<WorkspaceId> {
        if self.workspaces.is_empty() {
            return None;
        }

        let index = self.layout().neighbor(direction);
        self.workspaces.get(index).map(Workspace::id)
    }

    fn switch_between(&self, from: usize, to: usize) -> WorkspaceSwitch {
        let layout = self.layout();
        let direction = match (layout.position(from), layout.position(to)) {
            (Some((from_row, from_col)), Some((to_row, to_col))) => {
                if to_col > from_col {
                    Some(Direction::Right)
                } else if to_col < from_col {
                    Some(Direction::Left)
                } else if to_row > from_row {
                    Some(Direction::Down)
                } else if to_row < from_row {
                    Some(Direction::Up)
                } else {
                    None
                }
            }
            _ => None,
        };

        WorkspaceSwitch {
            from: self.workspaces[from].id,
            to: self.workspaces[to].id,
            direction,
        }
    }

    #[cfg(test)]
    pub fn verify_invariants(&self) {
        if self.workspaces.is_empty() {
            assert_eq!(self.active, 0);
            return;
        }

        assert!(self.active < self.workspaces.len(), "active index out of range");

        for (i, ws) in self.workspaces.iter().enumerate() {
            assert!(ws.id.0 <= self.id_counter);
            for other in &self.workspaces[i + 1..] {
                assert_ne!(ws.id, other.id, "workspace ids must be unique");
            }
        }
    }
}
