use super::{Error, Notification, Screen, ScreenData, ScreenState, WindowId};
use crate::utils::Direction;
use crate::workspace::{LayoutPolicy, WorkspaceId, WorkspaceLayout, WorkspaceSwitch, Workspaces};

impl<D: ScreenData> Screen<D> {
    pub fn workspaces(&self) -> &Workspaces {
        &self.workspaces
    }

    pub fn active_workspace(&self) -> Option<WorkspaceId> {
        self.workspaces.active_id()
    }

    pub fn workspace_layout(&self) -> WorkspaceLayout {
        self.workspaces.layout()
    }

    pub fn workspace_neighbor(&self, direction: Direction) -> Option<WorkspaceId> {
        self.workspaces.neighbor(direction)
    }

    pub fn set_layout_policy(&mut self, policy: LayoutPolicy) {
        debug!("workspace layout policy: {policy:?}");
        self.workspaces.set_policy(policy);
    }

    pub fn set_workspace_name(&mut self, id: WorkspaceId, name: Option<String>) -> Result<(), Error> {
        Ok(self.workspaces.set_name(id, name)?)
    }

    pub fn activate_workspace(&mut self, id: WorkspaceId) -> Result<(), Error> {
        let _span = tracy_client::span!("Screen::activate_workspace");

        if let Some(switch) = self.workspaces.activate(id)? {
            self.workspace_switched(switch);
        }
        Ok(())
    }

    pub fn append_new_workspace(&mut self, name: Option<String>) -> Result<WorkspaceId, Error> {
        if self.state == ScreenState::Closing {
            return Err(Error::Closing);
        }

        let id = self.workspaces.append(name);
        self.observers.emit(Notification::WorkspaceAdded(id));
        Ok(id)
    }

    /// Removes a workspace, moving its windows to the neighboring one.
    pub fn remove_workspace(&mut self, id: WorkspaceId) -> Result<(), Error> {
        let _span = tracy_client::span!("Screen::remove_workspace");

        let removal = self.workspaces.remove(id)?;
        for managed in &mut self.windows {
            if managed.workspace == Some(id) {
                managed.workspace = Some(removal.windows_to);
            }
        }
        debug!("removed workspace {id}, windows moved to {}", removal.windows_to);

        self.observers.emit(Notification::WorkspaceRemoved(id));
        if let Some(switch) = removal.switch {
            self.workspace_switched(switch);
        }
        Ok(())
    }

    /// Puts a window on a workspace, or on all workspaces with `None`.
    pub fn move_window_to_workspace(
        &mut self,
        window: &WindowId<D>,
        workspace: Option<WorkspaceId>,
    ) -> Result<(), Error> {
        if let Some(ws) = workspace {
            if self.workspaces.by_id(ws).is_none() {
                return Err(crate::workspace::WorkspaceError::Unknown(ws).into());
            }
        }

        let managed = self.managed_mut(window).ok_or(Error::UnknownWindow)?;
        managed.workspace = workspace;

        self.queue_workarea_recalc();
        self.queue_check_fullscreen();
        Ok(())
    }

    fn workspace_switched(&mut self, switch: WorkspaceSwitch) {
        debug!(
            "switched workspace {} -> {} ({:?})",
            switch.from, switch.to, switch.direction
        );

        if self.tile_preview.is_shown() {
            self.hide_tile_preview();
        }
        self.observers.emit(Notification::WorkspaceSwitched(switch));
        self.queue_workarea_recalc();
        self.queue_check_fullscreen();
    }
}
