//! Per-display coordination.
//!
//! [`Screen`] owns the monitor topology, the workspaces, the stacking order and the pixel content
//! of client surfaces, and keeps them consistent while reacting to [`ScreenEvent`]s. It lives
//! inside the compositor state `D` driven by a calloop event loop, so that deferred work can get
//! back to it through [`ScreenData::screen()`].
//!
//! The `impl Screen` blocks are split across the submodules by area.

use std::collections::HashMap;
use std::rc::Rc;

use calloop::LoopHandle;
use smithay::utils::{Logical, Point, Rectangle};
use strata_config::Config;

use crate::buffer::{Buffer, BufferError, TextureImporter};
use crate::monitor::{HardwareInfo, Topology, TopologyError};
use crate::stack::{ScreenCorner, Stack};
use crate::window::ScreenWindow;
use crate::workspace::{LayoutPolicy, WorkspaceError, WorkspaceId, Workspaces};

mod buffers;
mod deferred;
mod event;
mod monitors;
mod observers;
mod stacking;
mod startup;
mod tile_preview;
mod windows;
mod workspaces;


pub use deferred::{Deferred, DeferredWork};
pub use event::{BufferId, ScreenEvent, SurfaceId};
pub use observers::{Notification, Observers, SubscriptionId};
pub use startup::StartupSequence;
pub use tile_preview::TilePreview;
pub use windows::ListWindows;

/// Compositor state that owns a [`Screen`].
pub trait ScreenData: Sized + 'static {
    type Window: ScreenWindow;
    type Importer: TextureImporter;

    fn screen(&mut self) -> &mut Screen<Self>;
}

pub type WindowId<D> = <<D as ScreenData>::Window as ScreenWindow>::Id;
pub type SourceOf<D> = <<D as ScreenData>::Importer as TextureImporter>::Source;
pub type TextureOf<D> = <<D as ScreenData>::Importer as TextureImporter>::Texture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Workspaces are not populated yet and windows are not managed.
    Initializing,
    Active,
    /// Teardown has begun. Terminal.
    Closing,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("screen is closing")]
    Closing,
    #[error("screen is not managing windows yet")]
    NotActive,
    #[error("workspaces are already initialized")]
    AlreadyInitialized,
    #[error("workspaces are not initialized")]
    NoWorkspaces,
    #[error("window is already managed")]
    AlreadyManaged,
    #[error("window is not managed")]
    UnknownWindow,
    #[error("surface {0:?} has no buffer attached")]
    UnknownSurface(SurfaceId),
    #[error("buffer {0:?} was destroyed")]
    NoBuffer(BufferId),
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// A window adopted by the screen.
#[derive(Debug)]
pub(crate) struct Managed<W> {
    pub window: W,
    /// `None` for windows shown on all workspaces.
    pub workspace: Option<WorkspaceId>,
    /// Workspace index requested by a startup sequence.
    pub initial_workspace: Option<usize>,
    /// Timestamp of the user action that launched the window.
    pub initial_timestamp: Option<u32>,
}

pub struct Screen<D: ScreenData> {
    state: ScreenState,
    config: Config,

    topology: Rc<Topology>,
    /// Monitor the pointer was last seen on.
    last_monitor_index: usize,
    pointer: Point<i32, Logical>,
    /// Monitor rectangles minus struts, indexed like the topology.
    work_areas: Vec<Rectangle<i32, Logical>>,
    /// Per monitor, whether the topmost window on it is fullscreen.
    in_fullscreen: Vec<bool>,

    workspaces: Workspaces,
    stack: Stack<WindowId<D>>,
    /// Managed windows in adoption order.
    windows: Vec<Managed<D::Window>>,

    buffers: HashMap<BufferId, Buffer<D::Importer>>,
    /// Buffer currently attached to each surface.
    surfaces: HashMap<SurfaceId, BufferId>,

    startup_sequences: Vec<StartupSequence>,
    tile_preview: TilePreview<WindowId<D>>,

    deferred: Deferred<D>,
    observers: Observers,
}

impl<D: ScreenData> Screen<D> {
    pub fn new(event_loop: LoopHandle<'static, D>, config: &Config, hardware: &HardwareInfo) -> Self {
        let _span = tracy_client::span!("Screen::new");

        let topology = Rc::new(Topology::default().recompute(hardware));
        let work_areas = topology.monitors().iter().map(|mon| mon.rect).collect();
        let in_fullscreen = vec![false; topology.len()];
        let policy = LayoutPolicy::from_config(&config.workspaces.layout);

        Self {
            state: ScreenState::Initializing,
            config: config.clone(),
            topology,
            last_monitor_index: 0,
            pointer: Point::from((0, 0)),
            work_areas,
            in_fullscreen,
            workspaces: Workspaces::new(policy),
            stack: Stack::new(),
            windows: Vec::new(),
            buffers: HashMap::new(),
            surfaces: HashMap::new(),
            startup_sequences: Vec::new(),
            tile_preview: TilePreview::default(),
            deferred: Deferred::new(event_loop),
            observers: Observers::default(),
        }
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn subscribe(&mut self) -> (SubscriptionId, std::sync::mpsc::Receiver<Notification>) {
        self.observers.subscribe()
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn is_pending(&self, work: DeferredWork) -> bool {
        self.deferred.is_pending(work)
    }

    /// Creates the configured workspaces and the auxiliary windows.
    pub fn init_workspaces(&mut self) -> Result<(), Error> {
        let _span = tracy_client::span!("Screen::init_workspaces");

        match self.state {
            ScreenState::Initializing => (),
            ScreenState::Active => return Err(Error::AlreadyInitialized),
            ScreenState::Closing => return Err(Error::Closing),
        }
        if !self.workspaces.is_empty() {
            return Err(Error::AlreadyInitialized);
        }

        let ws_config = &self.config.workspaces;
        for i in 0..ws_config.initial_count() {
            let name = ws_config.named.get(i).map(|ws| ws.name.0.clone());
            let id = self.workspaces.append(name);
            self.observers.emit(Notification::WorkspaceAdded(id));
        }
        debug!("initialized {} workspaces", self.workspaces.len());

        self.stack.create_guard_window();
        if !self.config.hot_corners.off {
            for corner in [
                ScreenCorner::TopLeft,
                ScreenCorner::TopRight,
                ScreenCorner::BottomLeft,
                ScreenCorner::BottomRight,
            ] {
                self.stack.create_corner_window(corner);
            }
        }
        self.stack.create_overlay_window();

        Ok(())
    }

    /// Adopts the windows that existed before the screen started and begins managing windows.
    pub fn manage_all_windows(
        &mut self,
        windows: impl IntoIterator<Item = D::Window>,
    ) -> Result<(), Error> {
        let _span = tracy_client::span!("Screen::manage_all_windows");

        match self.state {
            ScreenState::Initializing => (),
            ScreenState::Active => return Err(Error::AlreadyInitialized),
            ScreenState::Closing => return Err(Error::Closing),
        }
        if self.workspaces.is_empty() {
            return Err(Error::NoWorkspaces);
        }

        for window in windows {
            if let Err(err) = self.adopt(window) {
                warn!("error adopting existing window: {err}");
            }
        }

        self.state = ScreenState::Active;
        debug!("managing {} windows", self.windows.len());

        self.recalc_work_areas();
        self.check_fullscreen();
        self.observers.emit(Notification::Restacked);
        Ok(())
    }

    /// Starts managing a newly mapped window.
    pub fn manage_window(&mut self, window: D::Window) -> Result<(), Error> {
        let _span = tracy_client::span!("Screen::manage_window");

        match self.state {
            ScreenState::Active => (),
            ScreenState::Initializing => return Err(Error::NotActive),
            ScreenState::Closing => return Err(Error::Closing),
        }

        self.adopt(window)?;
        self.observers.emit(Notification::Restacked);
        self.queue_workarea_recalc();
        self.queue_check_fullscreen();
        Ok(())
    }

    fn adopt(&mut self, window: D::Window) -> Result<(), Error> {
        let id = window.id().clone();
        if self.managed(&id).is_some() {
            return Err(Error::AlreadyManaged);
        }

        let window_type = window.window_type();
        let minimized = window.is_minimized();
        let on_all_workspaces = window.is_on_all_workspaces();

        self.windows.push(Managed {
            window,
            workspace: None,
            initial_workspace: None,
            initial_timestamp: None,
        });
        self.apply_startup_properties(&id);

        let initial = self.managed(&id).and_then(|m| m.initial_workspace);
        let workspace = if on_all_workspaces {
            None
        } else {
            initial
                .and_then(|index| self.workspaces.by_index(index))
                .map(|ws| ws.id())
                .or(self.workspaces.active_id())
        };
        if let Some(managed) = self.managed_mut(&id) {
            managed.workspace = workspace;
        }

        self.stack.add(id.clone(), window_type, minimized);
        debug!("managing window {id:?} on workspace {workspace:?}");
        Ok(())
    }

    /// Stops managing a window and hands it back.
    pub fn unmanage_window(&mut self, id: &WindowId<D>) -> Option<D::Window> {
        let _span = tracy_client::span!("Screen::unmanage_window");

        let idx = self.windows.iter().position(|m| m.window.id() == id)?;
        let managed = self.windows.remove(idx);
        self.stack.remove(id);
        debug!("unmanaged window {id:?}");

        if self.tile_preview.window.as_ref() == Some(id) {
            self.hide_tile_preview();
        }

        if self.state == ScreenState::Active {
            self.observers.emit(Notification::Restacked);
            self.queue_workarea_recalc();
            self.queue_check_fullscreen();
        }

        Some(managed.window)
    }

    /// Begins teardown.
    ///
    /// Pending deferred work is cancelled, subscribers are dropped, buffers are released and the
    /// managed windows are handed back.
    pub fn close(&mut self) -> Vec<D::Window> {
        let _span = tracy_client::span!("Screen::close");

        if self.state == ScreenState::Closing {
            return Vec::new();
        }
        debug!("closing screen");

        self.state = ScreenState::Closing;
        self.deferred.cancel_all();
        self.observers.clear();
        self.tile_preview = TilePreview::default();

        self.surfaces.clear();
        for (_, buffer) in self.buffers.drain() {
            buffer.destroy();
        }

        for managed in &self.windows {
            self.stack.remove(managed.window.id());
        }
        self.windows.drain(..).map(|m| m.window).collect()
    }

    pub(crate) fn managed(&self, id: &WindowId<D>) -> Option<&Managed<D::Window>> {
        self.windows.iter().find(|m| m.window.id() == id)
    }

    pub(crate) fn managed_mut(&mut self, id: &WindowId<D>) -> Option<&mut Managed<D::Window>> {
        self.windows.iter_mut().find(|m| m.window.id() == id)
    }

    pub fn window(&self, id: &WindowId<D>) -> Option<&D::Window> {
        self.managed(id).map(|m| &m.window)
    }

    pub fn window_mut(&mut self, id: &WindowId<D>) -> Option<&mut D::Window> {
        self.managed_mut(id).map(|m| &mut m.window)
    }

    /// Workspace of a managed window; the inner `None` means all workspaces.
    pub fn window_workspace(&self, id: &WindowId<D>) -> Option<Option<WorkspaceId>> {
        self.managed(id).map(|m| m.workspace)
    }

    pub fn initial_workspace(&self, id: &WindowId<D>) -> Option<usize> {
        self.managed(id).and_then(|m| m.initial_workspace)
    }

    pub fn initial_timestamp(&self, id: &WindowId<D>) -> Option<u32> {
        self.managed(id).and_then(|m| m.initial_timestamp)
    }

    #[cfg(test)]
    pub fn verify_invariants(&self) {
        use std::collections::HashSet;

        self.topology.verify_invariants();
        self.workspaces.verify_invariants();
        self.stack.verify_invariants();

        assert_eq!(self.work_areas.len(), self.topology.len());
        assert_eq!(self.in_fullscreen.len(), self.topology.len());
        assert!(self.topology.is_empty() || self.last_monitor_index < self.topology.len());

        let stacked: HashSet<_> = self.stack.order().collect();
        let managed: HashSet<_> = self.windows.iter().map(|m| m.window.id()).collect();
        assert_eq!(stacked, managed, "stack and managed windows must agree");

        for m in &self.windows {
            if let Some(ws) = m.workspace {
                assert!(
                    self.workspaces.by_id(ws).is_some(),
                    "window {:?} is on a removed workspace",
                    m.window.id()
                );
            }
        }

        match self.state {
            ScreenState::Initializing => assert!(self.windows.is_empty()),
            ScreenState::Active => assert!(!self.workspaces.is_empty()),
            ScreenState::Closing => {
                assert!(self.windows.is_empty());
                assert!(self.observers.is_empty());
                assert!(self.buffers.is_empty());
                for work in [
                    DeferredWork::TilePreview,
                    DeferredWork::WorkAreaRecalc,
                    DeferredWork::FullscreenCheck,
                ] {
                    assert!(!self.deferred.is_pending(work));
                }
            }
        }

        for (area, mon) in self.work_areas.iter().zip(self.topology.monitors()) {
            assert!(crate::utils::geometry::is_empty(*area) || mon.rect.contains_rect(*area));
        }
    }
}
