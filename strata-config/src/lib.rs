#[macro_use]
extern crate tracing;

use std::ffi::OsStr;
use std::path::Path;

use miette::{Context, IntoDiagnostic};

pub mod workspace;

pub use crate::workspace::{StartingCorner, WorkspaceConfig, WorkspaceLayout, WorkspaceName};

#[derive(knuffel::Decode, Debug, Default, Clone, PartialEq)]
pub struct Config {
    #[knuffel(child, default)]
    pub workspaces: Workspaces,
    #[knuffel(child, default)]
    pub tile_preview: TilePreview,
    #[knuffel(child, default)]
    pub hot_corners: HotCorners,
}

#[derive(knuffel::Decode, Debug, Clone, PartialEq)]
pub struct Workspaces {
    /// Number of workspaces created when the screen initializes.
    ///
    /// Named workspaces count towards this number; if there are more names than the count, the
    /// names win.
    #[knuffel(child, unwrap(argument), default = Self::default().count)]
    pub count: u32,
    #[knuffel(children(name = "workspace"))]
    pub named: Vec<WorkspaceConfig>,
    #[knuffel(child, default)]
    pub layout: WorkspaceLayout,
}

impl Default for Workspaces {
    fn default() -> Self {
        Self {
            count: 4,
            named: Vec::new(),
            layout: WorkspaceLayout::default(),
        }
    }
}

impl Workspaces {
    /// Number of workspaces to create, taking the named ones into account.
    pub fn initial_count(&self) -> usize {
        usize::max(self.count as usize, self.named.len()).max(1)
    }
}

#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePreview {
    /// Delay before showing the tile preview while a window is dragged into a tiling zone.
    #[knuffel(child, unwrap(argument), default = Self::default().delay_ms)]
    pub delay_ms: u64,
}

impl Default for TilePreview {
    fn default() -> Self {
        Self { delay_ms: 250 }
    }
}

#[derive(knuffel::Decode, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HotCorners {
    #[knuffel(child)]
    pub off: bool,
}

impl Config {
    pub fn load(path: &Path) -> miette::Result<Self> {
        let _span = tracy_client::span!("Config::load");

        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("error reading {path:?}"))?;

        let config = Self::parse(
            path.file_name()
                .and_then(OsStr::to_str)
                .unwrap_or("config.kdl"),
            &contents,
        )
        .context("error parsing")?;
        debug!("loaded config from {path:?}");
        Ok(config)
    }

    pub fn parse(filename: &str, text: &str) -> Result<Self, knuffel::Error> {
        let _span = tracy_client::span!("Config::parse");
        knuffel::parse(filename, text)
    }
}
