//! Arrangement of workspaces on a 2-D grid.
//!
//! The grid is a pure function of the workspace count, the current workspace and the
//! [`LayoutPolicy`]. It is computed on demand and never stored across changes to any of them.

pub use strata_config::StartingCorner;

use crate::utils::Direction;

/// Which grid dimension is configured. The other one is derived from the workspace count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutAxis {
    Rows(u32),
    Columns(u32),
}

/// Direction in which consecutive workspaces fill the grid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Row by row.
    #[default]
    Horizontal,
    /// Column by column.
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutPolicy {
    pub axis: LayoutAxis,
    pub starting_corner: StartingCorner,
    pub orientation: Orientation,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            axis: LayoutAxis::Rows(1),
            starting_corner: StartingCorner::TopLeft,
            orientation: Orientation::Horizontal,
        }
    }
}

impl LayoutPolicy {
    pub fn from_config(config: &strata_config::WorkspaceLayout) -> Self {
        let axis = match (config.rows, config.columns) {
            (Some(rows), Some(columns)) => {
                warn!("workspace layout sets both rows ({rows}) and columns ({columns}), using rows");
                LayoutAxis::Rows(rows)
            }
            (Some(rows), None) => LayoutAxis::Rows(rows),
            (None, Some(columns)) => LayoutAxis::Columns(columns),
            (None, None) => LayoutAxis::Rows(1),
        };

        Self {
            axis,
            starting_corner: config.starting_corner,
            orientation: if config.vertical {
                Orientation::Vertical
            } else {
                Orientation::Horizontal
            },
        }
    }
}

/// Grid placement of all workspaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    pub rows: usize,
    pub cols: usize,
    /// Row-major cells; `None` for cells past the last workspace.
    grid: Vec<Option<usize>>,
    pub current_row: usize,
    pub current_col: usize,
    current: usize,
}

impl WorkspaceLayout {
    /// Places `count` workspaces on a grid according to the policy.
    ///
    /// When `current` is not a valid workspace index the current cell is the top-left one.
    pub fn calc(policy: &LayoutPolicy, count: usize, current: usize) -> Self {
        let _span = tracy_client::span!("WorkspaceLayout::calc");

        let (rows, cols) = match policy.axis {
            LayoutAxis::Rows(rows) => {
                let rows = (rows as usize).max(1);
                (rows, count.div_ceil(rows).max(1))
            }
            LayoutAxis::Columns(cols) => {
                let cols = (cols as usize).max(1);
                (count.div_ceil(cols).max(1), cols)
            }
        };

        let (from_bottom, from_right) = match policy.starting_corner {
            StartingCorner::TopLeft => (false, false),
            StartingCorner::TopRight => (false, true),
            StartingCorner::BottomLeft => (true, false),
            StartingCorner::BottomRight => (true, true),
        };
        let row_order = |i: usize| if from_bottom { rows - 1 - i } else { i };
        let col_order = |i: usize| if from_right { cols - 1 - i } else { i };

        let mut grid = vec![None; rows * cols];
        let mut next = 0;
        let mut place = |row: usize, col: usize| {
            grid[row * cols + col] = (next < count).then_some(next);
            next += 1;
        };
        match policy.orientation {
            Orientation::Horizontal => {
                for r in 0..rows {
                    for c in 0..cols {
                        place(row_order(r), col_order(c));
                    }
                }
            }
            Orientation::Vertical => {
                for c in 0..cols {
                    for r in 0..rows {
                        place(row_order(r), col_order(c));
                    }
                }
            }
        }

        let (current_row, current_col) = grid
            .iter()
            .position(|cell| *cell == Some(current))
            .map_or((0, 0), |pos| (pos / cols, pos % cols));

        Self {
            rows,
            cols,
            grid,
            current_row,
            current_col,
            current,
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.grid[row * self.cols + col]
    }

    /// Grid coordinate (row, col) of a workspace.
    pub fn position(&self, index: usize) -> Option<(usize, usize)> {
        self.grid
            .iter()
            .position(|cell| *cell == Some(index))
            .map(|pos| (pos / self.cols, pos % self.cols))
    }

    /// Workspace in the adjacent cell, without wrapping around.
    ///
    /// Moving off the grid edge or into an empty cell yields the current workspace.
    pub fn neighbor(&self, direction: Direction) -> usize {
        let (mut row, mut col) = (self.current_row, self.current_col);
        match direction {
            Direction::Left => col = col.saturating_sub(1),
            Direction::Right => col = usize::min(col + 1, self.cols - 1),
            Direction::Up => row = row.saturating_sub(1),
            Direction::Down => row = usize::min(row + 1, self.rows - 1),
        }

        self.cell(row, col).unwrap_or(self.current)
    }

    /// Text rendering of the grid, one line per row. `-` marks empty cells and `*` the current
    /// workspace.
    pub fn render(&self) -> String {
        let lines: Vec<String> = (0..self.rows)
            .map(|row| {
                let mut line = String::new();
                for col in 0..self.cols {
                    let mut cell = match self.cell(row, col) {
                        Some(index) => index.to_string(),
                        None => String::from("-"),
                    };
                    if (row, col) == (self.current_row, self.current_col) {
                        cell.push('*');
                    }
                    line.push_str(&format!("{cell:<4}"));
                }
                line.trim_end().to_owned()
            })
            .collect();
        lines.join("\n")
    }
}
