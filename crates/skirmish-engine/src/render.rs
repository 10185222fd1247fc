//! Presentation: turning actor snapshots into frames.
//!
//! The presentation loop hands each frame's snapshots to a [`FrameSink`].
//! [`MapRenderer`] draws a coarse text map of the live actors.

use std::fmt::Write as _;
use std::io::{self, Write};

use parking_lot::Mutex;

use skirmish_core::{ActorSnapshot, MAP_SIZE};

/// Consumer of rendered frames.
pub trait FrameSink: Send + Sync {
    /// Present one frame. `actors` holds every actor, dead or alive.
    fn present(&self, actors: &[ActorSnapshot]);
}

/// Draws live actors onto a `grid_size` × `grid_size` character grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapRenderer {
    grid_size: usize,
}

impl MapRenderer {
    /// Renderer for a square grid. A zero size is raised to 1.
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size: grid_size.max(1),
        }
    }

    /// Rows and columns of the grid.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Render a full frame: header, grid rows, and the live count.
    ///
    /// Empty cells are `.`; a cell shows the symbol of the last live actor
    /// mapped into it.
    pub fn render(&self, actors: &[ActorSnapshot]) -> String {
        let n = self.grid_size;
        let mut grid = vec!['.'; n * n];
        let mut alive = 0usize;

        for actor in actors.iter().filter(|a| a.alive) {
            alive += 1;
            let col = self.cell(actor.position.x);
            let row = self.cell(actor.position.y);
            grid[row * n + col] = actor.kind.profile().symbol;
        }

        let mut out = String::with_capacity(32 + n * (2 * n + 3));
        out.push_str("=== CURRENT MAP ===\n");
        for row in grid.chunks(n) {
            out.push('|');
            for &c in row {
                out.push(c);
                out.push(' ');
            }
            out.push_str("|\n");
        }
        // Writing to a String cannot fail.
        let _ = writeln!(out, "Alive: {alive}");
        out
    }

    fn cell(&self, coord: i32) -> usize {
        let scaled = i64::from(coord.max(0)) * self.grid_size as i64 / i64::from(MAP_SIZE);
        (scaled as usize).min(self.grid_size - 1)
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Prints rendered frames to standard output.
#[derive(Debug, Default)]
pub struct StdoutSink {
    renderer: MapRenderer,
}

impl StdoutSink {
    /// Sink printing maps of the given grid size.
    pub fn new(grid_size: usize) -> Self {
        Self {
            renderer: MapRenderer::new(grid_size),
        }
    }
}

impl FrameSink for StdoutSink {
    fn present(&self, actors: &[ActorSnapshot]) {
        let frame = self.renderer.render(actors);
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out).and_then(|()| out.write_all(frame.as_bytes())) {
            tracing::warn!(error = %e, "failed to print map frame");
        }
    }
}

/// Discards every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&self, _actors: &[ActorSnapshot]) {}
}

/// Renders frames into any writer, e.g. a file or an in-memory buffer.
pub struct WriterSink<W: Write + Send> {
    renderer: MapRenderer,
    out: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    /// Sink rendering maps of `grid_size` into `out`.
    pub fn new(grid_size: usize, out: W) -> Self {
        Self {
            renderer: MapRenderer::new(grid_size),
            out: Mutex::new(out),
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write + Send> FrameSink for WriterSink<W> {
    fn present(&self, actors: &[ActorSnapshot]) {
        let frame = self.renderer.render(actors);
        let mut out = self.out.lock();
        if let Err(e) = out.write_all(frame.as_bytes()).and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "failed to write map frame");
        }
    }
}
