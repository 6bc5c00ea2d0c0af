use crate::channel::PositionSource;
use crate::config::LawnConfig;
use crate::coordinates::WorldPoint;
use crate::device::DeviceState;
use crate::grid::{GridError, LawnGrid};
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPhase {
    /// No usable record this tick; everything stays as it was.
    #[default]
    Idle,
    /// A record arrived: grid painted, marker and label moved.
    Active,
}

/// Per-tick state of the live view: the lawn raster plus the marker and
/// label derived from the last good record.
#[derive(Debug, Clone)]
pub struct LawnOverlay {
    grid: LawnGrid,
    cut_height: f32,
    mow_half_width: usize,
    marker: Option<WorldPoint>,
    label: String,
    last_state: Option<DeviceState>,
    phase: TickPhase,
    ticks: u64,
    active_ticks: u64,
    grid_dirty: bool,
}

impl LawnOverlay {
    pub fn new(grid: LawnGrid, cut_height: f32, mow_half_width: usize) -> Self {
        Self {
            grid,
            cut_height,
            mow_half_width,
            marker: None,
            label: String::new(),
            last_state: None,
            phase: TickPhase::Idle,
            ticks: 0,
            active_ticks: 0,
            grid_dirty: true,
        }
    }

    pub fn from_config(config: &LawnConfig) -> Result<Self, GridError> {
        let grid = config.build_grid()?;
        Ok(Self::new(grid, config.cut_height, config.mow_half_width))
    }

    /// One timer tick: a single read attempt on `source`, then [`Self::tick`].
    pub fn poll_tick<S: PositionSource + ?Sized>(&mut self, source: &mut S) -> TickPhase {
        let snapshot = source.poll();
        self.tick(snapshot)
    }

    pub fn tick(&mut self, snapshot: Option<DeviceState>) -> TickPhase {
        self.ticks += 1;

        let Some(state) = snapshot else {
            if self.phase == TickPhase::Active {
                debug!("no position data at tick {}, holding display", self.ticks);
            }
            self.phase = TickPhase::Idle;
            return self.phase;
        };

        let outcome = self
            .grid
            .mow_at(state.position(), self.mow_half_width, self.cut_height);
        if outcome.changed > 0 {
            self.grid_dirty = true;
        }

        let status_changed = self
            .last_state
            .as_ref()
            .map_or(true, |previous| previous.status != state.status);
        if status_changed {
            info!(
                "mower status {} at ({:.2}, {:.2}), battery {:.1}%",
                state.status, state.x, state.y, state.battery_pct
            );
        }

        self.marker = Some(state.position());
        self.label = state.info_text();
        self.last_state = Some(state);
        self.active_ticks += 1;
        self.phase = TickPhase::Active;
        self.phase
    }

    pub fn grid(&self) -> &LawnGrid {
        &self.grid
    }

    pub fn marker(&self) -> Option<WorldPoint> {
        self.marker
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn last_state(&self) -> Option<&DeviceState> {
        self.last_state.as_ref()
    }

    pub fn phase(&self) -> TickPhase {
        self.phase
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn active_ticks(&self) -> u64 {
        self.active_ticks
    }

    pub fn cut_fraction(&self) -> f32 {
        self.grid.cut_fraction(self.cut_height)
    }

    /// Returns whether the grid changed since the last call, and clears the flag.
    pub fn take_grid_dirty(&mut self) -> bool {
        std::mem::take(&mut self.grid_dirty)
    }
}
