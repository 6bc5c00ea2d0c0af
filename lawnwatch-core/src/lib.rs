pub mod channel;
pub mod config;
pub mod coordinates;
pub mod device;
pub mod grid;
pub mod overlay;
pub mod scene;
pub mod timer;

pub use channel::{
    ChannelError, FilePositionSource, PositionSource, parse_record, read_record,
    write_record_atomic,
};
pub use config::{ConfigError, DEFAULT_POSITION_FILE, LawnConfig};
pub use coordinates::{CellRegion, GridCell, WorldPoint};
pub use device::DeviceState;
pub use grid::{GridError, LawnGrid, MAX_CELLS, MowOutcome};
pub use overlay::{LawnOverlay, TickPhase};
pub use scene::Scene;
pub use timer::TickTimer;
