use crate::coordinates::WorldPoint;

/// Snapshot of the mower as reported by the controller on one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceState {
    pub x: f64,
    pub y: f64,
    pub battery_pct: f64,
    pub status: String,
}

impl DeviceState {
    pub fn new(x: f64, y: f64, battery_pct: f64, status: impl Into<String>) -> Self {
        Self {
            x,
            y,
            battery_pct,
            status: status.into(),
        }
    }

    pub fn position(&self) -> WorldPoint {
        WorldPoint::new(self.x, self.y)
    }

    pub fn info_text(&self) -> String {
        format!(
            "Battery: {:.1}% | State: {}",
            self.battery_pct, self.status
        )
    }

    /// Serializes the snapshot in the channel's `x,y,battery,status` form.
    pub fn to_record(&self) -> String {
        format!(
            "{:.3},{:.3},{:.1},{}",
            self.x, self.y, self.battery_pct, self.status
        )
    }
}
