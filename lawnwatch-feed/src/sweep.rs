use lawnwatch_core::{DeviceState, WorldPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MowerStatus {
    Mowing,
    Returning,
    Docked,
}

impl MowerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MowerStatus::Mowing => "MOWING",
            MowerStatus::Returning => "RETURNING",
            MowerStatus::Docked => "DOCKED",
        }
    }
}

/// Lane-by-lane coverage run over a rectangular lawn, ending at the dock.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    pub width: f64,
    pub height: f64,
    /// Distance between lane centre lines, rounded to whole cells.
    pub lane_spacing: f64,
    /// Side of one grid cell; lanes run through cell centres.
    pub cell_size: f64,
    /// Distance travelled between two reported records.
    pub step: f64,
    pub dock: WorldPoint,
    /// Battery percentage used per world unit travelled.
    pub drain_per_unit: f64,
}

impl SweepPlan {
    /// Lane centre lines, bottom to top. Each lane sits on a cell centre so
    /// that lanes one mowing width apart paint adjacent bands of rows.
    pub fn lane_ys(&self) -> Vec<f64> {
        let cell = self.cell_size.max(f64::EPSILON);
        let spacing_cells = ((self.lane_spacing / cell).round() as usize).max(1);
        (0..)
            .map(|lane| spacing_cells / 2 + lane * spacing_cells)
            .map(|row| (row as f64 + 0.5) * cell)
            .take_while(|&y| y < self.height)
            .collect()
    }

    /// Corner points of the run: dock, each lane's two ends alternating
    /// direction, then the dock again.
    pub fn waypoints(&self) -> Vec<(WorldPoint, MowerStatus)> {
        let mut points = vec![(self.dock, MowerStatus::Mowing)];
        for (index, y) in self.lane_ys().into_iter().enumerate() {
            let (from_x, to_x) = if index % 2 == 0 {
                (0.0, self.width)
            } else {
                (self.width, 0.0)
            };
            points.push((WorldPoint::new(from_x, y), MowerStatus::Mowing));
            points.push((WorldPoint::new(to_x, y), MowerStatus::Mowing));
        }
        points.push((self.dock, MowerStatus::Returning));
        points
    }

    /// Every record the run reports, in order. `jitter` offsets mowing
    /// positions by up to that many units on each axis; the returned path is
    /// unaffected by it.
    pub fn states(&self, rng: &mut fastrand::Rng, jitter: f64) -> Vec<DeviceState> {
        let waypoints = self.waypoints();
        let step = self.step.max(f64::EPSILON);
        let mut battery = 100.0_f64;
        let mut states = Vec::new();

        let Some(&(start, _)) = waypoints.first() else {
            return states;
        };
        states.push(DeviceState::new(
            start.x,
            start.y,
            battery,
            MowerStatus::Mowing.as_str(),
        ));

        for pair in waypoints.windows(2) {
            let (from, _) = pair[0];
            let (to, status) = pair[1];
            let travelled = distance(from, to) / segment_steps(from, to, step) as f64;
            for point in segment(from, to, step) {
                battery = (battery - travelled * self.drain_per_unit).max(0.0);

                let (x, y) = if status == MowerStatus::Mowing && jitter > 0.0 {
                    (
                        point.x + (rng.f64() * 2.0 - 1.0) * jitter,
                        point.y + (rng.f64() * 2.0 - 1.0) * jitter,
                    )
                } else {
                    (point.x, point.y)
                };
                states.push(DeviceState::new(x, y, battery, status.as_str()));
            }
        }

        states.push(DeviceState::new(
            self.dock.x,
            self.dock.y,
            battery,
            MowerStatus::Docked.as_str(),
        ));
        states
    }
}

fn distance(a: WorldPoint, b: WorldPoint) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

fn segment_steps(from: WorldPoint, to: WorldPoint, step: f64) -> usize {
    ((distance(from, to) / step).ceil() as usize).max(1)
}

/// Evenly spaced points from `from` (exclusive) to `to` (inclusive), no
/// further apart than `step`.
fn segment(from: WorldPoint, to: WorldPoint, step: f64) -> impl Iterator<Item = WorldPoint> {
    let steps = segment_steps(from, to, step);
    (1..=steps).map(move |i| {
        let t = i as f64 / steps as f64;
        WorldPoint::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)
    })
}
