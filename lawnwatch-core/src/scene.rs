use crate::coordinates::WorldPoint;
use serde::{Deserialize, Serialize};

/// Fixed landmarks drawn on top of the lawn. Set once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub obstacles: Vec<WorldPoint>,
    pub dock: WorldPoint,
}

impl Scene {
    pub fn new(obstacles: Vec<WorldPoint>, dock: WorldPoint) -> Self {
        Self { obstacles, dock }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            obstacles: vec![
                WorldPoint::new(4.0, 4.0),
                WorldPoint::new(6.0, 2.0),
                WorldPoint::new(2.0, 7.0),
            ],
            dock: WorldPoint::new(0.5, 0.5),
        }
    }
}
