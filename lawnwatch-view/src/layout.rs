use lawnwatch_core::WorldPoint;
use macroquad::prelude::{Rect, Vec2, vec2};

pub const MARGIN_SIDE: f32 = 24.0;
pub const MARGIN_TOP: f32 = 64.0;
pub const MARGIN_BOTTOM: f32 = 36.0;

/// Screen placement of the lawn plot. World y grows upward, screen y grows
/// downward, so the bottom edge of the plot is world y = 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotLayout {
    pub plot: Rect,
    scale: f32,
}

impl PlotLayout {
    /// Largest aspect-preserving plot that fits inside the screen margins,
    /// centred horizontally.
    pub fn fit(screen_w: f32, screen_h: f32, world_w: f64, world_h: f64) -> Self {
        let avail_w = (screen_w - 2.0 * MARGIN_SIDE).max(1.0);
        let avail_h = (screen_h - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
        let scale = (avail_w / world_w as f32).min(avail_h / world_h as f32);
        let plot_w = world_w as f32 * scale;
        let plot_h = world_h as f32 * scale;
        let x = (screen_w - plot_w) * 0.5;

        Self {
            plot: Rect::new(x, MARGIN_TOP, plot_w, plot_h),
            scale,
        }
    }

    /// Screen pixels per world unit.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn world_to_screen(&self, point: WorldPoint) -> Vec2 {
        vec2(
            self.plot.x + point.x as f32 * self.scale,
            self.plot.y + self.plot.h - point.y as f32 * self.scale,
        )
    }

    pub fn contains(&self, screen: Vec2) -> bool {
        self.plot.contains(screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_lawn_fills_limiting_axis() {
        let layout = PlotLayout::fit(648.0, 700.0, 10.0, 10.0);
        assert_eq!(layout.plot.w, 600.0);
        assert_eq!(layout.plot.h, 600.0);
        assert_eq!(layout.plot.x, 24.0);
        assert_eq!(layout.scale(), 60.0);
    }

    #[test]
    fn origin_is_bottom_left() {
        let layout = PlotLayout::fit(648.0, 700.0, 10.0, 10.0);
        assert_eq!(
            layout.world_to_screen(WorldPoint::new(0.0, 0.0)),
            vec2(24.0, MARGIN_TOP + 600.0)
        );
        assert_eq!(
            layout.world_to_screen(WorldPoint::new(10.0, 10.0)),
            vec2(624.0, MARGIN_TOP)
        );
        assert_eq!(
            layout.world_to_screen(WorldPoint::new(5.0, 5.0)),
            vec2(324.0, MARGIN_TOP + 300.0)
        );
    }

    #[test]
    fn wide_lawn_is_centred() {
        let layout = PlotLayout::fit(648.0, 700.0, 20.0, 5.0);
        assert_eq!(layout.scale(), 30.0);
        assert_eq!(layout.plot.h, 150.0);
        assert!(layout.contains(vec2(300.0, MARGIN_TOP + 10.0)));
        assert!(!layout.contains(vec2(300.0, MARGIN_TOP + 200.0)));
    }
}
