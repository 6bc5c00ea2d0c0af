use macroquad::prelude::Color;

/// Yellow-to-green ramp, light for short grass and dark for tall grass.
const YL_GN: [(u8, u8, u8); 9] = [
    (255, 255, 229),
    (247, 252, 185),
    (217, 240, 163),
    (173, 221, 142),
    (120, 198, 121),
    (65, 171, 93),
    (35, 132, 67),
    (0, 104, 55),
    (0, 69, 41),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightScale {
    pub min: f32,
    pub max: f32,
}

impl HeightScale {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Position of `height` on the ramp, clamped to `[0, 1]`.
    pub fn normalize(&self, height: f32) -> f32 {
        let span = self.max - self.min;
        if span <= f32::EPSILON {
            return 0.0;
        }
        ((height - self.min) / span).clamp(0.0, 1.0)
    }

    pub fn color_for(&self, height: f32) -> Color {
        ramp_color(self.normalize(height))
    }
}

fn ramp_color(t: f32) -> Color {
    let scaled = t.clamp(0.0, 1.0) * (YL_GN.len() - 1) as f32;
    let lower = (scaled.floor() as usize).min(YL_GN.len() - 2);
    let frac = scaled - lower as f32;
    let (r0, g0, b0) = YL_GN[lower];
    let (r1, g1, b1) = YL_GN[lower + 1];
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * frac).round() as u8;
    Color::from_rgba(mix(r0, r1), mix(g0, g1), mix(b0, b1), 255)
}
