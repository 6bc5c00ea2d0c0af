use macroquad::prelude::*;

#[derive(Debug, Clone)]
pub struct MarkerStyle {
    pub mower_radius_px: f32,
    pub mower_outline_px: f32,
    pub mower_color: Color,
    pub obstacle_size_px: f32,
    pub obstacle_color: Color,
    pub dock_size_px: f32,
    pub dock_thickness_px: f32,
    pub dock_color: Color,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            mower_radius_px: 6.0,
            mower_outline_px: 1.5,
            mower_color: RED,
            obstacle_size_px: 10.0,
            obstacle_color: BLACK,
            dock_size_px: 16.0,
            dock_thickness_px: 3.0,
            dock_color: Color::from_rgba(255, 221, 0, 255),
        }
    }
}

pub fn draw_mower(center: Vec2, style: &MarkerStyle) {
    draw_circle(
        center.x,
        center.y,
        style.mower_radius_px + style.mower_outline_px,
        Color::from_rgba(90, 0, 0, 255),
    );
    draw_circle(center.x, center.y, style.mower_radius_px, style.mower_color);
}

pub fn draw_obstacle(center: Vec2, style: &MarkerStyle) {
    let half = style.obstacle_size_px * 0.5;
    draw_rectangle(
        center.x - half,
        center.y - half,
        style.obstacle_size_px,
        style.obstacle_size_px,
        style.obstacle_color,
    );
}

/// Plus sign, drawn crisp at any zoom from two lines.
pub fn draw_dock(center: Vec2, style: &MarkerStyle) {
    let half = style.dock_size_px * 0.5;
    draw_line(
        center.x - half,
        center.y,
        center.x + half,
        center.y,
        style.dock_thickness_px,
        style.dock_color,
    );
    draw_line(
        center.x,
        center.y - half,
        center.x,
        center.y + half,
        style.dock_thickness_px,
        style.dock_color,
    );
}

const LEGEND_FONT_SIZE: f32 = 16.0;
const LEGEND_ROW_HEIGHT: f32 = 22.0;
const LEGEND_PADDING: f32 = 8.0;
const LEGEND_SYMBOL_WIDTH: f32 = 24.0;

/// Legend box anchored to the upper-right corner of `plot`.
pub fn draw_legend(plot: Rect, style: &MarkerStyle) {
    let entries: [(&str, fn(Vec2, &MarkerStyle)); 2] =
        [("Obstacle", draw_obstacle), ("Dock", draw_dock)];

    let text_width = entries
        .iter()
        .map(|(label, _)| measure_text(label, None, LEGEND_FONT_SIZE as u16, 1.0).width)
        .fold(0.0_f32, f32::max);
    let box_w = LEGEND_PADDING * 2.0 + LEGEND_SYMBOL_WIDTH + text_width;
    let box_h = LEGEND_PADDING * 2.0 + LEGEND_ROW_HEIGHT * entries.len() as f32;
    let box_x = plot.x + plot.w - box_w - LEGEND_PADDING;
    let box_y = plot.y + LEGEND_PADDING;

    draw_rectangle(box_x, box_y, box_w, box_h, Color::from_rgba(255, 255, 255, 210));
    draw_rectangle_lines(box_x, box_y, box_w, box_h, 1.0, GRAY);

    for (row, (label, draw_symbol)) in entries.iter().enumerate() {
        let row_center_y = box_y + LEGEND_PADDING + LEGEND_ROW_HEIGHT * (row as f32 + 0.5);
        let symbol_center = vec2(box_x + LEGEND_PADDING + LEGEND_SYMBOL_WIDTH * 0.4, row_center_y);
        draw_symbol(symbol_center, style);
        draw_text(
            label,
            box_x + LEGEND_PADDING + LEGEND_SYMBOL_WIDTH,
            row_center_y + LEGEND_FONT_SIZE * 0.3,
            LEGEND_FONT_SIZE,
            BLACK,
        );
    }
}
