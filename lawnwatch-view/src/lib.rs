use lawnwatch_core::{
    FilePositionSource, LawnConfig, LawnGrid, LawnOverlay, Scene, TickPhase, TickTimer,
};
use log::{error, info};
use macroquad::prelude::*;
use thiserror::Error;

use crate::colormap::HeightScale;
use crate::layout::{MARGIN_TOP, PlotLayout};
use crate::marker::{MarkerStyle, draw_dock, draw_legend, draw_mower, draw_obstacle};

pub mod colormap;
pub mod layout;
pub mod marker;

pub const WINDOW_TITLE: &str = "Smart Lawn Mower - Row-by-Row Simulation";
const TITLE_FONT_SIZE: f32 = 22.0;
const INFO_FONT_SIZE: f32 = 18.0;
const FOOTER_FONT_SIZE: f32 = 16.0;
const BACKGROUND: Color = Color::from_rgba(245, 245, 240, 255);

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("lawn raster of {rows}x{cols} cells exceeds the {max}x{max} texture limit")]
    RasterTooLarge { rows: usize, cols: usize, max: u16 },
    #[error(transparent)]
    Grid(#[from] lawnwatch_core::GridError),
}

/// Texture dimensions (width, height) for a `rows × cols` grid, one pixel
/// per cell.
pub fn raster_dimensions(rows: usize, cols: usize) -> Result<(u16, u16), ViewError> {
    match (u16::try_from(cols), u16::try_from(rows)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(ViewError::RasterTooLarge {
            rows,
            cols,
            max: u16::MAX,
        }),
    }
}

/// Writes one pixel per cell. Image row 0 is the top of the lawn, so grid
/// rows are flipped.
pub fn paint_raster(image: &mut Image, grid: &LawnGrid, scale: &HeightScale) {
    let rows = grid.rows();
    let cols = grid.cols();
    for (index, &height) in grid.cells().iter().enumerate() {
        let row = index / cols;
        let col = index % cols;
        let pixel_y = (rows - 1 - row) as u32;
        image.set_pixel(col as u32, pixel_y, scale.color_for(height));
    }
}

pub struct LawnView {
    overlay: LawnOverlay,
    source: FilePositionSource,
    timer: TickTimer,
    scene: Scene,
    world_size: (f64, f64),
    height_scale: HeightScale,
    marker_style: MarkerStyle,
    image: Image,
    texture: Texture2D,
}

impl LawnView {
    pub fn new(config: &LawnConfig) -> Result<Self, ViewError> {
        let overlay = LawnOverlay::from_config(config)?;
        let grid = overlay.grid();
        let (width_px, height_px) = raster_dimensions(grid.rows(), grid.cols())?;
        let image = Image::gen_image_color(width_px, height_px, BLACK);
        let texture = Texture2D::from_image(&image);
        texture.set_filter(FilterMode::Nearest);

        Ok(Self {
            overlay,
            source: FilePositionSource::new(&config.position_file),
            timer: TickTimer::new(config.refresh_interval()),
            scene: config.scene(),
            world_size: (config.width, config.height),
            height_scale: HeightScale::new(config.color_min, config.color_max),
            marker_style: MarkerStyle::default(),
            image,
            texture,
        })
    }

    pub fn update(&mut self, delta_seconds: f32) {
        if self.timer.advance(delta_seconds) {
            self.overlay.poll_tick(&mut self.source);
        }

        if self.overlay.take_grid_dirty() {
            paint_raster(&mut self.image, self.overlay.grid(), &self.height_scale);
            self.texture.update(&self.image);
        }
    }

    pub fn render(&self) {
        clear_background(BACKGROUND);

        let (world_w, world_h) = self.world_size;
        let layout = PlotLayout::fit(screen_width(), screen_height(), world_w, world_h);
        let plot = layout.plot;

        draw_texture_ex(
            &self.texture,
            plot.x,
            plot.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(plot.w, plot.h)),
                ..Default::default()
            },
        );
        draw_rectangle_lines(plot.x, plot.y, plot.w, plot.h, 1.5, DARKGRAY);

        for obstacle in &self.scene.obstacles {
            draw_obstacle(layout.world_to_screen(*obstacle), &self.marker_style);
        }
        draw_dock(layout.world_to_screen(self.scene.dock), &self.marker_style);

        if let Some(marker) = self.overlay.marker() {
            let center = layout.world_to_screen(marker);
            // The marker may sit outside the lawn; only draw it over the plot.
            if layout.contains(center) {
                draw_mower(center, &self.marker_style);
            }
        }

        draw_legend(plot, &self.marker_style);
        self.render_text(&layout);
    }

    fn render_text(&self, layout: &PlotLayout) {
        let plot = layout.plot;
        let title_dims = measure_text(WINDOW_TITLE, None, TITLE_FONT_SIZE as u16, 1.0);
        draw_text(
            WINDOW_TITLE,
            plot.x + (plot.w - title_dims.width) * 0.5,
            MARGIN_TOP * 0.4,
            TITLE_FONT_SIZE,
            BLACK,
        );

        draw_text(
            self.overlay.label(),
            plot.x,
            MARGIN_TOP - 8.0,
            INFO_FONT_SIZE,
            BLACK,
        );

        let waiting = if self.overlay.active_ticks() == 0 {
            format!(" | waiting for {}", self.source.path().display())
        } else if self.overlay.phase() == TickPhase::Idle {
            " | no data".to_string()
        } else {
            String::new()
        };
        let footer = format!(
            "tick {} | updates {} | mowed {:.1}%{}",
            self.overlay.ticks(),
            self.overlay.active_ticks(),
            self.overlay.cut_fraction() * 100.0,
            waiting
        );
        draw_text(
            &footer,
            plot.x,
            plot.y + plot.h + 24.0,
            FOOTER_FONT_SIZE,
            DARKGRAY,
        );
    }
}

pub fn window_conf() -> Conf {
    Conf {
        window_title: WINDOW_TITLE.to_string(),
        window_width: 648,
        window_height: 700,
        window_resizable: true,
        ..Default::default()
    }
}

pub async fn run(config: LawnConfig) {
    let mut view = match LawnView::new(&config) {
        Ok(view) => view,
        Err(err) => {
            error!("failed to set up lawn view: {err}");
            return;
        }
    };
    info!(
        "watching {} every {} ms ({}x{} cells at {} per cell)",
        config.position_file.display(),
        config.refresh_interval_ms,
        view.overlay.grid().cols(),
        view.overlay.grid().rows(),
        config.resolution
    );

    loop {
        if is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q) {
            info!("closing lawn view");
            break;
        }

        view.update(get_frame_time());
        view.render();

        next_frame().await;
    }
}
