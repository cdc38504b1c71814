//! Top-down PNG rendering of a generated diorama.
use std::path::Path;

use anyhow::Context;
use diorama_gen::catalog;
use diorama_gen::generator::Diorama;
use diorama_gen::layout::{cell_world_position, TILE_SIZE};
use diorama_gen::scatter::PlacedObject;
use glam::{IVec2, Vec2};
use image::{ImageBuffer, Rgb, RgbImage};
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber honouring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// How one category of object is drawn.
#[derive(Debug, Clone, Copy)]
pub enum AssetStyle {
    Circle { color: [u8; 3], radius: i32 },
    Square { color: [u8; 3], half_size: i32 },
    Hidden,
}

impl AssetStyle {
    pub const fn circle(color: [u8; 3], radius: i32) -> Self {
        Self::Circle { color, radius }
    }

    pub const fn square(color: [u8; 3], half_size: i32) -> Self {
        Self::Square { color, half_size }
    }
}

const FOREST_STYLES: [(&str, AssetStyle); 11] = [
    ("Mountain", AssetStyle::square([120, 120, 130], 14)),
    ("Pine Tall", AssetStyle::circle([20, 80, 35], 7)),
    ("Pine Medium", AssetStyle::circle([30, 105, 45], 6)),
    ("Pine Small", AssetStyle::circle([45, 125, 55], 5)),
    ("Stone", AssetStyle::square([150, 150, 150], 2)),
    ("Stump", AssetStyle::circle([110, 75, 40], 2)),
    ("Mushroom", AssetStyle::circle([200, 60, 50], 2)),
    ("Flower", AssetStyle::circle([230, 210, 80], 2)),
    ("Bush", AssetStyle::circle([70, 140, 60], 4)),
    ("Grass Filler", AssetStyle::circle([110, 170, 70], 1)),
    ("Grass Clump", AssetStyle::circle([95, 160, 60], 2)),
];

/// Rendering configuration: image size, world window and per-asset styles.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    /// World (x, z) of the window's centre.
    pub center: Vec2,
    /// World size covered by the image.
    pub extent: Vec2,
    pub background: [u8; 3],
    /// Styles keyed by asset-name prefix. The longest matching prefix wins.
    pub styles: Vec<(String, AssetStyle)>,
    pub default_style: AssetStyle,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), extent: Vec2) -> Self {
        Self {
            image_size,
            center: Vec2::ZERO,
            extent,
            background: [30, 30, 30],
            styles: Vec::new(),
            default_style: AssetStyle::circle([255, 0, 255], 2),
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_center(mut self, center: Vec2) -> Self {
        self.center = center;
        self
    }

    pub fn set_asset_style(&mut self, prefix: impl Into<String>, style: AssetStyle) -> &mut Self {
        self.styles.push((prefix.into(), style));
        self
    }

    /// Window over the grid and the mountain row, with forest colours.
    pub fn forest(image_size: (u32, u32)) -> Self {
        let mut config = Self::new(image_size, Vec2::new(64.0, 64.0));
        for (prefix, style) in FOREST_STYLES {
            config.set_asset_style(prefix, style);
        }
        config
    }

    fn style_for(&self, asset: &str) -> AssetStyle {
        self.styles
            .iter()
            .filter(|(prefix, _)| asset.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map_or(self.default_style, |(_, style)| *style)
    }

    fn world_to_pixel(&self, x: f32, z: f32) -> IVec2 {
        let (w, h) = self.image_size;
        let min = self.center - self.extent * 0.5;
        let u = (x - min.x) / self.extent.x;
        // Back of the diorama (+z) at the top of the image.
        let v = 1.0 - (z - min.y) / self.extent.y;
        IVec2::new((u * w as f32) as i32, (v * h as f32) as i32)
    }

    fn world_len_to_pixels(&self, len: f32) -> i32 {
        (len / self.extent.x * self.image_size.0 as f32).round() as i32
    }
}

fn tile_color(asset: &str) -> [u8; 3] {
    if asset == catalog::GROUND {
        [96, 140, 70]
    } else if catalog::BRIDGE_TILES.contains(&asset) {
        [150, 110, 70]
    } else if asset.starts_with("River") {
        [60, 110, 190]
    } else {
        [170, 150, 95]
    }
}

fn fill_rect(img: &mut RgbImage, min: IVec2, max: IVec2, color: [u8; 3]) {
    let (w, h) = (img.width() as i32, img.height() as i32);
    for y in min.y.max(0)..max.y.min(h) {
        for x in min.x.max(0)..max.x.min(w) {
            img.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }
}

fn draw_disk(img: &mut RgbImage, c: IVec2, r: i32, color: [u8; 3]) {
    let r = r.max(0);
    let (w, h) = (img.width() as i32, img.height() as i32);
    for y in (c.y - r)..=(c.y + r) {
        if y < 0 || y >= h {
            continue;
        }
        for x in (c.x - r)..=(c.x + r) {
            if x < 0 || x >= w {
                continue;
            }
            let (dx, dy) = (x - c.x, y - c.y);
            if dx * dx + dy * dy <= r * r {
                img.put_pixel(x as u32, y as u32, Rgb(color));
            }
        }
    }
}

fn draw_object(img: &mut RgbImage, config: &RenderConfig, object: &PlacedObject) {
    let c = config.world_to_pixel(object.position.x, object.position.z);
    match config.style_for(&object.asset) {
        AssetStyle::Circle { color, radius } => {
            let r = (radius as f32 * object.scale.x.max(object.scale.z)).round() as i32;
            draw_disk(img, c, r, color);
        }
        AssetStyle::Square { color, half_size } => {
            let half = IVec2::splat(half_size);
            fill_rect(img, c - half, c + half + IVec2::ONE, color);
        }
        AssetStyle::Hidden => {}
    }
}

/// Renders tiles, then every placed object in placement order.
pub fn render_diorama(diorama: &Diorama, config: &RenderConfig) -> RgbImage {
    let (w, h) = config.image_size;
    let mut img = ImageBuffer::from_pixel(w, h, Rgb(config.background));

    let half_tile = TILE_SIZE * 0.5;
    for (cell, tile) in diorama.layout.tiles.iter().enumerate() {
        let centre = cell_world_position(cell);
        let a = config.world_to_pixel(centre.x - half_tile, centre.z + half_tile);
        let b = config.world_to_pixel(centre.x + half_tile, centre.z - half_tile);
        fill_rect(&mut img, a, b, tile_color(&tile.asset));
        if !tile.is_ground() {
            let mark = config.world_len_to_pixels(2.0).max(2);
            let c = config.world_to_pixel(centre.x, centre.z);
            draw_disk(&mut img, c, mark, [240, 240, 240]);
        }
    }

    for object in diorama.mountains.iter() {
        draw_object(&mut img, config, object);
    }
    for (_, layer) in diorama.layers.iter().rev() {
        for object in &layer.placements {
            draw_object(&mut img, config, object);
        }
    }
    img
}

/// Renders `diorama` and writes it as a PNG.
pub fn render_diorama_to_png(
    diorama: &Diorama,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    render_diorama(diorama, config)
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Renders bare sample points in a `extent` rectangle as dots.
pub fn render_points_to_png(
    points: &[Vec2],
    extent: Vec2,
    image_size: (u32, u32),
    radius: i32,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let config = RenderConfig::new(image_size, extent).with_center(extent * 0.5);
    let (w, h) = image_size;
    let mut img = ImageBuffer::from_pixel(w, h, Rgb([235, 235, 225]));
    for p in points {
        draw_disk(&mut img, config.world_to_pixel(p.x, p.y), radius, [40, 90, 40]);
    }
    let path = path.as_ref();
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
