use std::collections::HashMap;
use std::path::Path;
use std::sync::Once;

use glam::Vec2;
use image::{Rgb, RgbImage};
use ruin_gen::prelude::*;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

/// Installs a compact `tracing` subscriber. Honours `RUST_LOG`, defaults to `info`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init();
    });
}

/// How elements of one role are drawn.
#[derive(Clone, Copy, Debug)]
pub enum RoleStyle {
    Fill { color: [u8; 3] },
    Outline { color: [u8; 3] },
    Hidden,
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub background: [u8; 3],
    /// Room fill at distance 0; rooms further away fade toward `far_room`.
    pub near_room: [u8; 3],
    pub far_room: [u8; 3],
    pub corridor: [u8; 3],
    pub wall: [u8; 3],
    pub wire: [u8; 3],
    pub margin: u32,
    role_styles: HashMap<StructureRole, RoleStyle>,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32)) -> Self {
        let role_styles = HashMap::from([
            (StructureRole::Wall, RoleStyle::Hidden),
            (StructureRole::Back, RoleStyle::Hidden),
            (StructureRole::Door, RoleStyle::Fill { color: [200, 90, 60] }),
            (StructureRole::Hatch, RoleStyle::Fill { color: [200, 160, 60] }),
            (StructureRole::Prop, RoleStyle::Outline { color: [240, 240, 240] }),
        ]);
        Self {
            image_size,
            background: [20, 20, 24],
            near_room: [70, 110, 160],
            far_room: [150, 60, 90],
            corridor: [60, 60, 70],
            wall: [230, 230, 210],
            wire: [90, 220, 120],
            margin: 16,
            role_styles,
        }
    }

    pub fn with_background(mut self, rgb: [u8; 3]) -> Self {
        self.background = rgb;
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn set_role_style(&mut self, role: StructureRole, style: RoleStyle) {
        self.role_styles.insert(role, style);
    }

    fn role_style(&self, role: StructureRole) -> RoleStyle {
        self.role_styles
            .get(&role)
            .copied()
            .unwrap_or(RoleStyle::Outline { color: [255, 0, 255] })
    }
}

/// Maps structure coordinates (y up) to pixels (y down), preserving aspect ratio.
struct Projection {
    origin: Vec2,
    scale: f32,
    offset: Vec2,
    height: f32,
}

impl Projection {
    fn fit(area: &Rect, cfg: &RenderConfig) -> Self {
        let (w, h) = cfg.image_size;
        let avail = Vec2::new(
            w.saturating_sub(2 * cfg.margin).max(1) as f32,
            h.saturating_sub(2 * cfg.margin).max(1) as f32,
        );
        let size = area.size().as_vec2().max(Vec2::ONE);
        let scale = (avail.x / size.x).min(avail.y / size.y);
        let offset = Vec2::splat(cfg.margin as f32) + (avail - size * scale) * 0.5;
        Self {
            origin: area.min().as_vec2(),
            scale,
            offset,
            height: h as f32,
        }
    }

    fn point(&self, p: Vec2) -> (i64, i64) {
        let local = (p - self.origin) * self.scale + self.offset;
        (local.x.round() as i64, (self.height - local.y).round() as i64)
    }

    fn rect(&self, r: &Rect) -> (i64, i64, i64, i64) {
        let (x0, y1) = self.point(r.min().as_vec2());
        let (x1, y0) = self.point(r.max().as_vec2());
        (x0, y0, x1, y1)
    }
}

/// Renders rooms, corridors, walls, elements and wire links of `structure` to a PNG.
pub fn render_structure_to_png(
    structure: &Structure,
    cfg: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = cfg.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(cfg.background));
    let proj = Projection::fit(&structure.area, cfg);
    let max_distance = structure.max_distance().max(1) as f32;

    for shape in &structure.shapes {
        let color = if shape.is_corridor() {
            cfg.corridor
        } else {
            let t = shape.distance.map_or(1.0, |d| d as f32 / max_distance);
            lerp_rgb(cfg.near_room, cfg.far_room, t)
        };
        fill_rect(&mut img, proj.rect(&shape.rect), color);
    }

    for element in &structure.elements {
        match cfg.role_style(element.role) {
            RoleStyle::Fill { color } => {
                let color = match element.door {
                    Some(state) if state.open => darken(color),
                    _ => color,
                };
                fill_rect(&mut img, proj.rect(&element.rect), color);
            }
            RoleStyle::Outline { color } => outline_rect(&mut img, proj.rect(&element.rect), color),
            RoleStyle::Hidden => {}
        }
    }

    for shape in &structure.shapes {
        for wall in &shape.walls {
            draw_line(
                &mut img,
                proj.point(wall.a.as_vec2()),
                proj.point(wall.b.as_vec2()),
                cfg.wall,
            );
        }
    }

    for wire in &structure.wires {
        let (Some(a), Some(b)) = (structure.element(wire.from), structure.element(wire.to)) else {
            continue;
        };
        draw_line(
            &mut img,
            proj.point(a.rect.center()),
            proj.point(b.rect.center()),
            cfg.wire,
        );
    }

    let entrance = &structure.shapes[structure.entrance].rect;
    let (cx, cy) = proj.point(entrance.center());
    fill_rect(&mut img, (cx - 4, cy - 4, cx + 4, cy + 4), [250, 220, 50]);

    img.save(path.as_ref())?;
    tracing::info!("Wrote {}", path.as_ref().display());
    Ok(())
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: [u8; 3]) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }
}

fn fill_rect(img: &mut RgbImage, (x0, y0, x1, y1): (i64, i64, i64, i64), color: [u8; 3]) {
    for y in y0.min(y1)..=y0.max(y1) {
        for x in x0.min(x1)..=x0.max(x1) {
            put(img, x, y, color);
        }
    }
}

fn outline_rect(img: &mut RgbImage, (x0, y0, x1, y1): (i64, i64, i64, i64), color: [u8; 3]) {
    draw_line(img, (x0, y0), (x1, y0), color);
    draw_line(img, (x1, y0), (x1, y1), color);
    draw_line(img, (x1, y1), (x0, y1), color);
    draw_line(img, (x0, y1), (x0, y0), color);
}

// Bresenham.
fn draw_line(img: &mut RgbImage, (x0, y0): (i64, i64), (x1, y1): (i64, i64), color: [u8; 3]) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let (mut x, mut y, mut err) = (x0, y0, dx + dy);
    loop {
        put(img, x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn lerp_rgb(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let mix = |i: usize| (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8;
    [mix(0), mix(1), mix(2)]
}

fn darken(c: [u8; 3]) -> [u8; 3] {
    [c[0] / 2, c[1] / 2, c[2] / 2]
}
