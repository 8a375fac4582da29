use crate::adapters::font::{draw_text, text_width, GLYPH_HEIGHT};
use crate::core::reporter::format_currency;
use crate::domain::model::GoalChart;
use crate::domain::ports::ChartRenderer;
use crate::utils::error::RenderError;
use image::{ImageOutputFormat, Rgb, RgbImage};
use std::f64::consts::PI;
use std::io::Cursor;

const PALETTE: [Rgb<u8>; 4] = [
    Rgb([0xFF, 0x9A, 0xA2]),
    Rgb([0xFF, 0xB7, 0xB2]),
    Rgb([0xFF, 0xDA, 0xC1]),
    Rgb([0xE2, 0xF0, 0xCB]),
];
const WHITE: Rgb<u8> = Rgb([0xFF, 0xFF, 0xFF]);
const INK: Rgb<u8> = Rgb([0x33, 0x33, 0x33]);

const START_ANGLE_DEG: f64 = 90.0;
const EXPLODE: f64 = 0.05;
const HOLE: f64 = 0.70;
const SHARE_DISTANCE: f64 = 0.85;
const LABEL_DISTANCE: f64 = 1.1;

#[derive(Debug, Clone, Copy)]
enum Align {
    Left,
    Center,
    Right,
}

struct Wedge {
    start_deg: f64,
    sweep_deg: f64,
    center: (f64, f64),
    color: Rgb<u8>,
}

impl Wedge {
    fn mid_radians(&self) -> f64 {
        (self.start_deg + self.sweep_deg / 2.0) * PI / 180.0
    }

    /// Point at `distance` from the wedge center along its bisector, in image coordinates.
    fn along_bisector(&self, distance: f64) -> (f64, f64) {
        let mid = self.mid_radians();
        (
            self.center.0 + distance * mid.cos(),
            self.center.1 - distance * mid.sin(),
        )
    }

    fn contains(&self, x: f64, y: f64, radius: f64) -> bool {
        let dx = x - self.center.0;
        let dy = self.center.1 - y;
        if dx * dx + dy * dy > radius * radius {
            return false;
        }
        let angle = dy.atan2(dx).to_degrees();
        (angle - self.start_deg).rem_euclid(360.0) <= self.sweep_deg
    }
}

/// Doughnut chart of monthly dividends, one exploded wedge per asset, drawn
/// counter-clockwise from 12 o'clock.
#[derive(Debug, Clone)]
pub struct PngDoughnutRenderer {
    width: u32,
    height: u32,
}

impl Default for PngDoughnutRenderer {
    fn default() -> Self {
        Self::new(1200, 900)
    }
}

impl PngDoughnutRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn label_scale(&self) -> u32 {
        (self.height / 450).max(1)
    }

    fn layout(&self, chart: &GoalChart, total: f64, radius: f64) -> Vec<Wedge> {
        let origin = self.origin();
        let mut start = START_ANGLE_DEG;

        chart
            .slices
            .iter()
            .enumerate()
            .map(|(i, slice)| {
                let sweep = slice.value.max(0.0) / total * 360.0;
                let mid = (start + sweep / 2.0) * PI / 180.0;
                let offset = EXPLODE * radius;
                let wedge = Wedge {
                    start_deg: start,
                    sweep_deg: sweep,
                    center: (origin.0 + offset * mid.cos(), origin.1 - offset * mid.sin()),
                    color: PALETTE[i % PALETTE.len()],
                };
                start += sweep;
                wedge
            })
            .collect()
    }

    fn origin(&self) -> (f64, f64) {
        (f64::from(self.width) / 2.0, f64::from(self.height) * 0.55)
    }

    fn radius(&self) -> f64 {
        (f64::from(self.height) * 0.30).min(f64::from(self.width) * 0.25)
    }
}

fn fill_wedge(img: &mut RgbImage, wedge: &Wedge, radius: f64) {
    let (cx, cy) = wedge.center;
    let x0 = (cx - radius).floor().max(0.0) as u32;
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let x1 = ((cx + radius).ceil() as u32).min(img.width());
    let y1 = ((cy + radius).ceil() as u32).min(img.height());

    for y in y0..y1 {
        for x in x0..x1 {
            if wedge.contains(f64::from(x) + 0.5, f64::from(y) + 0.5, radius) {
                img.put_pixel(x, y, wedge.color);
            }
        }
    }
}

fn fill_circle(img: &mut RgbImage, center: (f64, f64), radius: f64, color: Rgb<u8>) {
    let x0 = (center.0 - radius).floor().max(0.0) as u32;
    let y0 = (center.1 - radius).floor().max(0.0) as u32;
    let x1 = ((center.0 + radius).ceil() as u32).min(img.width());
    let y1 = ((center.1 + radius).ceil() as u32).min(img.height());

    for y in y0..y1 {
        for x in x0..x1 {
            let dx = f64::from(x) + 0.5 - center.0;
            let dy = f64::from(y) + 0.5 - center.1;
            if dx * dx + dy * dy <= radius * radius {
                img.put_pixel(x, y, color);
            }
        }
    }
}

/// Multi-line text block vertically centered on `anchor`.
fn draw_block(img: &mut RgbImage, lines: &[String], anchor: (f64, f64), align: Align, scale: u32) {
    let line_height = (GLYPH_HEIGHT + 3) * scale;
    let block_height = line_height * lines.len() as u32 - 3 * scale;
    let top = anchor.1.round() as i64 - i64::from(block_height / 2);

    for (i, line) in lines.iter().enumerate() {
        let width = i64::from(text_width(line, scale));
        let x = anchor.0.round() as i64;
        let left = match align {
            Align::Left => x,
            Align::Center => x - width / 2,
            Align::Right => x - width,
        };
        draw_text(img, line, left, top + i as i64 * i64::from(line_height), scale, INK);
    }
}

impl ChartRenderer for PngDoughnutRenderer {
    fn render(&self, chart: &GoalChart) -> Result<Vec<u8>, RenderError> {
        if chart.slices.is_empty() {
            return Err(RenderError::NothingToRender);
        }
        let total = chart.total();
        if !total.is_finite() || total <= 0.0 {
            return Err(RenderError::NonPositiveTotal(total));
        }

        let mut img = RgbImage::from_pixel(self.width, self.height, WHITE);
        let radius = self.radius();
        let origin = self.origin();
        let scale = self.label_scale();
        let wedges = self.layout(chart, total, radius);

        for wedge in &wedges {
            fill_wedge(&mut img, wedge, radius);
        }
        fill_circle(&mut img, origin, radius * HOLE, WHITE);

        for (wedge, slice) in wedges.iter().zip(&chart.slices) {
            let share = slice.value.max(0.0) / total * 100.0;
            draw_block(
                &mut img,
                &[format!("{:.1}%", share)],
                wedge.along_bisector(SHARE_DISTANCE * radius),
                Align::Center,
                scale,
            );

            let anchor = wedge.along_bisector(LABEL_DISTANCE * radius);
            let align = if anchor.0 >= origin.0 {
                Align::Left
            } else {
                Align::Right
            };
            let lines = [
                slice.label.clone(),
                format_currency(slice.value),
                format!("({:.1}% DA META)", slice.value / chart.goal * 100.0),
            ];
            draw_block(&mut img, &lines, anchor, align, scale);
        }

        draw_block(
            &mut img,
            &["TOTAL MENSAL:".to_string(), format_currency(total)],
            origin,
            Align::Center,
            scale + 1,
        );

        let title = [
            chart.title.clone(),
            format!("(META: {} POR ATIVO)", format_currency(chart.goal)),
        ];
        let title_y = f64::from((GLYPH_HEIGHT + 3) * (scale + 1) * 2);
        draw_block(
            &mut img,
            &title,
            (origin.0, title_y),
            Align::Center,
            scale + 1,
        );

        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
        tracing::debug!("Rendered {}x{} chart ({} bytes)", self.width, self.height, bytes.len());
        Ok(bytes)
    }
}
