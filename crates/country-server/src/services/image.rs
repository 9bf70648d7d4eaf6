//! Summary image rendering
//!
//! Draws the summary with the 8x8 bitmap glyphs from `font8x8`, scaled up,
//! so rendering never depends on fonts installed on the host.

use async_trait::async_trait;
use country_core::ports::SummaryRenderer;
use country_core::{CountryError, Result, SummaryStats};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{ImageFormat, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const GLYPH: u32 = 8;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const TEXT: Rgb<u8> = Rgb([0, 0, 0]);
const HEADER: Rgb<u8> = Rgb([41, 128, 185]);
const RULE: Rgb<u8> = Rgb([200, 200, 200]);

pub const IMAGE_FILE_NAME: &str = "summary.png";

static RENDER_SEQ: AtomicU64 = AtomicU64::new(0);

pub struct PngSummaryRenderer {
    cache_dir: PathBuf,
}

impl PngSummaryRenderer {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }
}

#[async_trait]
impl SummaryRenderer for PngSummaryRenderer {
    async fn render(&self, stats: &SummaryStats) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;

        let target = self.image_path();
        let stats = stats.clone();
        let path = target.clone();

        tokio::task::spawn_blocking(move || write_png(&draw_summary(&stats), &path))
            .await
            .map_err(|e| CountryError::Render(format!("render task failed: {}", e)))??;

        info!("Summary image written to {}", target.display());
        Ok(target)
    }

    fn image_path(&self) -> PathBuf {
        self.cache_dir.join(IMAGE_FILE_NAME)
    }
}

/// Write next to the target and rename, so readers never see a partial file
fn write_png(canvas: &RgbImage, target: &Path) -> Result<()> {
    let seq = RENDER_SEQ.fetch_add(1, Ordering::Relaxed);
    let tmp = target.with_extension(format!("{}.{}.tmp", std::process::id(), seq));
    if let Err(e) = canvas.save_with_format(&tmp, ImageFormat::Png) {
        let _ = std::fs::remove_file(&tmp);
        return Err(CountryError::Render(e.to_string()));
    }
    std::fs::rename(&tmp, target)?;
    Ok(())
}

fn draw_summary(stats: &SummaryStats) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    let mut y = 30;

    draw_centered(&mut canvas, "Country Currency Summary", y, 3, HEADER);
    y += 50;
    draw_rule(&mut canvas, y);
    y += 30;

    let total = format!("Total Countries: {}", stats.total_countries);
    draw_centered(&mut canvas, &total, y, 2, TEXT);
    y += 45;

    if !stats.top_countries.is_empty() {
        let header = format!("Top {} Countries by Estimated GDP", stats.top_countries.len());
        draw_centered(&mut canvas, &header, y, 2, HEADER);
        y += 40;

        for (idx, (name, gdp)) in stats.top_countries.iter().enumerate() {
            let gdp = gdp.map(format_usd).unwrap_or_else(|| "N/A".to_string());
            let line = format!("{}. {}: {}", idx + 1, name, gdp);
            draw_text(&mut canvas, &line, 100, y, 2, TEXT);
            y += 35;
        }
    }

    y += 20;
    draw_rule(&mut canvas, y);
    y += 30;

    let refreshed = stats
        .last_refreshed_at
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Never".to_string());
    draw_centered(&mut canvas, &format!("Last Refreshed: {}", refreshed), y, 2, TEXT);

    canvas
}

/// `$1,234,567.89`
pub fn format_usd(value: f64) -> String {
    let cents = format!("{:.2}", value.abs());
    let (whole, fraction) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, fraction)
}

fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH * scale
}

fn draw_centered(canvas: &mut RgbImage, text: &str, y: u32, scale: u32, color: Rgb<u8>) {
    let x = WIDTH.saturating_sub(text_width(text, scale)) / 2;
    draw_text(canvas, text, x, y, scale, color);
}

fn draw_text(canvas: &mut RgbImage, text: &str, x: u32, y: u32, scale: u32, color: Rgb<u8>) {
    for (i, ch) in text.chars().enumerate() {
        let origin_x = x + i as u32 * GLYPH * scale;
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..GLYPH {
                if bits & (1 << col) == 0 {
                    continue;
                }
                fill_block(
                    canvas,
                    origin_x + col * scale,
                    y + row as u32 * scale,
                    scale,
                    color,
                );
            }
        }
    }
}

fn fill_block(canvas: &mut RgbImage, x: u32, y: u32, size: u32, color: Rgb<u8>) {
    for dy in 0..size {
        for dx in 0..size {
            let (px, py) = (x + dx, y + dy);
            // long names are clipped at the edge
            if px < WIDTH && py < HEIGHT {
                canvas.put_pixel(px, py, color);
            }
        }
    }
}

fn draw_rule(canvas: &mut RgbImage, y: u32) {
    for x in 50..WIDTH - 50 {
        for dy in 0..2 {
            if y + dy < HEIGHT {
                canvas.put_pixel(x, y + dy, RULE);
            }
        }
    }
}
