//! Terminal image preview
//!
//! Draws a base64 JPEG/PNG payload with the upper-half-block glyph: each cell
//! shows two vertically stacked pixels, the top one as foreground and the
//! bottom one as background. Anything that fails to decode is replaced by a
//! textual placeholder.

use std::collections::VecDeque;

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Paragraph, StatefulWidget, Widget},
};

use cartoonify_core::prelude::*;
use cartoonify_core::ImagePayload;

use crate::layout;
use crate::theme::styles;

const HALF_BLOCK: &str = "▀";

/// Payloads kept decoded at once (the two sides of the display toggle)
const CACHE_CAPACITY: usize = 2;

/// Decode a payload into an image
pub fn decode_payload(payload: &ImagePayload) -> Result<DynamicImage> {
    let bytes = payload.decode()?;
    image::load_from_memory(&bytes).map_err(|e| Error::decode(format!("unreadable image: {e}")))
}

/// Largest `(columns, pixel_rows)` that keeps the image's aspect ratio inside
/// `area`. A cell is two pixel rows tall.
pub fn fit_size(image_width: u32, image_height: u32, area: Rect) -> (u32, u32) {
    let max_w = u64::from(area.width);
    let max_h = u64::from(area.height) * 2;
    let (img_w, img_h) = (u64::from(image_width), u64::from(image_height));
    if img_w == 0 || img_h == 0 || max_w == 0 || max_h == 0 {
        return (0, 0);
    }

    let (w, h) = if img_w * max_h <= img_h * max_w {
        (img_w * max_h / img_h, max_h)
    } else {
        (max_w, img_h * max_w / img_w)
    };
    (w.max(1) as u32, h.max(1) as u32)
}

// ─────────────────────────────────────────────────────────────────────────────
// Decode Cache
// ─────────────────────────────────────────────────────────────────────────────

/// Decoded payloads carried between draws.
///
/// The screen is redrawn on every poll, so decoding and scaling happen once
/// per payload (and once per target size), not once per draw.
#[derive(Debug, Default)]
pub struct PreviewCache {
    entries: VecDeque<CachedImage>,
    decodes: usize,
}

#[derive(Debug)]
struct CachedImage {
    payload: ImagePayload,
    /// `None` when the payload is not a readable image
    image: Option<DynamicImage>,
    fitted: Option<((u32, u32), RgbImage)>,
}

impl CachedImage {
    /// Pixels scaled to fit `area`, rescaled only when the fit changes
    fn pixels(&mut self, area: Rect) -> Option<&RgbImage> {
        let img = self.image.as_ref()?;
        let size = fit_size(img.width(), img.height(), area);
        if size.0 == 0 || size.1 == 0 {
            return None;
        }

        let stale = self.fitted.as_ref().map_or(true, |(fitted, _)| *fitted != size);
        if stale {
            let pixels = if size == (img.width(), img.height()) {
                img.to_rgb8()
            } else {
                img.resize_exact(size.0, size.1, FilterType::Triangle).to_rgb8()
            };
            self.fitted = Some((size, pixels));
        }
        self.fitted.as_ref().map(|(_, pixels)| pixels)
    }
}

impl PreviewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of payloads decoded so far
    pub fn decodes(&self) -> usize {
        self.decodes
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entry for `payload`, decoding it on first sight
    fn entry(&mut self, payload: &ImagePayload) -> Option<&mut CachedImage> {
        let hit = self
            .entries
            .iter()
            .position(|e| e.payload.ptr_eq(payload) || e.payload == *payload);

        match hit {
            Some(0) => {}
            Some(pos) => {
                if let Some(entry) = self.entries.remove(pos) {
                    self.entries.push_front(entry);
                }
            }
            None => {
                self.decodes += 1;
                let image = decode_payload(payload)
                    .map_err(|e| debug!("Preview decode failed: {}", e))
                    .ok();
                self.entries.push_front(CachedImage {
                    payload: payload.clone(),
                    image,
                    fitted: None,
                });
                self.entries.truncate(CACHE_CAPACITY);
            }
        }
        self.entries.front_mut()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Widget
// ─────────────────────────────────────────────────────────────────────────────

/// Preview of an image payload, or a placeholder message
pub struct ImagePreview<'a> {
    payload: Option<&'a ImagePayload>,
    placeholder: &'a str,
}

impl<'a> ImagePreview<'a> {
    pub fn new(payload: Option<&'a ImagePayload>) -> Self {
        Self {
            payload,
            placeholder: "",
        }
    }

    /// Text shown when there is no payload
    pub fn placeholder(mut self, text: &'a str) -> Self {
        self.placeholder = text;
        self
    }
}

impl StatefulWidget for ImagePreview<'_> {
    type State = PreviewCache;

    fn render(self, area: Rect, buf: &mut Buffer, cache: &mut PreviewCache) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let Some(payload) = self.payload else {
            render_message(self.placeholder, styles::text_muted(), area, buf);
            return;
        };

        let Some(entry) = cache.entry(payload) else {
            return;
        };
        if entry.image.is_none() {
            render_message("Preview unavailable", styles::error_text(), area, buf);
            return;
        }
        if let Some(pixels) = entry.pixels(area) {
            render_pixels(pixels, area, buf);
        }
    }
}

fn render_message(text: &str, style: Style, area: Rect, buf: &mut Buffer) {
    let target = layout::centered(area, area.width, 1);
    Paragraph::new(Line::styled(text, style))
        .alignment(Alignment::Center)
        .render(target, buf);
}

fn render_pixels(pixels: &RgbImage, area: Rect, buf: &mut Buffer) {
    let (w, h) = pixels.dimensions();
    let rows = h.div_ceil(2);
    let target = layout::centered(area, w as u16, rows as u16);

    for row in 0..rows {
        for col in 0..w {
            let top = pixel_color(pixels, col, row * 2);
            // An odd pixel height leaves the last bottom half empty
            let bottom = if row * 2 + 1 < h {
                pixel_color(pixels, col, row * 2 + 1)
            } else {
                Color::Reset
            };
            let x = target.x + col as u16;
            let y = target.y + row as u16;
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol(HALF_BLOCK).set_fg(top).set_bg(bottom);
            }
        }
    }
}

fn pixel_color(pixels: &RgbImage, x: u32, y: u32) -> Color {
    let [r, g, b] = pixels.get_pixel(x, y).0;
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{solid_png, TestTerminal};

    fn draw(term: &mut TestTerminal, payload: Option<&ImagePayload>, cache: &mut PreviewCache) {
        let area = term.area();
        term.render_stateful_widget(ImagePreview::new(payload), area, cache);
    }

    #[test]
    fn test_fit_size_keeps_aspect() {
        // 4:3 image in a 40x10 area (40x20 pixels) is height-bound
        assert_eq!(fit_size(640, 480, Rect::new(0, 0, 40, 10)), (26, 20));
        // Wide image is width-bound
        assert_eq!(fit_size(1000, 100, Rect::new(0, 0, 20, 10)), (20, 2));
    }

    #[test]
    fn test_fit_size_degenerate() {
        assert_eq!(fit_size(0, 10, Rect::new(0, 0, 10, 10)), (0, 0));
        assert_eq!(fit_size(10, 10, Rect::new(0, 0, 0, 10)), (0, 0));
    }

    #[test]
    fn test_renders_half_blocks_in_image_color() {
        let payload = solid_png(8, 8, [200, 10, 10]);
        let mut term = TestTerminal::with_size(8, 4);
        draw(&mut term, Some(&payload), &mut PreviewCache::new());

        let cell = &term.buffer()[(0, 0)];
        assert_eq!(cell.symbol(), HALF_BLOCK);
        assert_eq!(cell.fg, Color::Rgb(200, 10, 10));
        assert_eq!(cell.bg, Color::Rgb(200, 10, 10));
    }

    #[test]
    fn test_image_is_centered() {
        let payload = solid_png(4, 4, [0, 255, 0]);
        // 4x4 pixels fit as 8 columns x 8 pixel rows in a 20x4 area
        let mut term = TestTerminal::with_size(20, 4);
        draw(&mut term, Some(&payload), &mut PreviewCache::new());

        assert_eq!(term.cell_at(5, 0), Some(" "));
        assert_eq!(term.cell_at(6, 0), Some(HALF_BLOCK));
        assert_eq!(term.cell_at(13, 3), Some(HALF_BLOCK));
        assert_eq!(term.cell_at(14, 0), Some(" "));
    }

    #[test]
    fn test_unchanged_payload_is_decoded_once() {
        let payload = solid_png(64, 48, [10, 20, 30]);
        let mut cache = PreviewCache::new();
        let mut term = TestTerminal::with_size(20, 6);

        for _ in 0..5 {
            draw(&mut term, Some(&payload), &mut cache);
        }
        assert_eq!(cache.decodes(), 1);
        assert_eq!(term.cell_at(10, 2), Some(HALF_BLOCK));

        // A clone shares the text, an equal copy matches by content
        draw(&mut term, Some(&payload.clone()), &mut cache);
        draw(&mut term, Some(&ImagePayload::new(payload.as_str())), &mut cache);
        assert_eq!(cache.decodes(), 1);
    }

    #[test]
    fn test_toggling_between_two_payloads_reuses_both() {
        let original = solid_png(8, 8, [255, 0, 0]);
        let cartoon = solid_png(8, 8, [0, 0, 255]);
        let mut cache = PreviewCache::new();
        let mut term = TestTerminal::with_size(8, 4);

        for _ in 0..3 {
            draw(&mut term, Some(&cartoon), &mut cache);
            assert_eq!(term.buffer()[(0, 0)].fg, Color::Rgb(0, 0, 255));
            draw(&mut term, Some(&original), &mut cache);
            assert_eq!(term.buffer()[(0, 0)].fg, Color::Rgb(255, 0, 0));
        }
        assert_eq!(cache.decodes(), 2);

        // A third payload evicts the least recently drawn
        let third = solid_png(8, 8, [0, 255, 0]);
        draw(&mut term, Some(&third), &mut cache);
        draw(&mut term, Some(&original), &mut cache);
        assert_eq!(cache.decodes(), 3);
        draw(&mut term, Some(&cartoon), &mut cache);
        assert_eq!(cache.decodes(), 4);
    }

    #[test]
    fn test_resize_refits_without_decoding_again() {
        let payload = solid_png(16, 16, [1, 2, 3]);
        let mut cache = PreviewCache::new();

        let mut small = TestTerminal::with_size(4, 2);
        draw(&mut small, Some(&payload), &mut cache);
        let mut large = TestTerminal::with_size(16, 8);
        draw(&mut large, Some(&payload), &mut cache);

        assert_eq!(cache.decodes(), 1);
        assert_eq!(large.cell_at(15, 7), Some(HALF_BLOCK));
    }

    #[test]
    fn test_invalid_payload_shows_placeholder() {
        let payload = ImagePayload::new("not base64 at all!");
        let mut cache = PreviewCache::new();
        let mut term = TestTerminal::with_size(40, 3);
        draw(&mut term, Some(&payload), &mut cache);
        draw(&mut term, Some(&payload), &mut cache);
        assert!(term.buffer_contains("Preview unavailable"));
        assert_eq!(cache.decodes(), 1);
    }

    #[test]
    fn test_valid_base64_but_not_an_image() {
        let payload = ImagePayload::from_bytes(b"plain text");
        let mut term = TestTerminal::with_size(40, 3);
        draw(&mut term, Some(&payload), &mut PreviewCache::new());
        assert!(term.buffer_contains("Preview unavailable"));
    }

    #[test]
    fn test_missing_payload_shows_custom_placeholder() {
        let mut term = TestTerminal::with_size(40, 3);
        let area = term.area();
        term.render_stateful_widget(
            ImagePreview::new(None).placeholder("Connecting to webcam"),
            area,
            &mut PreviewCache::new(),
        );
        assert!(term.buffer_contains("Connecting to webcam"));
    }
}
