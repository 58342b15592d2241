use crate::locale::DisplayRecord;
use crate::preprocess::{DisplayBuffer, CANVAS_HEIGHT, CANVAS_WIDTH};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgba, RgbaImage};

const MARGIN: u32 = 20;
const HEADER: u32 = 40;
const FOOTER: u32 = 36;
/// Vertical room above the tallest bar reserved for its value text.
const VALUE_GAP: u32 = 24;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const INK: Rgba<u8> = Rgba([33, 33, 33, 255]);

pub fn figure_width() -> u32 {
    MARGIN * 3 + CANVAS_WIDTH * 2
}

pub fn figure_height() -> u32 {
    HEADER + CANVAS_HEIGHT + FOOTER
}

/// Composes the two side-by-side views: the display copy of the photo with
/// the dominant-emotion caption on the left, and a bar chart of every
/// localized label against its percentage score on the right.
pub fn compose_figure(
    display: &DisplayBuffer,
    records: &[DisplayRecord],
    caption: &str,
) -> RgbaImage {
    let mut figure = RgbaImage::from_pixel(figure_width(), figure_height(), BACKGROUND);

    draw_text(&mut figure, MARGIN, MARGIN / 2, caption, INK, 2);

    let photo = display.to_rgba_image();
    image::imageops::overlay(&mut figure, &photo, i64::from(MARGIN), i64::from(HEADER));

    draw_bar_chart(
        &mut figure,
        MARGIN * 2 + CANVAS_WIDTH,
        HEADER,
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        records,
    );

    figure
}

fn draw_bar_chart(
    figure: &mut RgbaImage,
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
    records: &[DisplayRecord],
) {
    let baseline = y0 + height;
    fill_rect(figure, x0, baseline - 2, width, 2, INK);

    if records.is_empty() {
        return;
    }

    let slot = width / records.len() as u32;
    if slot == 0 {
        // More labels than pixel columns; nothing legible can be drawn.
        return;
    }
    let bar_width = (slot * 3 / 4).max(1);
    let plot_height = height - VALUE_GAP;

    for (i, record) in records.iter().enumerate() {
        let slot_x = x0 + slot * i as u32;
        let bar_x = slot_x + (slot - bar_width) / 2;

        // Image-pipeline scores are percentages; anything outside [0, 100]
        // is clamped rather than trusted.
        let fraction = (record.score.clamp(0.0, 100.0)) / 100.0;
        let bar_height = (fraction * plot_height as f32).round() as u32;
        let bar_y = baseline - 2 - bar_height;

        let [r, g, b] = record.color.0;
        fill_rect(figure, bar_x, bar_y, bar_width, bar_height, Rgba([r, g, b, 255]));

        let value = format!("{:.1}", record.score);
        let value_x = centered_text_x(slot_x, slot, &value, 1);
        draw_text(figure, value_x, bar_y.saturating_sub(12), &value, INK, 1);

        let label = truncate_to_slot(&record.label, slot);
        let label_x = centered_text_x(slot_x, slot, &label, 1);
        draw_text(figure, label_x, baseline + 8, &label, INK, 1);
    }
}

fn centered_text_x(slot_x: u32, slot: u32, text: &str, scale: u32) -> u32 {
    let text_width = text.chars().count() as u32 * 8 * scale;
    slot_x + slot.saturating_sub(text_width) / 2
}

fn truncate_to_slot(label: &str, slot: u32) -> String {
    let max_chars = (slot / 8).max(1) as usize;
    label.chars().take(max_chars).collect()
}

fn fill_rect(figure: &mut RgbaImage, x: u32, y: u32, width: u32, height: u32, color: Rgba<u8>) {
    let x_end = (x + width).min(figure.width());
    let y_end = (y + height).min(figure.height());
    for py in y..y_end {
        for px in x..x_end {
            figure.put_pixel(px, py, color);
        }
    }
}

fn draw_text(figure: &mut RgbaImage, x: u32, y: u32, text: &str, color: Rgba<u8>, scale: u32) {
    let scale = scale.max(1);
    let mut cursor_x = x;
    for ch in text.chars() {
        let glyph = BASIC_FONTS
            .get(ch)
            .or_else(|| LATIN_FONTS.get(ch))
            .or_else(|| BASIC_FONTS.get('?'));
        let Some(glyph) = glyph else {
            cursor_x += 8 * scale;
            continue;
        };
        for (row_idx, row) in glyph.iter().copied().enumerate() {
            for col_idx in 0..8u32 {
                if (row >> col_idx) & 1 == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        let px = cursor_x + col_idx * scale + sx;
                        let py = y + row_idx as u32 * scale + sy;
                        if px < figure.width() && py < figure.height() {
                            figure.put_pixel(px, py, color);
                        }
                    }
                }
            }
        }
        cursor_x += 8 * scale;
    }
}
