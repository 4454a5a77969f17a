use pdf_writer::{Content, Name, Str};

use crate::fonts::{FontEntry, to_winansi_bytes};
use crate::model::Align;
use crate::style::Rgb;

/// Greedy word wrap against the font width table. A single word wider than
/// `max_width` gets its own line rather than being split; the builders'
/// truncation limits keep such words rare.
pub(super) fn wrap_text(
    text: &str,
    font: &FontEntry,
    font_size: f32,
    max_width: f32,
) -> Vec<String> {
    let space_w = font.space_width(font_size);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_w: f32 = 0.0;

    for word in text.split_whitespace() {
        let word_w = font.text_width(word, font_size);
        if current.is_empty() {
            current.push_str(word);
            current_w = word_w;
        } else if current_w + space_w + word_w > max_width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_w = word_w;
        } else {
            current.push(' ');
            current.push_str(word);
            current_w += space_w + word_w;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub(super) fn set_fill(content: &mut Content, color: Rgb) {
    let [r, g, b] = color;
    content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
}

pub(super) fn set_stroke(content: &mut Content, color: Rgb) {
    let [r, g, b] = color;
    content.set_stroke_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
}

/// Draw one line of text at a fixed baseline. Fill color must already be
/// set by the caller.
pub(super) fn draw_line(
    content: &mut Content,
    font: &FontEntry,
    font_size: f32,
    x: f32,
    baseline_y: f32,
    text: &str,
) {
    content
        .begin_text()
        .set_font(Name(font.pdf_name.as_bytes()), font_size)
        .next_line(x, baseline_y)
        .show(Str(&to_winansi_bytes(text)))
        .end_text();
}

/// Draw one line aligned within `[left_x, left_x + width]`.
pub(super) fn draw_aligned(
    content: &mut Content,
    font: &FontEntry,
    font_size: f32,
    align: Align,
    left_x: f32,
    width: f32,
    baseline_y: f32,
    text: &str,
) {
    let text_w = font.text_width(text, font_size);
    let x = match align {
        Align::Left => left_x,
        Align::Center => left_x + (width - text_w) / 2.0,
        Align::Right => left_x + width - text_w,
    };
    draw_line(content, font, font_size, x, baseline_y, text);
}

/// Horizontal rule between two x positions.
pub(super) fn draw_rule(content: &mut Content, color: Rgb, width: f32, x1: f32, x2: f32, y: f32) {
    content.save_state();
    content.set_line_width(width);
    set_stroke(content, color);
    content.move_to(x1, y);
    content.line_to(x2, y);
    content.stroke();
    content.restore_state();
}
