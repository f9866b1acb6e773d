//! # Terminal Preview
//!
//! Renders an RGBA image as ASCII art for development mode (`--stdout`), so
//! output can be checked without writing a PNG.

use image::RgbaImage;

/// Characters from darkest to brightest.
const RAMP: &[u8] = b" .:-=+*#%@";

/// Default preview width in characters.
pub const COLUMNS: usize = 48;

/// Convert `image` to ASCII art `columns` characters wide.
///
/// Terminal cells are roughly twice as tall as wide, so each row covers two
/// cells' worth of pixels. Transparent pixels count as dark.
pub fn ascii_art(image: &RgbaImage, columns: usize) -> String {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || columns == 0 {
        return String::new();
    }
    let cell_w = width as f64 / columns as f64;
    let rows = ((height as f64 / (cell_w * 2.0)).round() as usize).max(1);
    let cell_h = height as f64 / rows as f64;

    let mut out = String::with_capacity(rows * (columns + 1));
    for row in 0..rows {
        for col in 0..columns {
            let x0 = (col as f64 * cell_w) as u32;
            let y0 = (row as f64 * cell_h) as u32;
            let x1 = (((col + 1) as f64 * cell_w) as u32).clamp(x0 + 1, width);
            let y1 = (((row + 1) as f64 * cell_h) as u32).clamp(y0 + 1, height);

            let mut total = 0.0;
            let mut count = 0.0;
            for y in y0..y1 {
                for x in x0..x1 {
                    let p = image.get_pixel(x, y);
                    let luma = 0.299 * p[0] as f64 + 0.587 * p[1] as f64 + 0.114 * p[2] as f64;
                    total += luma * p[3] as f64 / 255.0;
                    count += 1.0;
                }
            }
            let level = total / count / 255.0;
            let index = ((level * (RAMP.len() - 1) as f64).round() as usize).min(RAMP.len() - 1);
            out.push(RAMP[index] as char);
        }
        out.push('\n');
    }
    out
}

/// Print `image` to stdout as ASCII art.
pub fn draw_ascii(image: &RgbaImage) {
    print!("{}", ascii_art(image, COLUMNS));
}
