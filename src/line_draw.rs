//! Line rasterization for RGBA images (Bresenham with a square brush).

use image::{Rgba, RgbaImage};

fn stamp(img: &mut RgbaImage, x: i32, y: i32, brush: i32, color: Rgba<u8>) {
    let r = brush / 2;
    for dy in -r..=r {
        for dx in -r..=r {
            let (px, py) = (x + dx, y + dy);
            if px >= 0 && py >= 0 && (px as u32) < img.width() && (py as u32) < img.height() {
                img.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

/// Draw a line segment between two pixel positions, `brush` pixels wide.
pub fn draw_segment(img: &mut RgbaImage, a: [f64; 2], b: [f64; 2], brush: u32, color: Rgba<u8>) {
    let (mut x0, mut y0) = (a[0].round() as i32, a[1].round() as i32);
    let (mut x1, mut y1) = (b[0].round() as i32, b[1].round() as i32);
    let brush = brush.max(1) as i32;
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }
    let dx = x1 - x0;
    let dy = (y1 - y0).abs();
    let mut err = dx / 2;
    let ystep = if y0 < y1 { 1 } else { -1 };
    let mut y = y0;
    for x in x0..=x1 {
        if steep {
            stamp(img, y, x, brush, color);
        } else {
            stamp(img, x, y, brush, color);
        }
        err -= dy;
        if err < 0 {
            y += ystep;
            err += dx;
        }
    }
}
