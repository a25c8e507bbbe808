#![allow(dead_code)]

use image::{Rgba, RgbaImage};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const BUILDING_GRAY: Rgba<u8> = Rgba([230, 230, 230, 255]);

pub fn blank(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, WHITE)
}

/// Fills the inclusive pixel range `[x0, x1] x [y0, y1]`.
pub fn fill(img: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
    for y in y0..=y1 {
        for x in x0..=x1 {
            img.put_pixel(x, y, color);
        }
    }
}

pub fn is_reddish(px: &Rgba<u8>) -> bool {
    px[0] > 200 && px[1] < 80 && px[2] < 80
}
