use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

use crate::geometry::Point;

pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// Luma 232, inside the default building band.
pub const BUILDING: Rgba<u8> = Rgba([232, 232, 232, 255]);
pub const ROAD: Rgba<u8> = Rgba([190, 190, 190, 255]);
pub const PIN: Rgba<u8> = Rgba([226, 38, 38, 255]);

const BLOCK_PITCH: u32 = 80;
const ROAD_WIDTH: u32 = 12;
const BLOCK_MARGIN: u32 = 6;

/// Generates a synthetic map screenshot.
///
/// Creates an image with:
/// - Gray roads every 80 pixels in both directions
/// - Light-gray building blocks between the roads
/// - A red downward pin whose tip sits on a road at roughly three quarters
///   of the width and height
///
/// Returns the image and the pin tip.
pub fn generate_sample_map(width: u32, height: u32) -> (RgbaImage, Point) {
    let mut img = RgbaImage::from_pixel(width, height, BACKGROUND);

    let mut offset = 0;
    while offset < width.max(height) {
        paint_block(&mut img, Point::new(offset as i32, 0), ROAD_WIDTH, height, ROAD);
        paint_block(&mut img, Point::new(0, offset as i32), width, ROAD_WIDTH, ROAD);
        offset += BLOCK_PITCH;
    }

    let inner = BLOCK_PITCH - ROAD_WIDTH - BLOCK_MARGIN * 2;
    let mut y = ROAD_WIDTH + BLOCK_MARGIN;
    while y < height {
        let mut x = ROAD_WIDTH + BLOCK_MARGIN;
        while x < width {
            paint_block(&mut img, Point::new(x as i32, y as i32), inner, inner, BUILDING);
            x += BLOCK_PITCH;
        }
        y += BLOCK_PITCH;
    }

    let road_x = (width * 3 / 4) / BLOCK_PITCH * BLOCK_PITCH + ROAD_WIDTH / 2;
    let road_y = (height * 3 / 4) / BLOCK_PITCH * BLOCK_PITCH + ROAD_WIDTH / 2;
    let tip = Point::new(road_x as i32, road_y as i32);
    paint_pin(&mut img, tip, 24);

    (img, tip)
}

/// Fills a `width` x `height` rectangle at `top_left`, clipped to the image.
pub fn paint_block(img: &mut RgbaImage, top_left: Point, width: u32, height: u32, color: Rgba<u8>) {
    if width == 0 || height == 0 {
        return;
    }
    draw_filled_rect_mut(img, Rect::at(top_left.x, top_left.y).of_size(width, height), color);
}

/// Draws a downward-pointing pin of the given height whose single bottom pixel is `tip`.
pub fn paint_pin(img: &mut RgbaImage, tip: Point, size: u32) {
    let size = size.max(4) as i32;
    let (w, h) = (img.width() as i32, img.height() as i32);
    for dy in 0..=size {
        let y = tip.y - dy;
        let half = dy / 3;
        for x in (tip.x - half)..=(tip.x + half) {
            if x >= 0 && y >= 0 && x < w && y < h {
                img.put_pixel(x as u32, y as u32, PIN);
            }
        }
    }
    draw_filled_circle_mut(img, (tip.x, tip.y - size), size / 3, PIN);
}
