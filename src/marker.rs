//! Finds the tip of a red map pin in a screenshot.
//!
//! Pixels are classified in HSV space against two red hue bands (red wraps
//! around 0°), grouped into 8-connected regions, and the bottom-most pixel of
//! the largest region is taken as the point of a downward-pointing pin.

use std::collections::VecDeque;

use image::{Rgba, RgbaImage};
use log::{debug, warn};
use palette::{Hsv, IntoColor, Srgb};
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

// H <= 10 and H >= 170 on the 8-bit 0-180 scale, where H = round(deg / 2),
// so the degree bands are [0, 21) and [339, 360). Likewise S >= 70 with
// S = round(255 * s).
const LOW_HUE_END: f32 = 21.0;
const HIGH_HUE_START: f32 = 339.0;
const MIN_SATURATION: f32 = 69.5 / 255.0;
const MIN_VALUE: f32 = 50.0 / 255.0;

/// Color thresholds for marker pixels.
///
/// Hues are in degrees, saturation and value in `0.0..=1.0`. A pixel is a
/// marker pixel when its hue is below `low_hue_end` or at least
/// `high_hue_start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub low_hue_end: f32,
    pub high_hue_start: f32,
    pub min_saturation: f32,
    pub min_value: f32,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            low_hue_end: LOW_HUE_END,
            high_hue_start: HIGH_HUE_START,
            min_saturation: MIN_SATURATION,
            min_value: MIN_VALUE,
        }
    }
}

impl MarkerConfig {
    /// Whether a pixel falls inside either red band. Alpha is ignored.
    pub fn matches(&self, px: &Rgba<u8>) -> bool {
        let hsv: Hsv = Srgb::new(px[0], px[1], px[2])
            .into_format::<f32>()
            .into_color();
        if hsv.saturation < self.min_saturation || hsv.value < self.min_value {
            return false;
        }
        let hue = hsv.hue.into_positive_degrees();
        hue < self.low_hue_end || hue >= self.high_hue_start
    }
}

/// A connected group of marker pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerRegion {
    pub area: usize,
    /// Bottom-most pixel; the left-most one when several share that row.
    pub tip: Point,
}

/// Binary mask (255 = marker color, 0 = background) in row-major order.
pub fn marker_mask(image: &RgbaImage, config: &MarkerConfig) -> Vec<u8> {
    image
        .pixels()
        .map(|px| if config.matches(px) { 255 } else { 0 })
        .collect()
}

/// Splits a mask into 8-connected regions, in row-major order of their first pixel.
pub fn marker_regions(mask: &[u8], width: usize, height: usize) -> Vec<MarkerRegion> {
    let mut visited = vec![false; mask.len()];
    let mut regions = Vec::new();

    for start in 0..mask.len() {
        if mask[start] == 0 || visited[start] {
            continue;
        }

        let mut queue = VecDeque::new();
        queue.push_back(start);
        visited[start] = true;

        let mut area = 0usize;
        let mut tip = Point::new((start % width) as i32, (start / width) as i32);

        while let Some(idx) = queue.pop_front() {
            let x = idx % width;
            let y = idx / width;
            area += 1;

            let (xi, yi) = (x as i32, y as i32);
            if yi > tip.y || (yi == tip.y && xi < tip.x) {
                tip = Point::new(xi, yi);
            }

            for dy in -1isize..=1 {
                for dx in -1isize..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = x as isize + dx;
                    let ny = y as isize + dy;
                    if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                        continue;
                    }
                    let next = ny as usize * width + nx as usize;
                    if mask[next] == 0 || visited[next] {
                        continue;
                    }
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }

        regions.push(MarkerRegion { area, tip });
    }

    regions
}

/// Largest marker region, or `None` if the image has no marker-colored pixels.
pub fn find_marker(image: &RgbaImage, config: &MarkerConfig) -> Option<MarkerRegion> {
    let (width, height) = image.dimensions();
    let mask = marker_mask(image, config);
    let regions = marker_regions(&mask, width as usize, height as usize);
    debug!("marker candidates: {} region(s)", regions.len());

    let mut largest: Option<MarkerRegion> = None;
    for region in regions {
        match largest {
            Some(best) if best.area >= region.area => {}
            _ => largest = Some(region),
        }
    }
    largest
}

/// Tip of the marker pin, falling back to the image center when no marker is visible.
pub fn locate_marker(image: &RgbaImage, config: &MarkerConfig) -> Point {
    match find_marker(image, config) {
        Some(region) => {
            debug!("marker area {} px, tip at {}", region.area, region.tip);
            region.tip
        }
        None => {
            let center = Point::new((image.width() / 2) as i32, (image.height() / 2) as i32);
            warn!("no marker found, using image center {center}");
            center
        }
    }
}
