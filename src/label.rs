//! Draws a boxed text label on a map and connects it to the marker tip.

use std::path::PathBuf;

use ab_glyph::PxScale;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut,
};
use imageproc::rect::Rect;
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::AnnotateConfig;
use crate::font::{FontSource, LabelFont};
use crate::geometry::{LabelBox, Point, clip_segment};
use crate::kornia::luma_plane;
use crate::marker::locate_marker;
use crate::route::{
    ObstructionScorer, Route, RouteKind, RouteMode, RouteScorer, ScoredRoute, clearest,
    rank_routes,
};

const FONT_FILE: &str = "ipaexg.ttf";
const FONT_SIZE: f32 = 40.0;
const PADDING_X: u32 = 15;
const PADDING_Y: u32 = 10;
const PLACEMENT_OFFSET: [i32; 2] = [250, 250];
const BLACK: [u8; 4] = [0, 0, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];
const RED: [u8; 4] = [255, 0, 0, 255];

/// Appearance of the label box and connector line.
///
/// Colors are RGBA arrays so they read naturally in JSON config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Font tried before the bundled one.
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    pub padding_x: u32,
    pub padding_y: u32,
    pub text_color: [u8; 4],
    pub box_fill: [u8; 4],
    pub box_color: [u8; 4],
    pub box_line_width: u32,
    pub line_color: [u8; 4],
    pub line_width: u32,
    /// Distance from the pin, up and to the left, of the box's top-left
    /// corner when no target is given.
    pub placement_offset: [i32; 2],
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            font_path: Some(PathBuf::from(FONT_FILE)),
            font_size: FONT_SIZE,
            padding_x: PADDING_X,
            padding_y: PADDING_Y,
            text_color: BLACK,
            box_fill: WHITE,
            box_color: RED,
            box_line_width: 2,
            line_color: RED,
            line_width: 2,
            placement_offset: PLACEMENT_OFFSET,
        }
    }
}

/// One annotation request, as handed over by the surrounding application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRequest {
    /// Label center. `None` places the label up-left of the pin.
    pub target: Option<Point>,
    pub text: String,
    #[serde(default)]
    pub mode: RouteMode,
}

impl LabelRequest {
    pub fn new(target: Option<Point>, text: impl Into<String>, mode: RouteMode) -> Self {
        Self {
            target,
            text: text.into(),
            mode,
        }
    }
}

/// What was drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub pin: Point,
    pub label_box: LabelBox,
    pub route: Route,
    /// Every candidate with its score in auto mode; empty in fixed modes.
    pub scores: Vec<ScoredRoute>,
    pub font_source: FontSource,
}

/// Labels `image` at `target` and connects the label to the marker tip.
pub fn render_label(
    image: &mut RgbaImage,
    target: Point,
    text: &str,
    mode: RouteMode,
    config: &AnnotateConfig,
) -> Annotation {
    annotate(image, &LabelRequest::new(Some(target), text, mode), config)
}

/// Handles a [`LabelRequest`] with the default obstruction scorer.
pub fn annotate(
    image: &mut RgbaImage,
    request: &LabelRequest,
    config: &AnnotateConfig,
) -> Annotation {
    let scorer = ObstructionScorer::new(config.obstruction.clone());
    annotate_with(image, request, config, &scorer)
}

/// Handles a [`LabelRequest`], scoring auto-mode candidates with `scorer`.
///
/// Fixed modes never call the scorer.
pub fn annotate_with<S>(
    image: &mut RgbaImage,
    request: &LabelRequest,
    config: &AnnotateConfig,
    scorer: &S,
) -> Annotation
where
    S: RouteScorer + ?Sized,
{
    let style = &config.label;
    let pin = locate_marker(image, &config.marker);

    let font = LabelFont::load(style.font_path.as_deref());
    let extent = font.measure(&request.text, style.font_size);
    let box_w = (extent.width + style.padding_x * 2).max(1);
    let box_h = (extent.height + style.padding_y * 2).max(1);

    let target = request.target.unwrap_or_else(|| {
        let [dx, dy] = style.placement_offset;
        pin.offset(
            ((box_w / 2) as i32).saturating_sub(dx),
            ((box_h / 2) as i32).saturating_sub(dy),
        )
    });
    let label_box = LabelBox::centered_on(target, box_w, box_h);
    let center = label_box.center();

    let (route, scores) = match request.mode.fixed_kind() {
        Some(kind) => (Route::between(kind, center, pin), Vec::new()),
        None => {
            let luma = luma_plane(image);
            let scores = rank_routes(&luma, Route::candidates(center, pin), scorer);
            let route = match clearest(&scores) {
                Some(best) => best.route.clone(),
                None => Route::between(RouteKind::Straight, center, pin),
            };
            (route, scores)
        }
    };
    info!(
        "label {:?} at {target}, pin {pin}, {} route ({} mode)",
        request.text, route.kind, request.mode
    );

    draw_route(image, &route, Rgba(style.line_color), style.line_width);
    if label_box.overlaps_canvas(image.width(), image.height()) {
        draw_label_box(image, &label_box, style);
        draw_text_mut(
            image,
            Rgba(style.text_color),
            label_box.left.saturating_add(style.padding_x as i32),
            label_box
                .top
                .saturating_add(style.padding_y as i32)
                .saturating_sub(extent.top),
            PxScale::from(style.font_size),
            font.font(),
            &request.text,
        );
    }

    Annotation {
        pin,
        label_box,
        route,
        scores,
        font_source: font.source(),
    }
}

fn draw_route(canvas: &mut RgbaImage, route: &Route, color: Rgba<u8>, width: u32) {
    let width = width.max(1);
    let margin = f64::from(width);
    let min = (-margin, -margin);
    let max = (
        f64::from(canvas.width()) + margin,
        f64::from(canvas.height()) + margin,
    );
    for (start, end) in route.segments() {
        // Segments reaching far off the canvas are cut to the part that can show.
        let Some((t0, t1)) = clip_segment(start, end, min, max) else {
            continue;
        };
        draw_thick_segment(canvas, start.lerp(end, t0), start.lerp(end, t1), color, width);
    }
}

// Square brush of side `width`, so joints between legs have no gaps.
fn draw_thick_segment(
    canvas: &mut RgbaImage,
    start: (f64, f64),
    end: (f64, f64),
    color: Rgba<u8>,
    width: u32,
) {
    let width = width.max(1) as i32;
    let lo = -(width - 1) / 2;
    let hi = width / 2;
    for dy in lo..=hi {
        for dx in lo..=hi {
            let (dx, dy) = (f64::from(dx), f64::from(dy));
            draw_line_segment_mut(
                canvas,
                ((start.0 + dx) as f32, (start.1 + dy) as f32),
                ((end.0 + dx) as f32, (end.1 + dy) as f32),
                color,
            );
        }
    }
}

// Fill first, then the outline inset ring by ring.
fn draw_label_box(canvas: &mut RgbaImage, label_box: &LabelBox, style: &LabelConfig) {
    let (w, h) = (label_box.width(), label_box.height());
    if w == 0 || h == 0 {
        return;
    }
    draw_filled_rect_mut(
        canvas,
        Rect::at(label_box.left, label_box.top).of_size(w, h),
        Rgba(style.box_fill),
    );
    for inset in 0..style.box_line_width {
        if w <= inset * 2 || h <= inset * 2 {
            break;
        }
        draw_hollow_rect_mut(
            canvas,
            Rect::at(label_box.left + inset as i32, label_box.top + inset as i32)
                .of_size(w - inset * 2, h - inset * 2),
            Rgba(style.box_color),
        );
    }
}
