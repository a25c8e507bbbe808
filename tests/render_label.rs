use std::cell::Cell;

use image::{GrayImage, RgbaImage};
use pin_label::font::FontSource;
use pin_label::sample_map::paint_pin;
use pin_label::{
    AnnotateConfig, LabelRequest, ObstructionScorer, Point, Route, RouteKind, RouteMode,
    RouteScorer, annotate_with, render_label,
};

mod common;
use common::{BUILDING_GRAY, RED, blank, fill, is_reddish};

struct CountingScorer {
    calls: Cell<usize>,
    inner: ObstructionScorer,
}

impl CountingScorer {
    fn new() -> Self {
        Self {
            calls: Cell::new(0),
            inner: ObstructionScorer::default(),
        }
    }
}

impl RouteScorer for CountingScorer {
    fn score(&self, luma: &GrayImage, route: &Route) -> f64 {
        self.calls.set(self.calls.get() + 1);
        self.inner.score(luma, route)
    }
}

struct FixedScores([f64; 3]);

impl RouteScorer for FixedScores {
    fn score(&self, _luma: &GrayImage, route: &Route) -> f64 {
        let idx = RouteKind::ALL
            .iter()
            .position(|&kind| kind == route.kind)
            .unwrap();
        self.0[idx]
    }
}

fn config() -> AnnotateConfig {
    let mut config = AnnotateConfig::default();
    config.label.font_path = None;
    config
}

/// Pin tip at (150, 150) and a building block that only the
/// horizontal-first route avoids when the label sits at (50, 50).
fn blocked_map() -> RgbaImage {
    let mut img = blank(200, 200);
    fill(&mut img, 30, 70, 140, 140, BUILDING_GRAY);
    paint_pin(&mut img, Point::new(150, 150), 20);
    img
}

fn any_reddish_near(img: &RgbaImage, x: i32, y: i32) -> bool {
    (-1..=1).any(|dy| {
        (-1..=1).any(|dx| is_reddish(img.get_pixel((x + dx) as u32, (y + dy) as u32)))
    })
}

#[test]
fn auto_mode_picks_the_clear_bend() {
    let mut img = blocked_map();
    let request = LabelRequest::new(Some(Point::new(50, 50)), "Lot 7", RouteMode::Auto);
    let scorer = CountingScorer::new();
    let out = annotate_with(&mut img, &request, &config(), &scorer);

    assert_eq!(scorer.calls.get(), 3);
    assert_eq!(out.pin, Point::new(150, 150));
    assert_eq!(out.route.kind, RouteKind::HorizontalFirst);
    let kinds: Vec<RouteKind> = out.scores.iter().map(|s| s.route.kind).collect();
    assert_eq!(kinds, RouteKind::ALL.to_vec());
    assert_eq!(out.scores[1].score, 1.0);
    assert!(out.scores[0].score > 1.0);
    assert!(out.scores[2].score > 1.0);
    // vertical leg of the chosen route
    assert!(any_reddish_near(&img, 150, 100));
    // the other candidates were not drawn
    assert_eq!(img.get_pixel(100, 100), &BUILDING_GRAY);
    assert_eq!(img.get_pixel(50, 110), &BUILDING_GRAY);
}

#[test]
fn fixed_modes_skip_the_scorer_and_draw_their_route() {
    let cases = [
        (RouteMode::Straight, RouteKind::Straight, (100, 100)),
        (RouteMode::HorizontalFirst, RouteKind::HorizontalFirst, (150, 100)),
        (RouteMode::VerticalFirst, RouteKind::VerticalFirst, (50, 110)),
    ];
    for (mode, kind, (x, y)) in cases {
        let mut img = blocked_map();
        let request = LabelRequest::new(Some(Point::new(50, 50)), "Lot 7", mode);
        let scorer = CountingScorer::new();
        let out = annotate_with(&mut img, &request, &config(), &scorer);

        assert_eq!(scorer.calls.get(), 0, "{mode}");
        assert!(out.scores.is_empty());
        assert_eq!(out.route, Route::between(kind, out.label_box.center(), out.pin));
        assert!(any_reddish_near(&img, x, y), "{mode} not drawn at ({x}, {y})");
    }
}

#[test]
fn lowest_score_wins_and_ties_keep_evaluation_order() {
    let request = LabelRequest::new(Some(Point::new(40, 40)), "A", RouteMode::Auto);

    let mut img = blank(120, 120);
    let out = annotate_with(&mut img, &request, &config(), &FixedScores([5.0, 3.0, 2.0]));
    assert_eq!(out.route.kind, RouteKind::VerticalFirst);

    let mut img = blank(120, 120);
    let out = annotate_with(&mut img, &request, &config(), &FixedScores([7.0, 7.0, 7.0]));
    assert_eq!(out.route.kind, RouteKind::Straight);

    let mut img = blank(120, 120);
    let out = annotate_with(&mut img, &request, &config(), &FixedScores([9.0, 4.0, 4.0]));
    assert_eq!(out.route.kind, RouteKind::HorizontalFirst);
}

#[test]
fn sentinel_routes_lose_to_any_sampled_route() {
    let request = LabelRequest::new(Some(Point::new(40, 40)), "A", RouteMode::Auto);
    let mut img = blank(120, 120);
    let scores = FixedScores([pin_label::NO_SAMPLES_SCORE, 1000.0, pin_label::NO_SAMPLES_SCORE]);
    let out = annotate_with(&mut img, &request, &config(), &scores);
    assert_eq!(out.route.kind, RouteKind::HorizontalFirst);
}

#[test]
fn end_to_end_straight_label() {
    let mut img = blank(200, 200);
    fill(&mut img, 95, 145, 105, 155, RED);

    let out = render_label(
        &mut img,
        Point::new(50, 50),
        "Site",
        RouteMode::Straight,
        &AnnotateConfig::default(),
    );

    assert_eq!(out.font_source, FontSource::Bundled);
    assert_eq!(out.pin.y, 155);
    assert!((95..=105).contains(&out.pin.x));
    assert_eq!(out.route.kind, RouteKind::Straight);
    assert_eq!(out.route.points, vec![out.label_box.center(), out.pin]);
    assert!((out.label_box.center().x - 50).abs() <= 1);
    assert!((out.label_box.center().y - 50).abs() <= 1);

    // connector between the box and the pin
    let center = out.label_box.center();
    let lx = center.x as f64 + (out.pin.x - center.x) as f64 * 0.7;
    let ly = center.y as f64 + (out.pin.y - center.y) as f64 * 0.7;
    assert!(!out.label_box.contains(Point::new(lx as i32, ly as i32)));
    assert!(any_reddish_near(&img, lx.round() as i32, ly.round() as i32));

    // red border, white fill
    assert_eq!(img.get_pixel(50, out.label_box.top as u32), &RED);
    assert_eq!(
        img.get_pixel(out.label_box.right as u32 - 5, out.label_box.top as u32 + 5),
        &common::WHITE
    );

    // dark text pixels inside the box
    let mut dark = 0;
    for y in out.label_box.top.max(0)..out.label_box.bottom {
        for x in out.label_box.left.max(0)..out.label_box.right {
            let px = img.get_pixel(x as u32, y as u32);
            if px[0] < 100 && px[1] < 100 && px[2] < 100 {
                dark += 1;
            }
        }
    }
    assert!(dark > 20, "only {dark} dark pixels in the label box");
}

fn is_ink(px: &image::Rgba<u8>) -> bool {
    px[0] == px[1] && px[1] == px[2] && px[0] < 255
}

#[test]
fn descender_text_stays_inside_padded_box() {
    let mut config = AnnotateConfig::default();
    config.label.font_path = None;
    let pad = config.label.padding_y as i32;
    let border = config.label.box_line_width as i32;

    for text in ["gyp", "Site"] {
        let mut img = blank(400, 300);
        let target = Point::new(200, 100);
        let out = render_label(&mut img, target, text, RouteMode::Straight, &config);
        let b = out.label_box;

        let mut rows: Option<(i32, i32)> = None;
        let mut outside = 0;
        for (x, y, px) in img.enumerate_pixels() {
            if !is_ink(px) {
                continue;
            }
            let (x, y) = (x as i32, y as i32);
            let inside = (b.left + border..b.right - border).contains(&x)
                && (b.top + border..b.bottom - border).contains(&y);
            if !inside {
                outside += 1;
            }
            rows = Some(match rows {
                Some((lo, hi)) => (lo.min(y), hi.max(y)),
                None => (y, y),
            });
        }

        assert_eq!(outside, 0, "{text}: ink outside {b:?}");
        let (first, last) = rows.expect("text drawn");
        let top_gap = first - b.top;
        let bottom_gap = b.bottom - 1 - last;
        assert!((pad..=pad + 1).contains(&top_gap), "{text}: top gap {top_gap}");
        assert!((pad..=pad + 2).contains(&bottom_gap), "{text}: bottom gap {bottom_gap}");
    }
}

#[test]
fn far_off_target_draws_only_the_visible_connector() {
    let mut config = AnnotateConfig::default();
    config.label.font_path = None;

    for (mode, on_line) in [
        (RouteMode::Auto, (150, 160)),
        (RouteMode::VerticalFirst, (150, 105)),
        (RouteMode::HorizontalFirst, (95, 150)),
    ] {
        let mut img = blank(200, 200);
        fill(&mut img, 95, 95, 105, 105, RED);
        let target = Point::new(i32::MAX, i32::MAX);
        let out = render_label(&mut img, target, "far", mode, &config);

        assert_eq!(out.pin, Point::new(95, 105));
        assert_eq!(out.label_box.right, i32::MAX);
        assert_eq!(out.route.points.last(), Some(&out.pin));
        assert!(
            any_reddish_near(&img, on_line.0, on_line.1),
            "{mode}: no connector near {on_line:?}"
        );
    }
}
