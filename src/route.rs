//! Connector routes between a label and the marker tip, and how obstructed
//! each one is.
//!
//! A route is scored by sampling the luma plane along its segments. Samples
//! in the light-gray band that map renderers use for building footprints cost
//! a large penalty, everything else costs one, and the score is the mean cost
//! per sample.

use std::fmt;

use image::{GrayImage, RgbaImage};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, clip_segment};
use crate::kornia::luma_plane;

/// Score of a route that produced no in-bounds samples.
pub const NO_SAMPLES_SCORE: f64 = 9_999_999.0;

const BUILDING_BAND_MIN: u8 = 215;
const BUILDING_BAND_MAX: u8 = 250;
const BUILDING_PENALTY: f64 = 1000.0;
const CLEAR_COST: f64 = 1.0;

/// Shape of a connector route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RouteKind {
    /// Direct line.
    Straight,
    /// Horizontal leg first, then vertical.
    HorizontalFirst,
    /// Vertical leg first, then horizontal.
    VerticalFirst,
}

impl RouteKind {
    /// Candidates in evaluation order; earlier kinds win score ties.
    pub const ALL: [RouteKind; 3] = [
        RouteKind::Straight,
        RouteKind::HorizontalFirst,
        RouteKind::VerticalFirst,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RouteKind::Straight => "straight",
            RouteKind::HorizontalFirst => "horizontal-first",
            RouteKind::VerticalFirst => "vertical-first",
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the renderer picks a route.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum RouteMode {
    /// Score every candidate and take the clearest.
    #[default]
    Auto,
    Straight,
    HorizontalFirst,
    VerticalFirst,
}

impl RouteMode {
    /// The route kind a fixed mode forces, `None` for `Auto`.
    pub fn fixed_kind(self) -> Option<RouteKind> {
        match self {
            RouteMode::Auto => None,
            RouteMode::Straight => Some(RouteKind::Straight),
            RouteMode::HorizontalFirst => Some(RouteKind::HorizontalFirst),
            RouteMode::VerticalFirst => Some(RouteKind::VerticalFirst),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self.fixed_kind() {
            Some(kind) => kind.as_str(),
            None => "auto",
        }
    }
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Polyline of at least two points. Consecutive points may coincide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub kind: RouteKind,
    pub points: Vec<Point>,
}

impl Route {
    /// Route of the given shape from `from` to `to`.
    pub fn between(kind: RouteKind, from: Point, to: Point) -> Self {
        let points = match kind {
            RouteKind::Straight => vec![from, to],
            RouteKind::HorizontalFirst => vec![from, Point::new(to.x, from.y), to],
            RouteKind::VerticalFirst => vec![from, Point::new(from.x, to.y), to],
        };
        Self { kind, points }
    }

    /// The three candidate routes, in [`RouteKind::ALL`] order.
    pub fn candidates(from: Point, to: Point) -> Vec<Route> {
        RouteKind::ALL
            .iter()
            .map(|&kind| Route::between(kind, from, to))
            .collect()
    }

    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }
}

/// Tuning for the building-band heuristic.
///
/// Luma values strictly between `band_min` and `band_max` are treated as
/// building fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstructionConfig {
    pub band_min: u8,
    pub band_max: u8,
    pub penalty: f64,
    pub clear_cost: f64,
    pub no_samples_score: f64,
}

impl Default for ObstructionConfig {
    fn default() -> Self {
        Self {
            band_min: BUILDING_BAND_MIN,
            band_max: BUILDING_BAND_MAX,
            penalty: BUILDING_PENALTY,
            clear_cost: CLEAR_COST,
            no_samples_score: NO_SAMPLES_SCORE,
        }
    }
}

impl ObstructionConfig {
    pub fn is_building(&self, luma: u8) -> bool {
        luma > self.band_min && luma < self.band_max
    }

    pub fn sample_cost(&self, luma: u8) -> f64 {
        if self.is_building(luma) {
            self.penalty
        } else {
            self.clear_cost
        }
    }
}

/// Scores a route against a luma plane; lower is clearer.
pub trait RouteScorer {
    fn score(&self, luma: &GrayImage, route: &Route) -> f64;
}

/// Default scorer: mean building-band cost along the route.
#[derive(Debug, Clone, Default)]
pub struct ObstructionScorer {
    pub config: ObstructionConfig,
}

impl ObstructionScorer {
    pub fn new(config: ObstructionConfig) -> Self {
        Self { config }
    }
}

impl RouteScorer for ObstructionScorer {
    fn score(&self, luma: &GrayImage, route: &Route) -> f64 {
        score_route_luma(luma, route, &self.config)
    }
}

/// Obstruction score of `route` over an RGBA image.
pub fn score_route(image: &RgbaImage, route: &Route, config: &ObstructionConfig) -> f64 {
    let luma = luma_plane(image);
    score_route_luma(&luma, route, config)
}

/// Obstruction score of `route` over a precomputed luma plane.
///
/// Each segment of rounded length `n` contributes `n` samples spread evenly
/// over both endpoints. Zero-length segments and samples outside the image
/// contribute nothing.
pub fn score_route_luma(luma: &GrayImage, route: &Route, config: &ObstructionConfig) -> f64 {
    let (width, height) = luma.dimensions();
    let far_corner = (width as f64, height as f64);
    let mut total = 0f64;
    let mut samples = 0usize;

    for (start, end) in route.segments() {
        let steps = start.distance(end).round() as usize;
        if steps == 0 {
            continue;
        }
        // Only the stretch near the image can land on it; a one-pixel margin
        // covers rounding.
        let Some((t0, t1)) = clip_segment(start, end, (-1.0, -1.0), far_corner) else {
            continue;
        };
        let last = (steps - 1) as f64;
        let first_i = (t0 * last).floor() as usize;
        let last_i = ((t1 * last).ceil() as usize).min(steps - 1);
        for i in first_i..=last_i {
            let t = if steps > 1 {
                i as f64 / (steps - 1) as f64
            } else {
                0.0
            };
            let (x, y) = start.lerp_rounded(end, t);
            if x < 0.0 || y < 0.0 || x >= width as f64 || y >= height as f64 {
                continue;
            }
            total += config.sample_cost(luma.get_pixel(x as u32, y as u32)[0]);
            samples += 1;
        }
    }

    if samples == 0 {
        return config.no_samples_score;
    }
    total / samples as f64
}

/// A candidate route with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRoute {
    pub route: Route,
    pub score: f64,
}

/// Scores every candidate, preserving their order.
pub fn rank_routes<S>(luma: &GrayImage, candidates: Vec<Route>, scorer: &S) -> Vec<ScoredRoute>
where
    S: RouteScorer + ?Sized,
{
    candidates
        .into_iter()
        .map(|route| {
            let score = scorer.score(luma, &route);
            debug!("route {} scored {score:.3}", route.kind);
            ScoredRoute { route, score }
        })
        .collect()
}

/// The candidate with the strictly smallest score; the earliest one on ties.
pub fn clearest(scored: &[ScoredRoute]) -> Option<&ScoredRoute> {
    let mut best: Option<&ScoredRoute> = None;
    for candidate in scored {
        match best {
            Some(current) if candidate.score >= current.score => {}
            _ => best = Some(candidate),
        }
    }
    best
}
