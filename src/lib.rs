//! Labels map screenshots: finds the red pin, picks the connector route least
//! likely to cross building footprints, and draws a boxed label joined to the
//! pin tip.

pub mod config;
pub mod error;
pub mod font;
pub mod geometry;
pub mod io;
pub mod kornia;
pub mod label;
pub mod marker;
pub mod route;
pub mod sample_map;

pub use config::AnnotateConfig;
pub use error::Error;
pub use geometry::{LabelBox, Point};
pub use label::{Annotation, LabelConfig, LabelRequest, annotate, annotate_with, render_label};
pub use marker::{MarkerConfig, locate_marker};
pub use route::{
    NO_SAMPLES_SCORE, ObstructionConfig, ObstructionScorer, Route, RouteKind, RouteMode,
    RouteScorer, ScoredRoute, score_route,
};
