pub mod luma;
pub use luma::{LumaError, luma_plane};
