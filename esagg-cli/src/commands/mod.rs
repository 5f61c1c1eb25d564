pub mod render;
pub mod search;

pub use render::run_render;
pub use search::run_search;
