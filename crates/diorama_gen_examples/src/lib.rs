#![forbid(unsafe_code)]

mod demo_scene;
mod rendering;

pub use demo_scene::demo_scene;
pub use rendering::{
    init_tracing, render_diorama, render_diorama_to_png, render_points_to_png, AssetStyle,
    RenderConfig,
};
