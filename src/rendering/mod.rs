pub mod instance;
pub mod lights;
pub mod render_model;
pub mod renderer;
pub mod scene_pass;
pub mod texture;
