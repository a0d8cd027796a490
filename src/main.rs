use anyhow::Result;

mod animation;
mod camera;
mod demo;
mod engine;
mod interaction;
mod math;
mod model;
mod rendering;
mod scene_graph;
mod screen;
mod window;

fn main() -> Result<()> {
    pretty_env_logger::init();

    pollster::block_on(window::run())?;

    Ok(())
}
