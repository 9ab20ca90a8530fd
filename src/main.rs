use anyhow::Result;
use clap::Parser;
use winit::event_loop::EventLoop;

use frame_scrubber::app::App;
use frame_scrubber::cli::Cli;
use frame_scrubber::config::Config;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);

    log::info!("Frame Scrubber - Controls: F/B play, Space pause, arrows step, Home/End, +/- rate, Escape to quit");
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
