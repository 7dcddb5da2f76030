mod app;
mod catalog;
mod config;
mod input;
mod locator;
mod player;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
