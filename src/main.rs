mod app;

use clap::Parser;

use app::Cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    app::run(Cli::parse())
}
