use crate::opts::Command;
use crate::prelude::*;

mod analyze;
mod dataset;
mod describe;
mod helpers;
mod inspector;
mod labels;
mod opts;
mod prelude;
mod report;
mod sparse;
mod trainer;

fn main() -> Result {
    let opts = opts::parse();
    helpers::tracing::init()?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting up…");

    match opts.subcommand {
        Command::Analyze(opts) => analyze::run(opts),
        Command::Describe(opts) => describe::run(opts),
    }
}
