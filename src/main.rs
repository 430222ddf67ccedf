mod color;
mod image;
mod options;
mod sprite;
mod template;

use std::process;

use log::LevelFilter;
use structopt::StructOpt;

use crate::options::Options;

fn main() {
    let options = Options::from_args();

    let mut logger = env_logger::Builder::new();
    logger.filter_level(LevelFilter::Warn);

    if options.verbose {
        logger
            .filter_module("css_sprite", LevelFilter::Debug)
            .filter_module("gridpack", LevelFilter::Debug);
    }

    logger.init();

    match sprite::run(options) {
        Ok(_) => {}
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(1);
        }
    }
}
