/*
 * File: /main.rs
 * Created Date: Wednesday, March 11th 2026
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-11		    	Compare cluster directories of two runs
 */

use std::env;
use std::process;

use cluster_overlap::config::{Config, USAGE};
use log::{error, LevelFilter};

fn setup_logger() -> Result<(), log::SetLoggerError> {
    simple_logger::SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
}

fn main() {
    if let Err(e) = setup_logger() {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let configuration = Config::new(env::args()).unwrap_or_else(|e| {
        eprintln!("{}", e);
        eprintln!("{}", USAGE);
        process::exit(1);
    });

    if let Err(e) = cluster_overlap::run(&configuration) {
        error!("Analysis failed: {}", e);
        process::exit(1);
    }
}
