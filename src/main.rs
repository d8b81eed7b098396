use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use clap::Parser;
use log::info;

use freightflow::{Problem, Report};

/// Solve capacitated transportation scenarios and report the sensitivity analysis.
#[derive(Parser)]
#[clap(author, version, about)]
struct Args {
    /// Scenario data files (json)
    #[clap(parse(from_os_str), required = true)]
    scenarios: Vec<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    for path in &args.scenarios {
        info!("solving scenario {}", path.display());
        match run(path) {
            Ok(report) => println!("{}", report),
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }
}

fn run(path: &Path) -> Result<Report, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let problem: Problem = serde_json::from_reader(BufReader::new(file))?;

    Ok(freightflow::solve(&problem)?)
}
