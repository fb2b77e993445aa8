use clap::{Parser, Subcommand};
use color_eyre::eyre;
use console::style;
use rodinia::fixture::{self, Format};
use rodinia_benchmarks as benchmarks;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate the input graph and expected levels of the bfs benchmark
    Bfs {
        #[arg(long = "vertices", default_value = "4096")]
        num_vertices: usize,
        #[arg(long = "degree", default_value = "4")]
        degree: usize,
        #[arg(long = "source", default_value = "0")]
        source: usize,
        #[arg(long = "costs", help = "also write a uniform edge cost buffer")]
        costs: bool,
        #[arg(long = "format", default_value = "binary")]
        format: Format,
        #[arg(short = 'o', long = "output")]
        output: PathBuf,
    },
    /// Compare levels produced by a kernel run against a bfs fixture
    ValidateBfs {
        #[arg(long = "fixture")]
        fixture: PathBuf,
        #[arg(long = "levels")]
        levels: PathBuf,
        #[arg(long = "format", help = "format of the levels file [default: fixture format]")]
        format: Option<Format>,
        #[arg(long = "max-reported", default_value = "10")]
        max_reported: usize,
    },
    /// Rank the hurricane records closest to a location
    Nn {
        #[arg(long = "records", default_value = "1024")]
        num_records: usize,
        #[arg(short = 'k', long = "neighbors", default_value = "10")]
        k: usize,
        #[arg(long = "lat", default_value = "30.0")]
        lat: f64,
        #[arg(long = "lng", default_value = "90.0")]
        lng: f64,
        #[arg(long = "seed", default_value = "0")]
        seed: u64,
    },
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Options {
    #[clap(subcommand)]
    pub command: Command,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let options = Options::parse();
    let start = Instant::now();

    match options.command {
        Command::Bfs {
            num_vertices,
            degree,
            source,
            costs,
            format,
            output,
        } => {
            let parameters = benchmarks::bfs::Parameters {
                num_vertices,
                degree,
                source,
                costs,
            };
            let fixture = benchmarks::bfs::Fixture::generate(parameters)?;
            let manifest = fixture.write(&output, format)?;
            eprintln!(
                "{} bfs fixture with {} vertices and {} edges ({} buffers) to {}",
                style("wrote").green(),
                fixture.graph.num_vertices(),
                fixture.graph.num_edges(),
                manifest.buffers.len(),
                output.display(),
            );
        }
        Command::ValidateBfs {
            fixture: fixture_dir,
            levels,
            format,
            max_reported,
        } => {
            let expected = benchmarks::bfs::Fixture::load(&fixture_dir)?;
            let format = match format {
                Some(format) => format,
                None => fixture::Manifest::<benchmarks::bfs::Metadata>::read(&fixture_dir)?.format,
            };
            let have = fixture::read_file(&levels, format)?;
            let report = benchmarks::bfs::validate(&have, &expected.levels, max_reported)?;
            if !report.is_ok() {
                eprintln!("{} {report}", style("FAILED").red().bold());
                return Err(eyre::eyre!(
                    "{} does not match {}",
                    levels.display(),
                    fixture_dir.display()
                ));
            }
            eprintln!("{} {report}", style("PASSED").green().bold());
        }
        Command::Nn {
            num_records,
            k,
            lat,
            lng,
            seed,
        } => {
            let records = benchmarks::nn::generate_records(num_records, seed);
            let ranked = benchmarks::nn::nearest(&records, k, lat, lng)?;
            for (rank, neighbor) in ranked.iter().enumerate() {
                println!(
                    "{:>3} {:<16} {}",
                    rank + 1,
                    neighbor.name,
                    style(format!("{:.4}", neighbor.distance)).cyan()
                );
            }
        }
    }

    log::info!("completed in {:?}", start.elapsed());
    Ok(())
}
