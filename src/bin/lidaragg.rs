use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use lidaragg::lidaragg::datasource::{JsonlReader, JsonlWriter};
use lidaragg::lidaragg::pipeline::{self, JobConfig};
use lidaragg::lidaragg::window::config::{DEFAULT_FRAME_ID, DEFAULT_WINDOW_DURATION_NS};
use lidaragg::lidaragg::window::WindowConfig;

#[derive(Parser)]
#[command(name = "lidaragg")]
#[command(about = "Re-bin a recorded lidar point stream into fixed-duration point cloud batches")]
#[command(version)]
struct Cli {
    /// Input container path (JSONL)
    input: String,

    /// Output container path (JSONL)
    output: String,

    /// Topic whose point packets are re-binned
    #[arg(long, default_value = "/livox/lidar")]
    source_topic: String,

    /// Topic the aggregated clouds are written under
    #[arg(long, default_value = "/livox/agg")]
    dest_topic: String,

    /// Frame label stamped on every emitted cloud
    #[arg(long, default_value = DEFAULT_FRAME_ID)]
    frame_id: String,

    /// Window duration in seconds
    #[arg(long, default_value_t = DEFAULT_WINDOW_DURATION_NS as f64 * 1e-9)]
    window_secs: f64,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let window_duration_ns = (cli.window_secs * 1e9) as u64;
    let window = match WindowConfig::new(window_duration_ns, &cli.dest_topic, &cli.frame_id) {
        Ok(window) => window,
        Err(e) => {
            error!("invalid configuration: {}", e);
            eprintln!("invalid configuration: {}", e);
            return ExitCode::from(1);
        }
    };

    let source = match JsonlReader::open(&cli.input) {
        Ok(source) => source,
        Err(e) => {
            error!("failed to open input container: {}", e);
            eprintln!("Failed to open input container: {}", e);
            return ExitCode::from(2);
        }
    };

    let sink = match JsonlWriter::create(&cli.output) {
        Ok(sink) => sink,
        Err(e) => {
            error!("failed to open output container: {}", e);
            eprintln!("Failed to open output container: {}", e);
            return ExitCode::from(3);
        }
    };

    let job = JobConfig {
        source_topic: cli.source_topic,
        window,
    };

    info!(
        "re-binning {} -> {} ({} s windows)",
        cli.input, cli.output, cli.window_secs
    );

    let (mut sink, summary) = match pipeline::run(source, sink, &job) {
        Ok(result) => result,
        Err(e) => {
            error!("run failed: {}", e);
            eprintln!("Run failed: {}", e);
            return ExitCode::from(1);
        }
    };

    if let Err(e) = sink.flush() {
        error!("failed to flush output container: {}", e);
        eprintln!("Failed to flush output container: {}", e);
        return ExitCode::from(3);
    }

    let stats = &summary.aggregator;
    println!(
        "Done.\nInput packets: {}  Points: {}  Output clouds: {}",
        stats.packets, stats.points, stats.clouds_emitted
    );
    if stats.time_regressions > 0 {
        println!("Time regressions dropped: {}", stats.time_regressions);
    }
    if summary.raw_passthrough > 0 {
        println!("Pass-through records: {}", summary.raw_passthrough);
    }

    ExitCode::SUCCESS
}
