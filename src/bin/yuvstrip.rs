use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "yuvstrip", version)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Strip Y4M framing and write the raw planar YUV stream.
    Extract(ExtractArgs),
    /// Print the stream header and frame layout as JSON.
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct ExtractArgs {
    /// Input Y4M file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output raw .yuv file.
    #[arg(long)]
    out: PathBuf,

    /// Overwrite output if it already exists.
    #[arg(long, default_value_t = false)]
    overwrite: bool,

    /// Reject odd width/height instead of truncating the chroma planes.
    #[arg(long, default_value_t = false)]
    strict_dimensions: bool,

    /// Maximum length in bytes of the header line and of each frame marker line.
    #[arg(long, default_value_t = yuvstrip::DEFAULT_MAX_LINE_LEN)]
    max_line_len: usize,

    /// Print a JSON report on stdout instead of a summary on stderr.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Input Y4M file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Maximum length in bytes of the header line.
    #[arg(long, default_value_t = yuvstrip::DEFAULT_MAX_LINE_LEN)]
    max_line_len: usize,
}

#[derive(serde::Serialize, Debug)]
struct Report {
    ok: bool,
    input: PathBuf,
    output: PathBuf,
    frames: yuvstrip::FrameCount,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<yuvstrip::ExtractStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.cmd {
        Command::Extract(args) => cmd_extract(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::WARN,
        (false, 1) => tracing::Level::INFO,
        (false, 2) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_extract(args: ExtractArgs) -> anyhow::Result<()> {
    let opts = yuvstrip::ExtractFileOpts {
        extract: yuvstrip::ExtractOpts {
            odd_dimensions: if args.strict_dimensions {
                yuvstrip::OddDimensionPolicy::Reject
            } else {
                yuvstrip::OddDimensionPolicy::Truncate
            },
            max_line_len: args.max_line_len,
        },
        overwrite: args.overwrite,
    };

    let res = yuvstrip::extract_file(&args.in_path, &args.out, &opts);

    if args.json {
        let report = match &res {
            Ok(stats) => Report {
                ok: true,
                input: args.in_path.clone(),
                output: args.out.clone(),
                frames: stats.frames,
                stats: Some(*stats),
                error_kind: None,
                error: None,
            },
            Err(err) => Report {
                ok: false,
                input: args.in_path.clone(),
                output: args.out.clone(),
                frames: err.frames_completed(),
                stats: None,
                error_kind: Some(err.kind_name()),
                error: Some(err.to_string()),
            },
        };
        let text = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{text}");
    }

    match res {
        Ok(stats) => {
            if !args.json {
                eprintln!(
                    "wrote {} frame(s) ({} bytes, {}x{}) to {}",
                    stats.frames,
                    stats.bytes_written,
                    stats.geometry.width,
                    stats.geometry.height,
                    args.out.display()
                );
                if let Some(tail) = stats.truncated_tail_bytes {
                    eprintln!(
                        "dropped a truncated trailing frame ({tail} of {} bytes)",
                        stats.geometry.frame_size
                    );
                }
            }
            Ok(())
        }
        Err(err) => {
            let frames = err.frames_completed();
            Err(anyhow::Error::new(err).context(format!(
                "extract '{}' stopped after {frames} complete frame(s)",
                args.in_path.display()
            )))
        }
    }
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let probe = yuvstrip::probe_file(&args.in_path, args.max_line_len)
        .with_context(|| format!("probe '{}'", args.in_path.display()))?;
    let text = serde_json::to_string_pretty(&probe).context("serialize probe")?;
    println!("{text}");
    Ok(())
}
