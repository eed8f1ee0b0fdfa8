use anyhow::Context;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use structopt::StructOpt;
use tailhash::document::read_document;
use tailhash::report::{render_report, ResultsDir};
use tailhash::{par_search, search};
use tailhash::{Algorithm, Cancellation, HexDigest, Md5Hex, NonceStrategy};
use tailhash::{SearchConfig, SearchError, SearchOutcome, Sha256Hex};

/// Finds the best partial hash collision between two text files
///
/// Appends a nonce to each file's text and searches for a pair of nonces whose digests match in
/// their last n hex characters, trying the largest n first. The report is written to
/// <results-dir>/collision_results.txt. Type 'q' and Enter to cancel a running search.
#[derive(Debug, StructOpt)]
struct Cli {
    /// First base document
    #[structopt(long, parse(from_os_str), default_value = "text_files/text1.txt")]
    text1: PathBuf,
    /// Second base document
    #[structopt(long, parse(from_os_str), default_value = "text_files/text2.txt")]
    text2: PathBuf,
    /// Directory the collision report is written to
    #[structopt(long, parse(from_os_str), default_value = "results")]
    results_dir: PathBuf,
    /// How nonces are appended: "numeric" (decimal suffix) or "newlines"
    #[structopt(short, long, default_value = "numeric")]
    strategy: NonceStrategy,
    /// Digest algorithm: "sha256" or "md5"
    #[structopt(long, default_value = "sha256")]
    algorithm: Algorithm,
    /// Number of trailing hex digits tried first
    #[structopt(long, default_value = "8")]
    max_digits: usize,
    /// Smallest number of trailing hex digits accepted as a collision
    #[structopt(long, default_value = "3")]
    min_digits: usize,
    /// Nonces tried per file for each width [default: 2000000 numeric, 1000000 newlines]
    #[structopt(long)]
    max_iterations: Option<u64>,
    /// Nonces between cancellation checks
    #[structopt(long, default_value = "10000")]
    check_interval: u64,
    /// Run parallel search for collisions
    #[structopt(short, long)]
    parallel: bool,
    /// Worker threads for the parallel search [default: number of CPUs]
    #[structopt(long)]
    threads: Option<usize>,
    /// Log at debug level
    #[structopt(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::from_args();

    let level = if args.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt().with_writer(io::stderr).with_max_level(level).init();

    let mut config = SearchConfig::new(args.strategy)
        .with_digits(args.max_digits, args.min_digits)
        .with_cancel_check_interval(args.check_interval);
    if let Some(max_iterations) = args.max_iterations {
        config = config.with_max_iterations(max_iterations);
    }

    let (results, wiped) = ResultsDir::prepare(&args.results_dir).with_context(|| {
        format!("failed to prepare results directory {}", args.results_dir.display())
    })?;
    if wiped {
        println!("Wiped previous collision results.");
    }

    let base_a = read_document(&args.text1)
        .with_context(|| format!("failed to read {}", args.text1.display()))?;
    let base_b = read_document(&args.text2)
        .with_context(|| format!("failed to read {}", args.text2.display()))?;

    let quit = Arc::new(AtomicBool::new(false));
    spawn_quit_watcher(Arc::clone(&quit));
    println!("*** Type 'q' and press Enter at any time to cancel the search ***");
    let cancel = move || quit.load(Ordering::Relaxed);

    let outcome = match args.algorithm {
        Algorithm::Sha256 => run(&Sha256Hex, &args, &base_a, &base_b, &config, &cancel),
        Algorithm::Md5 => run(&Md5Hex, &args, &base_a, &base_b, &config, &cancel),
    }?;

    match &outcome {
        SearchOutcome::Found(record) => {
            println!("\nCollision found!");
            println!("{}", render_report(record, config.nonce_strategy, &base_a, &base_b));
        }
        SearchOutcome::Exhausted => {
            println!("\nCould not find a collision within the specified search limits.")
        }
        SearchOutcome::Cancelled => println!("\nSearch cancelled by user."),
    }

    let written = results
        .publish(&outcome, config.nonce_strategy, &base_a, &base_b)
        .with_context(|| format!("failed to write {}", results.report_path().display()))?;
    if let Some(path) = written {
        println!("Results saved to {}", path.display());
    }

    Ok(())
}

fn run<D, C>(
    digest: &D,
    args: &Cli,
    base_a: &str,
    base_b: &str,
    config: &SearchConfig,
    cancel: &C,
) -> Result<SearchOutcome, SearchError>
where
    D: HexDigest,
    C: Cancellation + Sync,
{
    match args.parallel {
        true => {
            let threads = args.threads.unwrap_or_else(num_cpus::get);
            par_search::find_collision(digest, base_a, base_b, config, cancel, threads)
        }
        false => search::find_collision(digest, base_a, base_b, config, cancel),
    }
}

/// Sets `quit` once a line reading "q" arrives on stdin
fn spawn_quit_watcher(quit: Arc<AtomicBool>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) if line.trim().eq_ignore_ascii_case("q") => {
                    quit.store(true, Ordering::Relaxed);
                    break;
                }
                Ok(_) => continue,
                Err(_) => break,
            }
        }
    });
}
