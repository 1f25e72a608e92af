use pbar::{Bar, BarConfig, count_lines};
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

type DemoResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

fn main() {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    rt.block_on(async_main());
}

async fn async_main() {
    let args: Vec<String> = env::args().collect();

    // Parse command line arguments: [FILE] [INTERVAL_MS]
    let file = args.get(1).cloned();
    let interval = args
        .get(2)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(500); // Default 500 milliseconds

    let label = env::var("PBAR_LABEL").ok();

    if let Err(e) = run(file, interval, label).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Run the demo work on a blocking thread; Ctrl+C finishes the active bar early
async fn run(file: Option<String>, interval: u64, label: Option<String>) -> DemoResult<()> {
    println!(
        "pbar demo | Refresh: {}ms | Time: {}",
        interval,
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!();

    let cancel = Arc::new(AtomicBool::new(false));
    let worker_cancel = cancel.clone();
    let mut worker = tokio::task::spawn_blocking(move || match file {
        Some(path) => process_file(&path, interval, label, &worker_cancel),
        None => simulate(interval, label, &worker_cancel),
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            cancel.store(true, Ordering::Relaxed);
            worker.await??;
            println!("\nStopped.");
        }
        result = &mut worker => {
            result??;
            println!();
        }
    }

    Ok(())
}

fn config(interval: u64, label: String) -> BarConfig {
    BarConfig::default()
        .label(label)
        .refresh_interval_ms(interval)
        .bar_length(25)
}

/// Read a file line by line, tracking the lines seen against its line count
fn process_file(
    path: &str,
    interval: u64,
    label: Option<String>,
    cancel: &AtomicBool,
) -> DemoResult<()> {
    let total = count_lines(path)?;
    let label = label.unwrap_or_else(|| format!("{}: ", path));
    let bar = Bar::new(total, config(interval, label));

    bar.start();
    let reader = BufReader::new(File::open(path)?);
    for (seen, line) in reader.lines().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        line?;
        bar.update((seen + 1).min(total));
    }
    bar.finish();

    Ok(())
}

/// Two bars, one after the other, over simulated work
fn simulate(interval: u64, label: Option<String>, cancel: &AtomicBool) -> DemoResult<()> {
    for (n, target) in [8_000u64, 5_000].into_iter().enumerate() {
        let label = label
            .clone()
            .unwrap_or_else(|| format!("File {}: ", n + 1));
        let bar = Bar::new(
            target,
            config(interval, label)
                .left('⁅')
                .right('⁆')
                .uncompleted('▭')
                .completed('▬'),
        );

        bar.start();
        for i in 0..=target {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            bar.update(i);
            std::thread::sleep(Duration::from_micros(500));
        }
        bar.finish();
        println!();

        if cancel.load(Ordering::Relaxed) {
            break;
        }
    }

    Ok(())
}
