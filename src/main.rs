use clap::Parser;
use keyword_scout::keywords::keywords_from_file;
use keyword_scout::{ResultRow, Scan, ScanReport};
use std::error::Error;
use tokio_util::sync::CancellationToken;

mod args;
use args::{Args, OutputFormat};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let mut keywords = Vec::new();
    if let Some(path) = &args.keywords_file {
        keywords.extend(keywords_from_file(path)?);
    }
    keywords.extend(args.keywords.iter().cloned());
    if keywords.is_empty() {
        return Err("no keywords given; use --keyword or --keywords-file".into());
    }

    let mut scan = Scan::new();
    if let Some(path) = &args.config {
        ::log::info!("Loading configuration from file: {}", path.display());
        scan = scan.with_config_file(path)?;
    }

    // Apply command-line overrides
    if let Some(max_links) = args.max_links {
        scan = scan.with_max_links(max_links);
    }
    if let Some(concurrency) = args.concurrency {
        scan = scan.with_max_concurrency(concurrency);
    }
    if let Some(timeout) = args.timeout {
        scan = scan.with_request_timeout(timeout);
    }
    if let Some(total_timeout) = args.total_timeout {
        scan = scan.with_total_timeout(total_timeout);
    }

    // Ctrl-C abandons the whole scan
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ::log::warn!("Interrupted, cancelling scan");
            on_interrupt.cancel();
        }
    });

    let start_time = std::time::Instant::now();
    let report = scan.run_with_cancel(&args.website, &keywords, cancel).await?;
    ::log::info!(
        "Scan complete - checked {} keywords against {} pages in {:.2} seconds",
        report.records.len(),
        report.links.len(),
        start_time.elapsed().as_secs_f64()
    );

    let rendered = render(&report, args.format)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            ::log::info!("Results written to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn render(report: &ScanReport, format: OutputFormat) -> Result<String, serde_json::Error> {
    let rows = report.rows();
    match format {
        OutputFormat::Table => Ok(render_table(&rows)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&rows)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Plain text table with one column per report field
fn render_table(rows: &[ResultRow]) -> String {
    let mut widths = ResultRow::HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.columns()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, ResultRow::HEADERS, &widths);
    push_line(&mut out, widths.map(|_| ""), &widths);
    for row in rows {
        push_line(&mut out, row.columns(), &widths);
    }
    out
}

fn push_line(out: &mut String, cells: [&str; 4], widths: &[usize; 4]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            if cell.is_empty() {
                "-".repeat(*width)
            } else {
                format!("{:<width$}", cell, width = *width)
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
