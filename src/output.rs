use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::upload::TransferResult;

const BAR_REFRESH: Duration = Duration::from_millis(10);

/// Byte-counting progress bar sized to the upload, redrawn on a fixed tick.
pub fn upload_bar(total_bytes: u64) -> ProgressBar {
    let bar = ProgressBar::new(total_bytes);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
            .unwrap(),
    );
    bar.enable_steady_tick(BAR_REFRESH);
    bar
}

pub fn print_result(result: &TransferResult) {
    println!();
    println!("Download URL: {}", style(&result.download_url).green().bold());
    if let Some(delete_url) = &result.delete_url {
        println!("---");
        println!("Delete URL: {}", style(delete_url).red());
    }
}

pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {:#}", style("✗").red().bold(), err);
}
