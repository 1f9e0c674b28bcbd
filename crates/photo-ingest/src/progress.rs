//! Progress bar for transfer runs

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const TRANSFER_TEMPLATE: &str =
    "{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})";

/// Bar counting settled records out of `total`
pub fn create_transfer_progress(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(TRANSFER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Visible bar when `show` is set, otherwise a hidden one that still counts
pub fn transfer_progress(total: u64, show: bool) -> ProgressBar {
    if show {
        create_transfer_progress(total, "Downloading images")
    } else {
        ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::hidden())
    }
}
