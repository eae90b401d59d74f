use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for a batch of `total` files.
///
/// The bar is drawn on stderr.
pub fn create_bar(total: usize, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Advance the bar by one file and show its name.
pub fn step(pb: &ProgressBar, file: &str) {
    pb.set_message(file.to_string());
    pb.inc(1);
}

/// Remove the bar so per-file output that follows is not interleaved.
pub fn finish(pb: &ProgressBar) {
    pb.finish_and_clear();
}
