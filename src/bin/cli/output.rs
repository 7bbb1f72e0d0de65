//! Status lines printed after a session.

use std::path::Path;

use arcpick::WriteSummary;
use console::style;

/// Printed when the archive has been renamed into place.
pub fn print_closed(summary: &WriteSummary) {
    println!("{} total bytes", summary.bytes_written);
    println!("Archive finalized and output file closed.");
}

/// Printed when the compressor has flushed its last bytes.
pub fn print_drained() {
    println!("Data has been drained");
}

/// Prints the closing report of a written archive.
pub fn print_summary(destination: &Path, summary: &WriteSummary) {
    println!(
        "{} {} ({} files, {} directories, {})",
        style("Wrote").green().bold(),
        destination.display(),
        summary.entries_written,
        summary.directories_written,
        humanize_bytes(summary.bytes_written)
    );
    if !summary.is_clean() {
        eprintln!(
            "{} {} item(s) skipped:",
            style("Warning:").yellow().bold(),
            summary.warnings.len()
        );
        for warning in &summary.warnings {
            eprintln!("  {}", warning);
        }
    }
}

/// Formats bytes as human-readable string
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize_bytes() {
        assert_eq!(humanize_bytes(0), "0 B");
        assert_eq!(humanize_bytes(1023), "1023 B");
        assert_eq!(humanize_bytes(1536), "1.5 KB");
        assert_eq!(humanize_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
