//! Small pure helper functions used by the app layer.
//! - no state mutation

/// 83_000 ms -> "01:23". Minutes keep growing past 59.
pub fn format_time(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
