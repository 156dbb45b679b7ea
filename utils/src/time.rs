//! Time formatting for log lines.

const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

/// Render a voting window length, keeping every non-zero unit so that
/// windows differing by one second never print the same.
///
/// `3601` → `"1h 1s"`, `90_061` → `"1d 1h 1m 1s"`, `0` → `"0s"`.
pub fn format_window(secs: u64) -> String {
    let mut rest = secs;
    let mut parts = Vec::new();
    for (size, unit) in UNITS {
        let count = rest / size;
        rest %= size;
        if count > 0 {
            parts.push(format!("{count}{unit}"));
        }
    }
    if parts.is_empty() {
        return "0s".to_string();
    }
    parts.join(" ")
}
