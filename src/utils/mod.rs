//! Utility functions and helpers

pub mod bytes;

#[cfg(test)]
mod tests_property;

use tracing_subscriber::EnvFilter;

/// Initialize logging based on configuration
pub fn init_logging(level: &str, format: &str) {
    let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
    }
}

/// Format a hashing rate for display
pub fn format_hash_rate(rate: f64) -> String {
    if rate >= 1_000_000_000_000.0 {
        format!("{:.2} TH/s", rate / 1_000_000_000_000.0)
    } else if rate >= 1_000_000_000.0 {
        format!("{:.2} GH/s", rate / 1_000_000_000.0)
    } else if rate >= 1_000_000.0 {
        format!("{:.2} MH/s", rate / 1_000_000.0)
    } else if rate >= 1_000.0 {
        format!("{:.2} KH/s", rate / 1_000.0)
    } else {
        format!("{:.0} H/s", rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hash_rate() {
        assert_eq!(format_hash_rate(500.0), "500 H/s");
        assert_eq!(format_hash_rate(1_500.0), "1.50 KH/s");
        assert_eq!(format_hash_rate(2_500_000.0), "2.50 MH/s");
        assert_eq!(format_hash_rate(3_500_000_000.0), "3.50 GH/s");
        assert_eq!(format_hash_rate(4_500_000_000_000.0), "4.50 TH/s");
    }
}
