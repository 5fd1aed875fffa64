use std::path::PathBuf;

use crate::constants::DEFAULT_PORT;

/// Get the default CSV path from the environment, if one is configured
pub fn get_default_csv_path() -> Option<PathBuf> {
    std::env::var("STOCKBOARD_DATA_CSV").ok().map(PathBuf::from)
}

/// Get the server port from the environment or fall back to the default
pub fn get_default_port() -> u16 {
    std::env::var("STOCKBOARD_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Format an integer with thousands separators for console output
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }
}
