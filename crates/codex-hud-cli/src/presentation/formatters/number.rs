/// Abbreviate a token count: `1.2M`, `65k`, `512`
pub fn format_tokens(count: f64) -> String {
    if count >= 1_000_000.0 {
        format!("{:.1}M", count / 1_000_000.0)
    } else if count >= 1_000.0 {
        format!("{}k", (count / 1_000.0).round())
    } else {
        format!("{}", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tokens() {
        assert_eq!(format_tokens(0.0), "0");
        assert_eq!(format_tokens(999.0), "999");
        assert_eq!(format_tokens(1_000.0), "1k");
        assert_eq!(format_tokens(64_500.0), "65k");
        assert_eq!(format_tokens(258_000.0), "258k");
        assert_eq!(format_tokens(1_000_000.0), "1.0M");
        assert_eq!(format_tokens(1_240_000.0), "1.2M");
        assert_eq!(format_tokens(12_600_000.0), "12.6M");
    }
}
