use jiff::Zoned;

/// Render a model confidence in [0, 1] as a percentage with two decimals,
/// e.g. 0.8734 -> "87.34%".
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.2}%", confidence * 100.0)
}

/// Short clock stamp for when a result arrived.
pub fn format_received_at(at: &Zoned) -> String {
    at.strftime("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(0.8734), "87.34%");
        assert_eq!(format_confidence(1.0), "100.00%");
        assert_eq!(format_confidence(0.0), "0.00%");
        assert_eq!(format_confidence(0.5), "50.00%");
    }

    #[test]
    fn test_format_received_at_is_a_clock_stamp() {
        let stamp = format_received_at(&Zoned::now());
        assert_eq!(stamp.len(), 8);
        assert_eq!(stamp.matches(':').count(), 2);
    }
}
