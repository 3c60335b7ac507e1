const SUFFIXES: [&str; 3] = ["k", "M", "B"];

/// Compact human-readable count: `999`, `1.5k`, `2M`, `3.4B`.
pub fn format_large_number(n: u64) -> String {
    if n < 1_000 {
        return n.to_string();
    }

    let mut value = n as f64;
    for (i, suffix) in SUFFIXES.iter().enumerate() {
        value /= 1_000.0;
        let rounded = (value * 10.0).round() / 10.0;
        // 999_960 rounds to "1000k"; promote it to the next unit instead
        if rounded < 1_000.0 || i == SUFFIXES.len() - 1 {
            let text = format!("{:.1}", rounded);
            let text = text.strip_suffix(".0").unwrap_or(&text);
            return format!("{}{}", text, suffix);
        }
    }

    n.to_string()
}
