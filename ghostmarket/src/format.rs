/// Display formatting for dashboard numbers
///
/// Missing or non-numeric values render as an em dash placeholder.

/// Placeholder for missing values
pub const MISSING: &str = "—";

/// Money with 2 decimals for prices of at least 1, 4 decimals below that
pub fn fmt_money(value: Option<f64>) -> String {
    match value {
        Some(n) if !n.is_nan() => {
            if n >= 1.0 {
                format!("{:.2}", n)
            } else {
                format!("{:.4}", n)
            }
        }
        _ => MISSING.to_string(),
    }
}

/// Signed percentage with 2 decimals, e.g. "+1.20%", "-0.50%", "0.00%"
pub fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(n) if !n.is_nan() => {
            // -0.0 would otherwise render as "-0.00%"
            let n = if n == 0.0 { 0.0 } else { n };
            let sign = if n > 0.0 { "+" } else { "" };
            format!("{}{:.2}%", sign, n)
        }
        _ => MISSING.to_string(),
    }
}

/// Shortest round-trip rendering, e.g. 12.0 -> "12", 0.03 -> "0.03"
pub fn fmt_metric(value: Option<f64>) -> String {
    match value {
        Some(n) if !n.is_nan() => n.to_string(),
        _ => MISSING.to_string(),
    }
}

/// Whole-number count, e.g. the signal event count
pub fn fmt_count(value: Option<u64>) -> String {
    value
        .map(|n| n.to_string())
        .unwrap_or_else(|| MISSING.to_string())
}
