const UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// Render a byte count with decimal units, three significant digits,
/// trailing zeros trimmed ("1.2 kB", "123 kB", "999 B").
pub fn pretty_bytes(bytes: u64) -> String {
    if bytes < 1000 {
        return format!("{bytes} B");
    }
    let exponent = (((bytes as f64).log10() / 3.0).floor() as usize).min(UNITS.len() - 1);
    let value = bytes as f64 / 1000f64.powi(exponent as i32);
    format!("{} {}", trim_precision(value), UNITS[exponent])
}

/// Render a size delta with an explicit sign. Zero keeps the sign column
/// blank so renamed rows line up with signed ones.
pub fn pretty_bytes_signed(delta: i64) -> String {
    if delta == 0 {
        return " 0 B".to_string();
    }
    let magnitude = pretty_bytes(delta.unsigned_abs());
    if delta > 0 {
        format!("+{magnitude}")
    } else {
        format!("-{magnitude}")
    }
}

fn trim_precision(value: f64) -> String {
    let precision = if value >= 100.0 {
        0
    } else if value >= 10.0 {
        1
    } else {
        2
    };
    let formatted = format!("{value:.precision$}");
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}
