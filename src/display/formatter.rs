use std::fmt::Display;

/// Thousands-separated decimal formatting (e.g. 1234567 -> "1,234,567")
pub fn format_thousands<T: Display>(n: T) -> String {
    let digits = n.to_string();
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits.as_str()),
    };

    let mut out = String::with_capacity(sign.len() + digits.len() + digits.len() / 3);
    out.push_str(sign);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format the `(current/target)` pair shown next to the bar
pub fn format_count_ratio<T: Display>(current: T, target: T) -> String {
    format!("({}/{})", format_thousands(current), format_thousands(target))
}
