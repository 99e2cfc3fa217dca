/// `0x1234...abcd`. Anything shorter than head plus tail is returned as is.
pub fn short_wallet(wallet: &str) -> String {
    let chars: Vec<char> = wallet.chars().collect();

    if chars.len() < 10 {
        return wallet.to_string();
    }

    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();

    format!("{head}...{tail}")
}

/// Bar label on the chart, `0x..abcd`.
pub fn chart_label(wallet: &str) -> String {
    let chars: Vec<char> = wallet.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();

    format!("0x..{tail}")
}

pub fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }

    out
}

/// Rounds up to the leading digit's power of ten so the chart axis lands on
/// a round number. An empty chart still gets an axis of 10.
pub fn nice_max(value: u64) -> u64 {
    if value == 0 {
        return 10;
    }

    let mut factor = 1u64;
    while value / factor >= 10 {
        factor *= 10;
    }

    value.div_ceil(factor).saturating_mul(factor)
}

pub fn format_share(share: Option<f64>) -> String {
    match share {
        Some(percent) => format!("{percent:.2}%"),
        None => "-".to_string(),
    }
}
