use serde_json::Value;

/// Parses a loosely typed scalar into an f64.
///
/// Snapshot producers are inconsistent about types, so strings are
/// trimmed and may carry one trailing `%` (stripped without
/// rescaling). Anything unparseable is `None`.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            let text = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
            if text.is_empty() {
                return None;
            }
            text.parse::<f64>().ok().filter(|n| !n.is_nan())
        }
        _ => None,
    }
}

/// Fixed-decimal rendering; exact halves round away from zero rather
/// than to even.
fn to_fixed(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    format!("{rounded:.decimals$}")
}

/// Fixed two-decimal rendering, `-` when unparseable.
pub fn format_number(value: &Value) -> String {
    match parse_number(value) {
        Some(num) => to_fixed(num, 2),
        None => "-".to_string(),
    }
}

/// Percent rendering with two decimals.
///
/// Values at or below 1 are treated as ratios and scaled by 100;
/// anything above 1 is assumed to already be a percentage.
pub fn format_percent(value: &Value) -> String {
    match parse_number(value) {
        Some(num) => {
            let percent = if num <= 1.0 { num * 100.0 } else { num };
            format!("{}%", to_fixed(percent, 2))
        }
        None => "-".to_string(),
    }
}

/// Percent rendering rounded to a whole number, for signal probabilities.
pub fn format_probability(value: &Value) -> String {
    match parse_number(value) {
        Some(num) => {
            let percent = if num <= 1.0 { num * 100.0 } else { num };
            format!("{}%", to_fixed(percent, 0))
        }
        None => "-".to_string(),
    }
}

/// Share counts: whole numbers without decimals, fractional with two.
pub fn format_shares(value: &Value) -> String {
    match parse_number(value) {
        Some(num) if num.is_finite() && num.fract() == 0.0 => format!("{num}"),
        Some(num) => to_fixed(num, 2),
        None => "-".to_string(),
    }
}

/// True when the scalar would render as nothing: null, false, zero,
/// the empty string, or a non-scalar.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => true,
    }
}

/// Literal text of a scalar, or `fallback` when it is blank.
pub fn text_or(value: &Value, fallback: &str) -> String {
    if is_blank(value) {
        return fallback.to_string();
    }
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        _ => fallback.to_string(),
    }
}

/// Literal text with a `-` placeholder for blanks.
pub fn display_text(value: &Value) -> String {
    text_or(value, "-")
}

/// Like [`display_text`] but only null and non-scalars become `-`;
/// zero, false, and the empty string render literally.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        _ => "-".to_string(),
    }
}

fn number_text(n: &serde_json::Number) -> String {
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    match n.as_f64() {
        Some(v) if v.is_finite() && v.fract() == 0.0 => format!("{v:.0}"),
        _ => n.to_string(),
    }
}

/// Styling category for a trade direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionTag {
    Buy,
    Sell,
    Hold,
    None,
}

/// A trade direction normalized for display.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionInfo {
    pub label: String,
    pub tag: ActionTag,
}

/// Maps `buy`/`sell`/`hold` and their Chinese spellings onto the
/// canonical labels. Unknown values pass through literally, untagged.
pub fn map_action(value: &Value) -> ActionInfo {
    let normalized = scalar_text(value).trim().to_lowercase();
    let (label, tag) = match normalized.as_str() {
        "buy" | "买入" => ("买入", ActionTag::Buy),
        "sell" | "卖出" => ("卖出", ActionTag::Sell),
        "hold" | "观望" | "持有" => ("观望", ActionTag::Hold),
        _ => {
            return ActionInfo {
                label: display_text(value),
                tag: ActionTag::None,
            };
        }
    };
    ActionInfo {
        label: label.to_string(),
        tag,
    }
}

/// Normalizes the many encodings of "is there an opportunity" onto
/// 有 / 无, leaving unknown values to render literally. Matching is
/// case-insensitive but, unlike trade directions, untrimmed: padded
/// spellings stay raw.
pub fn map_opportunity(value: &Value) -> String {
    let normalized = scalar_text(value).to_lowercase();
    match normalized.as_str() {
        "yes" | "true" | "1" | "是" | "有" => "有".to_string(),
        "no" | "false" | "0" | "否" | "无" => "无".to_string(),
        "" => "-".to_string(),
        _ => display_text(value),
    }
}

/// Scalar as matching text: null and containers are empty, booleans
/// and numbers their literal spelling.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        _ => String::new(),
    }
}
