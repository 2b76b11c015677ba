use poise::serenity_prelude::ReactionType;

pub const DEFAULT_THRESHOLD: i32 = 3;
pub const MIN_THRESHOLD: i32 = 1;
pub const MAX_THRESHOLD: i32 = 120;

const THRESHOLD_FLAGS: [&str; 3] = ["threshold", "amount", "count"];

#[derive(Debug, PartialEq, Eq)]
pub enum ThresholdError {
    NotANumber(String),
    OutOfRange(i64),
    UnknownFlag(String),
    MissingValue(String),
}

impl std::fmt::Display for ThresholdError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ThresholdError::NotANumber(value) => write!(f, "`{value}` is not a number."),
            ThresholdError::OutOfRange(_) => write!(
                f,
                "The threshold must be between {MIN_THRESHOLD} and {MAX_THRESHOLD}."
            ),
            ThresholdError::UnknownFlag(flag) => write!(
                f,
                "Unknown option `--{flag}`, use `--threshold`, `--amount` or `--count`."
            ),
            ThresholdError::MissingValue(flag) => write!(f, "`--{flag}` needs a number."),
        }
    }
}

impl std::error::Error for ThresholdError {}

#[derive(Debug, PartialEq, Eq)]
pub enum ColourError {
    Invalid(String),
}

impl std::fmt::Display for ColourError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ColourError::Invalid(value) => {
                write!(f, "`{value}` is not a hex colour like `#ffac33`.")
            }
        }
    }
}

impl std::error::Error for ColourError {}

fn threshold_value(raw: &str) -> Result<i32, ThresholdError> {
    let value = raw
        .parse::<i64>()
        .map_err(|_| ThresholdError::NotANumber(raw.to_owned()))?;

    i32::try_from(value)
        .ok()
        .filter(|v| (MIN_THRESHOLD..=MAX_THRESHOLD).contains(v))
        .ok_or(ThresholdError::OutOfRange(value))
}

/// Reads the threshold from the trailing options of `starboard add`.
///
/// Accepts a bare number or one of `--threshold`, `--amount` and `--count`,
/// followed by a space or `=` and the number.
pub fn parse_threshold(options: Option<&str>) -> Result<i32, ThresholdError> {
    let mut tokens = options.unwrap_or_default().split_whitespace();

    let Some(first) = tokens.next() else {
        return Ok(DEFAULT_THRESHOLD);
    };

    let Some(flag) = first.strip_prefix("--") else {
        return threshold_value(first);
    };

    let (name, inline) = match flag.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (flag, None),
    };

    let name = name.to_lowercase();
    if !THRESHOLD_FLAGS.contains(&name.as_str()) {
        return Err(ThresholdError::UnknownFlag(name));
    }

    match inline.filter(|v| !v.is_empty()).or_else(|| tokens.next()) {
        Some(value) => threshold_value(value),
        None => Err(ThresholdError::MissingValue(name)),
    }
}

/// Parses `#rrggbb`, `rrggbb` or `0xrrggbb`, with `none` clearing the colour.
pub fn parse_colour(raw: &str) -> Result<Option<u32>, ColourError> {
    let trimmed = raw.trim();
    if ["none", "off", "reset", "default"]
        .iter()
        .any(|word| trimmed.eq_ignore_ascii_case(word))
    {
        return Ok(None);
    }

    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .unwrap_or(trimmed);

    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColourError::Invalid(raw.to_owned()));
    }

    u32::from_str_radix(hex, 16)
        .map(Some)
        .map_err(|_| ColourError::Invalid(raw.to_owned()))
}

/// Normalizes an emoji argument to the form reactions arrive in, `None` if
/// it is neither a unicode emoji nor a custom emoji mention.
#[must_use]
pub fn parse_emoji_arg(raw: &str) -> Option<String> {
    let raw = raw.trim();

    if raw.starts_with('<') {
        return match ReactionType::try_from(raw) {
            Ok(custom @ ReactionType::Custom { .. }) => Some(custom.to_string()),
            _ => None,
        };
    }

    emojis::get(raw).map(|emoji| emoji.as_str().to_owned())
}

/// Reads on/off style switches.
#[must_use]
pub fn parse_toggle(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "on" | "yes" | "true" | "enable" | "enabled" => Some(true),
        "off" | "no" | "false" | "disable" | "disabled" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_defaults_to_three() {
        assert_eq!(parse_threshold(None), Ok(3));
        assert_eq!(parse_threshold(Some("")), Ok(3));
        assert_eq!(parse_threshold(Some("   ")), Ok(3));
    }

    #[test]
    fn threshold_accepts_every_spelling() {
        assert_eq!(parse_threshold(Some("4")), Ok(4));
        assert_eq!(parse_threshold(Some("--threshold 4")), Ok(4));
        assert_eq!(parse_threshold(Some("--amount 10")), Ok(10));
        assert_eq!(parse_threshold(Some("--count=7")), Ok(7));
        assert_eq!(parse_threshold(Some("--COUNT 7")), Ok(7));
        assert_eq!(parse_threshold(Some("--threshold= 5")), Ok(5));
    }

    #[test]
    fn threshold_is_bounded() {
        assert_eq!(parse_threshold(Some("1")), Ok(1));
        assert_eq!(parse_threshold(Some("120")), Ok(120));
        assert_eq!(
            parse_threshold(Some("0")),
            Err(ThresholdError::OutOfRange(0))
        );
        assert_eq!(
            parse_threshold(Some("--threshold 121")),
            Err(ThresholdError::OutOfRange(121))
        );
        assert_eq!(
            parse_threshold(Some("99999999999")),
            Err(ThresholdError::OutOfRange(99_999_999_999))
        );
    }

    #[test]
    fn threshold_errors_explain_themselves() {
        assert_eq!(
            parse_threshold(Some("lots")),
            Err(ThresholdError::NotANumber("lots".to_owned()))
        );
        assert_eq!(
            parse_threshold(Some("--limit 3")),
            Err(ThresholdError::UnknownFlag("limit".to_owned()))
        );
        assert_eq!(
            parse_threshold(Some("--threshold")),
            Err(ThresholdError::MissingValue("threshold".to_owned()))
        );
        assert_eq!(
            ThresholdError::OutOfRange(500).to_string(),
            "The threshold must be between 1 and 120."
        );
    }

    #[test]
    fn colours_parse_as_hex() {
        assert_eq!(parse_colour("#ffac33"), Ok(Some(0xFFAC33)));
        assert_eq!(parse_colour("FFAC33"), Ok(Some(0xFFAC33)));
        assert_eq!(parse_colour("0x000000"), Ok(Some(0)));
        assert_eq!(parse_colour("none"), Ok(None));
        assert_eq!(parse_colour("Reset"), Ok(None));
        assert_eq!(
            parse_colour("#fff"),
            Err(ColourError::Invalid("#fff".to_owned()))
        );
        assert_eq!(
            parse_colour("#gggggg"),
            Err(ColourError::Invalid("#gggggg".to_owned()))
        );
        assert_eq!(
            parse_colour("+12345"),
            Err(ColourError::Invalid("+12345".to_owned()))
        );
    }

    #[test]
    fn emoji_arguments_are_normalized() {
        assert_eq!(parse_emoji_arg("⭐").as_deref(), Some("⭐"));
        assert_eq!(parse_emoji_arg(" 🤡 ").as_deref(), Some("🤡"));
        assert_eq!(parse_emoji_arg("<:pog:123>").as_deref(), Some("<:pog:123>"));
        assert_eq!(
            parse_emoji_arg("<a:dance:456>").as_deref(),
            Some("<a:dance:456>")
        );
        assert_eq!(parse_emoji_arg("star"), None);
        assert_eq!(parse_emoji_arg("<:broken>"), None);
        assert_eq!(parse_emoji_arg(""), None);
    }

    #[test]
    fn toggles() {
        assert_eq!(parse_toggle("on"), Some(true));
        assert_eq!(parse_toggle("Yes"), Some(true));
        assert_eq!(parse_toggle("off"), Some(false));
        assert_eq!(parse_toggle("disabled"), Some(false));
        assert_eq!(parse_toggle("maybe"), None);
    }
}
