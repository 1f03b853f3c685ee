use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Roman-numeral tokens ("III", "iv", ...) that show up in fraction or
    /// batch labels and never help a name lookup.
    static ref ROMAN_NUMERAL: Regex = Regex::new(r"\b[ivxlcdm]+\b").unwrap();

    /// Numeric locant fragments like "1o" or "2-" left over after the
    /// separators are spaced out.
    static ref NUMERIC_LOCANT: Regex = Regex::new(r"\d+[o-]").unwrap();

    /// Filler words that appear in hand-written compound lists but are not
    /// part of any database name.
    static ref STOPWORDS: Regex =
        Regex::new(r"\b(derivative|analog|compound|extract|form|type)\b").unwrap();
}

/// Cleans up a hand-written compound name before it is sent to the lookup
/// service: lowercases, turns `-`/`_` into spaces, drops Roman-numeral
/// tokens, numeric locants and filler words, collapses whitespace, and
/// title-cases the result.
///
/// Pure and idempotent; a name made entirely of filler ("III-Compound
/// Derivative-1o") normalizes to the empty string.
pub fn clean_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let spaced = lowered.replace(['-', '_'], " ");
    let no_romans = ROMAN_NUMERAL.replace_all(&spaced, "");
    let no_locants = NUMERIC_LOCANT.replace_all(&no_romans, "");
    let no_stopwords = STOPWORDS.replace_all(&no_locants, "");

    let collapsed = no_stopwords
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ");
    title_case(&collapsed)
}

/// Uppercases the first letter of each whitespace-separated word.
fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
