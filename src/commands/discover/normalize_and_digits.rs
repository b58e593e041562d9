const ALEF: char = '\u{0627}';
const YA: char = '\u{064A}';
const ALEF_MAQSURA: char = '\u{0649}';
const TATWEEL: char = '\u{0640}';

const INDIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

fn is_arabic_diacritic(ch: char) -> bool {
    matches!(ch, '\u{064B}'..='\u{065F}' | '\u{0670}')
}

pub(super) fn is_zero_width(ch: char) -> bool {
    matches!(
        ch,
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{200E}' | '\u{200F}' | '\u{FEFF}'
    )
}

fn is_alef_variant(ch: char) -> bool {
    matches!(ch, '\u{0623}' | '\u{0625}' | '\u{0622}' | '\u{0671}')
}

/// Canonical form used by every heuristic comparison.
///
/// Drops tashkeel, tatweel and zero-width marks, folds hamza-carrying alefs
/// to bare alef and alef maqsura to ya, then collapses whitespace.
pub(super) fn normalize_for_match(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars() {
        if is_arabic_diacritic(ch) || ch == TATWEEL || is_zero_width(ch) {
            continue;
        }

        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }

        if pending_space {
            out.push(' ');
            pending_space = false;
        }

        if is_alef_variant(ch) {
            out.push(ALEF);
        } else if ch == ALEF_MAQSURA {
            out.push(YA);
        } else {
            out.push(ch);
        }
    }

    out
}

/// Normalized form with surrounding heading punctuation removed.
pub(super) fn normalize_title_key(text: &str) -> String {
    normalize_for_match(text)
        .trim_matches(|ch: char| is_heading_punctuation(ch) || ch.is_whitespace())
        .to_string()
}

pub(super) fn is_heading_punctuation(ch: char) -> bool {
    matches!(
        ch,
        ':' | '.' | '،' | ',' | '؛' | ';' | '-' | '–' | '—' | '(' | ')' | '[' | ']' | '«' | '»'
    )
}

pub(super) fn indic_digit_value(ch: char) -> Option<u32> {
    INDIC_DIGITS
        .iter()
        .position(|digit| *digit == ch)
        .map(|value| value as u32)
}

pub(super) fn to_western_digits(text: &str) -> String {
    text.chars()
        .map(|ch| match indic_digit_value(ch) {
            Some(value) => char::from_digit(value, 10).unwrap_or(ch),
            None => ch,
        })
        .collect()
}

pub(super) fn to_indic_digits(text: &str) -> String {
    text.chars()
        .map(|ch| match ch.to_digit(10) {
            Some(value) if ch.is_ascii_digit() => INDIC_DIGITS[value as usize],
            _ => ch,
        })
        .collect()
}

/// Parses a run of Indic or Western digits (mixed is accepted).
pub(super) fn indic_to_int(text: &str) -> Option<u64> {
    let western = to_western_digits(text.trim());
    if western.is_empty() || !western.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }

    western.parse::<u64>().ok()
}

pub(super) fn int_to_indic(value: u64) -> String {
    to_indic_digits(&value.to_string())
}
