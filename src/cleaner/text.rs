use std::sync::LazyLock;

use regex::Regex;

/// Everything that is not a word character, whitespace, or ordinary
/// typewriter punctuation is treated as scanner noise.
static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^\w\s.,!?;:()\[\]{}"'$%&@#*+=<>/\\|~`^-]"#).unwrap());

static HSPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\S\n]+").unwrap());
static NEWLINE_PAD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" *\n *").unwrap());
static SPACE_BEFORE_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" +([,.!?;:])").unwrap());
static SPACE_AFTER_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([,.!?;:]) *([A-Z])").unwrap());
static CAMEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());
static SOFT_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\n])\n([a-z])").unwrap());
static PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n([A-Z])").unwrap());
static BARE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:\d+|[A-Z]|[A-Z]\d+)$").unwrap());
static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Known OCR misreadings, applied in order. Spelling fixes are case
/// insensitive; the stray-code removals only fire on upper-case fragments so
/// ordinary prose like "in 1933 I" survives.
const OCR_FIXES: &[(&str, &str)] = &[
    (r"(?i)\bi(\s+[a-z])", "I$1"),
    (r"(?i)\bto-morrow\b", "tomorrow"),
    (r"(?i)\bto-day\b", "today"),
    (r"(?i)\bto-night\b", "tonight"),
    (r"(?i)\bper[ -]cent\b", "percent"),
    (r"(?i)\bfavour\b", "favor"),
    (r"(?i)\bfavourable\b", "favorable"),
    (r"(?i)\bcolour\b", "color"),
    (r"(?i)\bhonour\b", "honor"),
    (r"(?i)\bcentre\b", "center"),
    (r"(?i)\btheatre\b", "theater"),
    (r"(?i)\bconneotor\b", "connector"),
    (r"(?i)\bsele otor\b", "selector"),
    (r"(?i)\boffereing\b", "offering"),
    (r"(?i)\bpreceeding\b", "preceding"),
    (r"(?i)\bregretable\b", "regrettable"),
    (r"(?i)\btravelling\b", "traveling"),
    (r"(?i)\bneighbouring\b", "neighboring"),
    (r"\bRumours\b", "Rumors"),
    (r"\brumours\b", "rumors"),
    (r"(?i)\bManchukoa\b", "Manchukuo"),
    (r"(?i)\bTokio\b", "Tokyo"),
    (r"(?i)\bAutomatio\b", "Automatic"),
    (r"(?i)\bspecially\b", "especially"),
    (r"(?i)\bover-estimated\b", "overestimated"),
    (r"(?i)\bover-burdened\b", "overburdened"),
    (r"\bU\.\s*S\.\s*A\.", "U.S.A."),
    (r"\bW\.\s*C\.\s*2\.", "W.C.2."),
    (r"\bP\.\s*A\.\s*X\.", "P.A.X."),
    (r"\b\d+\s+[A-Z]\s+\d+\s+[A-Z]\b", ""),
    (r"\b\d+\s+[A-Z]\s+\d+\b", ""),
    (r"\b[A-Z]{1,2}\s+\d+\s+[A-Z]\b", ""),
    (r"(?i)\bdan\s+t\b", ""),
    (r"(?i)\bContext:\s*$", ""),
    (r"(?i)\bOriginal:\s*IMG_\d+\.png\s*$", ""),
    (r"(?i)\bConfidence:\s*\d+%\s*$", ""),
];

static OCR_FIX_RES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    OCR_FIXES
        .iter()
        .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), *replacement))
        .collect()
});

const MAX_PASSES: usize = 8;

/// Normalize noisy OCR text.
///
/// Total and deterministic. Paragraph breaks survive as a single blank line;
/// wrapped lines are joined. The pass is repeated until the text stops
/// changing, so cleaning already-clean text is a no-op.
pub fn clean_text(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let mut current = text.replace("\r\n", "\n").replace('\r', "\n");
    for _ in 0..MAX_PASSES {
        let next = clean_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn clean_pass(text: &str) -> String {
    let mut text = DISALLOWED_RE.replace_all(text, "").into_owned();

    for (re, replacement) in OCR_FIX_RES.iter() {
        text = re.replace_all(&text, *replacement).into_owned();
    }

    text = HSPACE_RE.replace_all(&text, " ").into_owned();
    text = NEWLINE_PAD_RE.replace_all(&text, "\n").into_owned();
    text = SPACE_BEFORE_PUNCT_RE.replace_all(&text, "$1").into_owned();
    text = SPACE_AFTER_PUNCT_RE.replace_all(&text, "$1 $2").into_owned();
    text = CAMEL_RE.replace_all(&text, "$1 $2").into_owned();

    text = SOFT_BREAK_RE.replace_all(&text, "$1 $2").into_owned();
    text = PARAGRAPH_RE.replace_all(&text, "\n\n$1").into_owned();
    text = BARE_LINE_RE.replace_all(&text, "").into_owned();
    text = BLANK_RUN_RE.replace_all(&text, "\n\n").into_owned();

    text.trim().to_string()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   \n\t ",
        "We arrived in Tokio to-day , and the colour of the sky was grey .",
        "Dear Mr Smith,\ni am writing from the centre of\ntown.\n\n\n\nYours sincerely,\nE.K. Gann",
        "12\nA\nB7\nThe voyage from Southampton was rough.",
        "Shipments to the U. S. A. increased 10 per cent.thereAfter demand fell.",
        "Rumours of war. Original: IMG_0231.png Confidence: 87%",
        "GANNGOR NLT 28 A 4 B SOUTHAMPTON JAN 28 ARRIVED SAFELY STOP",
        "“Curly quotes” and © symbols — dashes • bullets",
        "at 5 a at 6 b at 7 c",
        "aBcDeF gHiJ",
        "LIST OF EQUIPMENT\n1. Camera\n2. Tripod\n(3) Film",
    ];

    #[test]
    fn cleaning_is_idempotent() {
        for sample in SAMPLES {
            let once = clean_text(sample);
            assert_eq!(clean_text(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn empty_input_yields_empty_string() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text(" \n \n"), "");
    }

    #[test]
    fn spelling_and_hyphenation_fixes() {
        let out = clean_text("We arrived in Tokio to-day, travelling through the centre.");
        assert_eq!(out, "We arrived in Tokyo today, traveling through the center.");
    }

    #[test]
    fn lowercase_pronoun_is_capitalized() {
        assert_eq!(clean_text("then i went ashore"), "then I went ashore");
    }

    #[test]
    fn punctuation_spacing() {
        assert_eq!(clean_text("Hello , world .Next"), "Hello, world. Next");
    }

    #[test]
    fn noise_characters_are_dropped() {
        assert_eq!(clean_text("Cairo • Suez ©"), "Cairo Suez");
    }

    #[test]
    fn trailing_artifacts_removed() {
        let out = clean_text("The ship sailed at noon. Original: IMG_0231.png Confidence: 87%");
        assert_eq!(out, "The ship sailed at noon.");
    }

    #[test]
    fn upper_case_codes_removed_but_prose_kept() {
        assert_eq!(clean_text("Sent 12 B 7 from London."), "Sent from London.");
        assert_eq!(clean_text("In 1933 I sailed."), "In 1933 I sailed.");
    }

    #[test]
    fn wrapped_lines_join_and_sentences_start_paragraphs() {
        let out = clean_text("the weather\nwas cold.\nThe next day\nwe left.");
        assert_eq!(out, "the weather was cold.\n\nThe next day we left.");
    }

    #[test]
    fn bare_number_and_letter_lines_removed() {
        let out = clean_text("12\nA\nB7\nThe voyage was rough.");
        assert_eq!(out, "The voyage was rough.");
    }

    #[test]
    fn blank_line_runs_collapse() {
        let out = clean_text("First part.\n\n\n\n\nSecond part.");
        assert_eq!(out, "First part.\n\nSecond part.");
    }
}
