// Text normalization: prepares raw comment text for feature extraction and
// keyword search.
//
// Steps run in a fixed order: lowercase, strip tag-like markup, strip
// URL-like tokens, strip anything that is not a word character or
// whitespace, strip digit runs. URL stripping runs once more at the end,
// since removing punctuation or digits can assemble a new URL prefix
// ("ht.tp..." becomes "http...").

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.*?>").expect("valid tag pattern"));

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+|www\S+|https\S+").expect("valid url pattern"));

// `\w` includes the underscore, which is punctuation as far as we are concerned.
static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]|_").expect("valid non-word pattern"));

static DIGIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid digit pattern"));

/// Normalize `text` for analysis.
///
/// Pure and total: any input yields a string (possibly empty), and
/// normalizing an already-normalized string returns it unchanged.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let text = TAG_RE.replace_all(&lowered, "");
    let text = URL_RE.replace_all(&text, "");
    let text = NON_WORD_RE.replace_all(&text, "");
    let text = DIGIT_RE.replace_all(&text, "");
    URL_RE.replace_all(&text, "").into_owned()
}
