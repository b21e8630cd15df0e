use regex::Regex;
use std::sync::LazyLock;

static NOISE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[<>{}\[\]@#_+=^]").unwrap());
static LINKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"http\S+").unwrap());
static PUNCT_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[!?.]{2,}").unwrap());

/// Cleans raw model output for display.
///
/// Strips bracket/symbol noise, then anything that looks like a link, then
/// collapses runs of `!`, `?` and `.` to the last mark of the run. Symbols
/// go first so removing them can never stitch a new link together, which
/// keeps the function idempotent.
pub fn sanitize(raw: &str) -> String {
    let text = NOISE.replace_all(raw, "");
    let text = LINKS.replace_all(&text, "");
    let text = PUNCT_RUNS.replace_all(&text, |caps: &regex::Captures| {
        caps[0].chars().last().map(String::from).unwrap_or_default()
    });
    text.trim().to_string()
}
