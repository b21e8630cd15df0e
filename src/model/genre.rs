use serde::{Deserialize, Serialize};
use std::fmt;

/// Story theme picked in the sidebar.
///
/// `Other` keeps whatever label an older or hand-edited settings file holds;
/// it is drawn with the generic illustration style.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Genre {
    #[default]
    Fantasy,
    SciFi,
    Horror,
    Cyberpunk,
    Mystery,
    Other(String),
}

impl Genre {
    pub const ALL: [Genre; 5] = [
        Genre::Fantasy,
        Genre::SciFi,
        Genre::Horror,
        Genre::Cyberpunk,
        Genre::Mystery,
    ];

    pub fn label(&self) -> &str {
        match self {
            Genre::Fantasy => "Fantasy",
            Genre::SciFi => "Sci-Fi",
            Genre::Horror => "Horror",
            Genre::Cyberpunk => "Cyberpunk",
            Genre::Mystery => "Mystery",
            Genre::Other(label) => label,
        }
    }

    /// Art direction prepended to every illustration prompt.
    pub fn illustration_style(&self) -> &'static str {
        match self {
            Genre::Fantasy => "epic fantasy art, magical",
            Genre::SciFi => "futuristic, sci-fi concept art, neon lights",
            Genre::Horror => "dark, horror, eerie atmosphere, mist",
            Genre::Cyberpunk => "cyberpunk city, high tech low life, neon",
            Genre::Mystery => "noir style, mysterious, detective, shadows",
            Genre::Other(_) => "cinematic art",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Genre {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Fantasy" => Genre::Fantasy,
            "Sci-Fi" => Genre::SciFi,
            "Horror" => Genre::Horror,
            "Cyberpunk" => Genre::Cyberpunk,
            "Mystery" => Genre::Mystery,
            _ => Genre::Other(label),
        }
    }
}

impl From<Genre> for String {
    fn from(genre: Genre) -> Self {
        genre.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_settings_json() {
        let json = serde_json::to_string(&Genre::SciFi).unwrap();
        assert_eq!(json, "\"Sci-Fi\"");

        let back: Genre = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Genre::SciFi);
    }

    #[test]
    fn unknown_label_uses_cinematic_style() {
        let genre: Genre = serde_json::from_str("\"Western\"").unwrap();

        assert_eq!(genre, Genre::Other("Western".into()));
        assert_eq!(genre.label(), "Western");
        assert_eq!(genre.illustration_style(), "cinematic art");
    }

    #[test]
    fn horror_style() {
        assert_eq!(
            Genre::Horror.illustration_style(),
            "dark, horror, eerie atmosphere, mist"
        );
    }

    #[test]
    fn defaults_to_fantasy() {
        assert_eq!(Genre::default(), Genre::Fantasy);
    }
}
