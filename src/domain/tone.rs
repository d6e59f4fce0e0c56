//! The fixed tone catalog.
//!
//! The order of [`TONES`] is stable: interactive menus number tones by it
//! and random pools draw from it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A persona/style constraint applied to generated text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Meta-tone: the generator picks one of [`Tone::CONCRETE`]
    Auto,
    Supportive,
    Funny,
    Analytical,
    Questioning,
    Informative,
    Controversial,
}

/// Every supported tone, in menu order
pub const TONES: [Tone; 7] = [
    Tone::Auto,
    Tone::Supportive,
    Tone::Funny,
    Tone::Analytical,
    Tone::Questioning,
    Tone::Informative,
    Tone::Controversial,
];

impl Tone {
    /// Styles the generator may pick from when asked for [`Tone::Auto`]
    pub const CONCRETE: [Tone; 5] = [
        Tone::Supportive,
        Tone::Questioning,
        Tone::Informative,
        Tone::Funny,
        Tone::Analytical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Auto => "auto",
            Tone::Supportive => "supportive",
            Tone::Funny => "funny",
            Tone::Analytical => "analytical",
            Tone::Questioning => "questioning",
            Tone::Informative => "informative",
            Tone::Controversial => "controversial",
        }
    }

    /// One-line description shown in menus
    pub fn description(&self) -> &'static str {
        match self {
            Tone::Auto => "Let AI choose the best tone",
            Tone::Supportive => "Encouraging and empathetic",
            Tone::Funny => "Humorous and witty",
            Tone::Analytical => "Thoughtful and detailed",
            Tone::Questioning => "Curious and probing",
            Tone::Informative => "Educational and helpful",
            Tone::Controversial => "Challenging and thought-provoking",
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Tone::Auto)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for labels outside the catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tone '{0}'")]
pub struct UnknownTone(pub String);

impl FromStr for Tone {
    type Err = UnknownTone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_ascii_lowercase();
        TONES
            .iter()
            .copied()
            .find(|tone| tone.as_str() == label)
            .ok_or_else(|| UnknownTone(s.to_string()))
    }
}

/// The full catalog in menu order
pub fn list_tones() -> &'static [Tone] {
    &TONES
}

/// Map a label onto the catalog, falling back to [`Tone::Auto`] for
/// anything unrecognized.
pub fn resolve(label: &str) -> Tone {
    match label.parse() {
        Ok(tone) => tone,
        Err(UnknownTone(unknown)) => {
            warn!(tone = %unknown, "Unknown tone, defaulting to 'auto'");
            Tone::Auto
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_is_stable() {
        let labels: Vec<&str> = list_tones().iter().map(Tone::as_str).collect();
        assert_eq!(
            labels,
            vec![
                "auto",
                "supportive",
                "funny",
                "analytical",
                "questioning",
                "informative",
                "controversial"
            ]
        );
    }

    #[test]
    fn test_resolve_known_and_unknown() {
        assert_eq!(resolve("funny"), Tone::Funny);
        assert_eq!(resolve(" Analytical "), Tone::Analytical);
        assert_eq!(resolve("sarcastic"), Tone::Auto);
        assert_eq!(resolve(""), Tone::Auto);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        for label in ["auto", "funny", "nonsense", "INFORMATIVE", "pending"] {
            let once = resolve(label);
            assert_eq!(resolve(once.as_str()), once);
        }
    }

    #[test]
    fn test_concrete_styles_exclude_auto() {
        assert!(Tone::CONCRETE.iter().all(|t| !t.is_auto()));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Tone::Questioning).unwrap();
        assert_eq!(json, "\"questioning\"");
    }
}
