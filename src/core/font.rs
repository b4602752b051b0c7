//! Font styles used by message content.
//!
//! Family names follow the Graphik face names. Terminal renderers only care
//! about the weight and slant, exposed through [`FontStyle::is_bold`] and
//! [`FontStyle::is_italic`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[serde(rename = "Graphik-Thin")]
    Thin,
    #[serde(rename = "Graphik-ThinItalic")]
    ThinItalic,
    #[serde(rename = "Graphik-ExtraLight")]
    ExtraLight,
    #[serde(rename = "Graphik-ExtraLightItalic")]
    ExtraLightItalic,
    #[serde(rename = "Graphik-Light")]
    Light,
    #[serde(rename = "Graphik-LightItalic")]
    LightItalic,
    #[default]
    #[serde(rename = "Graphik-Regular")]
    Regular,
    #[serde(rename = "Graphik-RegularItalic")]
    RegularItalic,
    #[serde(rename = "Graphik-Medium")]
    Medium,
    #[serde(rename = "Graphik-MediumItalic")]
    MediumItalic,
    #[serde(rename = "Graphik-Semibold")]
    Semibold,
    #[serde(rename = "Graphik-SemiboldItalic")]
    SemiboldItalic,
    #[serde(rename = "Graphik-Bold")]
    Bold,
    #[serde(rename = "Graphik-BoldItalic")]
    BoldItalic,
    #[serde(rename = "Graphik-Black")]
    Black,
    #[serde(rename = "Graphik-BlackItalic")]
    BlackItalic,
    #[serde(rename = "Graphik-Super")]
    Super,
    #[serde(rename = "Graphik-SuperItalic")]
    SuperItalic,
}

impl FontStyle {
    pub const ALL: [FontStyle; 18] = [
        FontStyle::Thin,
        FontStyle::ThinItalic,
        FontStyle::ExtraLight,
        FontStyle::ExtraLightItalic,
        FontStyle::Light,
        FontStyle::LightItalic,
        FontStyle::Regular,
        FontStyle::RegularItalic,
        FontStyle::Medium,
        FontStyle::MediumItalic,
        FontStyle::Semibold,
        FontStyle::SemiboldItalic,
        FontStyle::Bold,
        FontStyle::BoldItalic,
        FontStyle::Black,
        FontStyle::BlackItalic,
        FontStyle::Super,
        FontStyle::SuperItalic,
    ];

    /// PostScript face name.
    pub fn name(self) -> &'static str {
        match self {
            FontStyle::Thin => "Graphik-Thin",
            FontStyle::ThinItalic => "Graphik-ThinItalic",
            FontStyle::ExtraLight => "Graphik-ExtraLight",
            FontStyle::ExtraLightItalic => "Graphik-ExtraLightItalic",
            FontStyle::Light => "Graphik-Light",
            FontStyle::LightItalic => "Graphik-LightItalic",
            FontStyle::Regular => "Graphik-Regular",
            FontStyle::RegularItalic => "Graphik-RegularItalic",
            FontStyle::Medium => "Graphik-Medium",
            FontStyle::MediumItalic => "Graphik-MediumItalic",
            FontStyle::Semibold => "Graphik-Semibold",
            FontStyle::SemiboldItalic => "Graphik-SemiboldItalic",
            FontStyle::Bold => "Graphik-Bold",
            FontStyle::BoldItalic => "Graphik-BoldItalic",
            FontStyle::Black => "Graphik-Black",
            FontStyle::BlackItalic => "Graphik-BlackItalic",
            FontStyle::Super => "Graphik-Super",
            FontStyle::SuperItalic => "Graphik-SuperItalic",
        }
    }

    pub fn from_name(name: &str) -> Option<FontStyle> {
        Self::ALL.into_iter().find(|style| style.name() == name)
    }

    pub fn is_italic(self) -> bool {
        self.name().ends_with("Italic")
    }

    /// Semibold and heavier.
    pub fn is_bold(self) -> bool {
        matches!(
            self,
            FontStyle::Semibold
                | FontStyle::SemiboldItalic
                | FontStyle::Bold
                | FontStyle::BoldItalic
                | FontStyle::Black
                | FontStyle::BlackItalic
                | FontStyle::Super
                | FontStyle::SuperItalic
        )
    }

    /// Thin through light faces.
    pub fn is_light(self) -> bool {
        matches!(
            self,
            FontStyle::Thin
                | FontStyle::ThinItalic
                | FontStyle::ExtraLight
                | FontStyle::ExtraLightItalic
                | FontStyle::Light
                | FontStyle::LightItalic
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_lookup() {
        for style in FontStyle::ALL {
            assert_eq!(FontStyle::from_name(style.name()), Some(style));
        }
        assert_eq!(FontStyle::from_name("Helvetica"), None);
    }

    #[test]
    fn test_traits() {
        assert!(FontStyle::BoldItalic.is_bold());
        assert!(FontStyle::BoldItalic.is_italic());
        assert!(!FontStyle::Medium.is_bold());
        assert!(FontStyle::ExtraLight.is_light());
        assert!(!FontStyle::Regular.is_italic());
    }

    #[test]
    fn test_serde_uses_face_names() {
        let json = serde_json::to_string(&FontStyle::Semibold).unwrap();
        assert_eq!(json, "\"Graphik-Semibold\"");
    }
}
