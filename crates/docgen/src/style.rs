use crate::error::DocgenError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Docstring dialect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocstringStyle {
    #[default]
    Google,
    Numpy,
    Rest,
}

impl DocstringStyle {
    pub const ALL: [Self; 3] = [Self::Google, Self::Numpy, Self::Rest];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Numpy => "numpy",
            Self::Rest => "rest",
        }
    }
}

impl FromStr for DocstringStyle {
    type Err = DocgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "numpy" | "numpydoc" => Ok(Self::Numpy),
            "rest" | "rst" | "restructuredtext" => Ok(Self::Rest),
            _ => Err(DocgenError::invalid_style(s)),
        }
    }
}

impl fmt::Display for DocstringStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_styles() {
        assert_eq!("google".parse::<DocstringStyle>().unwrap(), DocstringStyle::Google);
        assert_eq!("NumPy".parse::<DocstringStyle>().unwrap(), DocstringStyle::Numpy);
        assert_eq!("rst".parse::<DocstringStyle>().unwrap(), DocstringStyle::Rest);
        assert_eq!(" rest ".parse::<DocstringStyle>().unwrap(), DocstringStyle::Rest);
    }

    #[test]
    fn test_unknown_style() {
        let err = "epydoc".parse::<DocstringStyle>().unwrap_err();
        assert!(matches!(err, DocgenError::InvalidStyle(ref s) if s == "epydoc"));
    }

    #[test]
    fn test_display_round_trip() {
        for style in DocstringStyle::ALL {
            assert_eq!(style.to_string().parse::<DocstringStyle>().unwrap(), style);
        }
    }
}
