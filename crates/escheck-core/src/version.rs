//! ECMAScript grammar versions and alias resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A grammar version the syntax checker can be configured for.
///
/// Ordering follows the edition history, so `Es5 < Es2015` holds and a
/// feature gate is a simple comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EcmaVersion {
    /// ECMAScript 3.
    Es3,
    /// ECMAScript 4. Never standardized; checked with the es3 grammar.
    Es4,
    /// ECMAScript 5.
    Es5,
    /// ECMAScript 2015 (es6).
    Es2015,
    /// ECMAScript 2016 (es7).
    Es2016,
    /// ECMAScript 2017 (es8).
    Es2017,
    /// ECMAScript 2018 (es9).
    Es2018,
    /// ECMAScript 2019 (es10).
    Es2019,
}

impl EcmaVersion {
    /// Every alias accepted by [`EcmaVersion::resolve`], in edition order.
    pub const ALIASES: &'static [&'static str] = &[
        "es3", "es4", "es5", "es6", "es2015", "es7", "es2016", "es8", "es2017", "es9", "es2018",
        "es10", "es2019",
    ];

    /// Alias used when the configuration names no version.
    pub const DEFAULT_ALIAS: &'static str = "es5";

    /// Resolves a version alias such as `es6` or `es2018`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidVersion`] for anything outside [`Self::ALIASES`].
    pub fn resolve(alias: &str) -> Result<Self, InvalidVersion> {
        let version = match alias {
            "es3" => Self::Es3,
            "es4" => Self::Es4,
            "es5" => Self::Es5,
            "es6" | "es2015" => Self::Es2015,
            "es7" | "es2016" => Self::Es2016,
            "es8" | "es2017" => Self::Es2017,
            "es9" | "es2018" => Self::Es2018,
            "es10" | "es2019" => Self::Es2019,
            other => return Err(InvalidVersion(other.to_string())),
        };
        Ok(version)
    }

    /// The numeric grammar identifier (3 through 10).
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::Es3 => 3,
            Self::Es4 => 4,
            Self::Es5 => 5,
            Self::Es2015 => 6,
            Self::Es2016 => 7,
            Self::Es2017 => 8,
            Self::Es2018 => 9,
            Self::Es2019 => 10,
        }
    }

    /// Human-readable label, e.g. `es6/es2015`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Es3 => "es3",
            Self::Es4 => "es4",
            Self::Es5 => "es5",
            Self::Es2015 => "es6/es2015",
            Self::Es2016 => "es7/es2016",
            Self::Es2017 => "es8/es2017",
            Self::Es2018 => "es9/es2018",
            Self::Es2019 => "es10/es2019",
        }
    }
}

impl Default for EcmaVersion {
    fn default() -> Self {
        Self::Es5
    }
}

impl fmt::Display for EcmaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "es{}", self.number())
    }
}

impl FromStr for EcmaVersion {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

/// An unrecognized grammar version alias.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid grammar version `{0}`")]
pub struct InvalidVersion(pub String);
