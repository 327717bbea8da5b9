// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsing modes

use std::fmt;
use std::str::FromStr;

/// How strictly a document is parsed
///
/// The mode is the single policy value consulted by the resolver, the
/// coercer and the normalizer when something does not match the canonical
/// schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ParseMode {
    /// Canonical keys and required fields only; the first issue aborts.
    Standard,
    /// Accept key aliases, drop bad entities, collect diagnostics.
    #[default]
    Flexible,
}

impl ParseMode {
    #[inline]
    pub fn is_standard(self) -> bool {
        matches!(self, ParseMode::Standard)
    }

    #[inline]
    pub fn is_flexible(self) -> bool {
        matches!(self, ParseMode::Flexible)
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMode::Standard => f.write_str("standard"),
            ParseMode::Flexible => f.write_str("flexible"),
        }
    }
}

impl FromStr for ParseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "strict" => Ok(ParseMode::Standard),
            "flexible" | "lenient" => Ok(ParseMode::Flexible),
            other => Err(format!("unknown parse mode: {other}")),
        }
    }
}
