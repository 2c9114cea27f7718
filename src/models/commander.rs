use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TowerError;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    /// Single-letter symbol used by Scryfall's `color` search keyword.
    pub fn symbol(&self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }
}

impl FromStr for Color {
    type Err = TowerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Color::White),
            "u" | "blue" => Ok(Color::Blue),
            "b" | "black" => Ok(Color::Black),
            "r" | "red" => Ok(Color::Red),
            "g" | "green" => Ok(Color::Green),
            other => Err(TowerError::InvalidArgument(format!(
                "Unknown color: {}",
                other
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// ColorFilter — The color checkboxes plus the "exact" toggle
// ---------------------------------------------------------------------------

/// Color constraint for a commander search.
///
/// With `exact` unset the commander's colors must be a subset of `colors`;
/// with `exact` set they must match exactly. An empty color set means no
/// constraint at all, regardless of `exact`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorFilter {
    colors: Vec<Color>,
    exact: bool,
}

impl ColorFilter {
    pub fn new<I: IntoIterator<Item = Color>>(colors: I, exact: bool) -> Self {
        let mut colors: Vec<Color> = colors.into_iter().collect();
        colors.sort();
        colors.dedup();
        Self { colors, exact }
    }

    /// Parse selection tokens such as `["w", "blue", "e"]`.
    ///
    /// `e` / `exact` toggles exact matching; every other token must name a color.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> crate::Result<Self> {
        let mut colors: Vec<Color> = Vec::new();
        let mut exact = false;
        for token in tokens {
            let token = token.as_ref().trim();
            if token.is_empty() {
                continue;
            }
            if token.eq_ignore_ascii_case("e") || token.eq_ignore_ascii_case("exact") {
                exact = true;
            } else {
                colors.push(token.parse()?);
            }
        }
        Ok(Self::new(colors, exact))
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn is_exact(&self) -> bool {
        self.exact
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Scryfall search clause, e.g. `color<=WU` or `color=WU`.
    ///
    /// Returns `None` when no color is selected.
    pub fn search_clause(&self) -> Option<String> {
        if self.colors.is_empty() {
            return None;
        }
        let op = if self.exact { "=" } else { "<=" };
        let symbols: String = self.colors.iter().map(Color::symbol).collect();
        Some(format!("color{}{}", op, symbols))
    }
}

impl fmt::Display for ColorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.search_clause() {
            Some(clause) => f.write_str(&clause),
            None => f.write_str("any"),
        }
    }
}

// ---------------------------------------------------------------------------
// Commander — Catalog lookup result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commander {
    pub name: String,
    pub image_uri: String,
}
