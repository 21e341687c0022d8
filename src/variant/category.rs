use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::engine::types::ChessError;

/// Rule-set identifier for a game, as named by the server.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Standard,
    Blitz,
    Lightning,
    Untimed,
    Nonstandard,
    Crazyhouse,
    Bughouse,
    Losers,
    /// Chess960 rules.
    WildFr,
    Wild0,
    Wild1,
    Wild2,
    Wild3,
    Wild4,
    Wild5,
    Wild8,
    Wild8a,
    /// Any name outside the list above; refused by move operations.
    Unsupported(String),
}

impl Category {
    /// Every supported category, orthodox ones first.
    pub const SUPPORTED: [Category; 17] = [
        Category::Standard,
        Category::Blitz,
        Category::Lightning,
        Category::Untimed,
        Category::Nonstandard,
        Category::Crazyhouse,
        Category::Bughouse,
        Category::Losers,
        Category::WildFr,
        Category::Wild0,
        Category::Wild1,
        Category::Wild2,
        Category::Wild3,
        Category::Wild4,
        Category::Wild5,
        Category::Wild8,
        Category::Wild8a,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Category::Standard => "standard",
            Category::Blitz => "blitz",
            Category::Lightning => "lightning",
            Category::Untimed => "untimed",
            Category::Nonstandard => "nonstandard",
            Category::Crazyhouse => "crazyhouse",
            Category::Bughouse => "bughouse",
            Category::Losers => "losers",
            Category::WildFr => "wild/fr",
            Category::Wild0 => "wild/0",
            Category::Wild1 => "wild/1",
            Category::Wild2 => "wild/2",
            Category::Wild3 => "wild/3",
            Category::Wild4 => "wild/4",
            Category::Wild5 => "wild/5",
            Category::Wild8 => "wild/8",
            Category::Wild8a => "wild/8a",
            Category::Unsupported(name) => name,
        }
    }

    /// Played with the orthodox rules; moves go straight to the rules library.
    pub fn is_orthodox(&self) -> bool {
        matches!(
            self,
            Category::Standard
                | Category::Blitz
                | Category::Lightning
                | Category::Untimed
                | Category::Nonstandard
        )
    }

    /// Captured pieces can be dropped back onto the board.
    pub fn is_drop_variant(&self) -> bool {
        matches!(self, Category::Crazyhouse | Category::Bughouse)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Category::Unsupported(_))
    }

    /// `Err(UnsupportedCategory)` for categories the engine refuses.
    pub fn ensure_supported(&self) -> Result<(), ChessError> {
        match self {
            Category::Unsupported(name) => Err(ChessError::UnsupportedCategory(name.clone())),
            _ => Ok(()),
        }
    }
}

impl FromStr for Category {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Ok(Category::SUPPORTED
            .into_iter()
            .find(|c| c.as_str() == name)
            .unwrap_or_else(|| Category::Unsupported(name.to_string())))
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(c) => c,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
