//! Product category enumeration.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Returned when a path segment is not one of the supported categories.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported category: {0}")]
pub struct CategoryError(pub String);

/// A catalog category a shopper can browse.
///
/// `All` is a pseudo-category that matches every product. Matching is exact
/// and case-sensitive, so `"Women"` is rejected just like `"shoes"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Women,
    Men,
    Accessories,
    All,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 4] = [Self::Women, Self::Men, Self::Accessories, Self::All];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Women => "women",
            Self::Men => "men",
            Self::Accessories => "accessories",
            Self::All => "all",
        }
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
