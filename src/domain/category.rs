use crate::error::{MarketError, Result};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Dog size the goods are meant for
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum BigCategory {
    Big,
    Middle,
    Small,
}

impl BigCategory {
    /// Numeric code used by `/item/categories/{code}/{name}`
    pub fn code(self) -> i64 {
        match self {
            BigCategory::Big => 1,
            BigCategory::Middle => 2,
            BigCategory::Small => 3,
        }
    }

    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            1 => Ok(BigCategory::Big),
            2 => Ok(BigCategory::Middle),
            3 => Ok(BigCategory::Small),
            other => Err(MarketError::Validation(format!(
                "unknown big category code {other}"
            ))),
        }
    }

    pub fn parse(token: &str) -> Result<Self> {
        token
            .trim()
            .parse()
            .map_err(|_| MarketError::Validation(format!("unknown big category '{token}'")))
    }
}

/// Kind of goods. The ordinal doubles as the bit index in
/// [`User::bit_category`](crate::domain::User).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum MidCategory {
    Feed,
    Snack,
    Clothes,
    Toy,
    House,
    Walk,
    Beauty,
    Health,
    Etc,
}

impl MidCategory {
    pub fn bit(self) -> i32 {
        1 << (self as i32)
    }

    pub fn parse(token: &str) -> Result<Self> {
        token
            .trim()
            .parse()
            .map_err(|_| MarketError::Validation(format!("unknown mid category '{token}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn big_category_codes_round_trip() {
        for category in BigCategory::iter() {
            assert_eq!(BigCategory::from_code(category.code()).unwrap(), category);
        }
        assert!(BigCategory::from_code(0).is_err());
    }

    #[test]
    fn tokens_parse_case_insensitively() {
        assert_eq!(MidCategory::parse("feed").unwrap(), MidCategory::Feed);
        assert_eq!(MidCategory::parse("FEED").unwrap(), MidCategory::Feed);
        assert_eq!(BigCategory::parse("small").unwrap(), BigCategory::Small);
        assert!(MidCategory::parse("kibble").is_err());
        assert_eq!(MidCategory::Clothes.to_string(), "CLOTHES");
    }

    #[test]
    fn every_mid_category_has_its_own_bit() {
        let all = MidCategory::iter().fold(0, |acc, c| {
            assert_eq!(acc & c.bit(), 0);
            acc | c.bit()
        });
        assert_eq!(all, (1 << 9) - 1);
    }
}
