use serde::{Deserialize, Serialize};

/// A string did not match any variant of a wire enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field} value: {value}")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(DurationBucket {
    LessThanOneDay => "less_than_one_day",
    OneToThreeDays => "one_to_three_days",
    FourToSevenDays => "four_to_seven_days",
    MoreThanOneWeek => "more_than_one_week",
});

impl DurationBucket {
    /// Label shown next to the duration picker.
    pub fn label(&self) -> &'static str {
        match self {
            Self::LessThanOneDay => "<1 day",
            Self::OneToThreeDays => "1-3 days",
            Self::FourToSevenDays => "4-7 days",
            Self::MoreThanOneWeek => ">1 week",
        }
    }

    /// Accepts either the wire name or the display label.
    pub fn parse(raw: &str) -> Result<Self, InvalidEnum> {
        let trimmed = raw.trim();
        trimmed.parse().or_else(|err| {
            [
                Self::LessThanOneDay,
                Self::OneToThreeDays,
                Self::FourToSevenDays,
                Self::MoreThanOneWeek,
            ]
            .into_iter()
            .find(|bucket| bucket.label() == trimmed)
            .ok_or(err)
        })
    }
}

str_enum!(Gender {
    Male => "male",
    Female => "female",
    Other => "other",
});

str_enum!(SeverityTier {
    Low => "low",
    Moderate => "moderate",
    High => "high",
});

str_enum!(ConfidenceTier {
    High => "high",
    Medium => "medium",
    Low => "low",
});

str_enum!(BackendKind {
    Local => "local",
    Remote => "remote",
});
