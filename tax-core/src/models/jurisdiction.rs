use std::fmt;

use serde::{Deserialize, Serialize};

/// Code identifying a tax authority: the federal scheme or one of the
/// provinces and territories.
///
/// The set is closed. Whether a code actually has a bracket table is decided
/// by the [`JurisdictionRegistry`](crate::JurisdictionRegistry) in use.
/// Serializes as its code (`"ON"`), the same text [`as_str`](Self::as_str)
/// returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JurisdictionId {
    #[serde(rename = "FED")]
    Federal,
    #[serde(rename = "NF")]
    NewfoundlandAndLabrador,
    #[serde(rename = "PE")]
    PrinceEdwardIsland,
    #[serde(rename = "NS")]
    NovaScotia,
    #[serde(rename = "NB")]
    NewBrunswick,
    #[serde(rename = "ON")]
    Ontario,
    #[serde(rename = "MB")]
    Manitoba,
    #[serde(rename = "SK")]
    Saskatchewan,
    #[serde(rename = "AB")]
    Alberta,
    #[serde(rename = "BC")]
    BritishColumbia,
    #[serde(rename = "YK")]
    Yukon,
    #[serde(rename = "NT")]
    NorthwestTerritories,
    #[serde(rename = "NV")]
    Nunavut,
}

impl JurisdictionId {
    /// Every provincial and territorial code, in display order.
    pub const REGIONAL: [JurisdictionId; 12] = [
        Self::NewfoundlandAndLabrador,
        Self::PrinceEdwardIsland,
        Self::NovaScotia,
        Self::NewBrunswick,
        Self::Ontario,
        Self::Manitoba,
        Self::Saskatchewan,
        Self::Alberta,
        Self::BritishColumbia,
        Self::Yukon,
        Self::NorthwestTerritories,
        Self::Nunavut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Federal => "FED",
            Self::NewfoundlandAndLabrador => "NF",
            Self::PrinceEdwardIsland => "PE",
            Self::NovaScotia => "NS",
            Self::NewBrunswick => "NB",
            Self::Ontario => "ON",
            Self::Manitoba => "MB",
            Self::Saskatchewan => "SK",
            Self::Alberta => "AB",
            Self::BritishColumbia => "BC",
            Self::Yukon => "YK",
            Self::NorthwestTerritories => "NT",
            Self::Nunavut => "NV",
        }
    }

    /// Parses a jurisdiction code. Matching ignores ASCII case and
    /// surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FED" => Some(Self::Federal),
            "NF" => Some(Self::NewfoundlandAndLabrador),
            "PE" => Some(Self::PrinceEdwardIsland),
            "NS" => Some(Self::NovaScotia),
            "NB" => Some(Self::NewBrunswick),
            "ON" => Some(Self::Ontario),
            "MB" => Some(Self::Manitoba),
            "SK" => Some(Self::Saskatchewan),
            "AB" => Some(Self::Alberta),
            "BC" => Some(Self::BritishColumbia),
            "YK" => Some(Self::Yukon),
            "NT" => Some(Self::NorthwestTerritories),
            "NV" => Some(Self::Nunavut),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Federal => "Federal",
            Self::NewfoundlandAndLabrador => "Newfoundland and Labrador",
            Self::PrinceEdwardIsland => "Prince Edward Island",
            Self::NovaScotia => "Nova Scotia",
            Self::NewBrunswick => "New Brunswick",
            Self::Ontario => "Ontario",
            Self::Manitoba => "Manitoba",
            Self::Saskatchewan => "Saskatchewan",
            Self::Alberta => "Alberta",
            Self::BritishColumbia => "British Columbia",
            Self::Yukon => "Yukon",
            Self::NorthwestTerritories => "Northwest Territories",
            Self::Nunavut => "Nunavut",
        }
    }

    pub fn is_regional(&self) -> bool {
        !matches!(self, Self::Federal)
    }

    pub fn is_territory(&self) -> bool {
        matches!(
            self,
            Self::Yukon | Self::NorthwestTerritories | Self::Nunavut
        )
    }
}

impl fmt::Display for JurisdictionId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
