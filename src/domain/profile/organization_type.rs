use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Kind of firm a subscriber registers on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationType {
    HedgeFund,
    AssetManager,
    PrivateEquity,
    FamilyOffice,
    InvestmentBank,
    PensionFund,
    Endowment,
    Insurance,
    RegisteredInvestmentAdvisor,
    BrokerDealer,
    Individual,
    Other,
}

impl OrganizationType {
    pub const ALL: [OrganizationType; 12] = [
        OrganizationType::HedgeFund,
        OrganizationType::AssetManager,
        OrganizationType::PrivateEquity,
        OrganizationType::FamilyOffice,
        OrganizationType::InvestmentBank,
        OrganizationType::PensionFund,
        OrganizationType::Endowment,
        OrganizationType::Insurance,
        OrganizationType::RegisteredInvestmentAdvisor,
        OrganizationType::BrokerDealer,
        OrganizationType::Individual,
        OrganizationType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationType::HedgeFund => "hedge_fund",
            OrganizationType::AssetManager => "asset_manager",
            OrganizationType::PrivateEquity => "private_equity",
            OrganizationType::FamilyOffice => "family_office",
            OrganizationType::InvestmentBank => "investment_bank",
            OrganizationType::PensionFund => "pension_fund",
            OrganizationType::Endowment => "endowment",
            OrganizationType::Insurance => "insurance",
            OrganizationType::RegisteredInvestmentAdvisor => "ria",
            OrganizationType::BrokerDealer => "broker_dealer",
            OrganizationType::Individual => "individual",
            OrganizationType::Other => "other",
        }
    }
}

impl fmt::Display for OrganizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrganizationType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        OrganizationType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "organization_type",
                    format!("unknown organization type '{}'", s.trim()),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_form_value() {
        for t in OrganizationType::ALL {
            assert_eq!(t.as_str().parse::<OrganizationType>(), Ok(t));
        }
    }

    #[test]
    fn parse_normalizes_case_and_separators() {
        assert_eq!(
            "Family Office".parse::<OrganizationType>(),
            Ok(OrganizationType::FamilyOffice)
        );
        assert_eq!(
            "hedge-fund".parse::<OrganizationType>(),
            Ok(OrganizationType::HedgeFund)
        );
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(matches!(
            "sovereign_wealth".parse::<OrganizationType>(),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}
