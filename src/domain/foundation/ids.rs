use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Declares a UUID-backed row identifier.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Auth-provider subject; also the primary key of `user_profiles`.
    UserId
);
uuid_id!(PrivacyRequestId);
uuid_id!(WaitlistRequestId);
uuid_id!(ReportId);

impl UserId {
    /// Parses untrusted input such as a token `sub` claim or a
    /// `client_reference_id` from the payment processor.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        raw.parse()
            .map_err(|e: uuid::Error| ValidationError::invalid_format("user_id", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_validates() {
        let raw = "5f0c7c1e-8a52-4a53-9a57-3c2a3cc2e0f1";
        assert_eq!(UserId::parse(&format!(" {raw} ")).unwrap().to_string(), raw);
        assert_eq!(
            UserId::parse("  "),
            Err(ValidationError::empty_field("user_id"))
        );
        assert!(matches!(
            UserId::parse("cus_123"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn ids_serialize_as_plain_uuid_strings() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_value(ReportId::from_uuid(uuid)).unwrap();
        assert_eq!(json, serde_json::Value::String(uuid.to_string()));
    }

    #[test]
    fn display_and_from_str_agree() {
        let id = PrivacyRequestId::new();
        assert_eq!(id.to_string().parse::<PrivacyRequestId>().unwrap(), id);
        assert!("not-a-uuid".parse::<WaitlistRequestId>().is_err());
    }
}
