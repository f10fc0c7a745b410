use crate::Error;

/// Enumeration of the verification relationships of a DID document, as specified by the DID spec.
#[repr(u8)]
#[derive(
    Clone,
    Copy,
    Debug,
    serde_with::DeserializeFromStr,
    Eq,
    Hash,
    PartialEq,
    Ord,
    PartialOrd,
    serde_with::SerializeDisplay,
)]
pub enum KeyPurpose {
    Authentication = 0,
    AssertionMethod = 1,
    KeyAgreement = 2,
    CapabilityInvocation = 3,
    CapabilityDelegation = 4,
}

impl KeyPurpose {
    /// An ordered array of all the variants in KeyPurpose.
    pub const VARIANTS: [KeyPurpose; 5] = [
        KeyPurpose::Authentication,
        KeyPurpose::AssertionMethod,
        KeyPurpose::KeyAgreement,
        KeyPurpose::CapabilityInvocation,
        KeyPurpose::CapabilityDelegation,
    ];
    /// Produce the camelCase string for this variant, as used in the DID doc.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyPurpose::Authentication => "authentication",
            KeyPurpose::AssertionMethod => "assertionMethod",
            KeyPurpose::KeyAgreement => "keyAgreement",
            KeyPurpose::CapabilityInvocation => "capabilityInvocation",
            KeyPurpose::CapabilityDelegation => "capabilityDelegation",
        }
    }
}

impl std::fmt::Display for KeyPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for KeyPurpose {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "authentication" => Ok(KeyPurpose::Authentication),
            "assertionMethod" => Ok(KeyPurpose::AssertionMethod),
            "keyAgreement" => Ok(KeyPurpose::KeyAgreement),
            "capabilityInvocation" => Ok(KeyPurpose::CapabilityInvocation),
            "capabilityDelegation" => Ok(KeyPurpose::CapabilityDelegation),
            _ => Err(Error::Malformed(
                format!("unrecognized KeyPurpose {:?}", s).into(),
            )),
        }
    }
}
