use serde::{Deserialize, Serialize};

use crate::serde_util::null_as_default;

/// JSON-LD context stamped on every certificate.
pub const OPEN_BADGES_CONTEXT: &str = "https://w3id.org/openbadges/v2";

// ---------------------------------------------------------------------------
// Issuer
// ---------------------------------------------------------------------------

/// Full issuer profile, stored under the issuer's email.
///
/// The issuer's `id` is its email. Profiles are written once, on the first
/// badge an issuer creates, and never updated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    pub id: String,
    pub url: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "revocationList")]
    pub revocation_list: String,
}

impl Issuer {
    pub const TYPE: &'static str = "Profile";

    /// Create a profile whose id is `email`.
    pub fn new(email: impl Into<String>, url: impl Into<String>, name: impl Into<String>) -> Self {
        let email = email.into();
        Self {
            id: email.clone(),
            url: url.into(),
            name: name.into(),
            email,
            kind: Self::TYPE.into(),
            revocation_list: String::new(),
        }
    }

    /// A fresh copy of the identifying fields, as embedded in a badge.
    pub fn snapshot(&self) -> Self {
        Self {
            id: self.id.clone(),
            url: self.url.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            kind: Self::TYPE.into(),
            revocation_list: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Badge
// ---------------------------------------------------------------------------

/// Criteria a recipient must meet to earn a badge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    pub narrative: String,
}

/// A signature line printed on issued certificates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureLine {
    #[serde(rename = "jobTitle")]
    pub job_title: String,
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: Vec<String>,
    pub image: String,
}

impl SignatureLine {
    pub fn new(job_title: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            job_title: job_title.into(),
            name: name.into(),
            kind: vec!["SignatureLine".into(), "Extension".into()],
            image: String::new(),
        }
    }
}

/// Credential template owned by one issuer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub issuer: Issuer,
    pub criteria: Criteria,
    pub image: String,
    pub description: String,
    #[serde(rename = "signatureLines", default, deserialize_with = "null_as_default")]
    pub signature_lines: Vec<SignatureLine>,
}

impl Badge {
    pub const TYPE: &'static str = "BadgeClass";

    /// Build a badge that embeds a snapshot of `issuer` and one signature line.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        issuer: &Issuer,
        criteria: impl Into<String>,
        signature: SignatureLine,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: Self::TYPE.into(),
            issuer: issuer.snapshot(),
            criteria: Criteria {
                narrative: criteria.into(),
            },
            image: String::new(),
            description: description.into(),
            signature_lines: vec![signature],
        }
    }

    /// Whether `issuer_id` created this badge.
    pub fn is_owned_by(&self, issuer_id: &str) -> bool {
        self.issuer.id == issuer_id
    }
}

// ---------------------------------------------------------------------------
// Certificate
// ---------------------------------------------------------------------------

/// Who a certificate was issued to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub identity: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub hashed: bool,
}

impl Recipient {
    /// An unhashed email identity.
    pub fn email(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            kind: "email".into(),
            hashed: false,
        }
    }
}

/// Recipient profile extension carrying the recipient's public key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientProfile {
    #[serde(rename = "publicKey")]
    pub public_key: String,
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: Vec<String>,
}

impl RecipientProfile {
    pub fn new(public_key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            name: name.into(),
            kind: vec!["RecipientProfile".into(), "Extension".into()],
        }
    }
}

/// Where and how a certificate can be verified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub location: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: Vec<String>,
}

impl Verification {
    pub fn merkle_proof(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            kind: vec!["MerkleProofVerification2017".into(), "Extension".into()],
        }
    }
}

/// Issued credential binding one badge to one recipient.
///
/// The badge is embedded by value so later reads never depend on the
/// badge record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    #[serde(rename = "@context")]
    pub context: String,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "issuedOn")]
    pub issued_on: String,
    pub recipient: Recipient,
    #[serde(rename = "recipientProfile")]
    pub recipient_profile: RecipientProfile,
    pub verification: Verification,
    pub badge: Badge,
}

impl Certificate {
    pub const TYPE: &'static str = "Assertion";

    pub fn new(
        id: impl Into<String>,
        issued_on: impl Into<String>,
        recipient: Recipient,
        recipient_profile: RecipientProfile,
        verification: Verification,
        badge: Badge,
    ) -> Self {
        Self {
            context: OPEN_BADGES_CONTEXT.into(),
            id: id.into(),
            kind: Self::TYPE.into(),
            issued_on: issued_on.into(),
            recipient,
            recipient_profile,
            verification,
            badge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> Issuer {
        Issuer::new("jane@acme.edu", "https://acme.edu", "Acme Univ")
    }

    fn intro_badge() -> Badge {
        Badge::new(
            "badge:introcourse",
            "Intro Course",
            "desc",
            &acme(),
            "criteria",
            SignatureLine::new("Dean", "Jane Doe"),
        )
    }

    #[test]
    fn issuer_id_is_email() {
        let issuer = acme();
        assert_eq!(issuer.id, "jane@acme.edu");
        assert_eq!(issuer.email, "jane@acme.edu");
        assert_eq!(issuer.kind, "Profile");
        assert!(issuer.revocation_list.is_empty());
    }

    #[test]
    fn badge_embeds_issuer_copy() {
        let badge = intro_badge();
        assert_eq!(badge.issuer, acme());
        assert_eq!(badge.kind, "BadgeClass");
        assert_eq!(badge.signature_lines.len(), 1);
        assert_eq!(badge.signature_lines[0].job_title, "Dean");
        assert_eq!(badge.criteria.narrative, "criteria");
        assert!(badge.is_owned_by("jane@acme.edu"));
        assert!(!badge.is_owned_by("other@univ.edu"));
    }

    #[test]
    fn certificate_fixed_fields() {
        let cert = Certificate::new(
            "cert:bob@example.com-introcourse",
            "2024-01-01",
            Recipient::email("bob@example.com"),
            RecipientProfile::new("pubkey123", "Bob"),
            Verification::merkle_proof("https://verify/1"),
            intro_badge(),
        );
        assert_eq!(cert.context, OPEN_BADGES_CONTEXT);
        assert_eq!(cert.kind, "Assertion");
        assert_eq!(cert.recipient.kind, "email");
        assert!(!cert.recipient.hashed);
        assert_eq!(cert.recipient_profile.kind, vec!["RecipientProfile", "Extension"]);
        assert_eq!(
            cert.verification.kind,
            vec!["MerkleProofVerification2017", "Extension"]
        );
        assert_eq!(cert.badge, intro_badge());
    }

    #[test]
    fn open_badges_field_names() {
        let json = serde_json::to_value(intro_badge()).unwrap();
        assert_eq!(json["type"], "BadgeClass");
        assert!(json.get("signatureLines").is_some());
        assert_eq!(json["signatureLines"][0]["jobTitle"], "Dean");
        assert_eq!(json["issuer"]["revocationList"], "");

        let cert = Certificate::new(
            "c",
            "2024-01-01",
            Recipient::email("r"),
            RecipientProfile::new("k", "n"),
            Verification::merkle_proof("l"),
            intro_badge(),
        );
        let json = serde_json::to_value(cert).unwrap();
        assert_eq!(json["@context"], OPEN_BADGES_CONTEXT);
        assert_eq!(json["issuedOn"], "2024-01-01");
        assert_eq!(json["recipientProfile"]["publicKey"], "k");
    }

    #[test]
    fn null_signature_lines_decode_as_empty() {
        let raw = r#"{
            "id": "badge:x", "name": "X", "type": "BadgeClass",
            "issuer": {"id": "a@b", "url": "", "name": "", "email": "a@b",
                       "type": "Profile", "revocationList": ""},
            "criteria": {"narrative": ""}, "image": "", "description": "",
            "signatureLines": null
        }"#;
        let badge: Badge = serde_json::from_str(raw).unwrap();
        assert!(badge.signature_lines.is_empty());
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = serde_json::to_vec(&intro_badge()).unwrap();
        let b = serde_json::to_vec(&intro_badge()).unwrap();
        assert_eq!(a, b);
    }
}
