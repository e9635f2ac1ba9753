use obl_gate::AuthenticatedIssuer;

use crate::badge::IssueBadge;
use crate::certificate::IssueCertificate;
use crate::error::{ContractError, ContractResult};

pub const INIT_LEDGER: &str = "initLedger";
pub const ISSUE_BADGE: &str = "issueBadge";
pub const ISSUE_CERTIFICATE: &str = "issueCertificate";
pub const GET_CERTIFICATE: &str = "getCertificate";

/// Every function name the contract accepts.
pub const FUNCTIONS: [&str; 4] = [INIT_LEDGER, ISSUE_BADGE, ISSUE_CERTIFICATE, GET_CERTIFICATE];

// ---------------------------------------------------------------------------
// Invocation
// ---------------------------------------------------------------------------

/// A parsed contract call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    InitLedger,
    IssueBadge(IssueBadge),
    IssueCertificate(IssueCertificate),
    GetCertificate { key: String },
}

impl Invocation {
    /// Parse a function name and its client-supplied arguments.
    ///
    /// Arity is checked on `args` as sent. The issuance functions get the
    /// authenticated issuer's email as their leading argument.
    pub fn parse(
        function: &str,
        args: &[String],
        issuer: &AuthenticatedIssuer,
    ) -> ContractResult<Self> {
        match function {
            INIT_LEDGER => {
                expect_args::<0>(function, args)?;
                Ok(Self::InitLedger)
            }
            ISSUE_BADGE => {
                let [
                    issuer_name,
                    issuer_url,
                    badge_name,
                    badge_description,
                    criteria,
                    job_title,
                    signature_name,
                ] = expect_args::<7>(function, args)?;
                Ok(Self::IssueBadge(IssueBadge {
                    issuer_email: issuer.email().to_string(),
                    issuer_name,
                    issuer_url,
                    badge_name,
                    badge_description,
                    criteria,
                    job_title,
                    signature_name,
                }))
            }
            ISSUE_CERTIFICATE => {
                let [
                    issued_on,
                    recipient_email,
                    recipient_name,
                    recipient_public_key,
                    location,
                    badge_key,
                ] = expect_args::<6>(function, args)?;
                Ok(Self::IssueCertificate(IssueCertificate {
                    issuer_email: issuer.email().to_string(),
                    issued_on,
                    recipient_email,
                    recipient_name,
                    recipient_public_key,
                    location,
                    badge_key,
                }))
            }
            GET_CERTIFICATE => {
                let [key] = expect_args::<1>(function, args)?;
                Ok(Self::GetCertificate { key })
            }
            other => Err(ContractError::UnknownAction(other.to_string())),
        }
    }

    pub fn function(&self) -> &'static str {
        match self {
            Self::InitLedger => INIT_LEDGER,
            Self::IssueBadge(_) => ISSUE_BADGE,
            Self::IssueCertificate(_) => ISSUE_CERTIFICATE,
            Self::GetCertificate { .. } => GET_CERTIFICATE,
        }
    }
}

fn expect_args<const N: usize>(function: &str, args: &[String]) -> ContractResult<[String; N]> {
    <[String; N]>::try_from(args.to_vec()).map_err(|_| ContractError::ArgumentCount {
        function: function.to_string(),
        expected: N,
        actual: args.len(),
    })
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Successful result of an invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    /// No payload (`initLedger`).
    Empty,
    /// A status message (issuance).
    Message(String),
    /// Raw record bytes (`getCertificate`).
    Record(Vec<u8>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use obl_gate::{AccessGate, AttributeMap, GateConfig};

    fn jane() -> AuthenticatedIssuer {
        AccessGate::with_default_stages(GateConfig::default())
            .admit(&AttributeMap::university("jane@acme.edu"))
            .unwrap()
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn issue_badge_gets_issuer_email_prepended() {
        let args = strings(&[
            "Acme Univ",
            "https://acme.edu",
            "Intro Course",
            "desc",
            "criteria",
            "Dean",
            "Jane Doe",
        ]);
        let Invocation::IssueBadge(req) = Invocation::parse(ISSUE_BADGE, &args, &jane()).unwrap()
        else {
            panic!("expected issueBadge");
        };
        assert_eq!(req.issuer_email, "jane@acme.edu");
        assert_eq!(req.issuer_name, "Acme Univ");
        assert_eq!(req.signature_name, "Jane Doe");
    }

    #[test]
    fn issue_certificate_fields_in_order() {
        let args = strings(&[
            "2024-01-01",
            "bob@example.com",
            "Bob",
            "pubkey123",
            "https://verify/1",
            "introcourse",
        ]);
        let parsed = Invocation::parse(ISSUE_CERTIFICATE, &args, &jane()).unwrap();
        assert_eq!(parsed.function(), ISSUE_CERTIFICATE);
        let Invocation::IssueCertificate(req) = parsed else {
            panic!("expected issueCertificate");
        };
        assert_eq!(req.issuer_email, "jane@acme.edu");
        assert_eq!(req.issued_on, "2024-01-01");
        assert_eq!(req.badge_key, "introcourse");
    }

    #[test]
    fn get_certificate_takes_raw_key() {
        let parsed = Invocation::parse(GET_CERTIFICATE, &strings(&["badge:x"]), &jane()).unwrap();
        assert_eq!(parsed, Invocation::GetCertificate { key: "badge:x".into() });
    }

    #[test]
    fn wrong_arity_names_counts() {
        let err = Invocation::parse(ISSUE_BADGE, &strings(&["only one"]), &jane()).unwrap_err();
        assert_eq!(
            err,
            ContractError::ArgumentCount {
                function: ISSUE_BADGE.into(),
                expected: 7,
                actual: 1,
            }
        );

        let err = Invocation::parse(INIT_LEDGER, &strings(&["extra"]), &jane()).unwrap_err();
        assert_eq!(err.code(), "ARGUMENT_COUNT");
    }

    #[test]
    fn unknown_function() {
        let err = Invocation::parse("revokeBadge", &[], &jane()).unwrap_err();
        assert_eq!(err, ContractError::UnknownAction("revokeBadge".into()));
    }
}
