//! Admin session gate for mutating operations.
//!
//! # Responsibility
//! - Exchange the shared admin credential for a session token.
//! - Let services check a token before applying any mutation.
//!
//! # Invariants
//! - `AdminSession` values can only be minted by an authority.
//! - A revoked session is never valid again.
//! - This gate is a UX guard, not an access-control boundary.

use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Token proving the holder entered admin mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdminSession {
    token: Uuid,
}

impl AdminSession {
    pub fn token(&self) -> Uuid {
        self.token
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The supplied credential does not match.
    InvalidCredential,
    /// No credential is configured, so admin mode cannot be entered.
    Disabled,
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredential => write!(f, "admin credential rejected"),
            Self::Disabled => write!(f, "admin mode is disabled: no credential configured"),
        }
    }
}

impl Error for AuthError {}

/// Issues and validates admin sessions.
pub trait AdminAuthority {
    fn authorize(&mut self, credential: &str) -> Result<AdminSession, AuthError>;
    fn is_valid(&self, session: &AdminSession) -> bool;
    fn revoke(&mut self, session: &AdminSession);
}

/// Authority backed by one shared static credential.
#[derive(Debug, Default)]
pub struct StaticCredentialAuthority {
    credential: String,
    active: HashSet<Uuid>,
}

impl StaticCredentialAuthority {
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
            active: HashSet::new(),
        }
    }
}

impl AdminAuthority for StaticCredentialAuthority {
    fn authorize(&mut self, credential: &str) -> Result<AdminSession, AuthError> {
        if self.credential.is_empty() {
            warn!("event=admin_login module=auth status=error error_code=disabled");
            return Err(AuthError::Disabled);
        }
        if credential != self.credential {
            warn!("event=admin_login module=auth status=error error_code=invalid_credential");
            return Err(AuthError::InvalidCredential);
        }

        let session = AdminSession {
            token: Uuid::new_v4(),
        };
        self.active.insert(session.token);
        info!("event=admin_login module=auth status=ok");
        Ok(session)
    }

    fn is_valid(&self, session: &AdminSession) -> bool {
        self.active.contains(&session.token)
    }

    fn revoke(&mut self, session: &AdminSession) {
        if self.active.remove(&session.token) {
            info!("event=admin_logout module=auth status=ok");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AdminAuthority, AuthError, StaticCredentialAuthority};

    #[test]
    fn matching_credential_issues_valid_session() {
        let mut authority = StaticCredentialAuthority::new("s3cret");
        let session = authority.authorize("s3cret").unwrap();
        assert!(authority.is_valid(&session));
    }

    #[test]
    fn wrong_credential_is_rejected() {
        let mut authority = StaticCredentialAuthority::new("s3cret");
        assert_eq!(
            authority.authorize("S3CRET").unwrap_err(),
            AuthError::InvalidCredential
        );
    }

    #[test]
    fn empty_credential_disables_admin_mode() {
        let mut authority = StaticCredentialAuthority::new("");
        assert_eq!(authority.authorize("").unwrap_err(), AuthError::Disabled);
    }

    #[test]
    fn revoked_session_is_no_longer_valid() {
        let mut authority = StaticCredentialAuthority::new("s3cret");
        let session = authority.authorize("s3cret").unwrap();
        authority.revoke(&session);
        assert!(!authority.is_valid(&session));
    }

    #[test]
    fn sessions_from_another_authority_are_not_valid() {
        let mut first = StaticCredentialAuthority::new("s3cret");
        let mut second = StaticCredentialAuthority::new("s3cret");
        let session = first.authorize("s3cret").unwrap();
        let _ = second.authorize("s3cret").unwrap();
        assert!(!second.is_valid(&session));
    }
}
