use async_trait::async_trait;

use super::{AuthError, AuthRequest, Authenticator, Identity};

/// Lets every request through as `anonymous`.
///
/// Meant for a cabinet on a trusted LAN; it has to be chosen explicitly in
/// the `[auth]` section.
#[derive(Default)]
pub struct NoneAuthenticator;

impl NoneAuthenticator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Authenticator for NoneAuthenticator {
    async fn authenticate(&self, _request: &AuthRequest) -> Result<Identity, AuthError> {
        Ok(Identity::anonymous())
    }

    fn method_name(&self) -> &'static str {
        "none"
    }

    fn admits_everyone(&self) -> bool {
        true
    }
}
