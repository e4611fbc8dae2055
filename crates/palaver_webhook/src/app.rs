//! Configuration and per-turn spine shared by both protocol adapters.

use std::sync::Arc;

use palaver_conversation::Conversation;
use tracing::warn;

use crate::{
    TurnReply,
    error::{Error, Result},
    router::Handlers,
    verify::{IdentityVerifier, Verification},
};

/// The adapter-independent half of an app: the handler table and the
/// identity settings.
#[derive(Default)]
pub(crate) struct AppCore {
    pub handlers: Handlers,
    pub verification: Option<Verification>,
    pub verifier: Option<Arc<dyn IdentityVerifier>>,
    pub client_id: Option<String>,
    pub debug: bool,
}

impl AppCore {
    /// The request-level verification short-circuit. Returns the rejection
    /// reply when the turn must not reach the router.
    pub(crate) async fn reject_unverified(&self, token: Option<&str>) -> Option<TurnReply> {
        let verification = self.verification.as_ref()?;

        let Some(verifier) = &self.verifier else {
            warn!("Verification is configured but no verifier is installed; rejecting.");
            return Some(TurnReply::rejected(verification));
        };
        let Some(token) = token else {
            warn!("Missing bearer token on a verified endpoint.");
            return Some(TurnReply::rejected(verification));
        };

        match verifier.verify(token, &verification.audience).await {
            Ok(_) => None,
            Err(error) => {
                warn!(%error, "Bearer token verification failed.");
                Some(TurnReply::rejected(verification))
            }
        }
    }

    /// Decode and attach the user's sign-in profile before dispatch, when a
    /// sign-in token is present and a verifier is configured.
    pub(crate) async fn attach_profile(&self, conv: &mut Conversation) -> Result<()> {
        let Some(token) = conv.user.profile.token.clone() else {
            return Ok(());
        };
        let (Some(verifier), Some(client_id)) = (&self.verifier, &self.client_id) else {
            return Ok(());
        };

        let claims = verifier
            .verify(&token, client_id)
            .await
            .map_err(Error::Profile)?;
        conv.user.attach_profile(claims);

        Ok(())
    }

    /// Steps 3 and 4 of the turn: profile attach, then routed dispatch.
    pub(crate) async fn run(&self, mut conv: Conversation, intent: &str) -> Result<Conversation> {
        self.attach_profile(&mut conv).await?;
        self.handlers.dispatch(conv, intent).await
    }
}
