//! The handler-facing view of the user, including the cross-conversation
//! storage map.

use palaver_wire as wire;
use serde_json::{Map, Value};

use crate::session;

/// The user behind the current turn.
#[derive(Debug, Clone, Default)]
pub struct User {
    /// Random string ID for the user; stable across conversations.
    pub id: Option<String>,

    /// IETF BCP-47 locale from the user's assistant settings.
    pub locale: Option<String>,

    /// Timestamp of the last interaction; `None` for first contact.
    pub last_seen: Option<String>,

    /// Permissions the user granted to this app.
    pub permissions: Vec<String>,

    /// Data persisted across conversations for this user. Mutations are
    /// written back through the response's storage field on finalize.
    pub storage: Map<String, Value>,

    /// Account-linking OAuth2 token, when the user linked their account.
    pub access_token: Option<String>,

    /// Permissioned name info; fields stay `None` until granted.
    pub name: Name,

    pub profile: Profile,

    /// The profile email, available once the sign-in token was verified.
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Name {
    pub display: Option<String>,
    pub given: Option<String>,
    pub family: Option<String>,
}

/// Sign-in identity, decoded lazily by the identity verifier.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    /// The raw id token from account linking, if any.
    pub token: Option<String>,

    /// Claims decoded from the token after verification.
    pub payload: Option<Map<String, Value>>,
}

impl User {
    pub fn new(raw: Option<&wire::User>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        let name = raw.profile.as_ref().map(|profile| Name {
            display: profile.display_name.clone(),
            given: profile.given_name.clone(),
            family: profile.family_name.clone(),
        });

        Self {
            id: raw.user_id.clone(),
            locale: raw.locale.clone(),
            last_seen: raw.last_seen.clone(),
            permissions: raw.permissions.clone(),
            storage: session::load(raw.user_storage.as_deref()),
            access_token: raw.access_token.clone(),
            name: name.unwrap_or_default(),
            profile: Profile {
                token: raw.id_token.clone(),
                payload: None,
            },
            email: None,
        }
    }

    /// Attach verified sign-in claims, surfacing the email shortcut.
    pub fn attach_profile(&mut self, claims: Map<String, Value>) {
        self.email = claims
            .get("email")
            .and_then(Value::as_str)
            .map(str::to_owned);
        self.profile.payload = Some(claims);
    }

    /// Serialize the storage map for the response envelope.
    pub fn serialize_storage(&self) -> String {
        session::save(&self.storage)
    }
}
