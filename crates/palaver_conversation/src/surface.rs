//! Capability checks for the current and available surfaces.

use palaver_wire as wire;

pub const SCREEN_OUTPUT: &str = "actions.capability.SCREEN_OUTPUT";
pub const AUDIO_OUTPUT: &str = "actions.capability.AUDIO_OUTPUT";
pub const MEDIA_RESPONSE_AUDIO: &str = "actions.capability.MEDIA_RESPONSE_AUDIO";
pub const WEB_BROWSER: &str = "actions.capability.WEB_BROWSER";

/// The surface the user is currently on.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    capabilities: Vec<String>,
}

impl Surface {
    pub fn new(raw: Option<&wire::Surface>) -> Self {
        Self {
            capabilities: capability_names(raw),
        }
    }

    pub fn has(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|name| name == capability)
    }

    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }
}

/// The other surfaces the user could be handed off to.
#[derive(Debug, Clone, Default)]
pub struct Available {
    surfaces: Vec<Surface>,
}

impl Available {
    pub fn new(raw: &[wire::Surface]) -> Self {
        Self {
            surfaces: raw.iter().map(|surface| Surface::new(Some(surface))).collect(),
        }
    }

    /// Whether any available surface has the capability.
    pub fn has(&self, capability: &str) -> bool {
        self.surfaces.iter().any(|surface| surface.has(capability))
    }
}

fn capability_names(raw: Option<&wire::Surface>) -> Vec<String> {
    raw.map(|surface| {
        surface
            .capabilities
            .iter()
            .filter_map(|capability| capability.name.clone())
            .collect()
    })
    .unwrap_or_default()
}
