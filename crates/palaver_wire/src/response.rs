//! The rich-response container and the item types that survive the fold.

use serde::{Deserialize, Serialize};

/// Ordered container of response items plus suggestion chips.
///
/// The platform requires the first item to be a simple response; the
/// conversation fold upholds that by injecting a placeholder where needed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichResponse {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<RichResponseItem>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

impl RichResponse {
    /// Append a simple text response.
    pub fn add_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.add_simple(SimpleResponse::text(text))
    }

    pub fn add_simple(&mut self, simple: SimpleResponse) -> &mut Self {
        self.items.push(RichResponseItem {
            simple_response: Some(simple),
            ..RichResponseItem::default()
        });
        self
    }

    pub fn add_card(&mut self, card: BasicCard) -> &mut Self {
        self.items.push(RichResponseItem {
            basic_card: Some(card),
            ..RichResponseItem::default()
        });
        self
    }

    pub fn add_media(&mut self, media: MediaResponse) -> &mut Self {
        self.items.push(RichResponseItem {
            media_response: Some(media),
            ..RichResponseItem::default()
        });
        self
    }

    /// Texts of all simple-response items, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| item.simple_response.as_ref())
            .filter_map(|simple| simple.text_to_speech.as_deref())
            .collect()
    }
}

/// One slot of a rich response; exactly one field is populated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichResponseItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple_response: Option<SimpleResponse>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_card: Option<BasicCard>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_response: Option<MediaResponse>,
}

/// Voice and text-only response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleResponse {
    /// Plain text of the speech output. Mutually exclusive with `ssml`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_to_speech: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssml: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
}

impl SimpleResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text_to_speech: Some(text.into()),
            ..Self::default()
        }
    }
}

impl<T: Into<String>> From<T> for SimpleResponse {
    fn from(text: T) -> Self {
        Self::text(text)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_objects: Vec<MediaObject>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Image>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_image: Option<Image>,
}
