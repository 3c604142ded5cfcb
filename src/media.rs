//! Media classification of gateway models.

use crate::model::ModelDescriptor;
use serde::{Deserialize, Serialize};

/// Coarse modality of a model.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Audio,
    Image,
    #[default]
    Text,
    Video,
    Vision,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Audio => "audio",
            MediaType::Image => "image",
            MediaType::Text => "text",
            MediaType::Video => "video",
            MediaType::Vision => "vision",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a model by its declared type and capability flags.
///
/// A `chat` model is always text. Otherwise the first set flag wins in the
/// order video, audio, image, vision; with no flag set the model is text.
pub fn classify(model: &ModelDescriptor) -> MediaType {
    if model.kind.as_deref() == Some("chat") {
        return MediaType::Text;
    }

    [
        (model.video, MediaType::Video),
        (model.audio, MediaType::Audio),
        (model.image, MediaType::Image),
        (model.vision, MediaType::Vision),
    ]
    .into_iter()
    .find_map(|(flag, media)| flag.then_some(media))
    .unwrap_or_default()
}
