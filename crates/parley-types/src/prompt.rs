//! Prompts played to the caller before or while collecting input.
//!
//! Rendering (TTS, audio fetch) is the transport's job. This module only
//! assembles the ordered list of prompts into an SSML-like document.

use crate::markup::{render, MarkupError};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde::{Deserialize, Serialize};

const SSML_NAMESPACE: &str = "http://www.w3.org/2001/10/synthesis";

/// A single piece of output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Prompt {
    /// Text to be rendered by the transport's speech synthesiser.
    Text(String),
    /// An audio file referenced by URL or path.
    Audio(String),
}

impl Prompt {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn audio(src: impl Into<String>) -> Self {
        Self::Audio(src.into())
    }
}

/// Strings that look like a URL or an absolute path become audio prompts;
/// everything else is spoken text.
impl From<&str> for Prompt {
    fn from(value: &str) -> Self {
        if value.contains("://") || value.starts_with('/') {
            Self::Audio(value.to_string())
        } else {
            Self::Text(value.to_string())
        }
    }
}

impl From<String> for Prompt {
    fn from(value: String) -> Self {
        Prompt::from(value.as_str())
    }
}

/// An ordered collection of prompts for one playback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDocument {
    prompts: Vec<Prompt>,
}

impl OutputDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document from possibly-missing prompts; `None` entries are dropped.
    pub fn from_prompts<I>(prompts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Prompt>>,
    {
        Self {
            prompts: prompts.into_iter().filter_map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, prompt: impl Into<Prompt>) {
        self.prompts.push(prompt.into());
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Renders the document as SSML for collection.
    pub fn to_ssml(&self) -> Result<String, MarkupError> {
        render(|w| {
            w.write_event(Event::Start(
                BytesStart::new("speak")
                    .with_attributes([("version", "1.0"), ("xmlns", SSML_NAMESPACE)]),
            ))?;
            for prompt in &self.prompts {
                match prompt {
                    Prompt::Text(text) => w.write_event(Event::Text(BytesText::new(text)))?,
                    Prompt::Audio(src) => w.write_event(Event::Empty(
                        BytesStart::new("audio").with_attributes([("src", src.as_str())]),
                    ))?,
                }
            }
            w.write_event(Event::End(BytesEnd::new("speak")))?;
            Ok(())
        })
    }
}

impl FromIterator<Prompt> for OutputDocument {
    fn from_iter<T: IntoIterator<Item = Prompt>>(iter: T) -> Self {
        Self {
            prompts: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_prompts_are_dropped() {
        let doc = OutputDocument::from_prompts(vec![
            None,
            Some(Prompt::audio("http://example.com/nice-to-meet-you.mp3")),
            Some(Prompt::audio("http://example.com/press-some-buttons.mp3")),
        ]);
        assert_eq!(doc.prompts().len(), 2);

        let empty = OutputDocument::from_prompts(vec![None::<Prompt>]);
        assert!(empty.is_empty());
    }

    #[test]
    fn strings_classify_as_audio_or_text() {
        assert_eq!(
            Prompt::from("http://example.com/a.mp3"),
            Prompt::Audio("http://example.com/a.mp3".into())
        );
        assert_eq!(
            Prompt::from("/opt/sounds/menu.wav"),
            Prompt::Audio("/opt/sounds/menu.wav".into())
        );
        assert_eq!(Prompt::from("Welcome"), Prompt::Text("Welcome".into()));
    }

    #[test]
    fn renders_ssml_in_order() {
        let doc: OutputDocument = vec![Prompt::text("Press <1>"), Prompt::audio("/a.wav")]
            .into_iter()
            .collect();
        assert_eq!(
            doc.to_ssml().unwrap(),
            "<speak version=\"1.0\" xmlns=\"http://www.w3.org/2001/10/synthesis\">\
             Press &lt;1&gt;<audio src=\"/a.wav\"/></speak>"
        );
    }
}
