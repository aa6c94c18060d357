//! XML writing shared by the SSML and grammar renderers.

use quick_xml::Writer;
use thiserror::Error;

/// A document could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to render markup: {0}")]
pub struct MarkupError(pub String);

impl From<quick_xml::Error> for MarkupError {
    fn from(err: quick_xml::Error) -> Self {
        Self(err.to_string())
    }
}

/// Runs `build` against an in-memory writer and returns the document text.
pub fn render<F>(build: F) -> Result<String, MarkupError>
where
    F: FnOnce(&mut Writer<Vec<u8>>) -> quick_xml::Result<()>,
{
    let mut writer = Writer::new(Vec::new());
    build(&mut writer)?;
    String::from_utf8(writer.into_inner()).map_err(|err| MarkupError(err.to_string()))
}
