//! Format selection: maps (quality, codec) to the engine's selection grammar.
//!
//! The result is an ordered fallback chain evaluated by the engine. Codec is a
//! soft preference: every chain ends in codec-agnostic clauses and finally the
//! engine's single best stream, so a source that lacks the preferred codec or
//! resolution still downloads.

use std::fmt;

use crate::job::{QualityTier, VideoCodec};

/// Height used when a tier name is not recognised.
pub const FALLBACK_MAX_HEIGHT: u32 = 1080;

/// A selection string in the engine's format grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormatExpression(String);

impl FormatExpression {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormatExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FormatExpression {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Height bound for a tier name, falling back to 1080p for unknown names.
pub fn max_height_for(tier: &str) -> u32 {
    tier.parse::<QualityTier>()
        .map(QualityTier::max_height)
        .unwrap_or(FALLBACK_MAX_HEIGHT)
}

/// Builds the format expression for `quality` and an optional codec preference.
///
/// - With a codec: `bestvideo[vcodec^=TAG][height<=H]+bestaudio`, then
///   `bestvideo[height<=H]+bestaudio`, then `best`.
/// - Without: `bestvideo[height<=H]+bestaudio`, then `best`.
pub fn select_format(quality: QualityTier, codec: Option<VideoCodec>) -> FormatExpression {
    let height = quality.max_height();
    let bounded = format!("bestvideo[height<={height}]+bestaudio");
    let expr = match codec {
        Some(codec) => format!(
            "bestvideo[vcodec^={tag}][height<={height}]+bestaudio/{bounded}/best",
            tag = codec.engine_tag(),
        ),
        None => format!("{bounded}/best"),
    };
    FormatExpression(expr)
}
