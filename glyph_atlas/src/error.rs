// Copyright 2025 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy shared by every atlas operation.

/// Boxed error reported by a collaborator (font backend, shaper or texture backend).
pub type BoxedSource = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Result type used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors surfaced by the atlas and its collaborators.
///
/// Use [`Error::kind`] to branch on the broad category; the variants carry the
/// context needed for a useful message.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// The configuration passed to [`FontAtlas::new`](crate::FontAtlas::new) cannot be used.
    InvalidConfig {
        /// What was wrong with it.
        reason: &'static str,
    },
    /// A face with this name is already registered.
    DuplicateFace {
        /// The rejected face name.
        name: String,
    },
    /// No face with this name is registered.
    UnknownFace {
        /// The name that was looked up.
        name: String,
    },
    /// A padded glyph box is larger than an empty atlas page.
    GlyphTooLarge {
        /// Requested width in pixels, border included.
        width: u32,
        /// Requested height in pixels, border included.
        height: u32,
        /// Configured page width and height.
        page_size: u32,
    },
    /// A collaborator failed; the original error is kept as the source.
    Resource {
        /// Which collaborator reported the failure.
        origin: ResourceOrigin,
        /// The collaborator's error.
        source: BoxedSource,
    },
}

impl Error {
    /// Wraps a collaborator failure.
    pub fn resource(origin: ResourceOrigin, source: impl Into<BoxedSource>) -> Self {
        Self::Resource {
            origin,
            source: source.into(),
        }
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfig { .. } | Self::DuplicateFace { .. } => ErrorKind::Configuration,
            Self::UnknownFace { .. } => ErrorKind::Lookup,
            Self::GlyphTooLarge { .. } => ErrorKind::Capacity,
            Self::Resource { .. } => ErrorKind::Resource,
        }
    }

    pub(crate) fn unknown_face(name: &str) -> Self {
        Self::UnknownFace {
            name: name.into(),
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidConfig { reason } => write!(f, "invalid atlas configuration: {reason}"),
            Self::DuplicateFace { name } => write!(f, "face `{name}` is already registered"),
            Self::UnknownFace { name } => write!(f, "no face named `{name}` is registered"),
            Self::GlyphTooLarge {
                width,
                height,
                page_size,
            } => write!(
                f,
                "glyph box {width}x{height} does not fit in a {page_size}x{page_size} atlas page"
            ),
            Self::Resource { origin, source } => write!(f, "{origin} error: {source}"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Resource { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// The non-exhaustive category of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Rejected at construction or registration; nothing was committed.
    Configuration,
    /// The caller named a face that does not exist.
    Lookup,
    /// A single glyph cannot fit in any page of the configured size.
    Capacity,
    /// A rasterizer, shaper or texture backend failed.
    Resource,
}

/// Which collaborator produced a [`Error::Resource`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResourceOrigin {
    /// Reading or parsing a font file.
    Font,
    /// Rasterizing a glyph or applying a character size.
    Rasterizer,
    /// Shaping text.
    Shaper,
    /// Creating or updating a texture.
    Texture,
}

impl core::fmt::Display for ResourceOrigin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Font => "font",
            Self::Rasterizer => "rasterizer",
            Self::Shaper => "shaper",
            Self::Texture => "texture",
        })
    }
}
