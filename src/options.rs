//! View options with TOML file support.
//!
//! The backend-independent settings of a [`TextureView`](crate::TextureView)
//! serialize to/from TOML so hosts can keep them next to their other
//! configuration. The pixel format is backend specific and passed to the
//! view directly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{error::TexviewError, fit::ContentFit, surface::ColorSpace};

/// Smallest allowed frames-in-flight limit.
pub const MIN_FRAMES_IN_FLIGHT: u32 = 1;
/// Largest allowed frames-in-flight limit.
pub const MAX_FRAMES_IN_FLIGHT: u32 = 3;

/// Backend-independent view configuration. Uses `#[serde(default)]` so
/// partial files work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ViewOptions {
    /// How the texture is fitted onto the drawable.
    pub content_fit: ContentFit,
    /// Whether layout changes resize the drawable.
    pub auto_resize: bool,
    /// Frames that may be queued for display before `draw` blocks.
    pub max_frames_in_flight: u32,
    /// Colorspace override for the drawable.
    pub color_space: Option<ColorSpace>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            content_fit: ContentFit::AspectFill,
            auto_resize: true,
            max_frames_in_flight: 2,
            color_space: None,
        }
    }
}

impl ViewOptions {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TexviewError::Io`] if the file cannot be read and
    /// [`TexviewError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, TexviewError> {
        let content = std::fs::read_to_string(path).map_err(TexviewError::Io)?;
        toml::from_str(&content)
            .map_err(|e| TexviewError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`TexviewError::OptionsParse`] if serialization fails and
    /// [`TexviewError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), TexviewError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TexviewError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(TexviewError::Io)?;
        }
        std::fs::write(path, content).map_err(TexviewError::Io)
    }

    /// The frames-in-flight limit clamped to the supported range.
    #[must_use]
    pub fn clamped_frames_in_flight(&self) -> u32 {
        clamp_frames_in_flight(self.max_frames_in_flight)
    }
}

/// Clamp a frames-in-flight limit to
/// `MIN_FRAMES_IN_FLIGHT..=MAX_FRAMES_IN_FLIGHT`, warning when it changes.
pub(crate) fn clamp_frames_in_flight(requested: u32) -> u32 {
    let clamped = requested.clamp(MIN_FRAMES_IN_FLIGHT, MAX_FRAMES_IN_FLIGHT);
    if clamped != requested {
        log::warn!(
            "max_frames_in_flight {requested} out of range, using {clamped}"
        );
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = ViewOptions::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: ViewOptions = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
content_fit = "aspect_fit"
"#;
        let opts: ViewOptions = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.content_fit, ContentFit::AspectFit);
        assert!(opts.auto_resize);
        assert_eq!(opts.max_frames_in_flight, 2);
        assert_eq!(opts.color_space, None);
    }

    #[test]
    fn color_space_parses_snake_case() {
        let opts: ViewOptions =
            toml::from_str("color_space = \"srgb\"\nauto_resize = false")
                .unwrap();
        assert_eq!(opts.color_space, Some(ColorSpace::Srgb));
        assert!(!opts.auto_resize);
    }

    #[test]
    fn unknown_fit_mode_is_rejected() {
        let result: Result<ViewOptions, _> =
            toml::from_str("content_fit = \"zoom\"");
        assert!(result.is_err());
    }

    #[test]
    fn frames_in_flight_is_clamped() {
        let mut opts = ViewOptions {
            max_frames_in_flight: 0,
            ..ViewOptions::default()
        };
        assert_eq!(opts.clamped_frames_in_flight(), 1);
        opts.max_frames_in_flight = 8;
        assert_eq!(opts.clamped_frames_in_flight(), 3);
        opts.max_frames_in_flight = 3;
        assert_eq!(opts.clamped_frames_in_flight(), 3);
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir()
            .join(format!("texview-options-{}", std::process::id()));
        let path = dir.join("view.toml");
        let opts = ViewOptions {
            content_fit: ContentFit::Stretch,
            auto_resize: false,
            max_frames_in_flight: 3,
            color_space: Some(ColorSpace::Linear),
        };
        opts.save(&path).unwrap();
        let loaded = ViewOptions::load(&path).unwrap();
        assert_eq!(loaded, opts);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("texview-does-not-exist.toml");
        assert!(matches!(
            ViewOptions::load(&path),
            Err(TexviewError::Io(_))
        ));
    }
}
