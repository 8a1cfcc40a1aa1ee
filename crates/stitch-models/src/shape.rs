//! Output geometry.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Landscape output width.
pub const LANDSCAPE_WIDTH: u32 = 1280;
/// Landscape output height.
pub const LANDSCAPE_HEIGHT: u32 = 720;
/// Portrait output width for vertical crops.
pub const PORTRAIT_WIDTH: u32 = 720;
/// Portrait output height for vertical crops.
pub const PORTRAIT_HEIGHT: u32 = 1280;

/// Geometry applied by the frame-to-video stage, recorded in the terminal
/// document so callers know the delivered resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoShape {
    pub width: u32,
    pub height: u32,
    pub vertical_crop: bool,
}

impl VideoShape {
    /// Shape selected by the request's vertical-crop flag.
    pub fn for_crop(vertical_crop: bool) -> Self {
        if vertical_crop {
            Self {
                width: PORTRAIT_WIDTH,
                height: PORTRAIT_HEIGHT,
                vertical_crop,
            }
        } else {
            Self {
                width: LANDSCAPE_WIDTH,
                height: LANDSCAPE_HEIGHT,
                vertical_crop,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_for_crop_flag() {
        let portrait = VideoShape::for_crop(true);
        assert_eq!((portrait.width, portrait.height), (720, 1280));

        let landscape = VideoShape::for_crop(false);
        assert_eq!((landscape.width, landscape.height), (1280, 720));
    }
}
