//! FFmpeg video filter definitions.

use stitch_models::shape::{LANDSCAPE_HEIGHT, LANDSCAPE_WIDTH, PORTRAIT_HEIGHT, PORTRAIT_WIDTH};

/// Rounds both dimensions up to the nearest even integer; yuv420p chroma
/// subsampling rejects odd dimensions.
pub const FILTER_EVEN_PAD: &str = "pad=ceil(iw/2)*2:ceil(ih/2)*2";

/// Center 9:16 crop expanded to the fixed portrait resolution.
/// The crop offset is clamped so narrow inputs never produce a negative
/// position.
pub fn vertical_filter() -> String {
    format!(
        "crop=ih*9/16:ih:max((iw-ih*9/16)/2\\,0):0,scale={}:{},{}",
        PORTRAIT_WIDTH, PORTRAIT_HEIGHT, FILTER_EVEN_PAD
    )
}

/// Landscape fit preserving aspect ratio, never exceeding the target box.
pub fn landscape_filter() -> String {
    format!(
        "scale={}:{}:force_original_aspect_ratio=decrease,{}",
        LANDSCAPE_WIDTH, LANDSCAPE_HEIGHT, FILTER_EVEN_PAD
    )
}

/// Build the geometry filter for the frame-to-video stage.
pub fn geometry_filter(vertical_crop: bool) -> String {
    if vertical_crop {
        vertical_filter()
    } else {
        landscape_filter()
    }
}
