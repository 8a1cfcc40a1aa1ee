//! The three-stage transcode sequence.
//!
//! Each stage is a thin function over one FFmpeg invocation; sequencing and
//! failure policy live in the orchestrator. A stage refuses to run when its
//! input artifact is missing.

use std::path::Path;

use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};
use crate::filters;

/// Input pattern matching the renumbered frame sequence.
pub const SEQUENCE_PATTERN: &str = "%06d.jpg";

/// Video codec for the silent-video stage.
pub const VIDEO_CODEC: &str = "libx264";
/// Encoding preset; speed over quality.
pub const VIDEO_PRESET: &str = "veryfast";
/// Constant rate factor; compression over quality.
pub const VIDEO_CRF: u8 = 28;
/// Encoder tuning.
pub const VIDEO_TUNE: &str = "fastdecode";
/// Encoder thread cap, keeps concurrent jobs bounded on small hosts.
pub const ENCODER_THREADS: u32 = 2;
/// Pixel format; requires even output dimensions.
pub const PIXEL_FORMAT: &str = "yuv420p";
/// Audio codec for the merge stage.
pub const AUDIO_CODEC: &str = "aac";
/// Audio bitrate for the merge stage.
pub const AUDIO_BITRATE: &str = "96k";

/// Zero-padded local file name of one renumbered sequence entry.
pub fn sequence_file_name(index: u32) -> String {
    format!("{:06}.jpg", index)
}

/// Build the frames-to-silent-video command.
///
/// The same `fps` drives decode (`-framerate`) and encode (`-r`), so the
/// declared recording pace survives the transcode untouched.
pub fn frame_sequence_command(sequence_dir: &Path, fps: f64, vertical_crop: bool, output: &Path) -> FfmpegCommand {
    FfmpegCommand::new(output)
        .frame_rate_in(fps)
        .input(sequence_dir.join(SEQUENCE_PATTERN))
        .frame_rate_out(fps)
        .video_filter(filters::geometry_filter(vertical_crop))
        .video_codec(VIDEO_CODEC)
        .preset(VIDEO_PRESET)
        .crf(VIDEO_CRF)
        .tune(VIDEO_TUNE)
        .threads(ENCODER_THREADS)
        .pix_fmt(PIXEL_FORMAT)
        .faststart()
}

/// Build the audio-concatenation command.
pub fn concat_command(manifest: &Path, sample_rate: u32, output: &Path) -> FfmpegCommand {
    FfmpegCommand::new(output)
        .concat_input(manifest)
        .audio_codec("pcm_s16le")
        .channels(1)
        .sample_rate(sample_rate)
}

/// Build the merge command: video copied, audio compressed, trimmed to the
/// shorter stream.
pub fn merge_command(video: &Path, audio: &Path, sample_rate: u32, output: &Path) -> FfmpegCommand {
    FfmpegCommand::new(output)
        .input(video)
        .input(audio)
        .copy_video()
        .audio_codec(AUDIO_CODEC)
        .audio_bitrate(AUDIO_BITRATE)
        .channels(1)
        .sample_rate(sample_rate)
        .threads(ENCODER_THREADS)
        .shortest()
        .faststart()
}

/// Stage one: encode the gapless frame sequence into a silent video.
pub async fn encode_frame_sequence(
    sequence_dir: &Path,
    fps: f64,
    vertical_crop: bool,
    output: &Path,
) -> MediaResult<()> {
    require_artifact(sequence_dir)?;
    frame_sequence_command(sequence_dir, fps, vertical_crop, output)
        .run()
        .await
}

/// Stage two: concatenate persisted audio chunks into one mono PCM track.
pub async fn concat_audio_chunks(
    manifest: &Path,
    sample_rate: u32,
    output: &Path,
) -> MediaResult<()> {
    require_artifact(manifest)?;
    concat_command(manifest, sample_rate, output).run().await
}

/// Stage three: merge the silent video with the concatenated audio.
pub async fn merge_video_audio(
    video: &Path,
    audio: &Path,
    sample_rate: u32,
    output: &Path,
) -> MediaResult<()> {
    require_artifact(video)?;
    require_artifact(audio)?;
    merge_command(video, audio, sample_rate, output).run().await
}

fn require_artifact(path: &Path) -> MediaResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(MediaError::MissingArtifact(path.to_path_buf()))
    }
}
