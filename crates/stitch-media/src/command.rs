//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// How much captured stderr to keep when a run fails.
const STDERR_TAIL_BYTES: usize = 4096;

#[derive(Debug, Clone)]
struct Input {
    /// Arguments placed before this input's -i
    args: Vec<String>,
    /// Input path or pattern
    source: String,
}

/// Builder for FFmpeg commands.
///
/// Input arguments accumulate until the next [`input`](Self::input) call,
/// which binds them to that source; output arguments apply after all inputs.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    inputs: Vec<Input>,
    pending_input_args: Vec<String>,
    output: PathBuf,
    output_args: Vec<String>,
    overwrite: bool,
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command producing `output`.
    pub fn new(output: impl AsRef<Path>) -> Self {
        Self {
            inputs: Vec::new(),
            pending_input_args: Vec::new(),
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add an argument applied to the next input (before its -i).
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.pending_input_args.push(arg.into());
        self
    }

    /// Add an input source, consuming pending input arguments.
    pub fn input(mut self, source: impl AsRef<Path>) -> Self {
        let args = std::mem::take(&mut self.pending_input_args);
        self.inputs.push(Input {
            args,
            source: source.as_ref().to_string_lossy().to_string(),
        });
        self
    }

    /// Input decoded at a fixed frame rate.
    pub fn frame_rate_in(self, fps: f64) -> Self {
        self.input_arg("-framerate").input_arg(format_rate(fps))
    }

    /// Input read through the concat demuxer.
    pub fn concat_input(self, manifest: impl AsRef<Path>) -> Self {
        self.input_arg("-f")
            .input_arg("concat")
            .input_arg("-safe")
            .input_arg("0")
            .input(manifest)
    }

    /// Add an output argument.
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Force the output frame rate.
    pub fn frame_rate_out(self, fps: f64) -> Self {
        self.output_arg("-r").output_arg(format_rate(fps))
    }

    /// Set video filter.
    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    /// Set video codec.
    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    /// Pass the video stream through without re-encoding.
    pub fn copy_video(self) -> Self {
        self.video_codec("copy")
    }

    /// Set audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    /// Set audio bitrate.
    pub fn audio_bitrate(self, bitrate: impl Into<String>) -> Self {
        self.output_arg("-b:a").output_arg(bitrate)
    }

    /// Set audio channel count.
    pub fn channels(self, channels: u8) -> Self {
        self.output_arg("-ac").output_arg(channels.to_string())
    }

    /// Set audio sample rate.
    pub fn sample_rate(self, rate: u32) -> Self {
        self.output_arg("-ar").output_arg(rate.to_string())
    }

    /// Set CRF (quality).
    pub fn crf(self, crf: u8) -> Self {
        self.output_arg("-crf").output_arg(crf.to_string())
    }

    /// Set encoding preset.
    pub fn preset(self, preset: impl Into<String>) -> Self {
        self.output_arg("-preset").output_arg(preset)
    }

    /// Set encoder tuning.
    pub fn tune(self, tune: impl Into<String>) -> Self {
        self.output_arg("-tune").output_arg(tune)
    }

    /// Cap encoder threads.
    pub fn threads(self, threads: u32) -> Self {
        self.output_arg("-threads").output_arg(threads.to_string())
    }

    /// Set pixel format.
    pub fn pix_fmt(self, format: impl Into<String>) -> Self {
        self.output_arg("-pix_fmt").output_arg(format)
    }

    /// Trim the output to the shortest input stream.
    pub fn shortest(self) -> Self {
        self.output_arg("-shortest")
    }

    /// Progressive-download-friendly container layout.
    pub fn faststart(self) -> Self {
        self.output_arg("-movflags").output_arg("+faststart")
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-v".to_string());
        args.push(self.log_level.clone());

        for input in &self.inputs {
            args.extend(input.args.clone());
            args.push("-i".to_string());
            args.push(input.source.clone());
        }

        args.extend(self.output_args.clone());
        args.push(self.output.to_string_lossy().to_string());

        args
    }

    /// Run the command to completion.
    ///
    /// A non-zero exit surfaces the captured stderr tail so stage failures
    /// are diagnosable from the terminal document alone.
    pub async fn run(&self) -> MediaResult<()> {
        check_ffmpeg()?;

        let args = self.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let output = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(MediaError::ffmpeg_failed(
                format!("FFmpeg exited with {}", output.status),
                Some(tail(&stderr, STDERR_TAIL_BYTES)),
                output.status.code(),
            ))
        }
    }
}

fn format_rate(fps: f64) -> String {
    format!("{:.4}", fps)
}

/// Last `max_bytes` of `text`, trimmed forward to a char boundary.
fn tail(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut start = text.len() - max_bytes;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    text[start..].to_string()
}

/// Check that FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_input_args() {
        let cmd = FfmpegCommand::new("out.mp4")
            .frame_rate_in(12.5)
            .input("seq/%06d.jpg")
            .frame_rate_out(12.5)
            .video_codec("libx264")
            .crf(28);

        let args = cmd.build_args();
        let framerate_pos = args.iter().position(|a| a == "-framerate").unwrap();
        let input_pos = args.iter().position(|a| a == "-i").unwrap();
        let rate_pos = args.iter().position(|a| a == "-r").unwrap();

        assert!(framerate_pos < input_pos, "decode rate must precede -i");
        assert!(input_pos < rate_pos, "encode rate must follow -i");
        assert!(args.contains(&"12.5000".to_string()));
        assert!(args.contains(&"libx264".to_string()));
        assert_eq!(args.last().unwrap(), "out.mp4");
    }

    #[test]
    fn test_multiple_inputs_keep_their_args() {
        let cmd = FfmpegCommand::new("merged.mp4")
            .input("silent.mp4")
            .input("audio.wav")
            .copy_video()
            .shortest();

        let args = cmd.build_args();
        let input_positions: Vec<_> = args
            .iter()
            .enumerate()
            .filter(|(_, a)| *a == "-i")
            .map(|(i, _)| i)
            .collect();

        assert_eq!(input_positions.len(), 2);
        assert_eq!(args[input_positions[0] + 1], "silent.mp4");
        assert_eq!(args[input_positions[1] + 1], "audio.wav");
        assert!(args.contains(&"copy".to_string()));
    }

    #[test]
    fn test_tail_respects_char_boundaries() {
        assert_eq!(tail("short", 100), "short");
        assert_eq!(tail("abcdef", 3), "def");
        // Multi-byte char straddling the cut is dropped, not split.
        let text = "xé tail";
        assert_eq!(tail(text, 6), " tail");
    }

    #[test]
    fn test_concat_input_flags() {
        let cmd = FfmpegCommand::new("audio.wav").concat_input("chunks.txt");
        let args = cmd.build_args();

        let f_pos = args.iter().position(|a| a == "-f").unwrap();
        assert_eq!(args[f_pos + 1], "concat");
        let safe_pos = args.iter().position(|a| a == "-safe").unwrap();
        assert_eq!(args[safe_pos + 1], "0");
        let input_pos = args.iter().position(|a| a == "-i").unwrap();
        assert!(safe_pos < input_pos);
    }
}
