//! Deterministic blob key layout.
//!
//! Every path the pipeline reads or writes is derived here, so the device,
//! the pipeline, and polling callers agree on one layout.

use stitch_models::SessionId;

/// Key of the recording-statistics document for a session.
pub fn recording_stats(session: &SessionId) -> String {
    format!("metadata/{}/recording.json", session)
}

/// Key of the terminal job-result document for a session.
pub fn job_result(session: &SessionId) -> String {
    format!("metadata/{}/result.json", session)
}

/// Key of one frame image, 1-based index.
pub fn frame(video_folder: &str, session: &SessionId, index: u32) -> String {
    format!("{}/{}/frame_{}.jpg", video_folder, session, index)
}

/// Key of one audio chunk, 1-based index.
pub fn audio_chunk(audio_folder: &str, session: &SessionId, index: u32) -> String {
    format!("{}/{}/chunk_{}.wav", audio_folder, session, index)
}

/// Key of the published artifact.
pub fn output_artifact(output_folder: &str, session: &SessionId) -> String {
    format!("{}/{}.mp4", output_folder, session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let session = SessionId::from_string("sess42");

        assert_eq!(recording_stats(&session), "metadata/sess42/recording.json");
        assert_eq!(job_result(&session), "metadata/sess42/result.json");
        assert_eq!(frame("frames", &session, 7), "frames/sess42/frame_7.jpg");
        assert_eq!(audio_chunk("audio", &session, 1), "audio/sess42/chunk_1.wav");
        assert_eq!(output_artifact("videos", &session), "videos/sess42.mp4");
    }
}
