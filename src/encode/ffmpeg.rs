use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::encode::sequence::{FrameSequence, SequenceEncoder};
use crate::foundation::core::Canvas;
use crate::foundation::error::{StarloopError, StarloopResult};

const STDERR_TAIL_CHARS: usize = 500;

/// Alpha-capable output codecs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoCodec {
    /// ProRes 4444 with a 16-bit alpha plane in a QuickTime container.
    #[default]
    ProRes4444,
    /// VP9 with `yuva420p` in a WebM container. Needs even dimensions.
    Vp9Alpha,
}

impl VideoCodec {
    /// Conventional file extension (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::ProRes4444 => "mov",
            Self::Vp9Alpha => "webm",
        }
    }

    /// Reject canvases the codec's chroma subsampling cannot represent.
    pub fn check_canvas(self, canvas: Canvas) -> StarloopResult<()> {
        match self {
            Self::ProRes4444 => Ok(()),
            Self::Vp9Alpha => {
                if !canvas.width.is_multiple_of(2) || !canvas.height.is_multiple_of(2) {
                    return Err(StarloopError::validation(format!(
                        "vp9 alpha output needs even dimensions, got {}x{}",
                        canvas.width, canvas.height
                    )));
                }
                Ok(())
            }
        }
    }

    fn output_args(self, seq: &FrameSequence) -> Vec<String> {
        match self {
            Self::ProRes4444 => vec![
                "-c:v".to_owned(),
                "prores_ks".to_owned(),
                "-profile:v".to_owned(),
                "4444".to_owned(),
                "-pix_fmt".to_owned(),
                "yuva444p10le".to_owned(),
                "-alpha_bits".to_owned(),
                "16".to_owned(),
                "-vendor".to_owned(),
                "apl0".to_owned(),
            ],
            Self::Vp9Alpha => vec![
                "-c:v".to_owned(),
                "libvpx-vp9".to_owned(),
                "-pix_fmt".to_owned(),
                "yuva420p".to_owned(),
                "-auto-alt-ref".to_owned(),
                "0".to_owned(),
                "-b:v".to_owned(),
                "0".to_owned(),
                "-crf".to_owned(),
                "30".to_owned(),
                "-g".to_owned(),
                keyframe_interval(seq).to_string(),
            ],
        }
    }
}

fn keyframe_interval(seq: &FrameSequence) -> u32 {
    (seq.fps.as_f64().round() as u32).max(1)
}

/// `true` if an `ffmpeg` executable is reachable on `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> StarloopResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            StarloopError::storage(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

/// Encodes PNG frame sequences with the system `ffmpeg` binary.
#[derive(Clone, Debug)]
pub struct FfmpegEncoder {
    program: PathBuf,
    codec: VideoCodec,
    overwrite: bool,
}

impl FfmpegEncoder {
    /// Encoder for `codec` using `ffmpeg` from `PATH`, overwriting existing outputs.
    pub fn new(codec: VideoCodec) -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
            codec,
            overwrite: true,
        }
    }

    /// Use a specific ffmpeg executable.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Refuse to replace an existing output file.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Output codec.
    pub fn codec(&self) -> VideoCodec {
        self.codec
    }

    /// Full ffmpeg argument list for encoding `seq` into `out_path`.
    pub fn command_args(&self, seq: &FrameSequence, out_path: &Path) -> Vec<String> {
        let mut args = vec![
            "-hide_banner".to_owned(),
            "-loglevel".to_owned(),
            "error".to_owned(),
            if self.overwrite { "-y" } else { "-n" }.to_owned(),
            "-framerate".to_owned(),
            format!("{}/{}", seq.fps.num, seq.fps.den),
            "-start_number".to_owned(),
            "0".to_owned(),
            "-i".to_owned(),
            seq.input_pattern_path().to_string_lossy().into_owned(),
            "-an".to_owned(),
        ];
        args.extend(self.codec.output_args(seq));
        args.push(out_path.to_string_lossy().into_owned());
        args
    }
}

impl SequenceEncoder for FfmpegEncoder {
    fn name(&self) -> &str {
        match self.codec {
            VideoCodec::ProRes4444 => "ffmpeg/prores4444",
            VideoCodec::Vp9Alpha => "ffmpeg/vp9-alpha",
        }
    }

    fn check_canvas(&self, canvas: Canvas) -> StarloopResult<()> {
        self.codec.check_canvas(canvas)
    }

    #[tracing::instrument(level = "debug", skip(self, seq), fields(frames = seq.len(), out = %out_path.display()))]
    fn encode(&self, seq: &FrameSequence, out_path: &Path) -> StarloopResult<()> {
        if seq.is_empty() {
            return Err(StarloopError::encoding("no frames to encode"));
        }
        self.codec.check_canvas(seq.canvas)?;
        ensure_parent_dir(out_path)?;
        if !self.overwrite && out_path.exists() {
            return Err(StarloopError::encoding(format!(
                "output file '{}' already exists",
                out_path.display()
            )));
        }

        let args = self.command_args(seq, out_path);
        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    StarloopError::encoding(format!(
                        "ffmpeg executable not found (resolved_path={}); install ffmpeg and put it on PATH",
                        self.program.display()
                    ))
                } else {
                    StarloopError::encoding(format!(
                        "failed to spawn ffmpeg (resolved_path={}): {e}",
                        self.program.display()
                    ))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StarloopError::encoding(format!(
                "ffmpeg exited with status {} (args='{}', stderr_tail='{}')",
                output.status,
                args.join(" "),
                last_n_chars(&stderr, STDERR_TAIL_CHARS)
            )));
        }
        tracing::debug!(codec = ?self.codec, "ffmpeg finished");
        Ok(())
    }
}

fn last_n_chars(s: &str, max_chars: usize) -> String {
    let count = s.chars().count();
    s.chars()
        .skip(count.saturating_sub(max_chars))
        .collect::<String>()
        .trim()
        .to_owned()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
