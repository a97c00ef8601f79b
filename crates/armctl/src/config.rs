// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process configuration, parsed from CLI flags with environment fallbacks.

use std::path::PathBuf;

/// Configuration for the control plane process.
#[derive(Debug, Clone, clap::Parser)]
pub struct AppConfig {
    /// Host to bind the HTTP listener on.
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// HTTP listen port.
    #[arg(long, default_value_t = 5000, env = "PORT")]
    pub port: u16,

    /// Index into the frame source used by the video passthrough.
    #[arg(long, default_value_t = 0, env = "CAMERA_INDEX")]
    pub camera_index: u32,

    /// Stream resolution as `WxH`.
    #[arg(long, default_value = "1280x720", env = "STREAM_RES")]
    pub stream_res: String,

    /// When false, the arm driver operates in mock mode.
    #[arg(long, default_value_t = false, env = "USE_HARDWARE")]
    pub use_hardware: bool,

    /// Selects the policy producer family. `"scripted"` is authoritative for
    /// tests; `"null"` yields a producer with zero chunks, exercising the
    /// worker's post-stream handoff guard on an empty stream. Any other value
    /// currently also resolves to the scripted producer (the model-driven
    /// family is out of scope for this crate).
    #[arg(long, default_value = "scripted", env = "MODEL_MODE")]
    pub model_mode: String,

    /// Control-loop pacing rate, in Hz.
    #[arg(long, default_value_t = 15, env = "INFERENCE_RATE_HZ")]
    pub inference_rate_hz: u32,

    /// Optional path to a joint-limit calibration JSON file.
    #[arg(long, env = "CALIBRATION_PATH")]
    pub calibration_path: Option<PathBuf>,

    /// Comma-separated CORS allowlist. Empty means permissive.
    #[arg(long, default_value = "", env = "CORS_ORIGINS")]
    pub cors_origins: String,

    /// Opaque path handed to the policy producer.
    #[arg(long, env = "MODEL_PATH")]
    pub model_path: Option<String>,
}

impl AppConfig {
    pub fn rate_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.inference_rate_hz.max(1)))
    }

    /// Parse `STREAM_RES` as `(width, height)`, falling back to 1280x720 on
    /// any malformed value rather than failing startup.
    pub fn stream_resolution(&self) -> (u32, u32) {
        self.stream_res
            .split_once('x')
            .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)))
            .unwrap_or((1280, 720))
    }

    pub fn cors_allowlist(&self) -> Vec<String> {
        self.cors_origins.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
    }
}
