//! Numeric code scanner
//!
//! Turns a live camera feed into one validated 4-digit attendance code.
//! The scattered capture/recognize callbacks of the flow this replaces are
//! reshaped into an explicit state machine so cancellation and the
//! re-entrancy guard are unit-testable without hardware:
//!
//! ```text
//! Idle -> Initializing -> Scanning -> Found   (code emitted, session over)
//!                |            |-----> Idle    (cancelled, nothing emitted)
//!                |            `-----> Error   (camera failed mid-session)
//!                `-> Error                    (engine/camera acquisition failed)
//! ```
//!
//! While Scanning, a 2-second ticker drives capture → grayscale →
//! recognize → extract. Only one recognition runs at a time: a pass that
//! overruns the interval holds the loop, and elapsed ticks are dropped,
//! never queued. At most one code is ever emitted per session.

pub mod camera;
pub mod frame;
pub mod ocr;

pub use camera::{CameraError, CameraRequest, Facing, FrameSource};
pub use frame::{Frame, to_grayscale};
pub use ocr::{OcrConfig, OcrEngine, OcrError, SegmentationMode};

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::checkin::code;

/// Terminal scan-session failures; per-tick recognition errors are logged
/// and scanning continues
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Camera unavailable: {0}")]
    Camera(#[from] CameraError),

    #[error("Scanner initialization failed: {0}")]
    OcrInit(#[from] OcrError),
}

/// Where a scanner session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerPhase {
    Idle,
    Initializing,
    Scanning,
    Found,
    Error,
}

/// Scanner session settings
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Recognition cadence
    pub tick: Duration,
    pub camera: CameraRequest,
    pub ocr: OcrConfig,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(2),
            camera: CameraRequest::default(),
            ocr: OcrConfig::default(),
        }
    }
}

/// Pick the attendance code out of recognized text
///
/// The first 4-digit word-boundary match wins; there is no confidence
/// scoring and no cross-frame voting. A first match outside 1000–9999
/// (codes never start with 0) rejects the whole frame.
fn extract_code(text: &str) -> Option<String> {
    static CODE_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = CODE_PATTERN
        .get_or_init(|| Regex::new(r"\b[0-9]{4}\b").expect("digit pattern is valid"));

    let found = pattern.find(text)?.as_str();
    code::in_range(found).then(|| found.to_string())
}

/// One scanning session over an exclusive camera + engine pair
///
/// The session owns both resources; tearing it down releases the camera
/// before anything else can open it.
pub struct NumberScanner<C: FrameSource, E: OcrEngine> {
    camera: C,
    engine: E,
    config: ScannerConfig,
    phase: ScannerPhase,
}

impl<C: FrameSource, E: OcrEngine> NumberScanner<C, E> {
    pub fn new(camera: C, engine: E) -> Self {
        Self::with_config(camera, engine, ScannerConfig::default())
    }

    pub fn with_config(camera: C, engine: E, config: ScannerConfig) -> Self {
        Self {
            camera,
            engine,
            config,
            phase: ScannerPhase::Idle,
        }
    }

    pub fn phase(&self) -> ScannerPhase {
        self.phase
    }

    /// Run the session until a code is found or `start` flips to false
    ///
    /// Returns `Ok(Some(code))` on the first in-range match, `Ok(None)` on
    /// cancellation. A cancellation that lands while a recognition is in
    /// flight lets the pass finish but discards its result. The camera is
    /// released on every exit path.
    pub async fn run(&mut self, mut start: watch::Receiver<bool>) -> Result<Option<String>, ScanError> {
        self.phase = ScannerPhase::Initializing;

        if let Err(e) = self.engine.initialize(&self.config.ocr).await {
            self.phase = ScannerPhase::Error;
            tracing::error!("OCR engine initialization failed: {e}");
            return Err(ScanError::OcrInit(e));
        }
        if let Err(e) = self.camera.open(&self.config.camera).await {
            self.phase = ScannerPhase::Error;
            tracing::error!("Camera acquisition failed: {}", e.user_message());
            return Err(ScanError::Camera(e));
        }

        self.phase = ScannerPhase::Scanning;
        if !*start.borrow() {
            // Cancelled before the first tick
            self.teardown(ScannerPhase::Idle);
            return Ok(None);
        }

        let mut ticker = tokio::time::interval(self.config.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await; // skip immediate tick; first pass waits a full interval

        loop {
            tokio::select! {
                changed = start.changed() => {
                    if changed.is_err() || !*start.borrow() {
                        self.teardown(ScannerPhase::Idle);
                        return Ok(None);
                    }
                }

                _ = ticker.tick() => {
                    // This arm holds the loop until the pass resolves, so two
                    // recognitions can never overlap; Skip drops the ticks
                    // that elapsed meanwhile.
                    let frame = match self.camera.capture().await {
                        Ok(frame) => frame,
                        Err(e) => {
                            tracing::error!("Frame capture failed: {}", e.user_message());
                            self.teardown(ScannerPhase::Error);
                            return Err(ScanError::Camera(e));
                        }
                    };

                    let gray = frame::to_grayscale(&frame);
                    let text = match self.engine.recognize(&gray).await {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::warn!("Recognition pass failed, retrying next tick: {e}");
                            continue;
                        }
                    };

                    // A cancellation that arrived mid-recognition wins over
                    // whatever the pass produced.
                    if !*start.borrow() {
                        self.teardown(ScannerPhase::Idle);
                        return Ok(None);
                    }

                    if let Some(found) = extract_code(&text) {
                        tracing::info!(code = %found, "Scanner found attendance code");
                        self.teardown(ScannerPhase::Found);
                        return Ok(Some(found));
                    }
                }
            }
        }
    }

    fn teardown(&mut self, phase: ScannerPhase) {
        self.camera.release();
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::GrayImage;
    use std::collections::VecDeque;

    struct MockCamera {
        open: bool,
        fail_open: Option<CameraError>,
    }

    impl MockCamera {
        fn working() -> Self {
            Self {
                open: false,
                fail_open: None,
            }
        }

        fn failing(error: CameraError) -> Self {
            Self {
                open: false,
                fail_open: Some(error),
            }
        }
    }

    #[async_trait]
    impl FrameSource for MockCamera {
        async fn open(&mut self, _request: &CameraRequest) -> Result<(), CameraError> {
            if let Some(e) = self.fail_open.clone() {
                return Err(e);
            }
            self.open = true;
            Ok(())
        }

        async fn capture(&mut self) -> Result<Frame, CameraError> {
            Ok(Frame::new(4, 4))
        }

        fn release(&mut self) {
            self.open = false;
        }

        fn is_open(&self) -> bool {
            self.open
        }
    }

    /// Plays back a scripted sequence of recognitions, one per tick,
    /// repeating the last entry once the script runs out
    struct MockEngine {
        script: VecDeque<String>,
        delay: Duration,
    }

    impl MockEngine {
        fn reading(script: &[&str]) -> Self {
            Self {
                script: script.iter().map(|s| (*s).to_string()).collect(),
                delay: Duration::ZERO,
            }
        }

        fn slow(script: &[&str], delay: Duration) -> Self {
            let mut engine = Self::reading(script);
            engine.delay = delay;
            engine
        }
    }

    #[async_trait]
    impl OcrEngine for MockEngine {
        async fn initialize(&mut self, _config: &OcrConfig) -> Result<(), OcrError> {
            Ok(())
        }

        async fn recognize(&mut self, _frame: &GrayImage) -> Result<String, OcrError> {
            if self.delay > Duration::ZERO {
                tokio::time::sleep(self.delay).await;
            }
            let next = match self.script.len() {
                0 => String::new(),
                1 => self.script[0].clone(),
                _ => self.script.pop_front().unwrap_or_default(),
            };
            Ok(next)
        }
    }

    fn fast_config() -> ScannerConfig {
        ScannerConfig {
            tick: Duration::from_millis(10),
            ..ScannerConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn emits_first_valid_code_and_stops() {
        let (_tx, rx) = watch::channel(true);
        let mut scanner = NumberScanner::with_config(
            MockCamera::working(),
            MockEngine::reading(&["door 9921 hall"]),
            fast_config(),
        );

        let result = scanner.run(rx).await.expect("session runs");
        assert_eq!(result.as_deref(), Some("9921"));
        assert_eq!(scanner.phase(), ScannerPhase::Found);
        assert!(!scanner.camera.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_scanning_past_wrong_length_digits() {
        let (_tx, rx) = watch::channel(true);
        // 2 digits, then 5 digits, then a real code
        let mut scanner = NumberScanner::with_config(
            MockCamera::working(),
            MockEngine::reading(&["99", "99215", "1042"]),
            fast_config(),
        );

        let result = scanner.run(rx).await.expect("session runs");
        assert_eq!(result.as_deref(), Some("1042"));
    }

    #[tokio::test(start_paused = true)]
    async fn first_match_wins_even_when_out_of_range() {
        let (_tx, rx) = watch::channel(true);
        // "0042" is the first 4-digit token; the frame is rejected outright
        // rather than falling through to "9921"
        let mut scanner = NumberScanner::with_config(
            MockCamera::working(),
            MockEngine::reading(&["0042 9921", "1042"]),
            fast_config(),
        );

        let result = scanner.run(rx).await.expect("session runs");
        assert_eq!(result.as_deref(), Some("1042"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_without_emitting() {
        let (tx, rx) = watch::channel(true);
        let mut scanner = NumberScanner::with_config(
            MockCamera::working(),
            MockEngine::reading(&["no digits here"]),
            fast_config(),
        );

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(35)).await;
            let _ = tx.send(false);
        });

        let result = scanner.run(rx).await.expect("session runs");
        assert_eq!(result, None);
        assert_eq!(scanner.phase(), ScannerPhase::Idle);
        assert!(!scanner.camera.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn mid_recognition_cancellation_discards_the_result() {
        let (tx, rx) = watch::channel(true);
        // Recognition takes 200ms per pass; the stop lands at 50ms, well
        // inside the first in-flight pass, which would otherwise match.
        let mut scanner = NumberScanner::with_config(
            MockCamera::working(),
            MockEngine::slow(&["9921"], Duration::from_millis(200)),
            fast_config(),
        );

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = tx.send(false);
        });

        let result = scanner.run(rx).await.expect("session runs");
        assert_eq!(result, None);
        assert!(!scanner.camera.is_open());
    }

    #[tokio::test]
    async fn camera_failure_is_terminal_with_distinct_error() {
        let (_tx, rx) = watch::channel(true);
        let mut scanner = NumberScanner::with_config(
            MockCamera::failing(CameraError::PermissionDenied),
            MockEngine::reading(&["9921"]),
            fast_config(),
        );

        let err = scanner.run(rx).await.expect_err("camera must fail");
        assert!(matches!(
            err,
            ScanError::Camera(CameraError::PermissionDenied)
        ));
        assert_eq!(scanner.phase(), ScannerPhase::Error);
    }

    #[test]
    fn extraction_follows_word_boundaries() {
        assert_eq!(extract_code("code: 9921."), Some("9921".to_string()));
        assert_eq!(extract_code("99"), None);
        assert_eq!(extract_code("99215"), None);
        assert_eq!(extract_code("x99215x 1042"), Some("1042".to_string()));
        assert_eq!(extract_code("0042"), None);
        assert_eq!(extract_code(""), None);
    }

    #[test]
    fn camera_errors_have_distinct_user_messages() {
        let messages: std::collections::HashSet<_> = [
            CameraError::PermissionDenied,
            CameraError::NotSupported,
            CameraError::Busy,
            CameraError::NotFound,
        ]
        .iter()
        .map(CameraError::user_message)
        .collect();
        assert_eq!(messages.len(), 4);
    }
}
