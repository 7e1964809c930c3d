//! Face and pose landmark detectors.
//!
//! Detectors are external collaborators: the pipeline only relies on the
//! contract "zero or one landmark set per image". A detector may keep
//! internal buffers between calls, so methods take `&mut self` and an
//! instance is owned by exactly one [`Analyzer`] at a time.

use std::io::{self, Cursor, ErrorKind, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use image::{ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::pipeline::Analyzer;
use crate::types::LandmarkSet;

/// Produces the face mesh for the single most prominent face, if any.
pub trait FaceLandmarker {
    fn detect_face(&mut self, image: &RgbImage) -> Result<Option<LandmarkSet>>;
}

/// Produces the body skeleton for the single most prominent person, if any.
pub trait PoseLandmarker {
    fn detect_pose(&mut self, image: &RgbImage) -> Result<Option<LandmarkSet>>;
}

impl<T: FaceLandmarker + ?Sized> FaceLandmarker for Box<T> {
    fn detect_face(&mut self, image: &RgbImage) -> Result<Option<LandmarkSet>> {
        (**self).detect_face(image)
    }
}

impl<T: PoseLandmarker + ?Sized> PoseLandmarker for Box<T> {
    fn detect_pose(&mut self, image: &RgbImage) -> Result<Option<LandmarkSet>> {
        (**self).detect_pose(image)
    }
}

pub type BoxedFaceLandmarker = Box<dyn FaceLandmarker + Send>;
pub type BoxedPoseLandmarker = Box<dyn PoseLandmarker + Send>;
pub type BoxedAnalyzer = Analyzer<BoxedFaceLandmarker, BoxedPoseLandmarker>;

/// A detector that never finds anything.
///
/// With it, face shape and body type always read "Not detected" while the
/// pixel-based attributes are still classified.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledLandmarker;

impl FaceLandmarker for DisabledLandmarker {
    fn detect_face(&mut self, _image: &RgbImage) -> Result<Option<LandmarkSet>> {
        Ok(None)
    }
}

impl PoseLandmarker for DisabledLandmarker {
    fn detect_pose(&mut self, _image: &RgbImage) -> Result<Option<LandmarkSet>> {
        Ok(None)
    }
}

/// What the external landmark program prints on stdout.
#[derive(Debug, Deserialize, Serialize)]
pub struct CommandOutput {
    pub landmarks: Option<LandmarkSet>,
}

/// How often a running landmark program is polled while a deadline is set.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Bridges to an external landmark program, one process per call.
///
/// The program is run as `program args... <face|pose>`, receives the image
/// PNG-encoded on stdin and must print a [`CommandOutput`] JSON document.
/// With a deadline, a program still running when it passes is killed and
/// reaped, and the call fails.
#[derive(Debug, Clone)]
pub struct CommandLandmarker {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub deadline: Option<Instant>,
}

impl CommandLandmarker {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn run(&self, mode: &str, image: &RgbImage) -> Result<Option<LandmarkSet>> {
        let mut png = Cursor::new(Vec::new());
        image.write_to(&mut png, ImageFormat::Png)?;
        let png = png.into_inner();

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(mode)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                Error::Detector(format!("failed to start {:?}: {}", self.program, e))
            })?;

        // stdin is fed while stdout and stderr drain, so a program that logs
        // heavily before reading its input can't fill a pipe and stall.
        let stdin = child.stdin.take();
        let writer = thread::spawn(move || match stdin {
            Some(mut stdin) => stdin.write_all(&png),
            None => Ok(()),
        });
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.wait(&mut child) {
            Ok(Some(status)) => status,
            Ok(None) => {
                kill_and_reap(&mut child);
                warn!(mode, program = ?self.program, "landmarker killed at deadline");
                return Err(Error::Detector(format!(
                    "{} landmarker did not finish before the deadline",
                    mode
                )));
            }
            Err(e) => {
                kill_and_reap(&mut child);
                return Err(e.into());
            }
        };

        let stderr = joined(stderr)?;
        if !status.success() {
            return Err(Error::Detector(format!(
                "{} landmarker exited with {}: {}",
                mode,
                status,
                String::from_utf8_lossy(&stderr).trim()
            )));
        }

        match joined(writer) {
            Ok(()) => {}
            // The program answered without reading all of its input.
            Err(Error::Io(e)) if e.kind() == ErrorKind::BrokenPipe => {
                debug!(mode, "landmarker closed stdin early");
            }
            Err(e) => {
                return Err(Error::Detector(format!(
                    "failed to send image to {:?}: {}",
                    self.program, e
                )))
            }
        }

        let parsed: CommandOutput = serde_json::from_slice(&joined(stdout)?)?;
        debug!(
            mode,
            landmarks = parsed.landmarks.as_ref().map_or(0, |l| l.num_landmarks()),
            "external landmarker finished"
        );
        Ok(parsed.landmarks)
    }

    /// Wait for the program to exit. `None` if the deadline passed first.
    fn wait(&self, child: &mut Child) -> io::Result<Option<ExitStatus>> {
        let Some(deadline) = self.deadline else {
            return child.wait().map(Some);
        };
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn joined<T>(handle: JoinHandle<io::Result<T>>) -> Result<T> {
    handle
        .join()
        .map_err(|_| Error::Detector("landmarker pipe thread panicked".to_string()))?
        .map_err(Error::from)
}

fn kill_and_reap(child: &mut Child) {
    // kill fails if the program exited meanwhile; wait reaps it either way.
    let _ = child.kill();
    let _ = child.wait();
}

impl FaceLandmarker for CommandLandmarker {
    fn detect_face(&mut self, image: &RgbImage) -> Result<Option<LandmarkSet>> {
        self.run("face", image)
    }
}

impl PoseLandmarker for CommandLandmarker {
    fn detect_pose(&mut self, image: &RgbImage) -> Result<Option<LandmarkSet>> {
        self.run("pose", image)
    }
}

/// Configured detector backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase", tag = "backend")]
pub enum DetectorBackend {
    #[default]
    Disabled,
    Command {
        program: PathBuf,
        #[serde(default)]
        args: Vec<String>,
    },
}

/// Builds a fresh analyzer, with its own detector instances, per request.
pub trait DetectorFactory: Send + Sync {
    fn analyzer(&self) -> Result<BoxedAnalyzer>;
}

impl DetectorBackend {
    /// Build an analyzer. External programs share one deadline, `budget`
    /// from now, across the face and pose calls.
    pub fn analyzer_within(&self, budget: Option<Duration>) -> BoxedAnalyzer {
        match self {
            DetectorBackend::Disabled => Analyzer::new(
                Box::new(DisabledLandmarker) as BoxedFaceLandmarker,
                Box::new(DisabledLandmarker) as BoxedPoseLandmarker,
            ),
            DetectorBackend::Command { program, args } => {
                let mut landmarker = CommandLandmarker::new(program.clone(), args.clone());
                if let Some(budget) = budget {
                    landmarker = landmarker.with_deadline(Instant::now() + budget);
                }
                Analyzer::new(
                    Box::new(landmarker.clone()) as BoxedFaceLandmarker,
                    Box::new(landmarker) as BoxedPoseLandmarker,
                )
            }
        }
    }
}

impl DetectorFactory for DetectorBackend {
    fn analyzer(&self) -> Result<BoxedAnalyzer> {
        Ok(self.analyzer_within(None))
    }
}

/// A backend whose external programs are killed once `budget` has elapsed
/// since the analyzer was built.
#[derive(Debug, Clone)]
pub struct BudgetedBackend {
    pub backend: DetectorBackend,
    pub budget: Duration,
}

impl DetectorFactory for BudgetedBackend {
    fn analyzer(&self) -> Result<BoxedAnalyzer> {
        Ok(self.backend.analyzer_within(Some(self.budget)))
    }
}

impl<F> DetectorFactory for F
where
    F: Fn() -> BoxedAnalyzer + Send + Sync,
{
    fn analyzer(&self) -> Result<BoxedAnalyzer> {
        Ok(self())
    }
}
