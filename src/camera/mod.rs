/// Camera capture session
///
/// The device is owned by a dedicated worker thread: it opens the stream,
/// decodes frames, JPEG-encodes them, and publishes the newest one into a
/// shared slot. The UI polls that slot on a timer while the camera view is
/// open. Only one session exists at a time; dropping the session (close,
/// replace, capture) stops the worker and releases the device handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use thiserror::Error;
use tracing::{info, warn};

use crate::state::image::CapturedImage;

/// JPEG quality for preview frames and captured stills
const JPEG_QUALITY: u8 = 85;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("Could not open camera: {0}")]
    Open(String),

    #[error("Camera stream failed: {0}")]
    Stream(String),
}

pub struct CameraSession {
    /// Newest JPEG-encoded frame from the worker
    latest: Arc<Mutex<Option<Vec<u8>>>>,
    /// Failure reported by the worker, consumed once by the UI
    error: Arc<Mutex<Option<CameraError>>>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl CameraSession {
    /// Start a capture session on the given device index.
    ///
    /// Returns immediately; the device is opened on the worker thread and
    /// any failure shows up through `take_error`.
    pub fn start(device_index: u32) -> Self {
        let latest = Arc::new(Mutex::new(None));
        let error = Arc::new(Mutex::new(None));
        let stop = Arc::new(AtomicBool::new(false));

        let worker = {
            let latest = Arc::clone(&latest);
            let error = Arc::clone(&error);
            let stop = Arc::clone(&stop);

            std::thread::Builder::new()
                .name("camera-capture".to_string())
                .spawn(move || capture_loop(device_index, latest, error, stop))
        };

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(err) => {
                *error.lock().expect("camera error slot poisoned") =
                    Some(CameraError::Open(err.to_string()));
                None
            }
        };

        Self {
            latest,
            error,
            stop,
            worker,
        }
    }

    /// Newest preview frame, if the worker has produced one yet.
    pub fn latest_frame(&self) -> Option<Vec<u8>> {
        self.latest
            .lock()
            .expect("camera frame slot poisoned")
            .clone()
    }

    /// Take the worker's failure, if it reported one.
    pub fn take_error(&self) -> Option<CameraError> {
        self.error
            .lock()
            .expect("camera error slot poisoned")
            .take()
    }

    /// Freeze the newest frame into a `CapturedImage`.
    ///
    /// Returns `None` when no frame has arrived yet (the stream is still
    /// warming up).
    pub fn capture(&self) -> Option<CapturedImage> {
        self.latest_frame().map(CapturedImage::from_camera_frame)
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("camera worker panicked during shutdown");
            }
        }
    }
}

/// Worker thread body. Owns the device for the whole session; the device
/// handle is released when this returns.
fn capture_loop(
    device_index: u32,
    latest: Arc<Mutex<Option<Vec<u8>>>>,
    error: Arc<Mutex<Option<CameraError>>>,
    stop: Arc<AtomicBool>,
) {
    let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);

    let mut camera = match Camera::new(CameraIndex::Index(device_index), requested) {
        Ok(camera) => camera,
        Err(err) => {
            *error.lock().expect("camera error slot poisoned") =
                Some(CameraError::Open(err.to_string()));
            return;
        }
    };

    if let Err(err) = camera.open_stream() {
        *error.lock().expect("camera error slot poisoned") =
            Some(CameraError::Open(err.to_string()));
        return;
    }

    info!("camera stream opened: {}", camera.info().human_name());

    while !stop.load(Ordering::Relaxed) {
        let frame = match camera.frame() {
            Ok(frame) => frame,
            Err(err) => {
                *error.lock().expect("camera error slot poisoned") =
                    Some(CameraError::Stream(err.to_string()));
                break;
            }
        };

        let decoded = match frame.decode_image::<RgbFormat>() {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!("dropping undecodable frame: {err}");
                continue;
            }
        };

        match encode_jpeg(&decoded) {
            Ok(jpeg) => {
                *latest.lock().expect("camera frame slot poisoned") = Some(jpeg);
            }
            Err(err) => warn!("frame encoding failed: {err}"),
        }
    }

    info!("camera stream closed");
}

fn encode_jpeg(frame: &RgbImage) -> Result<Vec<u8>, image::ImageError> {
    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
    encoder.encode_image(frame)?;
    Ok(jpeg)
}
