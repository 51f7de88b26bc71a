use std::path::Path;

use super::*;
use crate::frame::AcquisitionError;

impl RecognitionController {
    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// Switch between the live camera and an uploaded image.
    ///
    /// Any switch ends the current session; leaving camera mode also stops the feed.
    pub fn set_input_mode(&mut self, mode: InputMode) {
        if self.input_mode == mode {
            return;
        }
        self.stop_feed();
        self.end_session();
        self.input_mode = mode;
        tracing::info!(?mode, "Input mode changed");
    }

    pub fn start_camera(&mut self) -> Result<(), AcquisitionError> {
        self.last_error = None;
        let result = match self.camera.as_mut() {
            Some(camera) => camera.start(),
            None => Err(AcquisitionError::CameraUnavailable(
                "no camera backend configured".to_string(),
            )),
        };
        match &result {
            Ok(()) => tracing::info!("Camera started"),
            Err(err) => {
                tracing::warn!("Error accessing camera: {err:?}");
                self.last_error = Some(err.to_string());
            }
        }
        result
    }

    /// Stop the live feed and tear down the session that was using it.
    pub fn stop_camera(&mut self) {
        self.stop_feed();
        self.end_session();
    }

    pub fn toggle_camera(&mut self) -> Result<(), AcquisitionError> {
        if self.camera_active() {
            self.stop_camera();
            Ok(())
        } else {
            self.start_camera()
        }
    }

    /// Store user-supplied bytes as the image to analyze.
    pub fn load_image_bytes(&mut self, bytes: Vec<u8>) -> Result<(), AcquisitionError> {
        self.accept_upload(Frame::from_image_bytes(bytes))
    }

    pub fn load_image_file(&mut self, path: &Path) -> Result<(), AcquisitionError> {
        self.accept_upload(Frame::from_path(path))
    }

    pub fn clear_image(&mut self) {
        self.uploaded = None;
    }

    /// Release the camera and drop all pending timers.
    pub fn shutdown(&mut self) {
        self.stop_feed();
        self.end_session();
    }

    fn accept_upload(&mut self, frame: Result<Frame, AcquisitionError>) -> Result<(), AcquisitionError> {
        match frame {
            Ok(frame) => {
                tracing::info!(mime = %frame.mime_type, bytes = frame.bytes.len(), "Image loaded");
                self.uploaded = Some(frame);
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub(super) fn camera_active(&self) -> bool {
        self.camera.as_ref().is_some_and(|camera| camera.is_active())
    }

    pub(super) fn frame_available(&self) -> bool {
        match self.input_mode {
            InputMode::Camera => self.camera_active(),
            InputMode::Image => self.uploaded.is_some(),
        }
    }

    pub(super) fn capture_frame(&mut self) -> Result<Frame, RecognitionRejected> {
        match self.input_mode {
            InputMode::Image => self.uploaded.clone().ok_or(RecognitionRejected::NoFrame),
            InputMode::Camera => match self.camera.as_mut() {
                Some(camera) if camera.is_active() => Ok(camera.capture()?),
                _ => Err(RecognitionRejected::NoFrame),
            },
        }
    }

    /// Stop the camera hardware without touching session state.
    pub(super) fn stop_feed(&mut self) {
        if let Some(camera) = self.camera.as_mut()
            && camera.is_active()
        {
            camera.stop();
            tracing::info!("Camera stopped");
        }
    }
}
