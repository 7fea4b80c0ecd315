// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Live camera capture.
//!
//! A grabber thread reads frames from the camera and hands the most recent
//! one to the UI. Frames the UI has not picked up yet are dropped rather
//! than queued.

use anyhow::{anyhow, Context, Result};
use image::RgbaImage;
use opencv::{core::Mat, imgproc, prelude::*, videoio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Handle to a running camera. Dropping it stops the grabber thread.
pub struct CameraStream {
    frames: Receiver<RgbaImage>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl CameraStream {
    /// Open the camera and start grabbing frames.
    pub fn start(index: i32) -> Result<Self> {
        let mut capture = videoio::VideoCapture::new(index, videoio::CAP_ANY)
            .with_context(|| format!("failed to open camera {}", index))?;
        if !capture.is_opened().unwrap_or(false) {
            return Err(anyhow!("camera {} is not available", index));
        }
        log::info!("Camera {} opened", index);

        let (sender, frames) = sync_channel(1);
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = running.clone();
        let handle = std::thread::spawn(move || grab_frames(&mut capture, &sender, &thread_running));

        Ok(Self {
            frames,
            running,
            handle: Some(handle),
        })
    }

    /// Most recent frame since the last call, if any.
    pub fn latest_frame(&self) -> Option<RgbaImage> {
        self.frames.try_iter().last()
    }
}

impl Drop for CameraStream {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        log::info!("Camera stopped");
    }
}

fn grab_frames(capture: &mut videoio::VideoCapture, sender: &SyncSender<RgbaImage>, running: &AtomicBool) {
    let mut frame = Mat::default();
    while running.load(Ordering::Relaxed) {
        match capture.read(&mut frame) {
            Ok(true) if !frame.empty() => match to_rgba(&frame) {
                Ok(image) => match sender.try_send(image) {
                    Ok(()) | Err(TrySendError::Full(_)) => {}
                    Err(TrySendError::Disconnected(_)) => break,
                },
                Err(e) => log::debug!("Dropping camera frame: {}", e),
            },
            Ok(_) => std::thread::sleep(std::time::Duration::from_millis(10)),
            Err(e) => {
                log::error!("Camera read failed: {}", e);
                break;
            }
        }
    }
}

fn to_rgba(frame: &Mat) -> Result<RgbaImage> {
    let mut rgba = Mat::default();
    imgproc::cvt_color(frame, &mut rgba, imgproc::COLOR_BGR2RGBA, 0)?;
    let (width, height) = (rgba.cols() as u32, rgba.rows() as u32);
    let bytes = rgba.data_bytes()?.to_vec();
    RgbaImage::from_raw(width, height, bytes).ok_or_else(|| anyhow!("frame buffer size mismatch"))
}
