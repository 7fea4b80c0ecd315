// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! UI components never mutate the session directly. They report what the
//! user did as `AppEvent`s, which `HydroApp::dispatch` applies one at a
//! time, each to completion, after the panels have been laid out. Slow work
//! (image loading, analysis) runs on worker threads and reports back over
//! channels polled at the start of every frame.

use crate::config::{self, AppConfig};
use crate::detection::{self, client::GeminiClient, client::GenerativeModel, AnalysisRequest};
use crate::io::{media, serialization};
use crate::models::bounding_box::{BoundingBox, DetectType};
use crate::models::remedies::{remediation_panels, Remedy};
use crate::models::report::DetectionReport;
use crate::models::session::{ActiveMedia, AnalysisApplied, MediaKind, Session};
use crate::models::stroke::{Point, StrokeColor};
use crate::ui::{canvas, feedback, notice::Notice, prompt, sidebar, toolbar};
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::time::Duration;

/// Something the user asked for, produced by the UI and applied by the app.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    SelectExample(&'static str),
    UploadImage(PathBuf),
    StartCamera,
    StopCamera,
    ResetSession,
    SetModel(String),
    SetTemperature(f32),
    SetDetectType(DetectType),
    SetRevealOnHover(bool),
    SetDrawMode(bool),
    SetColor(StrokeColor),
    ClearStrokes,
    StrokeBegin(Point),
    StrokeExtend(Point),
    StrokeEnd,
    Analyze,
    ExportDetections(PathBuf),
    ImportDetections(PathBuf),
}

const HEALTHY_NOTICE: &str = "Your plant looks healthy!";

/// Result of background image loading operation.
type LoadedMedia = Result<ActiveMedia, String>;

/// Main application state.
pub struct HydroApp {
    config: AppConfig,
    api_key: Option<String>,
    session: Session,

    /// Texture of the active media and the session revision it shows
    media_texture: Option<egui::TextureHandle>,
    texture_revision: u64,

    /// Example previews, in catalog order once loaded
    thumbnails: Vec<(&'static str, egui::TextureHandle)>,
    thumbnail_loader: Option<Receiver<(&'static str, RgbaImage)>>,

    /// Receiver for background image loading
    media_loader: Option<Receiver<LoadedMedia>>,
    /// Loading state message
    loading_message: Option<String>,

    /// In-flight analysis: the session epoch it belongs to and its result
    analysis: Option<(u64, Receiver<Vec<BoundingBox>>)>,

    /// Advice for the current detections, rebuilt when the boxes change
    panels: Vec<(String, &'static Remedy)>,
    notice: Option<Notice>,

    #[cfg(feature = "video-opencv")]
    camera: Option<crate::io::camera::CameraStream>,
}

impl HydroApp {
    pub fn new(config: AppConfig, api_key: Option<String>) -> Self {
        let session = Session::new(config.model.clone(), config.temperature);
        let thumbnail_loader = Some(spawn_thumbnail_loader(config.examples_dir.clone()));
        Self {
            config,
            api_key,
            session,
            media_texture: None,
            texture_revision: 0,
            thumbnails: Vec::new(),
            thumbnail_loader,
            media_loader: None,
            loading_message: None,
            analysis: None,
            panels: Vec::new(),
            notice: None,
            #[cfg(feature = "video-opencv")]
            camera: None,
        }
    }

    /// Apply one event to completion.
    fn dispatch(&mut self, event: AppEvent) {
        match event {
            AppEvent::SelectExample(name) => {
                let path = media::example_path(&self.config.examples_dir, name);
                self.load_media(path, name.to_string(), MediaKind::Example);
            }
            AppEvent::UploadImage(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                self.load_media(path, name, MediaKind::Upload);
            }
            AppEvent::StartCamera => self.start_camera(),
            AppEvent::StopCamera => {
                self.stop_camera();
                self.session.reset();
                self.refresh_panels();
            }
            AppEvent::ResetSession => {
                self.stop_camera();
                self.session.reset();
                self.refresh_panels();
                log::info!("Session reset");
            }
            AppEvent::SetModel(model) => {
                log::info!("Model set to {}", model);
                self.session.set_model(model);
            }
            AppEvent::SetTemperature(t) => self.session.set_temperature(t),
            AppEvent::SetDetectType(detect_type) => self.session.set_detect_type(detect_type),
            AppEvent::SetRevealOnHover(enabled) => self.session.set_reveal_on_hover(enabled),
            AppEvent::SetDrawMode(enabled) => self.session.set_draw_mode(enabled),
            AppEvent::SetColor(color) => self.session.set_active_color(color),
            AppEvent::ClearStrokes => self.session.clear_strokes(),
            AppEvent::StrokeBegin(point) => {
                if self.session.media().is_some() {
                    self.session.begin_stroke(point);
                }
            }
            AppEvent::StrokeExtend(point) => self.session.extend_stroke(point),
            AppEvent::StrokeEnd => {
                if let Some(points) = self.session.end_stroke() {
                    log::debug!(
                        "Finished stroke with {} points, total strokes: {}",
                        points,
                        self.session.strokes().len()
                    );
                }
            }
            AppEvent::Analyze => self.start_analysis(),
            AppEvent::ExportDetections(path) => self.export_detections(path),
            AppEvent::ImportDetections(path) => self.import_detections(path),
        }
    }

    /// Load an image file in the background and activate it when done.
    fn load_media(&mut self, path: PathBuf, name: String, kind: MediaKind) {
        let (sender, receiver) = channel();
        self.media_loader = Some(receiver);
        self.loading_message = Some("Loading image...".to_string());

        std::thread::spawn(move || {
            let result = media::load_image(&path)
                .map(|raster| {
                    log::info!("Loaded image: {} ({}x{})", path.display(), raster.width(), raster.height());
                    ActiveMedia::new(name, kind, raster)
                })
                .map_err(|e| format!("{:#}", e));
            let _ = sender.send(result);
        });
    }

    fn start_analysis(&mut self) {
        let Some(epoch) = self.session.try_begin_analysis() else {
            log::debug!("Analyze ignored: busy or no media");
            return;
        };
        let Some(active) = self.session.media() else {
            return;
        };

        let request = AnalysisRequest {
            source: active.raster.clone(),
            strokes: self.session.strokes().to_vec(),
            detect_type: self.session.detect_type(),
            model: self.session.model().to_string(),
            temperature: self.session.temperature(),
            max_dimension: self.config.max_dimension,
        };
        let client = self.api_key.clone().map(|key| {
            GeminiClient::new(
                &self.config.api_base,
                key,
                Duration::from_secs(self.config.request_timeout_secs),
            )
        });
        log::info!("Analyzing {} with {}", active.name, request.model);

        let (sender, receiver) = channel();
        self.analysis = Some((epoch, receiver));
        std::thread::spawn(move || {
            let model = client.as_ref().map(|c| c as &dyn GenerativeModel);
            let _ = sender.send(detection::analyze(&request, model));
        });
    }

    fn finish_analysis(&mut self, epoch: u64, boxes: Vec<BoundingBox>) {
        match self.session.finish_analysis(epoch, boxes) {
            AnalysisApplied::Boxes(count) => log::info!("Showing {} detection(s)", count),
            AnalysisApplied::Healthy => {
                self.notice = Some(Notice::new(HEALTHY_NOTICE, self.config.notice_secs));
            }
            AnalysisApplied::Stale => log::debug!(
                "Discarding result from epoch {}, session is at epoch {}",
                epoch,
                self.session.epoch()
            ),
        }
        self.refresh_panels();
    }

    fn refresh_panels(&mut self) {
        self.panels = remediation_panels(self.session.boxes())
            .into_iter()
            .map(|(label, remedy)| (label.to_string(), remedy))
            .collect();
    }

    fn export_detections(&self, path: PathBuf) {
        let Some(active) = self.session.media() else {
            log::warn!("Nothing to export");
            return;
        };
        let dimensions = active.dimensions();
        let report = DetectionReport {
            media_file: active.name.clone(),
            frame_width: dimensions.width,
            frame_height: dimensions.height,
            model: self.session.model().to_string(),
            temperature: self.session.temperature(),
            detections: self.session.boxes().to_vec(),
        };
        match serialization::export_report(&report, &path) {
            Ok(()) => log::info!("Exported detections to {}", path.display()),
            Err(e) => log::error!("Failed to export detections: {:#}", e),
        }
    }

    fn import_detections(&mut self, path: PathBuf) {
        let report = match serialization::import_report(&path) {
            Ok(report) => report,
            Err(e) => {
                log::error!("Failed to open detections: {:#}", e);
                return;
            }
        };
        let Some(active) = self.session.media() else {
            log::warn!("Load an image before opening detections");
            return;
        };
        if active.name != report.media_file {
            log::warn!(
                "Detections were saved for {}, applying them to {}",
                report.media_file,
                active.name
            );
        }
        log::info!("Opened {} detection(s) from {}", report.detections.len(), path.display());
        self.session.replace_boxes(report.detections);
        self.refresh_panels();
    }

    #[cfg(feature = "video-opencv")]
    fn start_camera(&mut self) {
        self.stop_camera();
        match crate::io::camera::CameraStream::start(self.config.camera_index) {
            Ok(stream) => self.camera = Some(stream),
            Err(e) => log::error!("Failed to start camera: {:#}", e),
        }
    }

    #[cfg(not(feature = "video-opencv"))]
    fn start_camera(&mut self) {
        log::warn!("Camera support not compiled in (enable the video-opencv feature)");
    }

    fn stop_camera(&mut self) {
        #[cfg(feature = "video-opencv")]
        {
            self.camera = None;
        }
    }

    fn camera_active(&self) -> bool {
        #[cfg(feature = "video-opencv")]
        {
            self.camera.is_some()
        }
        #[cfg(not(feature = "video-opencv"))]
        {
            false
        }
    }

    /// Drain worker channels and the camera.
    fn poll_background(&mut self, ctx: &egui::Context) {
        if let Some(ref receiver) = self.thumbnail_loader {
            let finished = loop {
                match receiver.try_recv() {
                    Ok((name, raster)) => {
                        let texture = ctx.load_texture(
                            format!("thumbnail-{}", name),
                            color_image(&raster),
                            egui::TextureOptions::LINEAR,
                        );
                        self.thumbnails.push((name, texture));
                    }
                    Err(TryRecvError::Empty) => break false,
                    Err(TryRecvError::Disconnected) => break true,
                }
            };
            if finished {
                self.thumbnail_loader = None;
            }
        }

        if let Some(ref receiver) = self.media_loader {
            if let Ok(result) = receiver.try_recv() {
                self.media_loader = None;
                self.loading_message = None;
                match result {
                    Ok(active) => {
                        self.stop_camera();
                        self.session.set_media(active);
                        self.refresh_panels();
                    }
                    Err(e) => log::error!("Failed to load image: {}", e),
                }
            }
        }

        if let Some((epoch, ref receiver)) = self.analysis {
            match receiver.try_recv() {
                Ok(boxes) => {
                    self.analysis = None;
                    self.finish_analysis(epoch, boxes);
                }
                Err(TryRecvError::Disconnected) => {
                    log::error!("Analysis worker exited without a result");
                    self.analysis = None;
                    self.finish_analysis(epoch, Vec::new());
                }
                Err(TryRecvError::Empty) => {}
            }
        }

        #[cfg(feature = "video-opencv")]
        if let Some(frame) = self.camera.as_ref().and_then(|c| c.latest_frame()) {
            if self.session.media().map(|m| m.kind) == Some(MediaKind::Camera) {
                self.session.update_frame(frame);
            } else {
                self.session.set_media(ActiveMedia::new("camera", MediaKind::Camera, frame));
                self.refresh_panels();
            }
        }

        if self.session.media_revision() != self.texture_revision {
            self.texture_revision = self.session.media_revision();
            match self.session.media() {
                Some(active) => {
                    let image = color_image(&active.raster);
                    match self.media_texture {
                        Some(ref mut texture) => texture.set(image, egui::TextureOptions::LINEAR),
                        None => {
                            self.media_texture =
                                Some(ctx.load_texture("active_media", image, egui::TextureOptions::LINEAR))
                        }
                    }
                }
                None => self.media_texture = None,
            }
        }

        if self.notice.as_ref().is_some_and(Notice::expired) {
            self.notice = None;
        }
    }
}

fn color_image(raster: &RgbaImage) -> egui::ColorImage {
    let size = [raster.width() as usize, raster.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, raster.as_raw())
}

fn spawn_thumbnail_loader(examples_dir: PathBuf) -> Receiver<(&'static str, RgbaImage)> {
    let (sender, receiver) = channel();
    std::thread::spawn(move || {
        for name in media::EXAMPLE_IMAGES {
            let path = media::example_path(&examples_dir, name);
            match media::load_thumbnail(&path) {
                Ok(thumbnail) => {
                    if sender.send((name, thumbnail)).is_err() {
                        break;
                    }
                }
                Err(e) => log::warn!("No preview for {}: {:#}", name, e),
            }
        }
    });
    receiver
}

impl eframe::App for HydroApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_background(ctx);

        // Keep polling while work is outstanding
        if self.loading_message.is_some()
            || self.analysis.is_some()
            || self.thumbnail_loader.is_some()
            || self.camera_active()
        {
            ctx.request_repaint_after(Duration::from_millis(30));
        }

        let mut events: Vec<AppEvent> = Vec::new();
        let has_media = self.session.media().is_some();

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Upload Image...").clicked() {
                        if let Some(path) = sidebar::pick_upload() {
                            events.push(AppEvent::UploadImage(path));
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    ui.add_enabled_ui(has_media, |ui| {
                        if ui.button("Open Detections...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("Detections", &["json", "yaml", "yml"])
                                .pick_file()
                            {
                                events.push(AppEvent::ImportDetections(path));
                            }
                            ui.close_menu();
                        }
                        ui.menu_button("Export Detections", |ui| {
                            if ui.button("Export as JSON...").clicked() {
                                if let Some(path) = rfd::FileDialog::new()
                                    .add_filter("JSON", &["json"])
                                    .set_file_name("detections.json")
                                    .save_file()
                                {
                                    events.push(AppEvent::ExportDetections(path));
                                }
                                ui.close_menu();
                            }
                            if ui.button("Export as YAML...").clicked() {
                                if let Some(path) = rfd::FileDialog::new()
                                    .add_filter("YAML", &["yaml", "yml"])
                                    .set_file_name("detections.yaml")
                                    .save_file()
                                {
                                    events.push(AppEvent::ExportDetections(path));
                                }
                                ui.close_menu();
                            }
                        });
                    });
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    toolbar::show(ui, &self.session, self.api_key.is_some(), &mut events);
                });
            });
        });

        // Prompt bar
        egui::TopBottomPanel::bottom("prompt").show(ctx, |ui| {
            prompt::show(ui, &self.session, &mut events);
        });

        // Image selection and drawing controls (left side)
        egui::SidePanel::left("controls")
            .default_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    sidebar::show(ui, &self.session, &self.thumbnails, self.camera_active(), &mut events);
                });
            });

        // Remediation advice (right side)
        if !self.panels.is_empty() {
            egui::SidePanel::right("feedback")
                .default_width(320.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        feedback::show(ui, &self.panels);
                    });
                });
        }

        // Main canvas (center)
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(ref message) = self.loading_message {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.spinner();
                        ui.add_space(10.0);
                        ui.label(
                            egui::RichText::new(message)
                                .size(16.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                    });
                });
            } else {
                canvas::show(ui, &self.session, self.media_texture.as_ref(), &mut events);
            }
        });

        if let Some(ref notice) = self.notice {
            notice.show(ctx);
            ctx.request_repaint_after(notice.remaining());
        }

        for event in events {
            self.dispatch(event);
        }
    }
}

/// Build the app from config and environment.
pub fn build() -> HydroApp {
    let config = AppConfig::load();
    let api_key = config::load_api_key();
    HydroApp::new(config, api_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stroke::PALETTE;

    fn app(dir: &tempfile::TempDir) -> HydroApp {
        let config = AppConfig {
            examples_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        HydroApp::new(config, None)
    }

    fn photo() -> ActiveMedia {
        ActiveMedia::new("leaf.png", MediaKind::Upload, RgbaImage::new(40, 20))
    }

    fn wilting() -> BoundingBox {
        BoundingBox {
            x: 0.1,
            y: 0.1,
            width: 0.5,
            height: 0.5,
            label: "wilting".to_string(),
        }
    }

    #[test]
    fn test_stroke_events_record_points() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);

        // Ignored without media
        app.dispatch(AppEvent::StrokeBegin(Point::new(0.1, 0.1)));
        assert!(app.session.strokes().is_empty());

        app.session.set_media(photo());
        app.dispatch(AppEvent::SetColor(PALETTE[4]));
        app.dispatch(AppEvent::StrokeBegin(Point::new(0.1, 0.1)));
        app.dispatch(AppEvent::StrokeExtend(Point::new(0.2, 0.2)));
        app.dispatch(AppEvent::StrokeEnd);
        app.dispatch(AppEvent::StrokeExtend(Point::new(0.9, 0.9)));

        let strokes = app.session.strokes();
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].point_count(), 2);
        assert_eq!(strokes[0].color, PALETTE[4]);

        app.dispatch(AppEvent::ClearStrokes);
        assert!(app.session.strokes().is_empty());
    }

    #[test]
    fn test_results_refresh_remediation_panels() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.session.set_media(photo());

        let epoch = app.session.try_begin_analysis().unwrap();
        app.finish_analysis(epoch, vec![wilting(), wilting()]);
        assert_eq!(app.panels.len(), 1);
        assert_eq!(app.panels[0].0, "wilting");
        assert!(app.notice.is_none());

        app.dispatch(AppEvent::ResetSession);
        assert!(app.panels.is_empty());
        assert!(app.session.media().is_none());
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.session.set_media(photo());

        let epoch = app.session.try_begin_analysis().unwrap();
        app.session.set_media(photo());
        assert_eq!(app.session.epoch(), epoch + 1);
        app.finish_analysis(epoch, vec![wilting()]);

        assert!(app.session.boxes().is_empty());
        assert!(app.panels.is_empty());
        assert!(!app.session.is_busy());
    }

    #[test]
    fn test_analysis_without_key_reports_healthy() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.session.set_media(photo());

        app.dispatch(AppEvent::Analyze);
        assert!(app.session.is_busy());
        // Second request while busy is ignored
        app.dispatch(AppEvent::Analyze);

        let (epoch, receiver) = app.analysis.take().unwrap();
        let boxes = receiver.recv().unwrap();
        app.finish_analysis(epoch, boxes);

        assert!(!app.session.is_busy());
        assert!(app.session.boxes().is_empty());
        assert!(app.notice.is_some());
    }

    #[test]
    fn test_export_then_open_detections() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.session.set_media(photo());
        app.session.replace_boxes(vec![wilting()]);

        let path = dir.path().join("detections.json");
        app.dispatch(AppEvent::ExportDetections(path.clone()));
        assert!(path.exists());

        app.session.set_media(photo());
        assert!(app.session.boxes().is_empty());
        app.dispatch(AppEvent::ImportDetections(path));
        assert_eq!(app.session.boxes(), &[wilting()]);
        assert_eq!(app.panels.len(), 1);
    }
}
