use std::path::PathBuf;
use std::time::Duration;

use eframe::egui;
use log::{debug, info, warn};
use photo_editor_adapters::{
    present_adjustment_value, present_field_label, present_history_status, present_preset_label,
    present_state_json,
};
use photo_editor_application::{
    ApplicationService, ExportCommand, ExportOutcome, PollPreviewCommand, PollUploadCommand,
    SelectFilterCommand, SetAdjustmentCommand, SubmitPreviewCommand, UndoCommand,
    UploadImageCommand,
};
use photo_editor_domain::{AdjustmentField, FilterExpression, FilterPreset, PreviewFrame};

use crate::config::AppConfig;

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];
const POLL_INTERVAL: Duration = Duration::from_millis(30);
const CONTROL_PANEL_WIDTH: f32 = 280.0;

/// Remembers what the preview last rendered so it is resubmitted only when
/// the source or the composite expression changes.
#[derive(Debug, Default)]
struct PreviewTracker {
    source_generation: u64,
    submitted: Option<(u64, FilterExpression)>,
}

impl PreviewTracker {
    fn source_replaced(&mut self) {
        self.source_generation += 1;
    }

    fn needs_submit(&self, expression: &FilterExpression) -> bool {
        match &self.submitted {
            Some((generation, submitted)) => {
                *generation != self.source_generation || submitted != expression
            }
            None => true,
        }
    }

    fn mark_submitted(&mut self, expression: FilterExpression) {
        self.submitted = Some((self.source_generation, expression));
    }

    /// Frames are shown only once a request for the current source is out;
    /// anything earlier belongs to a replaced image.
    fn accepts_frame(&self) -> bool {
        matches!(&self.submitted, Some((generation, _)) if *generation == self.source_generation)
    }
}

struct EditorApp {
    service: ApplicationService,
    config: AppConfig,
    preview: PreviewTracker,
    texture: Option<egui::TextureHandle>,
    busy: bool,
    status: String,
}

impl EditorApp {
    fn new(service: ApplicationService, config: AppConfig, initial_image: Option<PathBuf>) -> Self {
        let mut app = Self {
            service,
            config,
            preview: PreviewTracker::default(),
            texture: None,
            busy: false,
            status: String::new(),
        };
        if initial_image.is_some() {
            app.begin_upload(initial_image);
        }
        app
    }

    fn pick_image(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_file();
        self.begin_upload(picked);
    }

    fn begin_upload(&mut self, path: Option<PathBuf>) {
        match self.service.upload_image(UploadImageCommand { path }) {
            Ok(Some(ticket)) => {
                debug!("upload {} started", ticket.0);
                self.busy = true;
            }
            Ok(None) => {}
            Err(error) => warn!("upload failed to start: {error}"),
        }
    }

    fn poll_workers(&mut self, ctx: &egui::Context) {
        // Sampled before draining: workers queue results before going idle.
        let mut busy = self.service.upload_in_flight() || self.service.preview_in_flight();

        match self.service.poll_upload(PollUploadCommand) {
            Ok(true) => {
                self.preview.source_replaced();
                self.texture = None;
                debug!("{}", present_state_json(self.service.state()));
            }
            Ok(false) => {}
            Err(error) => warn!("upload poll failed: {error}"),
        }

        let expression = self.service.composite_expression();
        if self.preview.needs_submit(&expression) {
            let edge = self.config.preview_max_edge;
            match self.service.submit_preview(SubmitPreviewCommand {
                target_width: edge,
                target_height: edge,
            }) {
                Ok(true) => {
                    self.preview.mark_submitted(expression);
                    busy = true;
                }
                Ok(false) => {}
                Err(error) => warn!("preview submit failed: {error}"),
            }
        }

        match self.service.poll_preview(PollPreviewCommand) {
            Ok(Some(frame)) if self.preview.accepts_frame() => self.show_frame(ctx, &frame),
            Ok(Some(frame)) => debug!("preview {} belongs to a replaced image", frame.sequence),
            Ok(None) => {}
            Err(error) => warn!("preview poll failed: {error}"),
        }

        self.busy = busy;
    }

    fn show_frame(&mut self, ctx: &egui::Context, frame: &PreviewFrame) {
        debug!(
            "preview {} ready: {}x{} in {}ms",
            frame.sequence, frame.width, frame.height, frame.render_time_ms
        );
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [frame.width as usize, frame.height as usize],
            &frame.pixels,
        );
        match self.texture.as_mut() {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("photo-editor-preview", image, egui::TextureOptions::LINEAR));
            }
        }
    }

    fn set_adjustment(&mut self, field: AdjustmentField, value: i32) {
        self.service
            .set_adjustment(SetAdjustmentCommand { field, value });
        debug!("{}", present_state_json(self.service.state()));
    }

    fn select_filter(&mut self, preset: FilterPreset) {
        self.service.select_filter(SelectFilterCommand { preset });
        debug!("{}", present_state_json(self.service.state()));
    }

    fn undo(&mut self) {
        if self.service.undo(UndoCommand) {
            debug!("{}", present_state_json(self.service.state()));
        }
    }

    fn download(&mut self) {
        let command = ExportCommand {
            file_name: self.config.export_file_name.clone(),
        };
        match self.service.export(command) {
            Ok(ExportOutcome::Delivered { location }) => {
                info!("download saved to {}", location.display());
                self.status = format!("Saved {}", location.display());
            }
            Ok(ExportOutcome::Skipped) => {}
            Err(error) => warn!("download failed: {error}"),
        }
    }

    fn draw_upload_prompt(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.35);
            ui.heading("Photo editor");
            ui.label("Open an image to start editing.");
            ui.add_space(12.0);
            if ui.button("Open image…").clicked() {
                self.pick_image();
            }
            if self.service.upload_in_flight() {
                ui.add_space(8.0);
                ui.spinner();
            }
        });
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Open").clicked() {
                self.pick_image();
            }
            let can_undo = self.service.state().history().len() > 1;
            if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                self.undo();
            }
            if ui.button("Download").clicked() {
                self.download();
            }
            ui.separator();
            ui.label(present_history_status(self.service.state().history()));
            if !self.status.is_empty() {
                ui.separator();
                ui.label(&self.status);
            }
        });
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Adjustments");
        let adjustments = self.service.state().adjustments();
        for field in AdjustmentField::ALL {
            let mut value = adjustments.get(field);
            ui.label(present_field_label(field));
            let changed = ui
                .horizontal(|ui| {
                    let response =
                        ui.add(egui::Slider::new(&mut value, field.range()).show_value(false));
                    ui.label(present_adjustment_value(field, value));
                    response.changed()
                })
                .inner;
            if changed {
                self.set_adjustment(field, value);
            }
        }

        ui.add_space(16.0);
        ui.heading("Filters");
        let selected = self.service.state().preset();
        ui.horizontal_wrapped(|ui| {
            for preset in FilterPreset::ALL {
                if ui
                    .selectable_label(preset == selected, present_preset_label(preset))
                    .clicked()
                {
                    self.select_filter(preset);
                }
            }
        });
    }

    fn draw_preview(&self, ui: &mut egui::Ui) {
        match &self.texture {
            Some(texture) => {
                ui.centered_and_justified(|ui| {
                    ui.add(
                        egui::Image::from_texture(egui::load::SizedTexture::from_handle(texture))
                            .shrink_to_fit(),
                    );
                });
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            }
        }
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_workers(ctx);

        let undo_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Z);
        if ctx.input_mut(|input| input.consume_shortcut(&undo_shortcut)) {
            self.undo();
        }

        if self.service.state().source().is_none() {
            egui::CentralPanel::default().show(ctx, |ui| self.draw_upload_prompt(ui));
        } else {
            egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.draw_toolbar(ui));
            egui::SidePanel::right("controls")
                .exact_width(CONTROL_PANEL_WIDTH)
                .resizable(false)
                .show(ctx, |ui| self.draw_controls(ui));
            egui::CentralPanel::default().show(ctx, |ui| self.draw_preview(ui));
        }

        if self.busy {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }
}

pub fn launch_window(
    service: ApplicationService,
    config: AppConfig,
    initial_image: Option<PathBuf>,
) -> Result<(), String> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(config.window_size),
        ..Default::default()
    };

    eframe::run_native(
        "photo-editor",
        options,
        Box::new(move |_cc| Ok(Box::new(EditorApp::new(service, config, initial_image)))),
    )
    .map_err(|error| format!("failed to start UI: {error}"))
}
