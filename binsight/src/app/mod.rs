pub mod common;
mod components;
pub mod config;
mod events;
pub mod storage;

use std::{path::PathBuf, sync::mpsc::Sender, thread::JoinHandle};

use self::components::{DataPanel, Histogram, HistogramMode};
use crate::data::DataCollection;
use crate::DynRequestSender;
use config::Config;
use events::{EventQueue, SaveLoadRequested, SetDataDir};
use storage::{load_json, save_json};
use viewer_core::backend::BackendRequest;

use crate::BackendAppState;

pub struct ViewerApp {
    pub(crate) config: Config,
    backend_thread_handle: Option<JoinHandle<()>>,
    pub(crate) data: DataCollection,
    data_panel: DataPanel,
    pub(crate) histogram: Histogram,
    pub(crate) request_tx: DynRequestSender,
    shortcuts_modal_open: bool,
    ui_selection: UISelection,
    event_queue: EventQueue<Self>,
    request_redraw: Option<()>,
}

#[derive(Debug, PartialEq, Eq)]
enum UISelection {
    Histogram,
    Data,
    Preferences,
}

impl UISelection {
    fn next(&self) -> Self {
        match self {
            UISelection::Histogram => Self::Data,
            UISelection::Data => Self::Histogram,
            UISelection::Preferences => Self::Histogram,
        }
    }
}

impl ViewerApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: Config,
        request_tx: Sender<Box<dyn BackendRequest<BackendAppState>>>,
        backend_thread_handle: JoinHandle<()>,
    ) -> Self {
        let histogram = Histogram::new(config.default_n_bins);

        Self {
            config,
            backend_thread_handle: Some(backend_thread_handle),
            data: DataCollection::default(),
            data_panel: DataPanel::default(),
            histogram,
            request_tx,
            shortcuts_modal_open: false,
            ui_selection: UISelection::Histogram,
            event_queue: EventQueue::<Self>::new(),
            request_redraw: None,
        }
    }

    fn reset_state(&mut self) {
        self.data = DataCollection::default();
        self.histogram = Histogram::new(self.config.default_n_bins);
        self.event_queue.discard_events();
    }

    fn update_state(&mut self) {
        self.run_events();
        if self.data.try_update() {
            // A table finished loading. If no attribute is selected yet,
            // default to the first one available.
            if self.histogram.state.x_att.is_none() {
                if let Some(attribute) = self.data.attributes().first() {
                    self.histogram.set_x_attribute(attribute, &self.data);
                }
            }
            self.request_redraw();
        }
    }

    pub fn request_redraw(&mut self) {
        self.request_redraw = Some(());
    }

    /// Queue pointing the backend at a new data directory.
    pub(crate) fn set_data_dir(&mut self, path: PathBuf) {
        self.event_queue.queue_event(Box::new(SetDataDir::new(path)));
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.request_redraw.take().is_some() {
            ctx.request_repaint();
        }

        self.update_state();

        let mut should_quit = false;

        // Handle keyboard input.
        ctx.input(|i| {
            // Help window.
            if i.key_pressed(egui::Key::F1) {
                self.shortcuts_modal_open = !self.shortcuts_modal_open;
            }
            // Circle main window view.
            if i.key_pressed(egui::Key::F3) {
                self.ui_selection = self.ui_selection.next();
            }
            // Circle mode.
            if i.key_pressed(egui::Key::F4) {
                self.histogram.mode = self.histogram.mode.next();
            }
            // Quick save app state.
            if i.key_pressed(egui::Key::F6) {
                if let Err(error) = save_json(self, None) {
                    log::error!("{}", error)
                };
            }
            // Quick load app state.
            if i.key_pressed(egui::Key::F5) {
                if let Err(error) = load_json(self, None) {
                    log::error!("{}", error)
                };
            }
            // Close app.
            if i.key_pressed(egui::Key::F10) {
                // Quitting cannot be requested from within here, the UI
                // stops, but not the backend thread.
                should_quit = true;
            }
            // Open preferences.
            if i.key_pressed(egui::Key::F12) {
                self.ui_selection = UISelection::Preferences;
            }
            if i.key_pressed(egui::Key::S) && i.modifiers.ctrl {
                log::debug!("open dialog to select save path");
                let handle = std::thread::spawn(|| rfd::FileDialog::new().save_file());
                let event = SaveLoadRequested::new(true, Some(handle));
                self.event_queue.queue_event(Box::new(event));
            }
            if i.key_pressed(egui::Key::L) && i.modifiers.ctrl {
                log::debug!("open dialog to select load path");
                let handle = std::thread::spawn(|| rfd::FileDialog::new().pick_file());
                let event = SaveLoadRequested::new(false, Some(handle));
                self.event_queue.queue_event(Box::new(event));
            }
            if i.key_pressed(egui::Key::O) && i.modifiers.ctrl {
                log::debug!("open dialog to select data files");
                let handle = std::thread::spawn(|| rfd::FileDialog::new().pick_files());
                let event = events::OpenFilesRequested::new(Some(handle));
                self.event_queue.queue_event(Box::new(event));
            }
        });

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.render_shortcut_modal(ctx);
            self.menu(ui, ctx);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.central_panel(ui, ctx);
        });

        if should_quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(handle) = self.backend_thread_handle.take() {
            viewer_core::backend::request_stop(&self.request_tx, handle);
        }
    }
}

impl ViewerApp {
    fn central_panel(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        use UISelection as U;
        match self.ui_selection {
            U::Histogram => self.histogram.render(&mut self.data, ui, ctx),
            U::Data => {
                self.data_panel
                    .render(&mut self.data, &mut self.event_queue, ui, ctx)
            }
            U::Preferences => {
                if let Some(path) = self.config.render(ctx, ui) {
                    self.set_data_dir(path);
                }
            }
        }
    }

    fn menu(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        egui::menu::bar(ui, |ui| {
            {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Data Files …").clicked() {
                        log::debug!("open dialog to select data files");
                        let handle = std::thread::spawn(|| rfd::FileDialog::new().pick_files());
                        let event = events::OpenFilesRequested::new(Some(handle));
                        self.event_queue.queue_event(Box::new(event));
                    }
                    if ui.button("Save Session").clicked() {
                        log::debug!("open dialog to select save path");
                        let handle = std::thread::spawn(|| rfd::FileDialog::new().save_file());
                        let event = SaveLoadRequested::new(true, Some(handle));
                        self.event_queue.queue_event(Box::new(event));
                    }
                    if ui.button("Load Session").clicked() {
                        log::debug!("open dialog to select load path");
                        let handle = std::thread::spawn(|| rfd::FileDialog::new().pick_file());
                        let event = SaveLoadRequested::new(false, Some(handle));
                        self.event_queue.queue_event(Box::new(event));
                    }
                    if ui.button("Quick Save").clicked() {
                        if let Err(error) = save_json(self, None) {
                            log::error!("{}", error)
                        };
                    }
                    if ui.button("Quick Load").clicked() {
                        // Loading on the main thread is fine, the tables
                        // (the only thing that takes time) are parsed on
                        // the backend anyway.
                        if let Err(error) = load_json(self, None) {
                            log::error!("{}", error)
                        };
                    }
                    if ui.button("Preferences").clicked() {
                        self.ui_selection = UISelection::Preferences
                    };
                    if ui.button("Reset Session").clicked() {
                        self.reset_state();
                    };
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                // Selection of ui view.
                ui.menu_button("View", |ui| {
                    ui.selectable_value(&mut self.ui_selection, UISelection::Histogram, "Histogram");
                    ui.selectable_value(&mut self.ui_selection, UISelection::Data, "Data");
                });

                let mode_button_label = format!(
                    "Mode ({})",
                    match self.histogram.mode {
                        HistogramMode::Display => "D",
                        HistogramMode::Select => "S",
                    },
                );
                ui.menu_button(mode_button_label, |ui| {
                    ui.selectable_value(
                        &mut self.histogram.mode,
                        HistogramMode::Display,
                        "Display (pan/zoom)",
                    );
                    ui.selectable_value(
                        &mut self.histogram.mode,
                        HistogramMode::Select,
                        "Select (drag x range)",
                    );
                });

                ui.toggle_value(&mut self.shortcuts_modal_open, "Help (F1)");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::widgets::global_theme_preference_buttons(ui);
                });
            };
        });
    }

    fn render_shortcut_modal(&mut self, ctx: &egui::Context) {
        if self.shortcuts_modal_open
            && egui::Modal::new("shortcut_modal".into())
                .show(ctx, |ui| {
                    ui.heading("Keyboard Shortcuts");
                    ui.separator();
                    ui.label("CTRL + O = Open Data Files");
                    ui.separator();
                    ui.label("CTRL + S = Open Save Dialog");
                    ui.separator();
                    ui.label("CTRL + L = Open Load Dialog");
                    ui.separator();
                    ui.label("F1 = Show Keyboard Shortcuts");
                    ui.separator();
                    ui.label("F3 = Cycle View");
                    ui.separator();
                    ui.label("F4 = Cycle Mode (Display/Select)");
                    ui.separator();
                    ui.label("F6 = Save App State");
                    ui.separator();
                    ui.label("F5 = Load App State");
                    ui.separator();
                    ui.label("F10 = Quit App");
                    ui.separator();
                    ui.label("F12 = Open Preferences");
                    ui.separator();
                })
                .should_close()
        {
            self.shortcuts_modal_open = false;
        };
    }
}
