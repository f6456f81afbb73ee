use crate::{
    app::{
        events::{EventQueue, OpenFilesRequested, RemoveDataset, RemoveSubset},
        ViewerApp,
    },
    data::DataCollection,
};

use crate::app::common::auto_color;
use crate::app::components::histogram::subset_color;

impl super::DataPanel {
    pub(crate) fn render(
        &mut self,
        data: &mut DataCollection,
        event_queue: &mut EventQueue<ViewerApp>,
        ui: &mut egui::Ui,
        _ctx: &egui::Context,
    ) {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
            ui.heading("Datasets and Subsets")
        });

        egui::ScrollArea::vertical().show(ui, |ui| {
            self.dataset_list(data, event_queue, ui);
            ui.separator();
            self.subset_list(data, event_queue, ui);
        });
    }

    fn dataset_list(
        &mut self,
        data: &mut DataCollection,
        event_queue: &mut EventQueue<ViewerApp>,
        ui: &mut egui::Ui,
    ) {
        ui.heading("Datasets");

        if ui.button("Open Data Files …").clicked() {
            log::debug!("open dialog to select data files");
            let handle = std::thread::spawn(|| rfd::FileDialog::new().pick_files());
            event_queue.queue_event(Box::new(OpenFilesRequested::new(Some(handle))));
        }

        let ids: Vec<_> = data.order.clone();
        for id in ids {
            let Some(dataset) = data.get_mut(id) else {
                continue;
            };
            ui.horizontal(|ui| {
                let color = auto_color(id.into());
                ui.colored_label(color, "■");
                let name = dataset.file_name().to_owned();
                ui.toggle_value(&mut dataset.properties.visible, name);
                ui.add(
                    egui::TextEdit::singleline(&mut dataset.properties.label)
                        .hint_text("alias")
                        .desired_width(120.0),
                );
                match dataset.table.value() {
                    Ok(table) => {
                        let response = ui.label(format!(
                            "{} rows, {} columns",
                            table.n_rows(),
                            table.column_names().len()
                        ));
                        if !table.comments().is_empty() {
                            response.on_hover_text(table.comments());
                        }
                    }
                    Err(_) if !dataset.table.is_up_to_date() => {
                        ui.spinner();
                    }
                    Err(msg) => {
                        ui.colored_label(egui::Color32::DARK_RED, msg);
                    }
                }
                if ui.button("🗙").on_hover_text("remove dataset").clicked() {
                    event_queue.queue_event(Box::new(RemoveDataset::new(id)));
                }
            });
        }
    }

    fn subset_list(
        &mut self,
        data: &mut DataCollection,
        event_queue: &mut EventQueue<ViewerApp>,
        ui: &mut egui::Ui,
    ) {
        ui.heading("Subsets");

        let edit_subset = data.edit_subset();
        let mut new_edit_subset = edit_subset;

        for (index, subset) in data.subsets.iter_mut().enumerate() {
            ui.horizontal(|ui| {
                ui.colored_label(subset_color(index), "■");
                let label = subset.label.clone();
                ui.toggle_value(&mut subset.visible, label);

                // Radio selecting which subset new selections edit.
                if ui
                    .radio(edit_subset == Some(index), "edit")
                    .on_hover_text("drawn selections modify this subset")
                    .clicked()
                {
                    new_edit_subset = if edit_subset == Some(index) {
                        None
                    } else {
                        Some(index)
                    };
                }

                ui.label(subset.state.describe());

                if self.editing_subset_label == Some(index) {
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.label_buffer).desired_width(100.0),
                    );
                    if response.lost_focus() {
                        if !self.label_buffer.is_empty() {
                            subset.label = self.label_buffer.clone();
                        }
                        self.editing_subset_label = None;
                    }
                } else if ui.button("✏").on_hover_text("rename").clicked() {
                    self.label_buffer = subset.label.clone();
                    self.editing_subset_label = Some(index);
                }

                if ui.button("🗙").on_hover_text("remove subset").clicked() {
                    event_queue.queue_event(Box::new(RemoveSubset::new(index)));
                }
            });
        }
        if data.subsets.is_empty() {
            ui.label("No subsets defined. Switch to select mode (F4) and drag on the histogram.");
        }

        if new_edit_subset != edit_subset {
            data.set_edit_subset(new_edit_subset);
        }
    }
}
