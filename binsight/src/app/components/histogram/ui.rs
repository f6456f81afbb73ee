use egui_plot::{Bar, BarChart, Legend, PlotBounds, VLine};

use crate::app::common::auto_color;
use crate::data::{DataCollection, Dataset, PolygonRoi, SubsetState};

use super::{histogram_counts, scale_counts, HistogramMode};

impl super::Histogram {
    pub fn render(&mut self, data: &mut DataCollection, ui: &mut egui::Ui, _ctx: &egui::Context) {
        self.update_edges();

        // Horizontal strip with the attribute selector and axis toggles.
        ui.horizontal(|ui| {
            let attributes = data.attributes();
            let mut selected = self.state.x_att.clone().unwrap_or_default();
            egui::ComboBox::new("histogram_x_att", "x attribute")
                .selected_text(selected.clone())
                .show_ui(ui, |ui| {
                    for attribute in attributes {
                        if ui
                            .selectable_value(&mut selected, attribute.clone(), &attribute)
                            .changed()
                        {
                            self.set_x_attribute(&attribute, data);
                        }
                    }
                });
            ui.separator();
            ui.toggle_value(&mut self.state.log_y, "log y");
            ui.toggle_value(&mut self.state.cumulative, "cumulative");
            ui.toggle_value(&mut self.state.normalize, "normalize");
        });

        let auto_bounds = self.mode == HistogramMode::Display;
        let allow_drag = self.mode == HistogramMode::Display;

        let response = egui_plot::Plot::new("Histogram")
            .allow_drag(allow_drag)
            .auto_bounds(egui::Vec2b {
                x: auto_bounds,
                y: auto_bounds,
            })
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                if let Some([xmin, xmax, ymin, ymax]) = self.request_plot_bounds.take() {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max([xmin, ymin], [xmax, ymax]));
                }

                // Binning and selection menu.
                plot_ui
                    .response()
                    .context_menu(|ui| self.binning_menu(data, ui));

                // Bars for every visible dataset, subset overlays on top.
                for (id, dataset) in data
                    .iter()
                    .filter(|(_, dataset)| dataset.properties.visible)
                {
                    let Some(chart) = self.dataset_chart(dataset, auto_color(id.into())) else {
                        continue;
                    };
                    plot_ui.bar_chart(chart.name(dataset.label()));

                    for (index, subset) in
                        data.subsets.iter().enumerate().filter(|(_, s)| s.visible)
                    {
                        if let Some(chart) =
                            self.subset_chart(dataset, &subset.state, subset_color(index))
                        {
                            plot_ui.bar_chart(chart.name(&subset.label));
                        }
                    }
                }

                // Paint the raw selection while the user drags.
                if self.mode == HistogramMode::Select {
                    if let Some((lo, hi)) = self
                        .current_selection
                        .as_ref()
                        .and_then(|roi| roi.x_extent())
                    {
                        let y = plot_ui.plot_bounds().center().y;
                        plot_ui.vline(VLine::new(lo).color(egui::Color32::RED));
                        plot_ui.vline(VLine::new(hi).color(egui::Color32::RED));
                        plot_ui.line(
                            egui_plot::Line::new(vec![[lo, y], [hi, y]])
                                .color(egui::Color32::RED)
                                .width(3.0),
                        );
                    }
                }

                // Handle the drag gesture (drawing the selection region).
                //
                // Reading this before the if statement is required to avoid
                // a dead lock.
                let inside_plot = pointer_inside_plot(plot_ui);
                let mut gesture_ended = false;
                plot_ui.ctx().input(|i| {
                    let button_down = i.pointer.button_down(egui::PointerButton::Primary);
                    if self.mode == HistogramMode::Select
                        && button_down
                        && plot_ui.response().contains_pointer()
                        && inside_plot
                    {
                        if let (Some(origin), Some(current_position)) =
                            (i.pointer.press_origin(), i.pointer.latest_pos())
                        {
                            // Pointer positions are in screen coordinates and
                            // must be translated into the coordinate system of
                            // the plot.
                            let origin = plot_ui.transform().value_from_position(origin);
                            let current_position =
                                plot_ui.transform().value_from_position(current_position);
                            self.current_selection = Some(PolygonRoi::from_corners(
                                [origin.x, origin.y],
                                [current_position.x, current_position.y],
                            ));
                            self.selection_active = true;
                        }
                    } else if self.selection_active && !button_down {
                        gesture_ended = true;
                    }
                });

                self.current_plot_bounds = {
                    let [xmin, ymin] = plot_ui.plot_bounds().min();
                    let [xmax, ymax] = plot_ui.plot_bounds().max();
                    [xmin, xmax, ymin, ymax]
                };

                gesture_ended
            });

        // The selection gesture ended this frame: snap it to the bin edges
        // and update the editable subset.
        if response.inner {
            self.selection_active = false;
            if let Some(roi) = self.current_selection.take() {
                self.apply_selection(data, &roi);
            }
        }
    }

    /// Bar chart of the full dataset, or None if the dataset has no data
    /// for the current x attribute.
    fn dataset_chart(&self, dataset: &Dataset, color: egui::Color32) -> Option<BarChart> {
        self.chart_with_filter(dataset, color, 0.75, |_, _| true)
    }

    /// Bar chart of the rows matching a subset condition, drawn narrower
    /// so the dataset bars stay visible behind it.
    fn subset_chart(
        &self,
        dataset: &Dataset,
        state: &SubsetState,
        color: egui::Color32,
    ) -> Option<BarChart> {
        self.chart_with_filter(dataset, color, 0.55, |table, row| state.contains(table, row))
    }

    fn chart_with_filter(
        &self,
        dataset: &Dataset,
        color: egui::Color32,
        width_fraction: f64,
        filter: impl Fn(&crate::backend_state::DataTable, usize) -> bool,
    ) -> Option<BarChart> {
        let edges = self.edges();
        if edges.len() < 2 {
            return None;
        }
        let attribute = self.state.x_att.as_deref()?;
        let table = dataset.get_table()?;
        let values = table.column(attribute)?;

        let mut counts = histogram_counts(values, edges, |row| filter(table, row));
        scale_counts(
            &mut counts,
            edges,
            self.state.cumulative,
            self.state.normalize,
        );

        let bars: Vec<Bar> = counts
            .iter()
            .enumerate()
            .filter_map(|(index, count)| {
                let height = if self.state.log_y {
                    // No log axis in the plotting backend; plot the log of
                    // the per-bin value and omit empty bins.
                    if *count > 0.0 {
                        count.log10()
                    } else {
                        return None;
                    }
                } else {
                    *count
                };
                let center = (edges[index] + edges[index + 1]) / 2.0;
                let width = (edges[index + 1] - edges[index]) * width_fraction;
                Some(Bar::new(center, height).width(width))
            })
            .collect();

        Some(BarChart::new(bars).color(color))
    }

    fn binning_menu(&mut self, data: &mut DataCollection, ui: &mut egui::Ui) {
        ui.set_min_width(200.0);

        ui.heading("Binning");
        let span = (self.state.hist_x_max - self.state.hist_x_min).abs().max(1e-12);
        ui.label("Number of bins");
        ui.add(egui::DragValue::new(&mut self.state.hist_n_bin).range(1..=10_000));
        ui.label("Lower bin limit");
        ui.add(egui::DragValue::new(&mut self.state.hist_x_min).speed(span / 500.0))
            .on_hover_cursor(egui::CursorIcon::Text);
        ui.label("Upper bin limit");
        ui.add(egui::DragValue::new(&mut self.state.hist_x_max).speed(span / 500.0))
            .on_hover_cursor(egui::CursorIcon::Text);
        let log_x_possible = self.state.hist_x_min > 0.0;
        ui.add_enabled(
            log_x_possible,
            egui::Checkbox::new(&mut self.state.log_x, "Logarithmic bins"),
        )
        .on_hover_ui(|ui| {
            ui.label("requires positive bin limits");
        });
        if !log_x_possible {
            self.state.log_x = false;
        }

        ui.separator();

        ui.heading("Selection");
        for mode in [
            crate::data::CombineMode::Replace,
            crate::data::CombineMode::And,
            crate::data::CombineMode::Or,
            crate::data::CombineMode::Xor,
            crate::data::CombineMode::AndNot,
        ] {
            ui.selectable_value(&mut self.edit_mode.mode, mode, mode.label());
        }
        if ui.button("Clear Selection").clicked() {
            self.clear_selection();
        }
        if ui.button("New Subset").clicked() {
            data.set_edit_subset(None);
        }
    }
}

/// Color for subset overlays, offset so they do not collide with the
/// dataset colors.
pub fn subset_color(index: usize) -> egui::Color32 {
    auto_color(index as i32 + 7)
}

fn pointer_inside_plot(plot_ui: &egui_plot::PlotUi) -> bool {
    if let Some(pointer_position) = plot_ui.pointer_coordinate() {
        return plot_ui
            .plot_bounds()
            .range_x()
            .contains(&pointer_position.x)
            && plot_ui
                .plot_bounds()
                .range_y()
                .contains(&pointer_position.y);
    }
    false
}
