mod ui;

/// Panel listing the loaded datasets and the defined subsets.
///
/// Removal of list entries goes through queued events instead of
/// happening inline, so the lists stay valid while they are rendered.
#[derive(Default)]
pub struct DataPanel {
    // Buffers the label currently being edited, so typing does not
    // immediately rename half-finished labels everywhere else.
    label_buffer: String,
    editing_subset_label: Option<usize>,
}
