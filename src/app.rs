//! Unstructured Data Analysis — egui/eframe application.
//!
//! # Architecture
//!
//! [`UnstructureApp`] is the top-level [`eframe::App`].  It owns the UI
//! state (active tab, the session document being edited) plus:
//!
//! * `command_tx` — sends [`PipelineCommand`] to the pipeline orchestrator.
//! * `state`      — [`SharedState`] the orchestrator writes results into,
//!   read here every frame.
//!
//! # Tabs
//!
//! | Tab | Contents |
//! |-----|----------|
//! | Image Analysis | placeholder |
//! | Audio Analysis | WAV picker → transcript text area or error banner |
//! | Text Analysis  | editor, sample-story button, Analyze, cloud panels, counts, entities |

use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::analysis::{AnalysisReport, WordClass};
use crate::cloud::{WordCloud, CLOUD_HEIGHT, CLOUD_WIDTH};
use crate::nlp::EntityLabel;
use crate::pipeline::{AudioPhase, PipelineCommand, SharedState, TextPhase};
use crate::stories::StoryPicker;

// ---------------------------------------------------------------------------
// Tab
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Image,
    Audio,
    Text,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Image, Tab::Audio, Tab::Text];

    fn title(&self) -> &'static str {
        match self {
            Tab::Image => "Image Analysis",
            Tab::Audio => "Audio Analysis",
            Tab::Text => "Text Analysis",
        }
    }
}

// ---------------------------------------------------------------------------
// UnstructureApp
// ---------------------------------------------------------------------------

/// eframe application — the tabbed analysis window.
pub struct UnstructureApp {
    /// Currently selected tab.
    tab: Tab,
    /// The session document: whatever the text editor currently holds.
    /// Re-sent in full with every Analyze press.
    document: String,
    /// Cycles the fixed sample stories.
    picker: StoryPicker,

    /// Send commands to the background pipeline orchestrator.
    command_tx: mpsc::Sender<PipelineCommand>,
    /// Results written by the orchestrator, read here every frame.
    state: SharedState,
}

impl UnstructureApp {
    /// Create a new [`UnstructureApp`].
    ///
    /// * `command_tx` — sender end of the pipeline command channel.
    /// * `state`      — shared state the orchestrator mutates.
    pub fn new(command_tx: mpsc::Sender<PipelineCommand>, state: SharedState) -> Self {
        Self {
            tab: Tab::Text,
            document: String::new(),
            picker: StoryPicker::new(),
            command_tx,
            state,
        }
    }

    // ── Tab bar ──────────────────────────────────────────────────────────

    fn draw_tab_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Unstructured Data Analysis");
            ui.separator();
            for tab in Tab::ALL {
                ui.selectable_value(&mut self.tab, tab, tab.title());
            }
        });
    }

    // ── Image tab ────────────────────────────────────────────────────────

    fn draw_image_tab(&self, ui: &mut egui::Ui) {
        ui.add_space(12.0);
        ui.label(
            egui::RichText::new("Image analysis is not available in this build.")
                .color(egui::Color32::from_rgb(130, 130, 130)),
        );
    }

    // ── Audio tab ────────────────────────────────────────────────────────

    fn draw_audio_tab(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.strong("Upload a WAV file to transcribe");
        ui.add_space(4.0);

        let busy = self.state.lock().unwrap().audio.is_busy();
        if ui
            .add_enabled(!busy, egui::Button::new("Choose a WAV audio file…"))
            .clicked()
        {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("WAV audio", &["wav"])
                .pick_file()
            {
                let _ = self.command_tx.try_send(PipelineCommand::TranscribeWav(path));
            }
        }

        ui.add_space(8.0);

        let st = self.state.lock().unwrap();
        match st.audio {
            AudioPhase::Idle => {
                ui.label(
                    egui::RichText::new(format!(
                        "No file selected yet. Transcription endpoint: {}",
                        st.config.speech.base_url
                    ))
                    .color(egui::Color32::from_rgb(130, 130, 130)),
                );
            }
            AudioPhase::Transcribing => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Transcribing audio...");
                });
            }
            AudioPhase::Transcript => {
                ui.label(
                    egui::RichText::new("Transcription complete!")
                        .color(egui::Color32::from_rgb(80, 200, 120)),
                );
                ui.add_space(4.0);
                let mut transcript = st.transcript.clone().unwrap_or_default();
                ui.add(
                    egui::TextEdit::multiline(&mut transcript)
                        .desired_rows(8)
                        .desired_width(f32::INFINITY)
                        .interactive(false),
                );
            }
            AudioPhase::Failed => {
                let message = st
                    .audio_error
                    .as_deref()
                    .unwrap_or("Unknown transcription error");
                error_banner(ui, message);
            }
        }
    }

    // ── Text tab ─────────────────────────────────────────────────────────

    fn draw_text_tab(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);

        if ui.button("Random Story").clicked() {
            self.document = self.picker.next_story().to_string();
        }

        ui.add_space(4.0);
        ui.label("Paste or modify your text here:");
        ui.add(
            egui::TextEdit::multiline(&mut self.document)
                .desired_rows(10)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(4.0);

        let busy = self.state.lock().unwrap().text.is_busy();
        if ui
            .add_enabled(!busy, egui::Button::new("Analyze Text"))
            .clicked()
        {
            let _ = self
                .command_tx
                .try_send(PipelineCommand::AnalyzeText(self.document.clone()));
        }

        ui.add_space(8.0);
        ui.separator();

        let st = self.state.lock().unwrap();
        match st.text {
            TextPhase::Idle => {}
            TextPhase::EmptyInput => {
                warning_label(ui, "Please paste or select some text first.");
            }
            TextPhase::Analyzing => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Analyzing text...");
                });
            }
            TextPhase::Failed => {
                let message = st.text_error.as_deref().unwrap_or("Unknown analysis error");
                error_banner(ui, message);
            }
            TextPhase::Report => {
                if let Some(report) = st.report.as_ref() {
                    draw_report(ui, report);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Report rendering
// ---------------------------------------------------------------------------

fn draw_report(ui: &mut egui::Ui, report: &AnalysisReport) {
    // 2×2 cloud panels.
    for row in report.clouds.chunks(2) {
        ui.horizontal_top(|ui| {
            for (class, cloud) in row {
                ui.vertical(|ui| {
                    ui.strong(class.heading());
                    match cloud {
                        Some(cloud) => draw_cloud(ui, cloud),
                        None => warning_label(ui, "No words found for this category."),
                    }
                });
            }
        });
        ui.add_space(6.0);
    }

    // Counts table.
    ui.add_space(4.0);
    ui.strong("POS Counts");
    egui::Grid::new("pos_counts").striped(true).show(ui, |ui| {
        ui.label("Category");
        ui.label("Count");
        ui.end_row();
        for class in WordClass::ALL {
            ui.label(class.heading());
            ui.label(report.buckets.count(class).to_string());
            ui.end_row();
        }
    });

    // Entities.
    ui.add_space(8.0);
    ui.strong("Named Entity Recognition (NER)");
    ui.add_space(4.0);
    ui.label("Detected Entities:");
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for segment in &report.highlights {
            match &segment.entity {
                Some(label) => {
                    ui.label(
                        egui::RichText::new(&segment.text)
                            .background_color(entity_fill(label))
                            .color(egui::Color32::WHITE),
                    );
                    ui.label(
                        egui::RichText::new(format!(" {} ", label.code()))
                            .small()
                            .background_color(entity_fill(label))
                            .color(egui::Color32::from_rgb(220, 220, 220)),
                    );
                }
                None => {
                    ui.label(&segment.text);
                }
            }
        }
    });

    ui.add_space(8.0);
    if report.entities.is_empty() {
        ui.label(
            egui::RichText::new("No named entities found.")
                .color(egui::Color32::from_rgb(110, 170, 230)),
        );
    } else {
        ui.strong("Entity Table:");
        egui::Grid::new("entity_table").striped(true).show(ui, |ui| {
            ui.label("Entity");
            ui.label("Label");
            ui.end_row();
            for entity in &report.entities {
                ui.label(&entity.text);
                ui.label(entity.label.code());
                ui.end_row();
            }
        });
    }
}

/// Paint one cloud panel: black 500×400 canvas, words drawn at their
/// computed centers.
fn draw_cloud(ui: &mut egui::Ui, cloud: &WordCloud) {
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(CLOUD_WIDTH, CLOUD_HEIGHT),
        egui::Sense::hover(),
    );

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, egui::Color32::BLACK);

    for word in &cloud.words {
        painter.text(
            egui::pos2(rect.left() + word.x, rect.top() + word.y),
            egui::Align2::CENTER_CENTER,
            &word.text,
            egui::FontId::proportional(word.size),
            egui::Color32::from_rgb(word.color.r, word.color.g, word.color.b),
        );
    }
}

/// Background fill for an entity span, keyed by label family.
fn entity_fill(label: &EntityLabel) -> egui::Color32 {
    match label {
        EntityLabel::Person => egui::Color32::from_rgb(122, 82, 160),
        EntityLabel::Organization => egui::Color32::from_rgb(58, 110, 165),
        EntityLabel::Location => egui::Color32::from_rgb(56, 140, 94),
        EntityLabel::Misc => egui::Color32::from_rgb(150, 118, 58),
        EntityLabel::Other(_) => egui::Color32::from_rgb(95, 95, 95),
    }
}

fn warning_label(ui: &mut egui::Ui, message: &str) {
    ui.label(
        egui::RichText::new(message).color(egui::Color32::from_rgb(230, 180, 80)),
    );
}

fn error_banner(ui: &mut egui::Ui, message: &str) {
    ui.label(
        egui::RichText::new(message)
            .color(egui::Color32::from_rgb(255, 120, 100))
            .strong(),
    );
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for UnstructureApp {
    /// Called every frame by eframe.  Renders the active tab and keeps
    /// repainting while a pipeline is running so spinners animate.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            self.draw_tab_bar(ui);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.tab {
                Tab::Image => self.draw_image_tab(ui),
                Tab::Audio => self.draw_audio_tab(ui),
                Tab::Text => self.draw_text_tab(ui),
            });
        });

        // Keep the spinner moving while work is in flight.
        let busy = {
            let st = self.state.lock().unwrap();
            st.audio.is_busy() || st.text.is_busy()
        };
        if busy {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Unstructured Data Analysis closing");
    }
}
