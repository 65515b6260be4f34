use std::fs;

use eframe::egui::{self, Button, CentralPanel, ComboBox, DragValue, TextEdit};
use eframe::{App, CreationContext, Frame, NativeOptions};
use egui_extras::{Column, TableBuilder};
use rfd::FileDialog;

use chapter_model::{Alignment, ChunkParams, LevelRule, RuleSet};
use chunker_service::{HeaderEdit, ReviewSession, RunConfig};
use doc_chunker::csv_export::{chunk_rows_to_csv_encoded, CsvEncoding};

fn main() -> eframe::Result<()> {
    let options = NativeOptions::default();
    eframe::run_native(
        "Chapter Chunker Review",
        options,
        Box::new(|cc| Box::new(AppState::new(cc))),
    )
}

struct AppState {
    // Inputs
    doc_path: String,
    book_name: String,
    author_name: String,

    // Detection rules
    rules: RuleSet,

    // Chunk settings
    min_words: usize,
    max_words: usize,
    overlap_pct: u32,
    csv_encoding: CsvEncoding,

    // Scan state: session rows stay read-only, checkbox edits live here
    session: Option<ReviewSession>,
    edits: Vec<HeaderEdit>,

    status: String,
}

impl AppState {
    fn new(_cc: &CreationContext<'_>) -> Self {
        let chunk = ChunkParams::default();
        Self {
            doc_path: String::new(),
            book_name: String::new(),
            author_name: String::new(),
            rules: RuleSet::default(),
            min_words: chunk.min_words,
            max_words: chunk.max_words,
            overlap_pct: (chunk.overlap * 100.0).round() as u32,
            csv_encoding: CsvEncoding::Utf8Bom,
            session: None,
            edits: Vec::new(),
            status: String::new(),
        }
    }

    fn run_config(&self) -> RunConfig {
        RunConfig {
            book_name: self.book_name.clone(),
            author_name: self.author_name.clone(),
            rules: self.rules.clone(),
            chunk: ChunkParams {
                min_words: self.min_words,
                max_words: self.max_words,
                overlap: f64::from(self.overlap_pct) / 100.0,
            },
        }
    }

    fn scan(&mut self) {
        let path = self.doc_path.trim().to_string();
        if path.is_empty() {
            self.status = "Pick a .docx file first".into();
            return;
        }
        match ReviewSession::scan(&path, &self.run_config()) {
            Ok(session) => {
                self.edits = session
                    .rows()
                    .iter()
                    .map(|r| HeaderEdit { idx: r.idx, is_h1: r.is_h1, is_h2: r.is_h2, is_h3: r.is_h3 })
                    .collect();
                self.status = format!(
                    "Scanned {} paragraphs, {} headers detected",
                    session.rows().len(),
                    session.header_count()
                );
                self.session = Some(session);
            }
            Err(err) => {
                self.session = None;
                self.edits.clear();
                self.status = format!("Scan failed: {err}");
            }
        }
    }

    fn generate_csv(&mut self) {
        let config = self.run_config();
        let Some(session) = self.session.as_mut() else {
            self.status = "Scan a document first".into();
            return;
        };
        let edits = self.edits.clone();
        session.review(move |rows| {
            for (row, edit) in rows.iter_mut().zip(edits.iter()) {
                *row = *edit;
            }
        });

        let chunks = session.build_chunks(&config);
        if chunks.is_empty() {
            self.status =
                "No chunks produced; lower the chunk word minimum or loosen the header rules".into();
            return;
        }

        let Some(out_path) = FileDialog::new().add_filter("CSV", &["csv"]).save_file() else {
            self.status = "Export canceled".into();
            return;
        };
        match chunk_rows_to_csv_encoded(&chunks, self.csv_encoding) {
            Ok(bytes) => match fs::write(&out_path, bytes) {
                Ok(()) => {
                    self.status = format!("CSV ready with {} chunks: {}", chunks.len(), out_path.display())
                }
                Err(err) => self.status = format!("Failed to write CSV: {err}"),
            },
            Err(err) => self.status = format!("Failed to build CSV: {err}"),
        }
    }

    fn save_rules(&mut self) {
        let Some(path) = FileDialog::new().add_filter("JSON", &["json"]).save_file() else {
            return;
        };
        match fs::write(&path, self.rules.to_json_pretty()) {
            Ok(()) => self.status = format!("Rules saved: {}", path.display()),
            Err(err) => self.status = format!("Failed to save rules: {err}"),
        }
    }

    fn load_rules(&mut self) {
        let Some(path) = FileDialog::new().add_filter("JSON", &["json"]).pick_file() else {
            return;
        };
        let loaded = fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| RuleSet::from_json(&json).map_err(|e| e.to_string()));
        match loaded {
            Ok(rules) => {
                self.rules = rules;
                self.status = format!("Rules loaded: {}", path.display());
            }
            Err(err) => self.status = format!("Failed to load rules: {err}"),
        }
    }
}

fn align_toggle(ui: &mut egui::Ui, rule: &mut LevelRule, align: Alignment, label: &str) {
    let mut on = rule.allowed_align.contains(&align);
    if ui.checkbox(&mut on, label).changed() {
        if on {
            if !rule.allowed_align.contains(&align) {
                rule.allowed_align.push(align);
            }
        } else {
            rule.allowed_align.retain(|a| *a != align);
        }
    }
}

fn rule_row(ui: &mut egui::Ui, label: &str, rule: &mut LevelRule) {
    ui.horizontal(|ui| {
        ui.checkbox(&mut rule.enabled, format!("Enable {label}"));
        ui.label("min font size (pt):");
        ui.add(DragValue::new(&mut rule.min_size).clamp_range(6.0..=72.0).speed(0.5));
        ui.checkbox(&mut rule.require_bold, "require bold");
        ui.label("align:");
        align_toggle(ui, rule, Alignment::Left, "left");
        align_toggle(ui, rule, Alignment::Center, "center");
        align_toggle(ui, rule, Alignment::Right, "right");
    });
}

impl App for AppState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        CentralPanel::default().show(ctx, |ui| {
            ui.heading("DOCX → CSV Chapter Chunker");

            ui.horizontal(|ui| {
                ui.label("DOCX file:");
                ui.add(TextEdit::singleline(&mut self.doc_path).desired_width(400.0));
                if ui.add(Button::new("Browse")).clicked() {
                    if let Some(path) = FileDialog::new().add_filter("DOCX", &["docx"]).pick_file() {
                        self.doc_path = path.display().to_string();
                    }
                }
            });

            ui.horizontal(|ui| {
                ui.label("Book name:");
                ui.add(TextEdit::singleline(&mut self.book_name).desired_width(220.0));
                ui.label("Author name:");
                ui.add(TextEdit::singleline(&mut self.author_name).desired_width(220.0));
            });

            ui.separator();
            ui.label("Header detection rules");
            ui.horizontal(|ui| {
                ui.label("Max header words:");
                ui.add(DragValue::new(&mut self.rules.max_header_words).clamp_range(3..=20));
                ui.checkbox(&mut self.rules.suppress_sentences, "suppress sentence-like lines");
                ui.checkbox(&mut self.rules.suppress_quotes, "suppress quoted one-liners");
                ui.checkbox(&mut self.rules.auto_detect, "auto-detect");
            });
            rule_row(ui, "H1", &mut self.rules.h1);
            rule_row(ui, "H2", &mut self.rules.h2);
            rule_row(ui, "H3", &mut self.rules.h3);
            ui.horizontal(|ui| {
                if ui.add(Button::new("Save rules…")).clicked() {
                    self.save_rules();
                }
                if ui.add(Button::new("Load rules…")).clicked() {
                    self.load_rules();
                }
            });

            ui.separator();
            ui.label("Chunk settings");
            ui.horizontal(|ui| {
                ui.label("Min words:");
                ui.add(DragValue::new(&mut self.min_words).clamp_range(50..=500).speed(10));
                ui.label("Max words:");
                ui.add(DragValue::new(&mut self.max_words).clamp_range(80..=800).speed(10));
                ComboBox::from_label("Overlap")
                    .selected_text(format!("{}%", self.overlap_pct))
                    .show_ui(ui, |ui| {
                        for pct in (0..=60).step_by(5) {
                            ui.selectable_value(&mut self.overlap_pct, pct, format!("{pct}%"));
                        }
                    });
                ComboBox::from_label("Encoding")
                    .selected_text(self.csv_encoding.label())
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.csv_encoding, CsvEncoding::Utf8Bom, CsvEncoding::Utf8Bom.label());
                        ui.selectable_value(&mut self.csv_encoding, CsvEncoding::ShiftJis, CsvEncoding::ShiftJis.label());
                    });
            });

            ui.horizontal(|ui| {
                if ui.add(Button::new("Preview & Edit Headers")).clicked() {
                    self.scan();
                }
                if ui.add(Button::new("Generate CSV")).clicked() {
                    self.generate_csv();
                }
            });
            if !self.status.is_empty() {
                ui.label(&self.status);
            }

            if let Some(session) = &self.session {
                ui.separator();
                let info = session.info();
                ui.label(format!(
                    "{}: {} bytes, sha256 {}",
                    info.source_path,
                    info.file_size_bytes.map(|s| s.to_string()).unwrap_or_else(|| "?".into()),
                    info.content_sha256.as_deref().map(|h| &h[..12]).unwrap_or("-")
                ));

                let rows = session.rows();
                TableBuilder::new(ui)
                    .striped(true)
                    .column(Column::auto())
                    .column(Column::auto())
                    .column(Column::auto())
                    .column(Column::auto())
                    .column(Column::auto())
                    .column(Column::auto())
                    .column(Column::auto())
                    .column(Column::auto())
                    .column(Column::remainder())
                    .header(20.0, |mut header| {
                        for title in ["idx", "H1", "H2", "H3", "score", "align", "max pt", "words", "text"] {
                            header.col(|ui| {
                                ui.strong(title);
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(18.0, rows.len(), |mut table_row| {
                            let i = table_row.index();
                            let row = &rows[i];
                            let edit = &mut self.edits[i];
                            table_row.col(|ui| {
                                ui.label(row.idx.to_string());
                            });
                            table_row.col(|ui| {
                                ui.checkbox(&mut edit.is_h1, "");
                            });
                            table_row.col(|ui| {
                                ui.checkbox(&mut edit.is_h2, "");
                            });
                            table_row.col(|ui| {
                                ui.checkbox(&mut edit.is_h3, "");
                            });
                            table_row.col(|ui| {
                                ui.label(row.score.to_string());
                            });
                            table_row.col(|ui| {
                                ui.label(row.features.align.as_str());
                            });
                            table_row.col(|ui| {
                                let pt = row
                                    .features
                                    .max_font_size
                                    .map(|s| format!("{s:.1}"))
                                    .unwrap_or_else(|| "-".into());
                                ui.label(pt);
                            });
                            table_row.col(|ui| {
                                ui.label(row.features.word_count.to_string());
                            });
                            table_row.col(|ui| {
                                ui.label(&row.text);
                            });
                        });
                    });
            }
        });
    }
}
