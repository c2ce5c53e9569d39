use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::bulk::{generate_palette, parse_bulk, parse_hex_list, parse_stock};
use crate::config::Config;
use crate::engine::{BatchPlan, DrawOptions, Selection, Session, Truncation};
use crate::entry::{normalize_hex, parse_count, Entry, EntryEdit, EntryId, EntrySetup};
use crate::store::EntryStore;
use crate::transfer::{self, ExportKind, TransferError};
use crate::ui::{ListLayout, Theme};

/// Largest batch the count keys will step up to
const MAX_COUNT: usize = 999;
/// How long each color stays up while the drum spins
const SPIN_FRAME: Duration = Duration::from_millis(90);

/// Which field of an entry a prompt edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Label,
    Weight,
    Stock,
    Hex,
}

impl EditField {
    /// Current value, used to prefill the prompt
    fn current(&self, entry: &Entry) -> String {
        match self {
            EditField::Label => entry.label.clone(),
            EditField::Weight => entry.weight.to_string(),
            EditField::Stock => entry.stock.map(|s| s.to_string()).unwrap_or_default(),
            EditField::Hex => entry.hex.clone(),
        }
    }
}

/// What the text typed into the prompt line is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    Add,
    Edit { id: EntryId, field: EditField },
    Bulk,
    HexList,
    HexListStock { list: String },
    Palette,
    PaletteStock { count: usize },
    Import,
    ConfirmReset,
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            PromptKind::Add => "Add (hex, label, weight, stock)",
            PromptKind::Edit { field: EditField::Label, .. } => "Label",
            PromptKind::Edit { field: EditField::Weight, .. } => "Weight",
            PromptKind::Edit { field: EditField::Stock, .. } => "Stock (blank = ∞)",
            PromptKind::Edit { field: EditField::Hex, .. } => "Color (#rrggbb)",
            PromptKind::Bulk => "Bulk, lines split by ';' (Red #ff0000 5; #00ff00 x3)",
            PromptKind::HexList => "Hex list (#ff0000, #00ff00, #0000ff)",
            PromptKind::HexListStock { .. } | PromptKind::PaletteStock { .. } => {
                "Common stock (blank = ∞)"
            }
            PromptKind::Palette => "Palette size (1-360)",
            PromptKind::Import => "Import setup (.csv / .json)",
            PromptKind::ConfirmReset => "Reset to preset? (y/N)",
        }
    }
}

/// A draw selected but not yet committed while the drum spins
#[derive(Debug)]
pub enum Pending {
    Single(Selection),
    Batch(BatchPlan),
}

impl Pending {
    /// Entry shown when the spin ends
    fn reveal(&self) -> Option<&Entry> {
        match self {
            Pending::Single(selection) => Some(&selection.entry),
            Pending::Batch(plan) => plan.last(),
        }
    }
}

/// Application mode - determines what UI to show and how to handle input
#[derive(Debug)]
pub enum AppMode {
    /// Browsing entries, ready to draw
    Normal,
    /// Draw selected, animation running until `until`
    Spinning {
        started: Instant,
        until: Instant,
        pending: Pending,
    },
    /// Typing into the prompt line
    Prompt { kind: PromptKind, buffer: String },
}

/// Status line message, replaced by the next one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
}

/// The revealed ball
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ball {
    pub hex: String,
    pub label: String,
}

impl Ball {
    fn from_entry(entry: &Entry) -> Self {
        Self {
            hex: entry.hex.clone(),
            label: entry.display_label(),
        }
    }
}

/// Application state
pub struct App {
    /// Current application mode
    mode: AppMode,
    /// Entries, history, batch and RNG
    session: Session,
    /// Batch draw settings shown in the header
    options: DrawOptions,
    /// Selected row of the entry table
    selected: usize,
    list: ListLayout,
    notice: Option<Notice>,
    ball: Option<Ball>,
    theme: Theme,
    config: Config,
}

impl App {
    pub fn new(store: EntryStore, config: Config) -> Self {
        let session = Session::seeded(store, config.draw.seed);
        Self {
            mode: AppMode::Normal,
            session,
            options: config.draw.options(),
            selected: 0,
            list: ListLayout::default(),
            notice: None,
            ball: None,
            theme: config.resolve_theme(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn options(&self) -> &DrawOptions {
        &self.options
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn ball(&self) -> Option<&Ball> {
        self.ball.as_ref()
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.mode, AppMode::Spinning { .. })
    }

    pub fn is_prompting(&self) -> bool {
        matches!(self.mode, AppMode::Prompt { .. })
    }

    /// Animation frame counter while spinning
    pub fn spin_frame(&self, now: Instant) -> Option<usize> {
        match &self.mode {
            AppMode::Spinning { started, .. } => {
                let elapsed = now.saturating_duration_since(*started);
                Some((elapsed.as_millis() / SPIN_FRAME.as_millis()) as usize)
            }
            _ => None,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        self.session.store().entries()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.entries().get(self.selected)
    }

    pub fn list_layout(&self) -> &ListLayout {
        &self.list
    }

    /// Resize the table page to the rows the terminal has room for
    pub fn set_visible_rows(&mut self, rows: u16) {
        self.list = ListLayout::new(rows);
    }

    pub fn previous(&mut self) {
        self.selected = self.list.move_up(self.selected);
    }

    pub fn next(&mut self) {
        self.selected = self.list.move_down(self.selected, self.entries().len());
    }

    pub fn page_up(&mut self) {
        self.selected = self.list.page_up(self.selected);
    }

    pub fn page_down(&mut self) {
        self.selected = self.list.page_down(self.selected, self.entries().len());
    }

    pub fn home(&mut self) {
        self.selected = 0;
    }

    pub fn end(&mut self) {
        self.selected = self.list.move_end(self.entries().len());
    }

    pub fn tab_next(&mut self) {
        self.selected = self.list.tab_next(self.selected, self.entries().len());
    }

    fn clamp_selection(&mut self) {
        self.selected = self.list.clamp(self.selected, self.entries().len());
    }

    pub fn increase_count(&mut self) {
        if !self.is_spinning() {
            self.options.count = (self.options.count + 1).min(MAX_COUNT);
        }
    }

    pub fn decrease_count(&mut self) {
        if !self.is_spinning() {
            self.options.count = self.options.count.saturating_sub(1).max(1);
        }
    }

    pub fn toggle_no_repeat(&mut self) {
        if !self.is_spinning() {
            self.options.no_repeat = !self.options.no_repeat;
        }
    }

    pub fn toggle_respect_stock(&mut self) {
        if !self.is_spinning() {
            self.options.respect_stock = !self.options.respect_stock;
        }
    }

    /// Select one entry and start the spin. The pick is committed by [`tick`](Self::tick).
    pub fn draw_once(&mut self, now: Instant) {
        if !matches!(self.mode, AppMode::Normal) {
            return;
        }
        match self.session.select_once(self.options.respect_stock) {
            Ok(selection) => self.start_spin(now, Pending::Single(selection)),
            Err(e) => self.warn(e.to_string()),
        }
    }

    /// Plan a whole batch against a snapshot and start the spin
    pub fn draw_batch(&mut self, now: Instant) {
        if !matches!(self.mode, AppMode::Normal) {
            return;
        }
        let plan = self.session.plan_batch(&self.options);
        if plan.is_empty() {
            let truncation = plan.truncated().unwrap_or(Truncation {
                completed: 0,
                requested: plan.requested(),
            });
            self.warn(truncation.to_string());
            return;
        }
        self.start_spin(now, Pending::Batch(plan));
    }

    fn start_spin(&mut self, now: Instant, pending: Pending) {
        self.notice = None;
        self.ball = None;
        self.mode = AppMode::Spinning {
            started: now,
            until: now + self.config.draw.spin_duration(),
            pending,
        };
    }

    /// Finish the spin once its deadline has passed: commit the pending draw
    /// and reveal the ball. Returns true if something was committed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let due = matches!(&self.mode, AppMode::Spinning { until, .. } if now >= *until);
        if !due {
            return false;
        }
        let AppMode::Spinning { pending, .. } = std::mem::replace(&mut self.mode, AppMode::Normal)
        else {
            return false;
        };

        self.ball = pending.reveal().map(Ball::from_entry);
        match pending {
            Pending::Single(selection) => {
                self.session.commit_single(selection, Utc::now());
            }
            Pending::Batch(plan) => {
                let outcome = self.session.commit_batch(plan, Utc::now());
                if let Some(truncation) = outcome.truncated {
                    self.warn(truncation.to_string());
                }
            }
        }
        true
    }

    pub fn clear_history(&mut self) {
        if !self.is_spinning() {
            self.session.clear_history();
            self.info("History cleared");
        }
    }

    pub fn clear_batch(&mut self) {
        if !self.is_spinning() {
            self.session.clear_batch();
            self.info("Batch cleared");
        }
    }

    pub fn delete_selected(&mut self) {
        if self.is_spinning() {
            return;
        }
        let Some(id) = self.selected_entry().map(|e| e.id) else {
            return;
        };
        if let Some(removed) = self.session.store_mut().remove(id) {
            tracing::debug!("Removed entry {} ({})", id, removed.label);
        }
        self.clamp_selection();
    }

    fn replace_entries(&mut self, setups: Vec<EntrySetup>, what: &str) {
        let count = setups.len();
        self.session.store_mut().replace_all(setups);
        self.selected = 0;
        self.info(format!("{what}: {count} entries"));
    }

    /// Open the prompt line. Edits need a selected entry and are prefilled
    /// with its current value.
    pub fn start_prompt(&mut self, kind: PromptKind) {
        if !matches!(self.mode, AppMode::Normal) {
            return;
        }
        let buffer = match &kind {
            PromptKind::Edit { id, field } => match self.session.store().get(*id) {
                Some(entry) => field.current(entry),
                None => return,
            },
            PromptKind::Palette => self.config.palette.count.to_string(),
            PromptKind::HexListStock { .. } | PromptKind::PaletteStock { .. } => {
                self.config.palette.stock.clone()
            }
            _ => String::new(),
        };
        self.mode = AppMode::Prompt { kind, buffer };
    }

    /// Edit prompt for the selected entry
    pub fn start_edit(&mut self, field: EditField) {
        if let Some(id) = self.selected_entry().map(|e| e.id) {
            self.start_prompt(PromptKind::Edit { id, field });
        }
    }

    pub fn prompt(&self) -> Option<(&PromptKind, &str)> {
        match &self.mode {
            AppMode::Prompt { kind, buffer } => Some((kind, buffer.as_str())),
            _ => None,
        }
    }

    pub fn push_prompt_char(&mut self, c: char) {
        if let AppMode::Prompt { buffer, .. } = &mut self.mode {
            buffer.push(c);
        }
    }

    pub fn pop_prompt_char(&mut self) {
        if let AppMode::Prompt { buffer, .. } = &mut self.mode {
            buffer.pop();
        }
    }

    pub fn cancel_prompt(&mut self) {
        if self.is_prompting() {
            self.mode = AppMode::Normal;
        }
    }

    /// Apply the prompt input. Failures leave the entries untouched and
    /// show a warning.
    pub async fn submit_prompt(&mut self) {
        let AppMode::Prompt { kind, buffer } = std::mem::replace(&mut self.mode, AppMode::Normal)
        else {
            return;
        };
        let input = buffer.trim();

        match kind {
            PromptKind::Add => {
                let fields: Vec<&str> = input.splitn(4, ',').collect();
                let field = |i: usize| fields.get(i).copied().unwrap_or("");
                match EntrySetup::from_form(field(0), field(1), field(2), field(3)) {
                    Some(setup) => {
                        let label = setup.label.clone();
                        self.session.store_mut().add(setup);
                        self.selected = self.entries().len() - 1;
                        self.info(format!("Added {label}"));
                    }
                    None => self.warn(format!("Invalid color {:?}", field(0).trim())),
                }
            }
            PromptKind::Edit { id, field } => {
                let edit = match field {
                    EditField::Label => Some(EntryEdit::Label(input.to_string())),
                    EditField::Weight => Some(EntryEdit::Weight(parse_count(input))),
                    EditField::Stock => Some(EntryEdit::Stock(parse_stock(input))),
                    EditField::Hex => normalize_hex(input).map(EntryEdit::Hex),
                };
                match edit {
                    Some(edit) => {
                        self.session.store_mut().edit(id, edit);
                        self.notice = None;
                    }
                    None => self.warn(format!("Invalid color {input:?}")),
                }
            }
            PromptKind::Bulk => {
                let setups = parse_bulk(&input.replace(';', "\n"));
                if setups.is_empty() {
                    self.warn("No valid lines (each line needs a hex color)");
                } else {
                    self.replace_entries(setups, "Bulk set");
                }
            }
            PromptKind::HexList => {
                if parse_hex_list(input, None).is_empty() {
                    self.warn("No hex colors found (e.g. #ff0000, #00ff00, #0000ff)");
                } else {
                    self.start_prompt(PromptKind::HexListStock {
                        list: input.to_string(),
                    });
                }
            }
            PromptKind::HexListStock { list } => {
                let setups = parse_hex_list(&list, parse_stock(input));
                self.replace_entries(setups, "Hex list");
            }
            PromptKind::Palette => {
                let count = (parse_count(input) as usize).max(1);
                self.start_prompt(PromptKind::PaletteStock { count });
            }
            PromptKind::PaletteStock { count } => {
                let setups = generate_palette(count, parse_stock(input));
                self.replace_entries(setups, "Palette");
            }
            PromptKind::Import => {
                if !input.is_empty() {
                    self.import_file(&expand_path(input)).await;
                }
            }
            PromptKind::ConfirmReset => {
                if matches!(input.to_lowercase().as_str(), "y" | "yes") {
                    self.session.store_mut().reset_preset();
                    self.selected = 0;
                    self.info("Reset to preset");
                }
            }
        }
    }

    /// Replace the entries with a CSV or JSON setup file
    pub async fn import_file(&mut self, path: &Path) {
        match transfer::read_setup_file(path).await {
            Ok(setups) if setups.is_empty() => {
                self.warn(format!("{} has no entries", path.display()));
            }
            Ok(setups) => self.replace_entries(setups, "Imported"),
            Err(e) => self.transfer_failed("Import", e),
        }
    }

    pub async fn export_results(&mut self) {
        let content = transfer::results_csv(self.session.history());
        self.export(ExportKind::Results, content).await;
    }

    pub async fn export_batch(&mut self) {
        let content = transfer::batch_csv(self.session.batch());
        self.export(ExportKind::Batch, content).await;
    }

    pub async fn save_setup(&mut self) {
        let content = transfer::export_setup_json(&self.session.store().setups());
        self.export(ExportKind::Setup, content).await;
    }

    async fn export(&mut self, kind: ExportKind, content: Result<String, TransferError>) {
        if self.is_spinning() {
            return;
        }
        let dir = self.config.export_dir();
        let written = match content {
            Ok(content) => transfer::write_export(&dir, kind, &content).await,
            Err(e) => Err(e),
        };
        match written {
            Ok(path) => self.info(format!("Saved {}", path.display())),
            Err(e) => self.transfer_failed("Export", e),
        }
    }

    fn transfer_failed(&mut self, what: &str, e: TransferError) {
        tracing::warn!("{} failed: {}", what, e);
        self.warn(format!("{what} failed: {e}"));
    }

    fn info(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::Info(message.into()));
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::Warning(message.into()));
    }
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        let mut config = Config::default();
        config.draw.seed = Some(7);
        config.draw.spin_ms = 900;
        config
    }

    fn app_with(setups: Vec<EntrySetup>) -> App {
        App::new(EntryStore::from_setups(setups), config())
    }

    fn setup(hex: &str, label: &str, stock: Option<u32>) -> EntrySetup {
        EntrySetup::new(hex.to_string(), label, 1, stock)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.push_prompt_char(c);
        }
    }

    #[test]
    fn test_single_draw_commits_after_spin() {
        let mut app = app_with(vec![setup("#ff0000", "Red", Some(2))]);
        let t0 = Instant::now();

        app.draw_once(t0);
        assert!(app.is_spinning());
        assert!(app.ball().is_none());

        // nothing is committed before the deadline
        assert!(!app.tick(t0 + Duration::from_millis(899)));
        assert!(app.session().history().is_empty());
        assert_eq!(app.entries()[0].stock, Some(2));

        assert!(app.tick(t0 + Duration::from_millis(900)));
        assert!(!app.is_spinning());
        assert_eq!(app.session().history().len(), 1);
        assert_eq!(app.entries()[0].stock, Some(1));
        assert_eq!(app.ball().map(|b| b.label.as_str()), Some("Red"));
    }

    #[test]
    fn test_no_second_draw_while_spinning() {
        let mut app = app_with(vec![setup("#ff0000", "Red", None)]);
        let t0 = Instant::now();

        app.draw_once(t0);
        app.draw_once(t0);
        app.draw_batch(t0);
        app.increase_count();
        app.delete_selected();
        app.start_prompt(PromptKind::Add);

        assert!(app.is_spinning());
        assert_eq!(app.options().count, 1);
        assert_eq!(app.entries().len(), 1);

        app.tick(t0 + Duration::from_secs(1));
        assert_eq!(app.session().history().len(), 1);
    }

    #[test]
    fn test_empty_pool_warns_without_spinning() {
        let mut app = app_with(vec![setup("#ff0000", "Red", Some(0))]);

        app.draw_once(Instant::now());
        assert!(!app.is_spinning());
        assert!(matches!(app.notice(), Some(Notice::Warning(_))));
        assert!(app.session().history().is_empty());
    }

    #[test]
    fn test_batch_truncation_warns_after_commit() {
        let mut app = app_with(vec![
            setup("#ff0000", "Red", None),
            setup("#00ff00", "Green", None),
        ]);
        for _ in 0..4 {
            app.increase_count();
        }
        let t0 = Instant::now();

        app.draw_batch(t0);
        assert!(app.notice().is_none());
        app.tick(t0 + Duration::from_secs(1));

        assert_eq!(app.session().batch().total(), 2);
        assert_eq!(app.session().history().len(), 2);
        match app.notice() {
            Some(Notice::Warning(msg)) => assert!(msg.contains("2 of 5")),
            other => panic!("expected truncation warning, got {other:?}"),
        }
    }

    #[test]
    fn test_count_bounds() {
        let mut app = app_with(vec![]);
        app.decrease_count();
        assert_eq!(app.options().count, 1);
        for _ in 0..1200 {
            app.increase_count();
        }
        assert_eq!(app.options().count, MAX_COUNT);
    }

    #[tokio::test]
    async fn test_add_prompt() {
        let mut app = app_with(vec![]);

        app.start_prompt(PromptKind::Add);
        type_text(&mut app, "#f80, Orange, 2, 5");
        app.submit_prompt().await;

        let entry = &app.entries()[0];
        assert_eq!(entry.hex, "#ff8800");
        assert_eq!(entry.label, "Orange");
        assert_eq!(entry.weight, 2);
        assert_eq!(entry.stock, Some(5));
        assert!(!app.is_prompting());

        app.start_prompt(PromptKind::Add);
        type_text(&mut app, "orange");
        app.submit_prompt().await;
        assert_eq!(app.entries().len(), 1);
        assert!(matches!(app.notice(), Some(Notice::Warning(_))));
    }

    #[tokio::test]
    async fn test_edit_prompt_prefills_and_applies() {
        let mut app = app_with(vec![setup("#ff0000", "Red", Some(3))]);

        app.start_edit(EditField::Stock);
        assert_eq!(app.prompt().map(|(_, b)| b), Some("3"));
        app.pop_prompt_char();
        app.submit_prompt().await;
        assert_eq!(app.entries()[0].stock, None);

        app.start_edit(EditField::Hex);
        app.pop_prompt_char();
        type_text(&mut app, "Z");
        app.submit_prompt().await;
        assert_eq!(app.entries()[0].hex, "#ff0000");
        assert!(matches!(app.notice(), Some(Notice::Warning(_))));
    }

    #[tokio::test]
    async fn test_bulk_prompt_replaces_or_warns() {
        let mut app = App::new(EntryStore::with_preset(), config());

        app.start_prompt(PromptKind::Bulk);
        type_text(&mut app, "nothing here");
        app.submit_prompt().await;
        assert_eq!(app.entries().len(), 6);

        app.start_prompt(PromptKind::Bulk);
        type_text(&mut app, "赤 #ff0000 5; #00ff00 x3");
        app.submit_prompt().await;
        assert_eq!(app.entries().len(), 2);
        assert_eq!(app.entries()[0].stock, Some(5));
        assert_eq!(app.entries()[1].stock, None);
    }

    #[tokio::test]
    async fn test_hex_list_asks_for_common_stock() {
        let mut app = app_with(vec![]);

        app.start_prompt(PromptKind::HexList);
        type_text(&mut app, "#ff0000, 00ff00");
        app.submit_prompt().await;

        // prefilled with the configured default stock
        assert_eq!(app.prompt().map(|(_, b)| b), Some("2"));
        app.submit_prompt().await;

        assert_eq!(app.entries().len(), 2);
        assert!(app.entries().iter().all(|e| e.stock == Some(2)));
    }

    #[tokio::test]
    async fn test_palette_prompt() {
        let mut app = app_with(vec![]);

        app.start_prompt(PromptKind::Palette);
        app.pop_prompt_char();
        type_text(&mut app, "4");
        app.submit_prompt().await;
        app.pop_prompt_char();
        app.submit_prompt().await;

        assert_eq!(app.entries().len(), 4);
        assert_eq!(app.entries()[3].label, "Color 4");
        assert!(app.entries().iter().all(|e| e.stock.is_none()));
    }

    #[tokio::test]
    async fn test_reset_needs_confirmation() {
        let mut app = app_with(vec![setup("#123456", "Only", None)]);

        app.start_prompt(PromptKind::ConfirmReset);
        type_text(&mut app, "n");
        app.submit_prompt().await;
        assert_eq!(app.entries().len(), 1);

        app.start_prompt(PromptKind::ConfirmReset);
        type_text(&mut app, "y");
        app.submit_prompt().await;
        assert_eq!(app.entries().len(), 6);
    }

    #[test]
    fn test_delete_clamps_selection() {
        let mut app = app_with(vec![
            setup("#ff0000", "Red", None),
            setup("#00ff00", "Green", None),
        ]);
        app.end();
        app.delete_selected();
        assert_eq!(app.selected_index(), 0);
        app.delete_selected();
        assert!(app.entries().is_empty());
        app.delete_selected();
    }

    #[tokio::test]
    async fn test_import_failure_keeps_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"hex": "x"}"#).unwrap();

        let mut app = App::new(EntryStore::with_preset(), config());
        app.import_file(&path).await;
        assert_eq!(app.entries().len(), 6);
        assert!(matches!(app.notice(), Some(Notice::Warning(_))));

        let good = dir.path().join("setup.csv");
        std::fs::write(&good, "hex,label,weight,stock\n#ff0000,Red,1,3\n").unwrap();
        app.import_file(&good).await;
        assert_eq!(app.entries().len(), 1);
        assert_eq!(app.entries()[0].stock, Some(3));
    }

    #[tokio::test]
    async fn test_export_batch_writes_into_export_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config();
        config.export.dir = dir.path().to_path_buf();
        let mut app = App::new(EntryStore::with_preset(), config);

        app.export_batch().await;
        assert!(matches!(app.notice(), Some(Notice::Warning(_))));

        let t0 = Instant::now();
        app.draw_batch(t0);
        app.tick(t0 + Duration::from_secs(1));
        app.export_batch().await;
        assert!(matches!(app.notice(), Some(Notice::Info(_))));

        let written: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(written.len(), 1);
    }
}
