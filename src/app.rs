use eframe::egui;

use crate::config::AppConfig;
use crate::data::chart::ChartAdapter;
use crate::state::{Notice, Session};
use crate::ui::{panels, UiEvents};
use crate::view::SessionView;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DataSweeperApp {
    pub session: Session,
    pub config: AppConfig,
    /// Messages produced by the most recent interaction.
    pub notices: Vec<Notice>,
    /// State of the "Clean data" checkbox; purely presentational.
    pub show_cleaning: bool,
}

impl DataSweeperApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            session: Session::new(ChartAdapter::new(config.pie_max_categories)),
            config,
            notices: Vec::new(),
            show_cleaning: false,
        }
    }

    /// Run the frame's actions through the session, in order. Notices from
    /// the previous interaction are replaced.
    fn apply(&mut self, events: UiEvents) {
        if events.is_empty() {
            return;
        }
        self.notices = events.notices;
        for action in events.actions {
            log::debug!("Dispatching {action:?}");
            let notices = self.session.dispatch(action);
            self.notices.extend(notices);
        }
    }
}

impl eframe::App for DataSweeperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut events = UiEvents::default();
        {
            let view = SessionView::build(&self.session, self.config.preview_rows);

            // ---- Top panel: menu bar ----
            egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
                panels::top_bar(ui, &view, &mut events);
            });

            // ---- Left side panel: uploaded files ----
            egui::SidePanel::left("files_panel")
                .default_width(320.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &view, &mut events);
                });

            // ---- Central panel: preview, cleaning, charts, conversion ----
            egui::CentralPanel::default().show(ctx, |ui| {
                panels::central_panel(
                    ui,
                    &view,
                    &self.notices,
                    &mut self.show_cleaning,
                    &mut events,
                );
            });
        }
        self.apply(events);
    }
}
