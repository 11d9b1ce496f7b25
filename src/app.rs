use crate::backend::ReplyDispatcher;
use crate::controller::ChatController;
use crate::event::AppEvent;
use crate::session::store::FileStorage;
use crate::session::Sender;
use crate::theme::Theme;
use crate::view::{Transcript, TranscriptEntry};
use eframe::egui::{self, Align, Layout, RichText, ScrollArea};
use std::sync::mpsc::{Receiver, TryRecvError};
use tracing::warn;

pub struct ChatApp {
    rx: Receiver<AppEvent>,
    dispatcher: ReplyDispatcher,
    controller: ChatController<FileStorage>,
    transcript: Transcript,
    theme: Theme,
    input_buffer: String,
    confirm_clear: bool,
}

impl ChatApp {
    pub fn new(
        creation_context: &eframe::CreationContext<'_>,
        rx: Receiver<AppEvent>,
        dispatcher: ReplyDispatcher,
        storage: FileStorage,
    ) -> Self {
        let theme = Theme::default();
        theme.apply_visuals(&creation_context.egui_ctx);

        let mut transcript = Transcript::default();
        let mut controller = ChatController::new(storage);
        controller.initialize(&mut transcript);

        Self {
            rx,
            dispatcher,
            controller,
            transcript,
            theme,
            input_buffer: String::new(),
            confirm_clear: false,
        }
    }

    fn drain_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(AppEvent::ReplyFinished { turn, outcome }) => {
                    self.controller
                        .finish_reply(turn, outcome, &mut self.transcript);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("reply channel disconnected");
                    break;
                }
            }
        }
    }

    fn submit_input(&mut self, ctx: &egui::Context) {
        let text = std::mem::take(&mut self.input_buffer);
        match self
            .controller
            .submit_user_message(&text, &mut self.transcript)
        {
            Some(request) => self.dispatcher.dispatch(request, Some(ctx.clone())),
            None => self.input_buffer = text,
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("HR Policy Assistant");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let pending = self.controller.pending_turns();
                    if pending > 0 {
                        ui.label(
                            RichText::new(format!("{pending} awaiting reply"))
                                .color(self.theme.text_muted),
                        );
                    }
                });
            });
        });
    }

    fn render_left_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("history_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                if ui.button("+ New Chat").clicked() {
                    self.controller.create_session(&mut self.transcript);
                }
                ui.separator();
                ui.strong("History");

                let mut clicked_session: Option<String> = None;
                ScrollArea::vertical()
                    .id_salt("history_list")
                    .max_height((ui.available_height() - 60.0).max(80.0))
                    .show(ui, |ui| {
                        for item in self.transcript.session_items() {
                            if ui.selectable_label(item.active, item.title.as_str()).clicked() {
                                clicked_session = Some(item.id.clone());
                            }
                        }
                    });

                if let Some(session_id) = clicked_session {
                    self.controller
                        .select_session(&session_id, &mut self.transcript);
                }

                ui.separator();
                if ui
                    .button(RichText::new("Clear All History").color(self.theme.danger))
                    .clicked()
                {
                    self.confirm_clear = true;
                }
            });
    }

    fn render_center_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let transcript_height = (ui.available_height() - 80.0).max(120.0);
            let scroll_to_bottom = self.transcript.take_scroll_request();
            egui::Frame::new().fill(self.theme.surface_0).show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("chat_transcript")
                    .max_height(transcript_height)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for entry in self.transcript.entries() {
                            self.render_entry(ui, entry);
                        }
                        if scroll_to_bottom {
                            ui.scroll_to_cursor(Some(Align::BOTTOM));
                        }
                    });
            });

            ui.separator();
            let mut send_now = false;
            self.theme.composer_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    let input_width = (ui.available_width() - 80.0).max(120.0);
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.input_buffer)
                            .desired_width(input_width)
                            .hint_text(
                                RichText::new("Ask about HR policies...")
                                    .color(self.theme.text_muted),
                            ),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        send_now = true;
                        response.request_focus();
                    }

                    let clicked = ui
                        .add_enabled(
                            !self.input_buffer.trim().is_empty(),
                            egui::Button::new("Send"),
                        )
                        .clicked();
                    send_now |= clicked;
                });
            });

            if send_now {
                self.submit_input(ctx);
            }
        });
    }

    fn render_entry(&self, ui: &mut egui::Ui, entry: &TranscriptEntry) {
        let max_width = self.theme.bubble_max_width;
        match entry {
            TranscriptEntry::Message(message) if message.sender == Sender::User => {
                ui.with_layout(Layout::right_to_left(Align::TOP), |ui| {
                    self.theme.user_bubble().show(ui, |ui| {
                        ui.set_max_width(max_width);
                        ui.label(RichText::new(&message.text).color(self.theme.text_on_accent));
                    });
                });
            }
            TranscriptEntry::Message(message) => {
                self.theme.bot_bubble().show(ui, |ui| {
                    ui.set_max_width(max_width);
                    ui.label(message.text.as_str());
                });
            }
            TranscriptEntry::Typing(_) => {
                self.theme.bot_bubble().show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new());
                        ui.label(RichText::new("typing").color(self.theme.text_muted));
                    });
                });
            }
        }
    }

    fn render_clear_confirmation(&mut self, ctx: &egui::Context) {
        if !self.confirm_clear {
            return;
        }

        let mut decision: Option<bool> = None;
        egui::Window::new("Clear all history")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Are you sure you want to delete all chat history?");
                ui.horizontal(|ui| {
                    if ui
                        .button(RichText::new("Delete").color(self.theme.danger))
                        .clicked()
                    {
                        decision = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        decision = Some(false);
                    }
                });
            });

        match decision {
            Some(true) => {
                self.controller.clear_all(&mut self.transcript);
                self.confirm_clear = false;
            }
            Some(false) => self.confirm_clear = false,
            None => {}
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();
        self.render_top_bar(ctx);
        self.render_left_panel(ctx);
        self.render_center_panel(ctx);
        self.render_clear_confirmation(ctx);
    }
}
