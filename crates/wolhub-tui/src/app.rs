//! Application core — event loop, state, action dispatch.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use wolhub_core::{
    Device, DeviceForm, Dispatcher, Feedback, FeedbackChannel, Intent, ListView, Notification,
    Phase,
};

use crate::action::{Action, ConfirmAction};
use crate::event::{Event, EventReader};
use crate::theme;
use crate::tui::Tui;

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

// ── Add form ────────────────────────────────────────────────────────

const FORM_LABELS: [&str; 5] = ["Name", "MAC address", "IP address", "Broadcast IP", "Port"];

/// The add-device input form. Field order matches [`FORM_LABELS`].
#[derive(Default)]
struct AddForm {
    inputs: [Input; 5],
    focus: usize,
}

impl AddForm {
    fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.inputs.len();
    }

    fn prev_field(&mut self) {
        self.focus = (self.focus + self.inputs.len() - 1) % self.inputs.len();
    }

    fn to_device_form(&self) -> DeviceForm {
        DeviceForm {
            name: self.inputs[0].value().into(),
            mac_address: self.inputs[1].value().into(),
            ip_address: self.inputs[2].value().into(),
            broadcast_ip: self.inputs[3].value().into(),
            port: self.inputs[4].value().into(),
        }
    }
}

// ── App ─────────────────────────────────────────────────────────────

/// Top-level application state and event loop.
pub struct App {
    dispatcher: Dispatcher,
    feedback_mode: FeedbackChannel,
    /// Whether the app should keep running.
    running: bool,
    /// Last received device list snapshot.
    view: ListView,
    /// Selected index into the loaded device list.
    selected: usize,
    list_state: ListState,
    /// The intent currently holding the single-flight guard, if any.
    busy: Option<Intent>,
    spinner_frame: usize,
    /// Active toasts, oldest first. Pruned on tick once expired.
    toasts: Vec<Notification>,
    /// Queued modal notifications (dialog feedback mode).
    dialogs: VecDeque<Notification>,
    /// Add form, when open.
    form: Option<AddForm>,
    /// Pending delete confirmation, when open.
    confirm: Option<ConfirmAction>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(dispatcher: Dispatcher, feedback_mode: FeedbackChannel) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            dispatcher,
            feedback_mode,
            running: true,
            view: ListView::default(),
            selected: 0,
            list_state: ListState::default(),
            busy: None,
            spinner_frame: 0,
            toasts: Vec::new(),
            dialogs: VecDeque::new(),
            form: None,
            confirm: None,
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let cancel = CancellationToken::new();
        tokio::spawn(crate::data_bridge::spawn_data_bridge(
            self.dispatcher.clone(),
            self.action_tx.clone(),
            cancel.clone(),
        ));

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        // Kick off the initial fetch
        self.action_tx.send(Action::Refresh)?;

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key) {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                let render = matches!(action, Action::Render);
                self.process_action(action);

                if render {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Key handling ─────────────────────────────────────────────────

    /// Map a key event to an action. Modal layers take priority:
    /// dialog, then confirm popup, then the add form, then global keys.
    fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        // Dialog-mode notification: must be dismissed before anything else
        if !self.dialogs.is_empty() {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(Action::DismissDialog),
                _ => None,
            };
        }

        if self.confirm.is_some() {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Enter => Some(Action::ConfirmYes),
                KeyCode::Char('n') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            };
        }

        if let Some(form) = self.form.as_mut() {
            return match key.code {
                KeyCode::Esc => Some(Action::CloseForm),
                KeyCode::Enter => Some(Action::SubmitAdd),
                KeyCode::Tab | KeyCode::Down => Some(Action::FormNextField),
                KeyCode::BackTab | KeyCode::Up => Some(Action::FormPrevField),
                _ => {
                    form.inputs[form.focus]
                        .handle_event(&crossterm::event::Event::Key(key));
                    None
                }
            };
        }

        match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('a') => Some(Action::OpenForm),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::SelectPrev),
            KeyCode::Char('w') | KeyCode::Enter => Some(Action::RequestWake),
            KeyCode::Char('d') | KeyCode::Delete => {
                let identity = self.dispatcher.identity();
                self.selected_device().map(|device| {
                    Action::ShowConfirm(ConfirmAction::DeleteDevice {
                        identifier: identity.of(device).to_owned(),
                        name: device.name.clone(),
                    })
                })
            }
            _ => None,
        }
    }

    // ── Action processing ────────────────────────────────────────────

    fn process_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Tick => {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
                let now = Instant::now();
                self.toasts.retain(|n| n.phase(now) != Phase::Expired);
            }

            Action::Render | Action::Resize(..) => {}

            Action::SelectNext => {
                let count = self.device_count();
                if count > 0 {
                    self.selected = (self.selected + 1).min(count - 1);
                }
            }

            Action::SelectPrev => {
                self.selected = self.selected.saturating_sub(1);
            }

            Action::Refresh => {
                let dispatcher = self.dispatcher.clone();
                tokio::spawn(async move {
                    dispatcher.refresh().await;
                });
            }

            Action::RequestWake => {
                if let Some(device) = self.selected_device() {
                    let identifier = self.dispatcher.identity().of(device).to_owned();
                    let dispatcher = self.dispatcher.clone();
                    tokio::spawn(async move {
                        dispatcher.wake(&identifier).await;
                    });
                }
            }

            Action::OpenForm => {
                self.form = Some(AddForm::default());
            }

            Action::CloseForm => {
                self.form = None;
            }

            Action::FormNextField => {
                if let Some(form) = self.form.as_mut() {
                    form.next_field();
                }
            }

            Action::FormPrevField => {
                if let Some(form) = self.form.as_mut() {
                    form.prev_field();
                }
            }

            Action::SubmitAdd => {
                if let Some(form) = self.form.as_ref() {
                    let device_form = form.to_device_form();
                    if device_form.is_complete() {
                        let dispatcher = self.dispatcher.clone();
                        tokio::spawn(async move {
                            dispatcher.submit_add(device_form).await;
                        });
                    } else {
                        // Checked at the source; never dispatched
                        self.push_note(Notification::error(
                            "Name and MAC address are required",
                        ));
                    }
                }
            }

            Action::ShowConfirm(confirm) => {
                self.confirm = Some(confirm);
            }

            Action::ConfirmNo => {
                // Declined; the dispatcher is never touched
                self.confirm = None;
            }

            Action::ConfirmYes => {
                if let Some(ConfirmAction::DeleteDevice { identifier, .. }) = self.confirm.take()
                {
                    let dispatcher = self.dispatcher.clone();
                    tokio::spawn(async move {
                        dispatcher.remove(&identifier).await;
                    });
                }
            }

            Action::DismissDialog => {
                self.dialogs.pop_front();
            }

            Action::ListUpdated(view) => {
                debug!("list snapshot replaced");
                self.view = view;
                let count = self.device_count();
                if count == 0 {
                    self.selected = 0;
                } else {
                    self.selected = self.selected.min(count - 1);
                }
            }

            Action::FeedbackReceived(event) => match event {
                Feedback::OpStarted(intent) => {
                    self.busy = Some(intent);
                }
                Feedback::OpFinished(_) => {
                    self.busy = None;
                }
                Feedback::Notify(note) => {
                    self.push_note(note);
                }
                Feedback::ClearForm => {
                    self.form = None;
                }
            },
        }
    }

    fn push_note(&mut self, note: Notification) {
        match self.feedback_mode {
            FeedbackChannel::Toast => self.toasts.push(note),
            FeedbackChannel::Dialog => self.dialogs.push_back(note),
        }
    }

    fn device_count(&self) -> usize {
        match &self.view {
            ListView::Loaded(devices) => devices.len(),
            ListView::Loading | ListView::Failed(_) => 0,
        }
    }

    fn selected_device(&self) -> Option<&Device> {
        match &self.view {
            ListView::Loaded(devices) => devices.get(self.selected),
            ListView::Loading | ListView::Failed(_) => None,
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // Device list
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        self.render_devices(frame, layout[0]);
        self.render_status_bar(frame, layout[1]);

        if let Some(form) = self.form.as_ref() {
            render_form(frame, area, form);
        }
        if let Some(confirm) = self.confirm.as_ref() {
            render_confirm(frame, area, confirm);
        }
        if let Some(dialog) = self.dialogs.front() {
            render_dialog(frame, area, dialog);
        }
        self.render_toasts(frame, area);
    }

    fn render_devices(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" wolhub — Wake-on-LAN devices ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match &self.view {
            ListView::Loading => {
                frame.render_widget(
                    Paragraph::new("Loading devices...").style(theme::key_hint()),
                    inner,
                );
            }

            ListView::Failed(message) => {
                frame.render_widget(
                    Paragraph::new(message.as_str())
                        .style(Style::default().fg(theme::ERROR_RED)),
                    inner,
                );
            }

            ListView::Loaded(devices) if devices.is_empty() => {
                frame.render_widget(
                    Paragraph::new("No devices registered yet. Press 'a' to add one.")
                        .style(theme::key_hint()),
                    inner,
                );
            }

            ListView::Loaded(devices) => {
                let items: Vec<ListItem> = devices.iter().map(device_card).collect();
                let list = List::new(items)
                    .highlight_style(theme::card_selected())
                    .highlight_symbol("▌ ");
                self.list_state.select(Some(self.selected));
                frame.render_stateful_widget(list, inner, &mut self.list_state);
            }
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];

        if let Some(intent) = self.busy {
            let glyph = SPINNER[self.spinner_frame % SPINNER.len()];
            spans.push(Span::styled(
                format!("{glyph} {} ", intent_label(intent)),
                Style::default().fg(theme::INFO_YELLOW),
            ));
        }

        spans.push(Span::styled("a", theme::key_hint_key()));
        spans.push(Span::styled(" add  ", theme::key_hint()));
        spans.push(Span::styled("w", theme::key_hint_key()));
        spans.push(Span::styled(" wake  ", theme::key_hint()));
        spans.push(Span::styled("d", theme::key_hint_key()));
        spans.push(Span::styled(" delete  ", theme::key_hint()));
        spans.push(Span::styled("r", theme::key_hint_key()));
        spans.push(Span::styled(" refresh  ", theme::key_hint()));
        spans.push(Span::styled("q", theme::key_hint_key()));
        spans.push(Span::styled(" quit", theme::key_hint()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Stack toasts in the top-right corner, newest at the bottom.
    /// Fading toasts render dimmed for the last 300ms of their life.
    fn render_toasts(&self, frame: &mut Frame, area: Rect) {
        let now = Instant::now();
        for (i, toast) in self.toasts.iter().enumerate() {
            let phase = toast.phase(now);
            if phase == Phase::Expired {
                continue;
            }
            let width = (toast.message.len() as u16 + 2).min(area.width);
            let y = area.y + 1 + i as u16;
            if y >= area.y + area.height {
                break;
            }
            let rect = Rect::new(area.x + area.width.saturating_sub(width + 1), y, width, 1);
            frame.render_widget(Clear, rect);
            frame.render_widget(
                Paragraph::new(format!(" {} ", toast.message))
                    .style(theme::notification(toast.level, phase == Phase::Fading)),
                rect,
            );
        }
    }
}

// ── Widgets ─────────────────────────────────────────────────────────

/// One device card: name plus an online/offline hint (derived from
/// `ip_address` presence, not a liveness check), MAC, IP (only when
/// known), wake target.
fn device_card(device: &Device) -> ListItem<'_> {
    let status = if device.ip_address.is_some() {
        Span::styled("  ● online", Style::default().fg(theme::SUCCESS_GREEN))
    } else {
        Span::styled("  ○ offline", theme::key_hint())
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(
            device.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        status,
    ])];

    lines.push(Line::from(Span::styled(
        format!("  MAC: {}", device.mac_address),
        theme::card_text(),
    )));

    if let Some(ip) = &device.ip_address {
        lines.push(Line::from(Span::styled(
            format!("  IP:  {ip}"),
            theme::card_text(),
        )));
    }

    let broadcast = device.broadcast_ip.as_deref().unwrap_or("255.255.255.255");
    let port = device.port.unwrap_or(9);
    lines.push(Line::from(Span::styled(
        format!("  Wake: {broadcast}:{port}"),
        theme::key_hint(),
    )));
    lines.push(Line::from(""));

    ListItem::new(lines)
}

fn intent_label(intent: Intent) -> &'static str {
    match intent {
        Intent::Add => "adding...",
        Intent::Wake => "waking...",
        Intent::Remove => "deleting...",
        Intent::Refresh => "refreshing...",
    }
}

fn render_form(frame: &mut Frame, area: Rect, form: &AddForm) {
    let popup = centered_rect(44, 9, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Add device ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let rows = Layout::vertical([Constraint::Length(1); 7]).split(inner);

    for (i, label) in FORM_LABELS.iter().enumerate() {
        let focused = i == form.focus;
        let label_style = if focused {
            theme::title_style()
        } else {
            theme::key_hint()
        };
        let line = Line::from(vec![
            Span::styled(format!(" {label:<13}"), label_style),
            Span::styled(form.inputs[i].value().to_owned(), theme::card_text()),
        ]);
        frame.render_widget(Paragraph::new(line), rows[i]);

        if focused {
            // +14 for the padded label column
            let x = rows[i].x + 14 + form.inputs[i].visual_cursor() as u16;
            frame.set_cursor_position((x.min(rows[i].right().saturating_sub(1)), rows[i].y));
        }
    }

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " Enter submit   Tab next   Esc cancel",
            theme::key_hint(),
        ))),
        rows[6],
    );
}

fn render_confirm(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
    let popup = centered_rect(46, 5, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Confirm ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::ERROR_RED));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let lines = vec![
        Line::from(Span::styled(format!(" {confirm}"), theme::card_text())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" y", theme::key_hint_key()),
            Span::styled(" confirm   ", theme::key_hint()),
            Span::styled("n", theme::key_hint_key()),
            Span::styled(" cancel", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_dialog(frame: &mut Frame, area: Rect, note: &Notification) {
    let width = (note.message.len() as u16 + 6).clamp(30, area.width.saturating_sub(2));
    let popup = centered_rect(width, 5, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Notice ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::notification(note.level, false));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let lines = vec![
        Line::from(Span::styled(
            format!(" {}", note.message),
            theme::notification(note.level, false),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Enter", theme::key_hint_key()),
            Span::styled(" dismiss", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

// ── Tests ───────────────────────────────────────────────────────────
