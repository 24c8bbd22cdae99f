use std::time::{Duration, Instant};

use hexsplit::core::{BlockRow, LookupRequest, Session};
use hexsplit::domain::abi::CandidateSignature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Blocks,
    Signatures,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Prompt(PromptKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Signature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

#[derive(Debug)]
pub struct App {
    /// Raw text in the input panel
    pub input: String,
    /// Calldata mode toggle as shown in the header
    pub calldata_mode: bool,
    default_calldata_mode: bool,
    pub session: Session,
    pub focus: Focus,
    pub input_mode: InputMode,
    pub prompt_input: String,
    pub selected_block: usize,
    /// Message of the last failed split
    pub error: Option<String>,
    pub status: Option<StatusMessage>,
    pub browse_url: String,
    pub help_open: bool,
    pub should_quit: bool,
    pending_lookup: Option<LookupRequest>,
}

impl App {
    pub fn new(calldata_mode: bool, lookups_enabled: bool, browse_url: impl Into<String>) -> Self {
        Self {
            input: String::new(),
            calldata_mode,
            default_calldata_mode: calldata_mode,
            session: Session::new(lookups_enabled),
            focus: Focus::Input,
            input_mode: InputMode::Normal,
            prompt_input: String::new(),
            selected_block: 0,
            error: None,
            status: None,
            browse_url: browse_url.into(),
            help_open: false,
            should_quit: false,
            pending_lookup: None,
        }
    }

    pub fn focus_label(&self) -> &'static str {
        match self.focus {
            Focus::Input => "Input",
            Focus::Blocks => "Blocks",
            Focus::Signatures => "Signature",
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > Duration::from_secs(3) {
                self.status = None;
            }
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        self.input.push(ch);
    }

    /// Bracketed paste, newlines included
    pub fn insert_str(&mut self, text: &str) {
        self.input.push_str(text);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Split the input panel contents with the current toggle
    pub fn split_input(&mut self) {
        self.selected_block = 0;
        match self.session.split(&self.input, self.calldata_mode) {
            Ok(request) => {
                self.error = None;
                self.pending_lookup = request;
                let count = self.session.blocks().len();
                self.set_status(
                    format!("Split into {count} block{}", if count == 1 { "" } else { "s" }),
                    StatusLevel::Info,
                );
                if count > 0 && self.focus == Focus::Input {
                    self.focus = Focus::Blocks;
                }
            }
            Err(err) => {
                self.pending_lookup = None;
                self.error = Some(err.to_string());
            }
        }
    }

    pub fn toggle_calldata_mode(&mut self) {
        self.calldata_mode = !self.calldata_mode;
        let label = if self.calldata_mode { "on" } else { "off" };
        self.set_status(format!("Calldata mode {label}"), StatusLevel::Info);
    }

    /// Reset input, output and the toggle to its configured default
    pub fn clear_all(&mut self) {
        self.input.clear();
        self.session.clear();
        self.calldata_mode = self.default_calldata_mode;
        self.error = None;
        self.pending_lookup = None;
        self.selected_block = 0;
        self.focus = Focus::Input;
        self.set_status("Cleared", StatusLevel::Info);
    }

    pub fn take_lookup_request(&mut self) -> Option<LookupRequest> {
        self.pending_lookup.take()
    }

    pub fn apply_lookup_finished(
        &mut self,
        generation: u64,
        result: Result<Vec<CandidateSignature>, String>,
    ) {
        let failed = result.is_err();
        if !self.session.apply_lookup(generation, result) {
            return;
        }
        if failed {
            self.set_status("Signature lookup failed", StatusLevel::Warn);
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Blocks,
            Focus::Blocks => Focus::Signatures,
            Focus::Signatures => Focus::Input,
        };
    }

    pub fn move_selection_up(&mut self) {
        self.selected_block = self.selected_block.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        let len = self.session.blocks().len();
        if len > 0 && self.selected_block + 1 < len {
            self.selected_block += 1;
        }
    }

    pub fn cycle_decode(&mut self, forward: bool) {
        if !self.session.cycle_decode_choice(self.selected_block, forward) {
            self.set_status("Partial blocks cannot be decoded", StatusLevel::Warn);
        }
    }

    pub fn clear_decode_choice(&mut self) {
        self.session.set_decode_choice(self.selected_block, None);
    }

    pub fn cycle_candidate(&mut self, forward: bool) {
        if self.session.cycle_candidate(forward) {
            if let Some(signature) = self.session.active_signature() {
                let text = signature.to_string();
                self.set_status(format!("Using {text}"), StatusLevel::Info);
            }
        }
    }

    pub fn enter_prompt(&mut self, kind: PromptKind) {
        if !self.session.has_output() {
            self.set_status("Split some data first", StatusLevel::Warn);
            return;
        }
        self.input_mode = InputMode::Prompt(kind);
        self.prompt_input = self
            .session
            .active_signature()
            .map(str::to_string)
            .unwrap_or_default();
    }

    pub fn exit_prompt(&mut self) {
        self.input_mode = InputMode::Normal;
        self.prompt_input.clear();
    }

    pub fn apply_prompt(&mut self, kind: PromptKind) {
        match kind {
            PromptKind::Signature => {
                let text = self.prompt_input.trim().to_string();
                if self.session.set_manual_signature(text) {
                    self.set_status("Signature applied", StatusLevel::Info);
                } else {
                    self.set_status("Empty signature", StatusLevel::Warn);
                }
            }
        }
        self.exit_prompt();
    }

    pub fn selected_row(&self) -> Option<BlockRow> {
        self.session.block_rows().into_iter().nth(self.selected_block)
    }

    /// Text for `y`: the selected block, or the signature / selector
    pub fn copy_target(&self) -> Option<String> {
        match self.focus {
            Focus::Blocks => self.selected_row().map(|row| row.content),
            Focus::Signatures => self
                .session
                .active_signature()
                .map(str::to_string)
                .or_else(|| self.session.selector().map(|s| s.to_string())),
            Focus::Input => None,
        }
    }

    pub fn lookup_link(&self) -> Option<String> {
        self.session
            .selector()
            .map(|selector| selector.browse_url(&self.browse_url))
    }
}
