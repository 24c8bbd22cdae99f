mod app;
mod ui;

use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use hexsplit::config::{self, Config};
use hexsplit::core::{render_report, Session};
use hexsplit::infrastructure::fourbyte::{FourByteClient, SignatureResolver};
use hexsplit::infrastructure::runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
use hexsplit::logging::{self, LogTarget};

use crate::app::{App, Focus, InputMode, PromptKind, StatusLevel};

#[derive(Debug, Parser)]
#[command(
    name = "hexsplit",
    version,
    about = "Split EVM calldata into 32-byte words and decode them"
)]
struct Args {
    /// Treat the first 4 bytes as a function selector
    #[arg(long)]
    calldata: bool,

    /// Hex data to load on start (use `-` to read stdin)
    #[arg(long)]
    input: Option<String>,

    /// Signature to decode with instead of looking the selector up
    #[arg(long)]
    signature: Option<String>,

    /// Never contact the signature directory
    #[arg(long)]
    offline: bool,

    /// Print the split result and exit instead of opening the TUI
    #[arg(long)]
    print: bool,

    /// Config file (defaults to $HEXSPLIT_CONFIG or the XDG config dir)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::load(args.config.as_deref());

    let input = match args.input.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading input from stdin")?;
            Some(buf)
        }
        other => other.map(str::to_string),
    };

    let calldata_mode = args.calldata || config.calldata_mode;
    let lookups_enabled = config.resolver.enabled && !args.offline && args.signature.is_none();

    if args.print {
        if let Err(err) = logging::init(&config.log.level, LogTarget::Stderr) {
            eprintln!("{err:#}");
        }
        return print_report(&config, input.unwrap_or_default(), &args, lookups_enabled);
    }

    if let Some(path) = config.log_path() {
        // the terminal is unusable for log output once raw mode is on
        let _ = logging::init(&config.log.level, LogTarget::File(path));
    }
    tracing::info!(calldata_mode, lookups_enabled, "starting hexsplit");

    let resolver: Arc<dyn SignatureResolver> = Arc::new(FourByteClient::new(&config.resolver)?);
    let runtime = RuntimeBridge::new(resolver)?;

    let mut app = App::new(
        calldata_mode,
        lookups_enabled,
        config.resolver.browse_url.clone(),
    );
    if let Some(input) = input {
        app.insert_str(input.trim());
        app.split_input();
        if let Some(signature) = args.signature.as_deref() {
            app.session.set_manual_signature(signature);
        }
    }

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, runtime);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("{err:?}");
        eprintln!("{err:?}");
    }

    Ok(())
}

/// One-shot mode: split, optionally resolve the selector, print, exit
fn print_report(config: &Config, input: String, args: &Args, lookups_enabled: bool) -> Result<()> {
    let calldata_mode = args.calldata || config.calldata_mode;
    let mut session = Session::new(lookups_enabled);
    let request = session.split(&input, calldata_mode)?;

    if let Some(request) = request {
        let client = FourByteClient::new(&config.resolver)?;
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("starting tokio runtime")?;
        let result = rt
            .block_on(client.lookup(&request.selector))
            .map_err(|err| err.to_string());
        session.apply_lookup(request.generation, result);
    }
    if let Some(signature) = args.signature.as_deref() {
        session.set_manual_signature(signature);
    }

    print!("{}", render_report(&session, &config.resolver.browse_url));
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &runtime);
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => handle_key(&mut app, key),
                Event::Paste(text) => handle_paste(&mut app, &text),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}

/// Send queued lookups and apply finished ones
fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    if let Some(request) = app.take_lookup_request() {
        let cmd = RuntimeCommand::LookupSelector {
            generation: request.generation,
            selector: request.selector,
        };
        if let Err(err) = runtime.send(cmd) {
            app.set_status(err.to_string(), StatusLevel::Error);
        }
    }

    for event in runtime.poll_events() {
        match event {
            RuntimeEvent::LookupFinished {
                generation,
                selector,
                result,
            } => {
                tracing::debug!(selector = %selector, generation, "lookup event");
                app.apply_lookup_finished(generation, result);
            }
            RuntimeEvent::Error { message } => {
                tracing::error!("{message}");
                app.set_status(message, StatusLevel::Error);
            }
        }
    }
}

fn handle_paste(app: &mut App, text: &str) {
    match app.input_mode {
        InputMode::Prompt(_) => app.prompt_input.push_str(text.trim()),
        InputMode::Normal => {
            app.focus = Focus::Input;
            app.insert_str(text);
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.help_open = false;
        }
        return;
    }

    match app.input_mode {
        InputMode::Prompt(kind) => handle_prompt_mode(app, key, kind),
        InputMode::Normal => {
            if !handle_global(app, key) {
                match app.focus {
                    Focus::Input => handle_input_focus(app, key),
                    Focus::Blocks | Focus::Signatures => handle_normal_mode(app, key),
                }
            }
        }
    }
}

/// Keys that work regardless of focus. Returns true when consumed.
fn handle_global(app: &mut App, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::F(5) => app.split_input(),
        KeyCode::Char('s') if ctrl => app.split_input(),
        KeyCode::Char('t') if ctrl => app.toggle_calldata_mode(),
        KeyCode::Char('l') if ctrl => app.clear_all(),
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Tab => app.cycle_focus(),
        _ => return false,
    }
    true
}

fn handle_input_focus(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.focus = Focus::Blocks,
        KeyCode::Enter => app.insert_char('\n'),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.insert_char(ch);
        }
        _ => {}
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.help_open = true,
        KeyCode::Char('i') => app.focus = Focus::Input,
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),
        KeyCode::Left | KeyCode::Char('h') => app.cycle_decode(false),
        KeyCode::Right | KeyCode::Char('l') => app.cycle_decode(true),
        KeyCode::Char('x') => app.clear_decode_choice(),
        KeyCode::Char('[') => app.cycle_candidate(false),
        KeyCode::Char(']') => app.cycle_candidate(true),
        KeyCode::Char('s') => app.enter_prompt(PromptKind::Signature),
        KeyCode::Char('y') => {
            let text = app.copy_target();
            copy_to_clipboard(app, text);
        }
        KeyCode::Char('o') => {
            let text = app.lookup_link();
            copy_to_clipboard(app, text);
        }
        _ => {}
    }
}

fn handle_prompt_mode(app: &mut App, key: KeyEvent, kind: PromptKind) {
    match key.code {
        KeyCode::Esc => app.exit_prompt(),
        KeyCode::Enter => app.apply_prompt(kind),
        KeyCode::Backspace => {
            app.prompt_input.pop();
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.prompt_input.push(ch);
        }
        _ => {}
    }
}

fn copy_to_clipboard(app: &mut App, text: Option<String>) {
    use arboard::Clipboard;

    let Some(text) = text else {
        app.set_status("Nothing to copy", StatusLevel::Warn);
        return;
    };

    match Clipboard::new() {
        Ok(mut clipboard) => {
            if clipboard.set_text(text.as_str()).is_ok() {
                let shown = if text.chars().count() > 24 {
                    format!("{}...", text.chars().take(24).collect::<String>())
                } else {
                    text
                };
                app.set_status(format!("Copied: {shown}"), StatusLevel::Info);
            } else {
                app.set_status("Failed to copy to clipboard", StatusLevel::Error);
            }
        }
        Err(_) => {
            app.set_status("Clipboard not available", StatusLevel::Error);
        }
    }
}
