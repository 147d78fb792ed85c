//! Terminal client for booking a truck and handing off to the payment gateway.

mod app;
mod input;
mod settings;
mod ui;

use std::{
    fs::File,
    io,
    sync::{Arc, Mutex},
    time::{Duration as StdDuration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use truckhaul_core::{
    backend::Backend, debounce::Debouncer, orchestrator::BookingOrchestrator, ports::BookingPort,
    quote::QuoteRequest, quote::fetch_quotes,
};
use truckhaul_http::RestBackend;

use crate::app::{App, Completion};
use crate::input::Action;
use crate::settings::Settings;

#[expect(
    clippy::print_stdout,
    reason = "the gateway URL is printed after the terminal is restored"
)]
#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env()?;
    init_logging(&settings)?;

    // HTTP + workflow setup
    let client = Client::builder()
        .user_agent("truckhaul/0.1")
        .timeout(settings.workflow.request_timeout())
        .build()?;
    let rest = Arc::new(RestBackend::new(
        client,
        settings.api_url.clone(),
        settings.token.clone(),
    ));
    let lookup = Debouncer::new(settings.workflow.debounce());
    let mut workflow = BookingOrchestrator::new(
        Backend::from_shared(Arc::clone(&rest)),
        settings.workflow,
        settings.trip,
        settings.session,
    );
    workflow.open().await?;

    let mut app = App::new(workflow, lookup);
    app.sync_pickup_time();

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, app, &rest).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // The gateway takes over from here; its redirect back is handled by the web app
    if let Some(url) = res? {
        info!("continuing at payment gateway");
        println!("Continue your payment at:\n{url}");
    }
    Ok(())
}

fn init_logging(settings: &Settings) -> Result<()> {
    let file = File::create(&settings.log_file)
        .with_context(|| format!("creating log file {}", settings.log_file.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    rest: &RestBackend,
) -> Result<Option<String>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();

    loop {
        while let Ok(done) = rx.try_recv() {
            app.complete(done);
        }
        // Any call may have hit a 401; the workflow then has to ask for a new sign-in
        if !rest.is_authenticated() && app.workflow.is_signed_in() {
            app.workflow.sign_out();
        }
        if let Some(handoff) = app.handoff.take() {
            return Ok(Some(handoff.into_url()));
        }
        if app.closed() {
            return Ok(None);
        }
        app.tick(Instant::now());

        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            match input::handle_key_event(key, &mut app) {
                Action::None => {}
                Action::FetchQuotes(request) => spawn_quotes(&app, &tx, request),
                Action::ContinueToPayment => match app.workflow.begin_booking() {
                    Ok(Some(ticket)) => {
                        app.is_loading = true;
                        app.banner = None;
                        let port = app.workflow.booking_port();
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let outcome = port.create(ticket.booking()).await;
                            if tx.send(Completion::Booking(ticket, outcome)).is_err() {
                                debug!("event loop gone before booking outcome");
                            }
                        });
                    }
                    Ok(None) => {
                        app.banner = None;
                        app.focus_for_state();
                    }
                    Err(err) => app.banner = Some(err.user_message()),
                },
                Action::SubmitPayment => match app.workflow.begin_payment() {
                    Ok(ticket) => {
                        app.is_loading = true;
                        app.banner = None;
                        let gateway = app.workflow.gateway();
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let outcome = gateway.initiate(ticket.request()).await;
                            if tx.send(Completion::Payment(ticket, outcome)).is_err() {
                                debug!("event loop gone before payment outcome");
                            }
                        });
                    }
                    Err(err) => app.banner = Some(err.user_message()),
                },
            }
        }
    }
}

fn spawn_quotes(app: &App, tx: &UnboundedSender<Completion>, request: QuoteRequest) {
    let port = app.workflow.quote_port();
    let tx = tx.clone();
    tokio::spawn(async move {
        let results = fetch_quotes(&*port, &request).await;
        if tx.send(Completion::Quotes(results)).is_err() {
            debug!("event loop gone before quote results");
        }
    });
}
