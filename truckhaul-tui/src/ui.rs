use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use truckhaul_core::{
    model::{LocationField, format_fare},
    orchestrator::QuoteStatus,
    payment::PaymentFailure,
    session::ContactField,
    state::WorkflowState,
};

use crate::app::{App, Focus, PICKUP_TIME_FORMAT};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let trip = app.workflow.trip();
    let header = Paragraph::new(format!("truckhaul – book a truck · {}", trip.truck_type))
        .block(Block::default().borders(Borders::ALL).title("Truckhaul"));
    frame.render_widget(header, *header_area);

    let state = app.workflow.state();
    match state {
        WorkflowState::Booking => draw_booking(frame, app, *content_area),
        WorkflowState::Payment => draw_payment(frame, app, *content_area),
        WorkflowState::Processing => draw_message(
            frame,
            *content_area,
            "Payment",
            "Opening the payment gateway…",
            Color::Yellow,
        ),
        WorkflowState::Success => draw_message(
            frame,
            *content_area,
            "Payment",
            "Payment session ready, handing off to the gateway.",
            Color::Green,
        ),
        WorkflowState::Error(failure) => draw_error(frame, *failure, *content_area),
        WorkflowState::Idle => {}
    }

    // Status bar
    let nav_hint = match state {
        WorkflowState::Booking => {
            "Type to search · ↑/↓ pick · Enter select/continue · Tab next field · Ctrl-R retry fare · Esc close"
        }
        WorkflowState::Payment => {
            "Tab next field · Enter pay · Ctrl-B/Ctrl-← back to booking · Esc close"
        }
        WorkflowState::Processing => "Please wait…",
        WorkflowState::Error(_) => "r/Enter retry · b/← back to booking · Esc cancel",
        WorkflowState::Success | WorkflowState::Idle => "",
    };

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.banner {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.banner.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });
    frame.render_widget(status, *status_area);

    if app.confirm_exit {
        draw_confirm_exit(frame, area);
    }
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::default().fg(Color::Yellow))
    } else {
        block
    }
}

fn draw_booking(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // pickup
            Constraint::Length(3), // destination
            Constraint::Length(3), // pickup time
            Constraint::Min(0),    // suggestions + fare
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [pickup_area, destination_area, time_area, lower_area] = chunks else {
        return;
    };

    let draft = app.workflow.draft();
    for (field, focus, slot) in [
        (LocationField::Pickup, Focus::Pickup, pickup_area),
        (LocationField::Destination, Focus::Destination, destination_area),
    ] {
        let input = draft.location(field);
        let marker = if input.resolved().is_some() { " ✓" } else { "" };
        let title = format!("{field}{marker}");
        let paragraph = Paragraph::new(input.text())
            .block(field_block(&title, app.focus == focus))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, *slot);
    }

    let time_title = match draft.pickup_time() {
        Some(_) => "Pickup time".to_owned(),
        None => format!("Pickup time ({PICKUP_TIME_FORMAT})"),
    };
    let time_style = if app.parsed_pickup_time().is_some() {
        Style::default()
    } else {
        Style::default().fg(Color::Red)
    };
    let time = Paragraph::new(app.pickup_time_input.as_str())
        .style(time_style)
        .block(field_block(&time_title, app.focus == Focus::PickupTime));
    frame.render_widget(time, *time_area);

    let lower_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(*lower_area);
    let lower = lower_chunks.as_ref();
    let [suggestions_area, fare_area] = lower else {
        return;
    };

    draw_suggestions(frame, app, *suggestions_area);
    draw_fare(frame, app, *fare_area);
}

fn draw_suggestions(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let suggestions = match app.focus.location() {
        Some(field) if app.suggestions_visible => app.workflow.suggestions(field),
        _ => Vec::new(),
    };

    let items = if suggestions.is_empty() {
        let hint = if app.workflow.areas().is_empty() {
            "No service areas loaded."
        } else if app.lookup.is_pending() {
            "Searching…"
        } else {
            "Start typing an area name."
        };
        vec![ListItem::new(hint)]
    } else {
        suggestions
            .iter()
            .map(|area| ListItem::new(area.label.clone()))
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Areas (↑/↓, Enter)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !suggestions.is_empty() {
        state.select(Some(app.suggestion_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_fare(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let draft = app.workflow.draft();
    let mut lines: Vec<Line<'_>> = match app.workflow.quote_status() {
        QuoteStatus::Idle => vec![Line::from("Choose pickup and destination to see the fare.")],
        QuoteStatus::Pending => vec![Line::from("Calculating fare…").yellow()],
        QuoteStatus::Ready => vec![
            Line::from(format_fare(draft.fare())).bold(),
            Line::from(format!("{:.1} km", draft.distance())),
        ],
        QuoteStatus::Failed => vec![
            Line::from("Could not price this trip.").red(),
            Line::from("Ctrl-R to try again."),
        ],
        QuoteStatus::Fallback => vec![
            Line::from(format!("Estimated fare {}", format_fare(draft.fare()))).yellow(),
            Line::from(format!("~{:.1} km", draft.distance())),
        ],
    };

    if let Some(quote) = draft.quote() {
        for (name, amount) in &quote.breakdown {
            lines.push(Line::from(format!("  {name}: {}", format_fare(*amount))).dim());
        }
    }
    if let Some(route) = app.workflow.route() {
        lines.push(Line::from(format!("About {:.0} min on the road", route.duration)));
    } else if let Some(err) = app.workflow.route_error() {
        lines.push(Line::from(err.user_message()).dim());
    }

    lines.push(Line::from(""));
    if app.workflow.is_creating_booking() {
        lines.push(Line::from("Creating your booking…").yellow());
    } else if app.workflow.can_continue() {
        lines.push(Line::from("[ Continue to Payment ]").green().bold());
    } else {
        lines.push(Line::from("[ Continue to Payment ]").dark_gray());
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Fare"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_payment(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // booking summary
            Constraint::Length(3), // name
            Constraint::Length(3), // email
            Constraint::Length(3), // phone
            Constraint::Min(0),    // shipping
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [summary_area, name_area, email_area, phone_area, shipping_area] = chunks else {
        return;
    };

    let booking = app
        .workflow
        .booking_id()
        .map_or_else(|| "<pending>".to_owned(), ToString::to_string);
    let summary = Paragraph::new(format!(
        "Booking {booking} · {}",
        format_fare(app.workflow.draft().fare())
    ))
    .block(Block::default().borders(Borders::ALL).title("Booking"));
    frame.render_widget(summary, *summary_area);

    let customer = app.workflow.customer();
    for (field, focus, title, slot) in [
        (ContactField::Name, Focus::Name, "Name", name_area),
        (ContactField::Email, Focus::Email, "Email", email_area),
        (ContactField::Phone, Focus::Phone, "Phone", phone_area),
    ] {
        let value = customer.contact(field);
        let style = if value.trim().is_empty() {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        let input = Paragraph::new(value)
            .style(style)
            .block(field_block(title, app.focus == focus));
        frame.render_widget(input, *slot);
    }

    let shipping = Paragraph::new(vec![
        Line::from(format!("Address:  {}", customer.address)),
        Line::from(format!("City:     {}", customer.city)),
        Line::from(format!("Postcode: {}", customer.post_code)),
        Line::from(format!("Country:  {}", customer.country)),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Shipping (from your trip)"),
    )
    .wrap(Wrap { trim: true });
    frame.render_widget(shipping, *shipping_area);
}

fn draw_error(frame: &mut Frame<'_>, failure: PaymentFailure, area: Rect) {
    let mut lines = vec![Line::from(failure.user_message()).red().bold(), Line::from("")];
    if failure.is_retryable() {
        lines.push(Line::from("Press r to try again."));
    }
    lines.push(Line::from("Press b to edit the booking, Esc to cancel."));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Payment failed"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_message(frame: &mut Frame<'_>, area: Rect, title: &str, text: &str, color: Color) {
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_confirm_exit(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered(area, 50, 5);
    frame.render_widget(Clear, popup);
    let dialog = Paragraph::new("Discard this booking? (y/n)")
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Unsaved trip")
                .border_style(Style::default().fg(Color::Yellow)),
        );
    frame.render_widget(dialog, popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
