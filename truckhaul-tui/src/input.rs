use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use truckhaul_core::{guard::ExitDecision, quote::QuoteRequest, state::WorkflowState};

use crate::app::{App, Focus};

#[derive(Debug)]
pub(crate) enum Action {
    None,
    /// Run the quote request off the event loop
    FetchQuotes(QuoteRequest),
    /// Run `workflow.continue_to_payment`(...)
    ContinueToPayment,
    /// Enter processing and open the gateway session off the event loop
    SubmitPayment,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, BackTab, Char, Down, Enter, Esc, Left, Tab, Up};

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if app.confirm_exit {
        match key.code {
            Char('y' | 'Y') => {
                app.confirm_exit = false;
                if let Err(err) = app.workflow.confirm_close() {
                    app.banner = Some(err.user_message());
                }
            }
            Char('n' | 'N') | Esc => app.confirm_exit = false,
            _ => {}
        }
        return Action::None;
    }

    // Close requests always go through the workflow so processing can refuse them
    if key.code == Esc || (ctrl && key.code == Char('c')) {
        request_close(app);
        return Action::None;
    }

    let mut action = Action::None;
    let state = app.workflow.state().clone();

    match state {
        WorkflowState::Booking => match key.code {
            Tab | BackTab => {
                app.focus = app.focus.next();
                app.suggestions_visible = false;
                app.lookup.cancel();
            }
            Up => {
                app.suggestion_index = app.suggestion_index.saturating_sub(1);
            }
            Down => {
                let count = app
                    .focus
                    .location()
                    .map_or(0, |field| app.workflow.suggestions(field).len());
                if app.suggestion_index + 1 < count {
                    app.suggestion_index += 1;
                }
            }
            Char('r') if ctrl => {
                if let Some(request) = app.workflow.retry_quote() {
                    action = Action::FetchQuotes(request);
                }
            }
            Char(character) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                edit_booking_field(app, |text| text.push(character));
            }
            Backspace => {
                edit_booking_field(app, |text| {
                    text.pop();
                });
            }
            Enter => {
                action = match select_current_suggestion(app) {
                    Some(selected) => selected,
                    None if app.workflow.can_continue() => Action::ContinueToPayment,
                    None if app.workflow.is_creating_booking() => Action::None,
                    None => {
                        app.banner = Some(
                            "Pick both locations from the suggestions and wait for the fare."
                                .into(),
                        );
                        Action::None
                    }
                };
            }
            _ => {}
        },

        WorkflowState::Payment => match key.code {
            Tab | BackTab => app.focus = app.focus.next(),
            Left if ctrl => go_back(app),
            Char('b') if ctrl => go_back(app),
            Char(character) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                edit_contact(app, |text| text.push(character));
            }
            Backspace => {
                edit_contact(app, |text| {
                    text.pop();
                });
            }
            Enter => action = Action::SubmitPayment,
            _ => {}
        },

        WorkflowState::Error(_) => match key.code {
            Char('r') | Enter => {
                if let Err(err) = app.workflow.retry() {
                    app.banner = Some(err.user_message());
                } else {
                    app.banner = None;
                }
                app.focus_for_state();
            }
            Char('b') | Left => go_back(app),
            _ => {}
        },

        WorkflowState::Processing | WorkflowState::Success | WorkflowState::Idle => {}
    }
    action
}

fn request_close(app: &mut App) {
    match app.workflow.request_close() {
        Ok(ExitDecision::Confirm) => app.confirm_exit = true,
        Ok(ExitDecision::Close | ExitDecision::Blocked) => {}
        Err(err) => app.banner = Some(err.user_message()),
    }
}

fn go_back(app: &mut App) {
    if let Err(err) = app.workflow.back() {
        app.banner = Some(err.user_message());
    }
    app.focus_for_state();
}

fn edit_booking_field(app: &mut App, edit: impl FnOnce(&mut String)) {
    if app.focus == Focus::PickupTime {
        edit(&mut app.pickup_time_input);
        app.sync_pickup_time();
        return;
    }
    let Some(field) = app.focus.location() else {
        return;
    };
    let mut text = app.workflow.draft().location(field).text().to_owned();
    edit(&mut text);
    match app.workflow.set_location_text(field, text) {
        Ok(()) => {
            app.banner = None;
            app.suggestions_visible = false;
            app.lookup.touch(Instant::now());
        }
        Err(err) => app.banner = Some(err.user_message()),
    }
}

fn edit_contact(app: &mut App, edit: impl FnOnce(&mut String)) {
    let Some(field) = app.focus.contact() else {
        return;
    };
    let mut text = app.workflow.customer().contact(field).to_owned();
    edit(&mut text);
    if let Err(err) = app.workflow.set_contact(field, text) {
        app.banner = Some(err.user_message());
    }
}

fn select_current_suggestion(app: &mut App) -> Option<Action> {
    if !app.suggestions_visible {
        return None;
    }
    let field = app.focus.location()?;
    let id = app
        .workflow
        .suggestions(field)
        .get(app.suggestion_index)
        .map(|area| area.id.clone())?;

    app.suggestions_visible = false;
    app.suggestion_index = 0;
    match app.workflow.select_suggestion(field, &id) {
        Ok(Some(request)) => Some(Action::FetchQuotes(request)),
        Ok(None) => {
            app.focus = app.focus.next();
            Some(Action::None)
        }
        Err(err) => {
            app.banner = Some(err.user_message());
            Some(Action::None)
        }
    }
}
