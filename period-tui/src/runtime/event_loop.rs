use crate::api::ApiClient;
use crate::app::App;
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use super::action_queue::channel;
use super::actions::run_action;
use super::views::{handle_mouse, handle_view_key};

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &mut ApiClient,
) -> Result<()> {
    let (action_tx, mut action_rx) = channel();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if app.is_loading {
            app.throbber_state.calc_next();
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_view_key(key, app, &action_tx);
                }
                Event::Mouse(mouse) => handle_mouse(mouse, app, &action_tx),
                _ => {}
            }
        }

        // Requests run one at a time in the order they were queued; redraw
        // first so disabled controls and the spinner are visible meanwhile.
        while let Ok(action) = action_rx.try_recv() {
            app.is_loading = true;
            terminal.draw(|f| ui::render(f, app))?;
            run_action(action, app, client).await?;
            app.is_loading = false;
        }

        if !app.running {
            break;
        }
    }

    Ok(())
}
