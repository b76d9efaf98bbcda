mod ui;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use freewrite::config::{Cli, Command};
use freewrite::entry_store::{read_entries, EntryStore};
use freewrite::logging;
use freewrite::preferences::Preferences;
use freewrite::storage::{FileStore, KeyValueStore};
use freewrite::timer::Timer;
use std::time::Instant;
use tracing::{error, info};
use ui::{Action, UI};

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let data_dir = cli.resolve_data_dir();
    logging::init(&cli.resolve_log_file()).wrap_err("Failed to set up logging")?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %data_dir.display(),
        "freewrite started"
    );

    let store = FileStore::open(&data_dir)
        .wrap_err_with(|| format!("Failed to open data directory {}", data_dir.display()))?;

    match cli.command {
        Some(Command::List) => list_entries(&store),
        None => run_editor(store),
    }
}

fn list_entries(store: &FileStore) -> Result<()> {
    let entries = read_entries(store)?;
    if entries.is_empty() {
        println!("No entries found");
        return Ok(());
    }
    for entry in &entries {
        println!("{:<7} {}", entry.date, entry.display_preview());
    }
    Ok(())
}

fn run_editor(store: FileStore) -> Result<()> {
    let mut prefs = Preferences::load(&store)?;
    let mut entry_store = EntryStore::open(store)?;
    let mut timer = Timer::default();
    let mut ui = UI::new()?;
    ui.state_mut().reset_cursor(entry_store.buffer());

    let mut force_quit = false;
    loop {
        timer.tick(Instant::now());
        ui.display(&entry_store, &prefs, &timer)?;

        let Some(action) = ui.handle_input(&mut entry_store, &prefs)? else {
            continue;
        };
        if action != Action::Quit {
            force_quit = false;
        }

        match action {
            Action::Save => match entry_store.save_buffer() {
                Ok(()) => ui.set_status("Saved"),
                Err(e) => {
                    error!(error = %e, "save failed");
                    ui.set_status(e.status_message());
                }
            },
            Action::NewEntry => {
                if autosave(&mut entry_store, &mut ui) {
                    entry_store.create();
                    ui.state_mut().reset_cursor(entry_store.buffer());
                    ui.new_placeholder();
                }
            }
            Action::Select(id) => {
                if entry_store.selected_id() != Some(id.as_str())
                    && autosave(&mut entry_store, &mut ui)
                    && entry_store.select(&id)
                {
                    ui.state_mut().reset_cursor(entry_store.buffer());
                }
            }
            Action::Delete(id) => {
                let before = entry_store.selected_id().map(str::to_string);
                if let Err(e) = entry_store.delete(&id) {
                    error!(error = %e, "delete failed");
                    ui.set_status(e.status_message());
                }
                if entry_store.selected_id().map(str::to_string) != before {
                    ui.state_mut().reset_cursor(entry_store.buffer());
                }
            }
            Action::Toggle(toggle) => {
                let next = prefs.toggled(toggle);
                if let Err(e) = next.persist_changes(&prefs, entry_store.store_mut()) {
                    error!(error = %e, "failed to persist preference");
                    ui.set_status(e.status_message());
                }
                prefs = next;
            }
            Action::NextFontSize => prefs = prefs.with_next_font_size(),
            Action::NextFontFamily => prefs = prefs.with_next_font_family(),
            Action::ToggleControls => prefs = prefs.with_controls_toggled(),
            Action::ToggleTimer => timer.toggle(Instant::now()),
            Action::ResetTimer => timer.reset(),
            Action::EditTimer => ui.state_mut().begin_timer_input(timer.display()),
            Action::SetTimer(input) => timer.set_from_input(&input),
            Action::Quit => {
                if force_quit || autosave(&mut entry_store, &mut ui) {
                    break;
                }
                force_quit = true;
                ui.set_status("Save failed; quit again to discard changes");
            }
        }
    }

    info!("freewrite exiting");
    Ok(())
}

/// Save pending edits before the buffer is replaced. False if the save failed.
fn autosave<S: KeyValueStore>(entry_store: &mut EntryStore<S>, ui: &mut UI) -> bool {
    if !entry_store.is_dirty() {
        return true;
    }
    match entry_store.save_buffer() {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "autosave failed");
            ui.set_status(e.status_message());
            false
        }
    }
}
