//! doxnav: navigation and search for generated documentation sites.
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use doxnav::{app_state, config, input, ui};
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "doxnav")]
#[command(about = "Navigation and search for generated documentation sites", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Navigation descriptor, relative to the site directory
    #[arg(long, global = true)]
    nav_file: Option<String>,

    /// Search partition directory, relative to the site directory
    #[arg(long, global = true)]
    search_dir: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the table of contents depth-first
    Walk {
        /// Generated site directory
        #[arg(value_name = "SITE", default_value = ".")]
        site: PathBuf,
        /// Emit JSON instead of indented text
        #[arg(long)]
        json: bool,
    },
    /// Print the previous and next page for a page identifier
    Nav {
        /// Page identifier as listed in the page index
        page: String,
        /// Generated site directory
        #[arg(value_name = "SITE", default_value = ".")]
        site: PathBuf,
    },
    /// Search the symbol index
    Search {
        /// Symbol name or prefix
        query: String,
        /// Generated site directory
        #[arg(value_name = "SITE", default_value = ".")]
        site: PathBuf,
        /// Load every partition up front
        #[arg(long)]
        eager: bool,
        /// Maximum number of hits (0 for unlimited)
        #[arg(long, short = 'n')]
        limit: Option<usize>,
        /// Restrict to these sections (all, classes, ...)
        #[arg(long, short = 's', value_name = "SECTION")]
        section: Vec<String>,
    },
    /// Browse the table of contents interactively
    Browse {
        /// Generated site directory
        #[arg(value_name = "SITE", default_value = ".")]
        site: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    let mut cfg = config::Config::load();

    // Override config with command line args
    if let Some(nav_file) = args.nav_file {
        cfg.nav_file = nav_file;
    }
    if let Some(search_dir) = args.search_dir {
        cfg.search_dir = search_dir;
    }

    match run(args.command, cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, mut cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Walk { site, json } => {
            let tree = input::Site::new(&site, &cfg).load_navigation()?;
            if json {
                let steps: Vec<_> = tree.walk().collect();
                println!("{}", serde_json::to_string_pretty(&steps)?);
            } else {
                for step in tree.walk() {
                    let marker = if step.deferred.is_some() { " …" } else { "" };
                    println!(
                        "{}{} [{}]{marker}",
                        "  ".repeat(step.depth),
                        step.label,
                        step.link
                    );
                }
            }
        }
        Command::Nav { page, site } => {
            let tree = input::Site::new(&site, &cfg).load_navigation()?;
            if tree.index().position(&page).is_none() {
                log::warn!("{page} is not in the page index");
            }
            println!("{}", serde_json::to_string_pretty(&tree.lookup(&page))?);
        }
        Command::Search {
            query,
            site,
            eager,
            limit,
            section,
        } => {
            if eager {
                cfg.lazy_partitions = false;
            }
            if let Some(limit) = limit {
                cfg.max_results = limit;
            }
            if !section.is_empty() {
                cfg.sections = section;
            }
            let index = input::Site::new(&site, &cfg).open_search(cfg.search_options());
            println!("{}", serde_json::to_string_pretty(&index.search(&query))?);
        }
        Command::Browse { site } => {
            let site = input::Site::new(&site, &cfg);
            let state = app_state::AppState::new(site.navigation());
            let index = site.open_search(cfg.search_options());
            if let Some(link) = run_tui(state, &index)? {
                println!("{link}");
            }
        }
    }
    Ok(())
}

fn run_tui(
    mut app: app_state::AppState,
    index: &doxnav::search::SearchIndex,
) -> io::Result<Option<String>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, index);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.map(|()| app.chosen_link)
}

#[allow(clippy::too_many_lines)]
fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut app_state::AppState,
    index: &doxnav::search::SearchIndex,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if app.chosen_link.is_some() {
            return Ok(());
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };

        match app.current_view {
            app_state::View::Tree => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Up => {
                    let target = if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.navigate_to_prev_sibling()
                    } else {
                        app.find_prev_row()
                    };
                    if let Some(idx) = target {
                        app.current_row_index = idx;
                    }
                }
                KeyCode::Down => {
                    let target = if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.navigate_to_next_sibling()
                    } else {
                        app.find_next_row()
                    };
                    if let Some(idx) = target {
                        app.current_row_index = idx;
                    }
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    if let Some(idx) = app.navigate_to_parent() {
                        app.current_row_index = idx;
                    }
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    if let Some(idx) = app.navigate_to_first_child() {
                        app.current_row_index = idx;
                    }
                }
                KeyCode::Home => {
                    let target = if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.navigate_to_first_at_level()
                    } else {
                        app.navigate_to_first()
                    };
                    if let Some(idx) = target {
                        app.current_row_index = idx;
                    }
                }
                KeyCode::End => {
                    let target = if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.navigate_to_last_at_level()
                    } else {
                        app.navigate_to_last()
                    };
                    if let Some(idx) = target {
                        app.current_row_index = idx;
                    }
                }
                KeyCode::Char('n') => {
                    app.go_to_next_page();
                }
                KeyCode::Char('p') => {
                    app.go_to_prev_page();
                }
                KeyCode::Char('/') => app.start_search(),
                KeyCode::Enter => app.choose_current(),
                _ => {}
            },
            app_state::View::Search => match key.code {
                KeyCode::Char(c) => app.query_buffer.push(c),
                KeyCode::Backspace => {
                    app.query_buffer.pop();
                }
                KeyCode::Enter => app.run_search(index),
                KeyCode::Esc => app.cancel_search(),
                _ => {}
            },
            app_state::View::Results => match key.code {
                KeyCode::Up => {
                    app.current_result_index = app.current_result_index.saturating_sub(1);
                }
                KeyCode::Down => {
                    if app.current_result_index + 1 < app.results.len() {
                        app.current_result_index += 1;
                    }
                }
                KeyCode::Enter => app.open_selected_result(),
                KeyCode::Esc => app.cancel_search(),
                _ => {}
            },
        }
    }
}
