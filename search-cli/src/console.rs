use std::sync::Arc;

use anyhow::Result;
use dynamic_search::adapters::outbound::UrlState;
use dynamic_search::domain::ports::outbound::DatasourceRegistry;
use dynamic_search::{
    Candidate, PanelView, QueryPreview, SearchController, SelectionPublisher, SelectionState,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

/// A line typed at the console.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// New search box contents.
    Input(String),
    /// 1-based index into the last printed candidates.
    Pick(usize),
    Clear,
    Preview,
    State,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    // Search text is kept as typed, trailing spaces included.
    let Some(command) = line.strip_prefix(':') else {
        return Command::Input(line.to_string());
    };
    let line = line.trim_end();

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("pick"), Some(index)) => match index.parse() {
            Ok(index) if index > 0 => Command::Pick(index),
            _ => Command::Unknown(line.to_string()),
        },
        (Some("clear"), None) => Command::Clear,
        (Some("preview"), None) => Command::Preview,
        (Some("state"), None) => Command::State,
        (Some("quit" | "q"), None) => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

/// Interactive host: stdin lines are keystrokes, results print as they land.
pub struct Console<R: DatasourceRegistry> {
    controller: Arc<SearchController<R>>,
    url_state: Arc<UrlState>,
    publisher: SelectionPublisher,
    selection: SelectionState,
    candidates: Vec<Candidate>,
}

impl<R: DatasourceRegistry> Console<R> {
    pub fn new(controller: Arc<SearchController<R>>, url_state: Arc<UrlState>) -> Self {
        Self {
            controller,
            publisher: SelectionPublisher::new(url_state.clone()),
            url_state,
            selection: SelectionState::default(),
            candidates: Vec::new(),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<(u64, Vec<Candidate>)>();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut generation = 0u64;

        self.print_view();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match parse_command(&line) {
                        Command::Input(text) => {
                            generation += 1;
                            let current = generation;
                            let controller = self.controller.clone();
                            let tx = tx.clone();
                            tokio::spawn(async move {
                                let candidates = controller.resolve(&text).await;
                                let _ = tx.send((current, candidates));
                            });
                        }
                        Command::Pick(index) => self.pick(index),
                        Command::Clear => self.clear(),
                        Command::Preview => {
                            println!("{}", QueryPreview::from_options(&self.controller.options()));
                        }
                        Command::State => println!("{}", self.url_state.query_string()),
                        Command::Quit => break,
                        Command::Unknown(line) => {
                            println!("Unknown command {line:?}; try :pick N, :clear, :preview, :state, :quit");
                        }
                    }
                }
                Some((current, candidates)) = rx.recv() => {
                    // Superseded requests settle empty; only the latest input is shown.
                    if current == generation {
                        self.show(candidates);
                    } else {
                        debug!(current, generation, "Dropping result for older input");
                    }
                }
            }
        }

        self.controller.close();
        Ok(())
    }

    fn print_view(&self) {
        let options = self.controller.options();
        match PanelView::build(&options, &self.controller.compilation(), &self.selection) {
            PanelView::ConfigWarning { missing } => {
                println!("{}", PanelView::WARNING_TITLE);
                println!("{}", PanelView::WARNING_TEXT);
                for field in missing {
                    println!("  missing: {field}");
                }
            }
            PanelView::Search {
                placeholder,
                footer,
                selected,
            } => {
                println!("{placeholder}");
                println!("{footer}");
                if let Some(selected) = selected {
                    println!("selected: {selected}");
                }
            }
        }
    }

    fn show(&mut self, candidates: Vec<Candidate>) {
        if candidates.is_empty() {
            println!("No results");
        }
        for (i, candidate) in candidates.iter().enumerate() {
            match &candidate.description {
                Some(description) => println!("{:>3}. {} ({description})", i + 1, candidate.label),
                None => println!("{:>3}. {}", i + 1, candidate.label),
            }
        }
        self.candidates = candidates;
    }

    fn pick(&mut self, index: usize) {
        let Some(candidate) = self.candidates.get(index - 1).cloned() else {
            println!("No candidate {index}");
            return;
        };

        let variable_name = self.controller.options().variable_name;
        let value = candidate.value.clone();
        if self.selection.select(candidate, &variable_name, &self.publisher) {
            println!("${variable_name} = {value}  {}", self.url_state.query_string());
        } else {
            println!("Selected {value} (no target variable configured)");
        }
    }

    fn clear(&mut self) {
        let variable_name = self.controller.options().variable_name;
        if self.selection.clear(&variable_name, &self.publisher) {
            println!("${variable_name} cleared  {}", self.url_state.query_string());
        }
    }
}
