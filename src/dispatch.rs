// Command dispatcher - user actions to backend requests
//
// Every host command becomes an `Action`. Planning an action is pure: it
// either yields a request (endpoint + payload), a local step, or a reason to
// stay quiet. Running a file adds one explicit transition: a failed run is
// not reported as an error, it becomes the input of an /analyze request.

use crate::bridge::{Endpoint, Payload};
use crate::config::Config;
use crate::markup;
use crate::runner::{RunOutcome, Runner};
use crate::selection::SelectionSpec;
use crate::session::Session;
use crate::sink::Notice;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

pub const SELECT_CODE_FIRST: &str = "Please select some code first.";
pub const NAME_LIBRARY_FIRST: &str = "Please name a library first.";
pub const RUN_FAILED_NOTICE: &str = "Code failed! Asking AI Tutor...";

/// Something the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Explain the selected code
    ExplainSelection { selection: String },
    /// Quiz on the selection, or on the default topic when nothing is selected
    GenerateQuiz { selection: String },
    /// Run a file locally; failures are sent for debugging
    RunAndDebug { path: PathBuf },
    /// Follow-up question typed into the chat
    Ask { question: String },
    /// Documentation summary for a library
    Docs { library: String },
    /// Check the backend answers at all
    TestBackend,
    /// List chat commands
    Help,
}

/// What planning an action decided
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Request(Endpoint, Payload),
    Run(PathBuf),
    Probe,
    Help,
    /// Nothing is sent; the notice (if any) tells the user why
    Suppress(Option<Notice>),
}

/// Where a finished run leads
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Clean run: show the output, nothing is sent
    ShowOutput { stdout: String },
    /// Failed run: the file and its error become an /analyze request
    AnalyzeFailure { code: String, error_output: String },
}

impl Transition {
    pub fn after_run(code: String, outcome: RunOutcome) -> Self {
        match outcome {
            RunOutcome::Succeeded { stdout } => Transition::ShowOutput { stdout },
            RunOutcome::Failed { error_output } => Transition::AnalyzeFailure { code, error_output },
        }
    }
}

/// How a dispatch ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// A request went to the backend
    Sent(Endpoint),
    /// Handled locally; output is already in the sink
    Shown,
    /// Nothing happened (empty input)
    Suppressed,
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    runner: Runner,
    default_quiz_topic: String,
}

impl Dispatcher {
    pub fn new(config: &Config) -> Self {
        Self {
            runner: Runner::new(&config.runner),
            default_quiz_topic: config.chat.default_quiz_topic.clone(),
        }
    }

    /// Decide what an action turns into, without side effects
    pub fn plan(&self, action: Action) -> Plan {
        match action {
            Action::ExplainSelection { selection } => {
                if selection.trim().is_empty() {
                    return Plan::Suppress(Some(Notice::info(SELECT_CODE_FIRST)));
                }
                Plan::Request(Endpoint::Analyze, Payload::new().with("code", selection))
            }
            Action::GenerateQuiz { selection } => {
                let topic = if selection.trim().is_empty() {
                    self.default_quiz_topic.clone()
                } else {
                    selection
                };
                Plan::Request(Endpoint::Quiz, Payload::new().with("code_or_topic", topic))
            }
            Action::RunAndDebug { path } => Plan::Run(path),
            Action::Ask { question } => {
                if question.trim().is_empty() {
                    return Plan::Suppress(None);
                }
                Plan::Request(Endpoint::Followup, Payload::new().with("question", question))
            }
            Action::Docs { library } => {
                let library = library.trim();
                if library.is_empty() {
                    return Plan::Suppress(Some(Notice::info(NAME_LIBRARY_FIRST)));
                }
                Plan::Request(Endpoint::Docs, Payload::new().with("library_name", library))
            }
            Action::TestBackend => Plan::Probe,
            Action::Help => Plan::Help,
        }
    }

    /// Carry out an action on `session`, waiting until its output is in the sink
    pub async fn dispatch(&self, session: &Session, action: Action) -> Result<Dispatched> {
        tracing::debug!("Dispatching {:?}", action);

        match self.plan(action) {
            Plan::Request(endpoint, payload) => {
                session.send(endpoint, payload).await;
                Ok(Dispatched::Sent(endpoint))
            }
            Plan::Suppress(notice) => {
                if let Some(notice) = notice {
                    session.sink().notify(notice);
                }
                Ok(Dispatched::Suppressed)
            }
            Plan::Run(path) => Ok(self.run_and_debug(session, path).await),
            Plan::Probe => {
                test_backend(session).await;
                Ok(Dispatched::Shown)
            }
            Plan::Help => {
                session.sink().show(&help_display());
                Ok(Dispatched::Shown)
            }
        }
    }

    async fn run_and_debug(&self, session: &Session, path: PathBuf) -> Dispatched {
        session
            .sink()
            .notify(Notice::info(format!("Running {}...", path.display())));

        let outcome = self.runner.run(&path).await;
        // Read after running so the request carries what was actually executed
        let code = match &outcome {
            RunOutcome::Succeeded { .. } => String::new(),
            RunOutcome::Failed { .. } => executed_code(&path),
        };

        match Transition::after_run(code, outcome) {
            Transition::ShowOutput { stdout } => {
                session.sink().show(&format!(
                    "{}{}{}",
                    markup::bold("Execution Success:"),
                    markup::LINE_BREAK,
                    markup::pre(&stdout)
                ));
                Dispatched::Shown
            }
            Transition::AnalyzeFailure { code, error_output } => {
                tracing::info!("Run of {} failed, asking for a debug analysis", path.display());
                session.sink().notify(Notice::error(RUN_FAILED_NOTICE));
                let payload = Payload::new()
                    .with("code", code)
                    .with("error_output", error_output);
                session.send(Endpoint::Analyze, payload).await;
                Dispatched::Sent(Endpoint::Analyze)
            }
        }
    }
}

/// Source sent along with a failed run
///
/// Read lossily so a non-UTF-8 file still gets analysed; a file that is gone
/// after the run is sent without code.
fn executed_code(path: &Path) -> String {
    match std::fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::warn!("Cannot read {} after a failed run: {}", path.display(), e);
            String::new()
        }
    }
}

/// Probe the backend and report the result in the session's own sink
async fn test_backend(session: &Session) {
    let bridge = session.bridge();
    session.sink().show(&markup::italic(&format!(
        "Checking backend at {}...",
        bridge.base_url()
    )));

    match bridge.probe().await {
        Ok(status) => {
            tracing::info!("Backend reachable (HTTP {})", status.as_u16());
            session.sink().show(&format!(
                "{} at {} (HTTP {})",
                markup::bold("Backend reachable"),
                bridge.base_url(),
                status.as_u16()
            ));
        }
        Err(e) => {
            tracing::error!("Backend probe failed: {}", e);
            session
                .sink()
                .notify(Notice::error(crate::bridge::FAILURE_NOTICE));
            session.sink().show(&bridge.failure_display());
        }
    }
}

const CHAT_HELP: &[(&str, &str)] = &[
    ("<question>", "ask a follow-up question"),
    ("/explain <code | @file[:a-b]>", "explain code"),
    ("/quiz [topic | @file[:a-b]]", "generate a quiz"),
    ("/run <file>", "run a file and debug failures"),
    ("/docs <library>", "summarize a library"),
    ("/ping", "check the backend"),
    ("/help", "show this list"),
];

fn help_display() -> String {
    let mut display = markup::bold("Commands");
    for (usage, description) in CHAT_HELP {
        display.push_str(markup::LINE_BREAK);
        display.push_str(&format!("{}  {}", usage, description));
    }
    display
}

/// Read `@file[:range]` references, or take the text literally
fn selection_arg(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(spec) => SelectionSpec::parse(spec)?.read(),
        None => Ok(arg.to_string()),
    }
}

/// Turn a line typed into the chat panel into an action
///
/// Returns Ok(None) for blank input. Plain text is a follow-up question.
pub fn parse_chat_line(line: &str) -> Result<Option<Action>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(command) = line.strip_prefix('/') else {
        return Ok(Some(Action::Ask {
            question: line.to_string(),
        }));
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    let action = match name {
        "explain" => Action::ExplainSelection {
            selection: selection_arg(arg)?,
        },
        "quiz" => Action::GenerateQuiz {
            selection: selection_arg(arg)?,
        },
        "run" => {
            if arg.is_empty() {
                bail!("usage: /run <file>");
            }
            Action::RunAndDebug {
                path: PathBuf::from(arg),
            }
        }
        "docs" => Action::Docs {
            library: arg.to_string(),
        },
        "ping" => Action::TestBackend,
        "help" => Action::Help,
        other => bail!("unknown command /{} (try /help)", other),
    };
    Ok(Some(action))
}
