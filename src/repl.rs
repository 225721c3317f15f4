// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Interactive REPL: every line is a module name to require.

use owo_colors::OwoColorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config, Editor, Helper};
use spacey_loader::{LoaderContext, LoaderError, VERSION, require, require_resolve};
use spacey_script::Value;
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

/// REPL configuration constants
const HISTORY_FILE: &str = ".spacey_require_history";
const MAX_HISTORY_SIZE: usize = 1000;

/// Objects nested deeper than this print as `[Object]`
const MAX_PRINT_DEPTH: usize = 2;

/// REPL commands that can be executed with a dot prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Exit,
    Clear,
    Version,
    Cache,
    Resolve,
}

impl ReplCommand {
    /// Parse a REPL command from input string
    pub fn parse(input: &str) -> Option<(Self, Option<&str>)> {
        let input = input.trim();
        let rest = input.strip_prefix('.')?;

        let mut parts = rest.splitn(2, char::is_whitespace);
        let cmd = parts.next()?.to_lowercase();
        let arg = parts.next().map(str::trim).filter(|arg| !arg.is_empty());

        match cmd.as_str() {
            "help" | "h" | "?" => Some((ReplCommand::Help, arg)),
            "exit" | "quit" | "q" => Some((ReplCommand::Exit, arg)),
            "clear" | "cls" => Some((ReplCommand::Clear, arg)),
            "version" | "v" => Some((ReplCommand::Version, arg)),
            "cache" | "c" => Some((ReplCommand::Cache, arg)),
            "resolve" | "r" => Some((ReplCommand::Resolve, arg)),
            _ => None,
        }
    }

    /// Get all available commands for help/completion
    pub fn all_commands() -> &'static [(&'static str, &'static str)] {
        &[
            (".help", "Show this help message"),
            (".exit", "Exit the REPL"),
            (".clear", "Clear the screen"),
            (".version", "Show version information"),
            (".cache", "List cached module keys"),
            (".resolve <name>", "Show the canonical key for a module name"),
        ]
    }
}

/// Completes dot commands and the keys of modules loaded so far
struct RequireHelper {
    context: Arc<LoaderContext>,
}

impl RequireHelper {
    fn candidates(&self) -> Vec<String> {
        let mut candidates: Vec<String> = ReplCommand::all_commands()
            .iter()
            .filter_map(|(cmd, _)| cmd.split_whitespace().next())
            .map(String::from)
            .collect();
        candidates.push(self.context.config().native_prefix.clone());
        candidates.extend(self.context.cached_keys());
        candidates
    }
}

impl Completer for RequireHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let word = &line[..pos];
        if word.is_empty() {
            return Ok((pos, vec![]));
        }

        let matches: Vec<Pair> = self
            .candidates()
            .into_iter()
            .filter(|candidate| candidate.starts_with(word))
            .map(|candidate| Pair {
                replacement: candidate[word.len()..].to_string(),
                display: candidate,
            })
            .collect();

        Ok((pos, matches))
    }
}

impl Hinter for RequireHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        if pos < line.len() || line.len() < 2 {
            return None;
        }

        self.candidates()
            .into_iter()
            .find(|candidate| candidate.starts_with(line) && candidate.len() > line.len())
            .map(|candidate| (&candidate[line.len()..]).dimmed().to_string())
    }
}

impl Highlighter for RequireHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('.') && !line.starts_with("./") && !line.starts_with("..") {
            return Cow::Owned(line.magenta().to_string());
        }

        let prefix = self.context.config().native_prefix.as_str();
        let mut result = String::with_capacity(line.len() * 2);
        for (i, segment) in line.split('/').enumerate() {
            if i > 0 {
                result.push_str(&"/".dimmed().to_string());
            }
            let colored = match segment {
                "." | ".." => segment.yellow().to_string(),
                s if i == 0 && s == prefix => s.cyan().bold().to_string(),
                s => s.to_string(),
            };
            result.push_str(&colored);
        }
        Cow::Owned(result)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Validator for RequireHelper {}

impl Helper for RequireHelper {}

/// The interactive REPL over a loader context
pub struct Repl {
    context: Arc<LoaderContext>,
    editor: Editor<RequireHelper, DefaultHistory>,
    history_path: PathBuf,
}

impl Repl {
    /// Create a new REPL instance
    pub fn new(context: Arc<LoaderContext>) -> rustyline::Result<Self> {
        let config = Config::builder()
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .max_history_size(MAX_HISTORY_SIZE)?
            .auto_add_history(true)
            .build();

        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(RequireHelper {
            context: Arc::clone(&context),
        }));

        let history_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spacey")
            .join(HISTORY_FILE);

        if let Some(parent) = history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        // Missing history is normal on first run
        let _ = editor.load_history(&history_path);

        Ok(Self {
            context,
            editor,
            history_path,
        })
    }

    /// Run the REPL main loop
    pub fn run(&mut self) -> rustyline::Result<()> {
        self.print_banner();

        loop {
            let prompt = format!("{} ", "require>".bright_green().bold());

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();

                    if trimmed.is_empty() {
                        continue;
                    }

                    if let Some((cmd, arg)) = ReplCommand::parse(trimmed) {
                        match self.execute_command(cmd, arg) {
                            CommandResult::Continue => continue,
                            CommandResult::Exit => break,
                        }
                    }

                    self.require_and_print(trimmed);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "^C".dimmed());
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "^D".dimmed());
                    break;
                }
                Err(err) => {
                    eprintln!("{}: {:?}", "Error".red().bold(), err);
                    break;
                }
            }
        }

        if let Err(e) = self.editor.save_history(&self.history_path) {
            tracing::debug!(error = %e, "could not save REPL history");
        }

        println!();
        Ok(())
    }

    fn print_banner(&self) {
        println!();
        println!(
            "  {} {} {}",
            "Spacey Module Loader".white().bold(),
            "v".dimmed(),
            VERSION.bright_yellow()
        );
        println!(
            "  {} {} {}",
            "Type a module name to require it, or".dimmed(),
            ".help".cyan(),
            "for available commands".dimmed()
        );
        println!();
    }

    fn execute_command(&mut self, cmd: ReplCommand, arg: Option<&str>) -> CommandResult {
        match cmd {
            ReplCommand::Help => self.print_help(),
            ReplCommand::Exit => return CommandResult::Exit,
            ReplCommand::Clear => print!("\x1B[2J\x1B[H"),
            ReplCommand::Version => {
                println!("{}: {}", "spacey-require".bright_cyan().bold(), VERSION.yellow());
            }
            ReplCommand::Cache => {
                let keys = self.context.cached_keys();
                if keys.is_empty() {
                    println!("{}", "(no modules loaded)".dimmed());
                }
                for key in keys {
                    println!("  {}", key.green());
                }
            }
            ReplCommand::Resolve => match arg {
                Some(name) => match require_resolve(&self.context, name) {
                    Ok(key) => println!("{}", key.green()),
                    Err(e) => print_error(&e),
                },
                None => eprintln!(
                    "{}: {} {}",
                    "Error".red().bold(),
                    ".resolve".cyan(),
                    "requires a module name".dimmed()
                ),
            },
        }
        CommandResult::Continue
    }

    fn print_help(&self) {
        println!();
        println!("{}", "REPL Commands:".white().bold());
        println!();

        for (cmd, desc) in ReplCommand::all_commands() {
            println!("  {:18} {}", cmd.cyan(), desc.dimmed());
        }

        println!();
        println!("{}", "Module names:".white().bold());
        println!();
        println!("  {:18} {}", "lib/util".yellow(), "Resolved from the root".dimmed());
        println!(
            "  {:18} {}",
            format!("{}/filesystem", self.context.config().native_prefix).yellow(),
            "Native module".dimmed()
        );
        println!();
    }

    fn require_and_print(&self, name: &str) {
        match require(&self.context, name) {
            Ok(value) => println!("{}", format_value(&value)),
            Err(e) => print_error(&e),
        }
    }
}

/// Result of executing a REPL command
enum CommandResult {
    Continue,
    Exit,
}

/// Format a script value for display with syntax coloring
pub fn format_value(value: &Value) -> String {
    format_nested(value, 0)
}

fn format_nested(value: &Value, depth: usize) -> String {
    match value {
        Value::Undefined => "undefined".blue().dimmed().to_string(),
        Value::Null => "null".blue().to_string(),
        Value::Boolean(b) => b.to_string().yellow().to_string(),
        Value::Number(_) => value.to_string().yellow().to_string(),
        Value::String(s) if depth == 0 => s.green().to_string(),
        Value::String(s) => format!("'{}'", s).green().to_string(),
        Value::Function(func) => format!("[Function: {}]", func.name()).magenta().to_string(),
        Value::Object(object) => {
            if object.is_empty() {
                return "{}".to_string();
            }
            if depth >= MAX_PRINT_DEPTH {
                return "[Object]".cyan().to_string();
            }
            let entries: Vec<String> = object
                .keys()
                .into_iter()
                .map(|key| {
                    let value = object.get(&key).unwrap_or_default();
                    format!("{}: {}", key, format_nested(&value, depth + 1))
                })
                .collect();
            format!("{{ {} }}", entries.join(", "))
        }
    }
}

/// Print a formatted error message
pub fn print_error(error: &LoaderError) {
    let error_str = error.to_string();

    // Split error type from message
    match error_str.split_once(':') {
        Some((error_type, message)) => eprintln!("{}:{}", error_type.red().bold(), message),
        None => eprintln!("{}", error_str.red()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacey_script::ObjectRef;

    #[test]
    fn test_repl_command_parse() {
        assert!(matches!(
            ReplCommand::parse(".help"),
            Some((ReplCommand::Help, None))
        ));
        assert!(matches!(
            ReplCommand::parse(".exit"),
            Some((ReplCommand::Exit, None))
        ));
        assert!(matches!(
            ReplCommand::parse(".cache"),
            Some((ReplCommand::Cache, None))
        ));
        assert!(matches!(
            ReplCommand::parse(".resolve ./lib/util"),
            Some((ReplCommand::Resolve, Some("./lib/util")))
        ));
        assert!(ReplCommand::parse("lib/util").is_none());
        assert!(ReplCommand::parse("./lib/util").is_none());
    }

    #[test]
    fn test_format_value_limits_depth() {
        let inner = ObjectRef::new();
        inner.set("deep", ObjectRef::new());
        inner.get("deep").unwrap().as_object().unwrap().set("x", 1.0);
        let outer = ObjectRef::new();
        outer.set("inner", inner);

        let text = format_value(&Value::Object(outer));
        assert!(text.contains("inner"));
        assert!(text.contains("deep"));
        assert!(text.contains("[Object]"));
        assert!(!text.contains("x:"));
    }
}
