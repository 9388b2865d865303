use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    history::DefaultHistory,
    Context as ReadlineContext, Editor, Helper, Highlighter, Hinter, Validator,
};

use super::context::{CliMode, LoopControl, ShellContext};
use super::errors::{CliError, CommandError};
use super::output;
use super::registry::CommandRegistry;

/// Set to run commands from stdin without prompts or line editing.
pub const SCRIPT_ENV: &str = "CARTERA_CLI_SCRIPT";

/// Commands whose arguments carry a PIN and never reach the history.
const SECRET_COMMANDS: &[&str] = &["unlock", "pin"];

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => Interactive::new(&context)?.run(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

struct Interactive {
    editor: Editor<ShellHelper, DefaultHistory>,
}

impl Interactive {
    fn new(context: &ShellContext) -> Result<Self, CliError> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(ShellHelper::new(&context.registry)));
        Ok(Self { editor })
    }

    fn run(mut self, context: &mut ShellContext) -> Result<(), CliError> {
        context.print_banner();
        while context.running {
            if let Some(helper) = self.editor.helper_mut() {
                helper.locked = context.app.auth.is_locked();
            }
            let line = match self.editor.readline(&context.prompt()) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    if context.confirm_exit() {
                        break;
                    }
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    output::info("Bye.");
                    break;
                }
                Err(err) => return Err(err.into()),
            };
            if keeps_in_history(&line) {
                self.editor.add_history_entry(line.trim()).ok();
            }
            if step(context, &line) == LoopControl::Exit {
                break;
            }
        }
        Ok(())
    }
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        let line = line?;
        if step(context, &line) == LoopControl::Exit || !context.running {
            break;
        }
    }
    Ok(())
}

fn step(context: &mut ShellContext, line: &str) -> LoopControl {
    match handle_line(context, line) {
        Ok(control) => control,
        Err(err) => {
            context.report_error(err);
            LoopControl::Continue
        }
    }
}

fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let tokens = match tokenize(line) {
        Ok(Some(tokens)) => tokens,
        Ok(None) => return Ok(LoopControl::Continue),
        Err(err) => {
            output::warning(format!("Could not read that line: {err}"));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((command, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    let control = context.dispatch(&command.to_lowercase(), &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// Splits a line into words. Blank lines and `#` comments yield `None`.
fn tokenize(line: &str) -> Result<Option<Vec<String>>, shell_words::ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let tokens = shell_words::split(line)?;
    Ok((!tokens.is_empty()).then_some(tokens))
}

fn keeps_in_history(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return false;
    }
    let command = line.split_whitespace().next().unwrap_or_default().to_lowercase();
    !SECRET_COMMANDS.contains(&command.as_str())
}

/// One position in a usage form.
#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Word(&'static str),
    Choice(Vec<&'static str>),
    Free,
}

impl Slot {
    fn parse(token: &'static str) -> Self {
        let inner = token
            .trim_start_matches(['<', '['])
            .trim_end_matches(['>', ']']);
        if inner.starts_with("--") {
            Slot::Free
        } else if inner.contains('|') {
            Slot::Choice(inner.split('|').collect())
        } else if inner.len() == token.len() {
            Slot::Word(token)
        } else {
            Slot::Free
        }
    }

    fn accepts(&self, word: &str) -> bool {
        match self {
            Slot::Word(literal) => literal.eq_ignore_ascii_case(word),
            Slot::Choice(options) => options.iter().any(|option| option.eq_ignore_ascii_case(word)),
            Slot::Free => true,
        }
    }

    fn words(&self) -> &[&'static str] {
        match self {
            Slot::Word(literal) => std::slice::from_ref(literal),
            Slot::Choice(options) => options,
            Slot::Free => &[],
        }
    }
}

struct CompletionEntry {
    name: &'static str,
    while_locked: bool,
    /// Usage alternatives without the command word.
    forms: Vec<Vec<Slot>>,
}

/// Completes command names, then subcommands and fixed choices read from
/// each command's usage line. While locked only the unlocking commands show.
#[derive(Helper, Hinter, Highlighter, Validator)]
struct ShellHelper {
    entries: Vec<CompletionEntry>,
    locked: bool,
}

impl ShellHelper {
    fn new(registry: &CommandRegistry) -> Self {
        let entries = registry
            .list()
            .into_iter()
            .map(|entry| CompletionEntry {
                name: entry.name,
                while_locked: entry.while_locked,
                forms: entry
                    .usage
                    .split(" | ")
                    .map(|form| form.split_whitespace().skip(1).map(Slot::parse).collect())
                    .collect(),
            })
            .collect();
        Self {
            entries,
            locked: false,
        }
    }

    fn reachable(&self, entry: &CompletionEntry) -> bool {
        entry.while_locked || !self.locked
    }

    fn candidates(&self, typed: &[&str], current: &str) -> Vec<&'static str> {
        let current = current.to_lowercase();
        let mut words: Vec<&'static str> = match typed.split_first() {
            None => self
                .entries
                .iter()
                .filter(|entry| self.reachable(entry))
                .map(|entry| entry.name)
                .collect(),
            Some((command, args)) => self
                .entries
                .iter()
                .filter(|entry| entry.name.eq_ignore_ascii_case(command) && self.reachable(entry))
                .flat_map(|entry| entry.forms.iter())
                .filter(|form| {
                    form.len() > args.len()
                        && form.iter().zip(args.iter()).all(|(slot, word)| slot.accepts(word))
                })
                .flat_map(|form| form[args.len()].words().iter().copied())
                .collect(),
        };
        words.retain(|word| word.starts_with(&current));
        words.sort_unstable();
        words.dedup();
        words
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        let mut typed: Vec<&str> = before.split_whitespace().collect();
        let current = if before.ends_with(char::is_whitespace) || before.is_empty() {
            ""
        } else {
            typed.pop().unwrap_or_default()
        };
        let pairs = self
            .candidates(&typed, current)
            .into_iter()
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect();
        Ok((pos - current.len(), pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    fn helper(locked: bool) -> ShellHelper {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        let mut helper = ShellHelper::new(&registry);
        helper.locked = locked;
        helper
    }

    #[test]
    fn tokenize_keeps_quoted_descriptions_together() {
        let tokens = tokenize(r#"tx add expense 12.50 food "Lunch with Ana""#)
            .unwrap()
            .unwrap();
        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[5], "Lunch with Ana");
    }

    #[test]
    fn tokenize_skips_comments_and_rejects_open_quotes() {
        assert_eq!(tokenize("   # restock").unwrap(), None);
        assert_eq!(tokenize("").unwrap(), None);
        assert!(tokenize("product add \"Coffee").is_err());
    }

    #[test]
    fn pin_bearing_lines_stay_out_of_history() {
        assert!(!keeps_in_history("unlock 1234"));
        assert!(!keeps_in_history("PIN change 1234 5678"));
        assert!(keeps_in_history("unlock-bio"));
        assert!(keeps_in_history("tx list"));
    }

    #[test]
    fn locked_shell_only_completes_unlocking_commands() {
        let locked = helper(true);
        assert_eq!(locked.candidates(&[], "un"), vec!["unlock", "unlock-bio"]);
        assert!(locked.candidates(&[], "pro").is_empty());
        assert!(locked.candidates(&["product"], "").is_empty());

        let open = helper(false);
        assert_eq!(open.candidates(&[], "pro"), vec!["product"]);
    }

    #[test]
    fn subcommands_and_choices_come_from_usage() {
        let helper = helper(false);
        assert_eq!(
            helper.candidates(&["product"], ""),
            vec!["add", "delete", "list", "sell"]
        );
        assert_eq!(helper.candidates(&["tx", "add"], "in"), vec!["income"]);
        assert_eq!(helper.candidates(&["stats"], ""), vec!["month", "week", "year"]);
        assert_eq!(helper.candidates(&["biometrics"], "o"), vec!["off", "on"]);
        assert!(helper.candidates(&["product", "sell"], "").is_empty());
    }
}
