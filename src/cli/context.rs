//! Shell state, dispatch and the helpers commands share.

use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;

use super::args::ParsedArgs;
use super::commands;
use super::errors::{CliError, CommandError};
use super::io as cli_io;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
use crate::app::AppContext;
use crate::config::{Config, ConfigManager};
use crate::currency::CurrencyCode;
use crate::security::LockState;
use crate::utils::{app_data_dir, ensure_dir};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub app: AppContext,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub data_dir: PathBuf,
    pub theme: ColorfulTheme,
    /// Consecutive failed unlocks since the last success.
    pub failed_unlocks: u32,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let data_dir = app_data_dir();
        ensure_dir(&data_dir)?;
        let config_manager = ConfigManager::with_base_dir(&data_dir);
        let config = config_manager.load()?;
        let app = AppContext::open(&data_dir, &config)?;
        Ok(Self::from_parts(mode, app, config, config_manager, data_dir))
    }

    /// Builds a shell around an already assembled app context.
    pub fn from_parts(
        mode: CliMode,
        app: AppContext,
        config: Config,
        config_manager: ConfigManager,
        data_dir: PathBuf,
    ) -> Self {
        output::set_color_enabled(config.ui_color_enabled && mode == CliMode::Interactive);
        app.auth.subscribe(|snapshot| {
            tracing::debug!(state = ?snapshot.state, "lock state changed");
        });
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        Self {
            mode,
            registry,
            app,
            config,
            config_manager,
            data_dir,
            theme: ColorfulTheme::default(),
            failed_unlocks: 0,
            last_command: None,
            running: true,
        }
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(entry) = self.registry.get(command) else {
            self.suggest_command(command);
            return Ok(LoopControl::Continue);
        };
        if !entry.while_locked && self.app.auth.is_locked() {
            return Err(CommandError::Locked);
        }
        let handler = entry.handler;
        self.last_command = Some(command.to_string());
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(&needle, name), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{name}`?"));
            }
        }
    }

    pub fn report_error(&self, err: CommandError) {
        output::error(&err);
        if let CommandError::InvalidArguments(_) = err {
            if let Some(command) = self.last_command.as_deref().and_then(|name| self.command(name)) {
                output::info(format!("Usage: {}", command.usage));
            }
        }
    }

    pub fn confirm_exit(&self) -> bool {
        match self.mode {
            CliMode::Script => true,
            CliMode::Interactive => {
                cli_io::confirm_action(&self.theme, "Exit the shell?", true).unwrap_or(true)
            }
        }
    }

    pub fn prompt(&self) -> String {
        match self.app.auth.lock_state() {
            LockState::Locked | LockState::Uninitialized => "cartera (locked)> ".into(),
            _ => "cartera> ".into(),
        }
    }

    pub fn print_banner(&self) {
        output::section("Cartera");
        if self.app.auth.is_locked() {
            output::info("The app is locked. Use `unlock` or `unlock-bio`.");
        } else {
            output::info("Type `help` to list commands.");
        }
    }

    /// Destructive commands proceed on `--yes`; interactive shells may ask instead.
    pub(crate) fn confirm(&self, args: &ParsedArgs<'_>, prompt: &str) -> Result<bool, CommandError> {
        if args.flag("--yes") {
            return Ok(true);
        }
        match self.mode {
            CliMode::Script => {
                output::warning("Pass --yes to confirm in script mode.");
                Ok(false)
            }
            CliMode::Interactive => cli_io::confirm_action(&self.theme, prompt, false),
        }
    }

    /// PIN from the positional slot, or a hidden prompt when interactive.
    pub(crate) fn pin_arg(
        &self,
        args: &ParsedArgs<'_>,
        index: usize,
        prompt: &str,
    ) -> Result<String, CommandError> {
        match (args.positional(index), self.mode) {
            (Some(pin), _) => Ok(pin.to_string()),
            (None, CliMode::Interactive) => cli_io::prompt_pin(&self.theme, prompt),
            (None, CliMode::Script) => Err(CommandError::InvalidArguments("missing <pin>".into())),
        }
    }

    /// Tracks unlock attempts and warns once the configured threshold is hit.
    pub fn record_unlock(&mut self, success: bool) {
        if success {
            self.failed_unlocks = 0;
            return;
        }
        self.failed_unlocks += 1;
        tracing::warn!(attempts = self.failed_unlocks, "unlock failed");
        if self.failed_unlocks >= self.config.unlock_warning_threshold {
            output::warning(format!(
                "{} failed unlock attempts in a row.",
                self.failed_unlocks
            ));
        }
    }

    /// Currency from the stored settings; used for new records.
    pub fn currency(&self) -> CurrencyCode {
        self.app.repository.settings().currency
    }

    pub fn export_dir(&self) -> PathBuf {
        self.config.export_dir_or(&self.data_dir)
    }

    pub fn save_config(&self) -> Result<(), CommandError> {
        self.config_manager.save(&self.config)?;
        Ok(())
    }
}
