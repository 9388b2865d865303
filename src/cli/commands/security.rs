//! PIN, biometric and lock commands.

use crate::cli::args::ParsedArgs;
use crate::cli::context::ShellContext;
use crate::cli::errors::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::security::LockState;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "pin",
            "Set, change or remove the PIN",
            "pin setup <pin> | pin change <old> <new> | pin remove <pin>",
            cmd_pin,
        ),
        CommandEntry::new("unlock", "Unlock with the PIN", "unlock <pin>", cmd_unlock)
            .while_locked(),
        CommandEntry::new(
            "unlock-bio",
            "Unlock with biometrics",
            "unlock-bio",
            cmd_unlock_bio,
        )
        .while_locked(),
        CommandEntry::new("lock", "Lock the app", "lock", cmd_lock),
        CommandEntry::new(
            "biometrics",
            "Enable or disable biometric unlock",
            "biometrics on|off",
            cmd_biometrics,
        ),
        CommandEntry::new("status", "Show lock status", "status", cmd_status).while_locked(),
    ]
}

fn cmd_pin(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = ParsedArgs::parse(args)?;
    match args.require(0, "setup|change|remove")? {
        "setup" => {
            if context.app.auth.has_pin() {
                return Err(CommandError::Message(
                    "A PIN is already set. Use `pin change`.".into(),
                ));
            }
            let pin = context.pin_arg(&args, 1, "New PIN")?;
            context.app.auth.setup_pin(&pin)?;
            output::success("PIN set. The app is unlocked.");
        }
        "change" => {
            let old = context.pin_arg(&args, 1, "Current PIN")?;
            let new = context.pin_arg(&args, 2, "New PIN")?;
            if !context.app.auth.change_pin(&old, &new)? {
                return Err(CommandError::Message("Current PIN is incorrect.".into()));
            }
            output::success("PIN changed.");
        }
        "remove" => {
            let pin = context.pin_arg(&args, 1, "Current PIN")?;
            if !context.app.auth.remove_pin(&pin)? {
                return Err(CommandError::Message("PIN is incorrect.".into()));
            }
            output::success("PIN removed.");
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown pin action `{other}`"
            )))
        }
    }
    Ok(())
}

fn cmd_unlock(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !context.app.auth.is_locked() {
        output::info("The app is not locked.");
        return Ok(());
    }
    let args = ParsedArgs::parse(args)?;
    let pin = context.pin_arg(&args, 0, "PIN")?;
    let unlocked = context.app.auth.unlock(&pin);
    context.record_unlock(unlocked);
    if !unlocked {
        return Err(CommandError::Message("Incorrect PIN.".into()));
    }
    output::success("Unlocked.");
    Ok(())
}

fn cmd_unlock_bio(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.app.auth.biometrics_enabled() {
        return Err(CommandError::Message(
            "Biometric unlock is not enabled.".into(),
        ));
    }
    if !context.app.auth.unlock_with_biometrics() {
        return Err(CommandError::Message("Biometric check failed.".into()));
    }
    context.record_unlock(true);
    output::success("Unlocked.");
    Ok(())
}

fn cmd_lock(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.app.auth.lock() {
        output::success("Locked.");
        Ok(())
    } else {
        Err(CommandError::Message(
            "Set a PIN with `pin setup` before locking.".into(),
        ))
    }
}

fn cmd_biometrics(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = ParsedArgs::parse(args)?;
    let enabled = match args.require(0, "on|off")? {
        "on" => true,
        "off" => false,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "expected `on` or `off`, got `{other}`"
            )))
        }
    };
    context.app.auth.enable_biometrics(enabled)?;
    if enabled {
        output::success("Biometric unlock enabled.");
    } else {
        output::success("Biometric unlock disabled.");
    }
    Ok(())
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshot = context.app.auth.snapshot();
    let state = match snapshot.state {
        LockState::Uninitialized => "starting",
        LockState::NoPin => "no PIN",
        LockState::Locked => "locked",
        LockState::Unlocked => "unlocked",
    };
    output::section("Security");
    output::info(format!("  State      : {state}"));
    output::info(format!("  PIN set    : {}", yes_no(snapshot.has_pin)));
    output::info(format!("  Biometrics : {}", yes_no(snapshot.has_biometrics)));
    output::info(format!("  Bio unlock : {}", yes_no(snapshot.biometrics_enabled)));
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
