//! Entry point for the pidash TUI. Parses args, resolves the profile, and runs
//! the dashboard or one of the one-shot modes.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing::warn;

use pidash::action::{perform_action, Action, ActionOutcome};
use pidash::api::{normalize_base_url, ApiClient};
use pidash::app::App;
use pidash::diagnostics::Diagnostics;
use pidash::interact::{Interaction, StdioInteraction};
use pidash::logging::{default_log_file, init_logging, LogTarget};
use pidash::profiles::{
    load_profiles, save_profiles, upsert, ProfileEntry, ProfileRequest, ResolveProfile,
};
use pidash::view::DashboardView;

const USAGE_FLAGS: &str = "[--tls-ca CERT_PEM|-t CERT_PEM] [--profile NAME|-P NAME] [--save] [--refresh SECS|-r SECS] [--once] [--action shutdown|update] [--log-file PATH] [--dry-run] [http://HOST:PORT]";

#[derive(Debug, Default)]
struct ParsedArgs {
    url: Option<String>,
    tls_ca: Option<String>,
    profile: Option<String>,
    save: bool,
    refresh: Option<u64>,
    once: bool,
    action: Option<Action>,
    log_file: Option<PathBuf>,
    dry_run: bool,
}

#[derive(Debug)]
enum ArgError {
    Help(String),
    Invalid(String),
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, ArgError> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "pidash".into());
    let usage = format!("Usage: {prog} {USAGE_FLAGS}");
    let mut out = ParsedArgs::default();

    while let Some(arg) = it.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
            _ => (arg.clone(), None),
        };
        match flag.as_str() {
            "-h" | "--help" => return Err(ArgError::Help(usage.clone())),
            "--tls-ca" | "-t" => {
                out.tls_ca = Some(take_value(&flag, inline.as_deref(), &mut it, &usage)?)
            }
            "--profile" | "-P" => {
                out.profile = Some(take_value(&flag, inline.as_deref(), &mut it, &usage)?)
            }
            "--save" => out.save = true,
            "--once" => out.once = true,
            "--dry-run" => out.dry_run = true,
            "--refresh" | "-r" => {
                let v = take_value(&flag, inline.as_deref(), &mut it, &usage)?;
                let secs = v.parse::<u64>().map_err(|_| {
                    ArgError::Invalid(format!("--refresh expects whole seconds, got '{v}'"))
                })?;
                out.refresh = Some(secs);
            }
            "--action" => {
                let v = take_value(&flag, inline.as_deref(), &mut it, &usage)?;
                out.action = Some(v.parse::<Action>().map_err(ArgError::Invalid)?);
            }
            "--log-file" => {
                let v = take_value(&flag, inline.as_deref(), &mut it, &usage)?;
                out.log_file = Some(PathBuf::from(v));
            }
            _ if arg.starts_with('-') => {
                return Err(ArgError::Invalid(format!("Unknown flag '{arg}'. {usage}")));
            }
            _ => {
                if out.url.is_none() {
                    out.url = Some(arg);
                } else {
                    return Err(ArgError::Invalid(format!("Unexpected argument. {usage}")));
                }
            }
        }
    }
    if out.once && out.action.is_some() {
        return Err(ArgError::Invalid("--once and --action cannot be combined".into()));
    }
    Ok(out)
}

// accepts both "--flag value" and "--flag=value"
fn take_value(
    flag: &str,
    inline: Option<&str>,
    it: &mut impl Iterator<Item = String>,
    usage: &str,
) -> Result<String, ArgError> {
    match inline {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        Some(_) => Err(ArgError::Invalid(format!("{flag} needs a value. {usage}"))),
        None => it
            .next()
            .ok_or_else(|| ArgError::Invalid(format!("{flag} needs a value. {usage}"))),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(ArgError::Help(usage)) => {
            eprintln!("{usage}");
            return Ok(());
        }
        Err(ArgError::Invalid(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    let one_shot = parsed.once || parsed.action.is_some() || parsed.dry_run;
    if one_shot {
        init_logging(LogTarget::Stderr)?;
    } else {
        let path = parsed.log_file.clone().unwrap_or_else(default_log_file);
        init_logging(LogTarget::File(&path))
            .with_context(|| format!("opening log file {}", path.display()))?;
    }

    let Some(target) = resolve_target(&parsed, &mut StdioInteraction::stdin()) else {
        return Ok(());
    };

    if parsed.dry_run {
        println!("{}", normalize_base_url(&target.url)?);
        return Ok(());
    }

    let client = ApiClient::new(&target.url, target.tls_ca.as_deref())?;

    if parsed.once {
        let snapshot = client
            .fetch_snapshot()
            .await
            .with_context(|| format!("loading snapshot from {}", client.base_url()))?;
        let mut view = DashboardView::new();
        view.apply(&snapshot);
        for (id, value) in view.rows() {
            println!("{}: {}", id.label(), value);
        }
        return Ok(());
    }

    if let Some(action) = parsed.action {
        let mut ui = StdioInteraction::stdin();
        let mut diag = Diagnostics::default();
        return match perform_action(&client, action, &mut ui, &mut diag).await {
            ActionOutcome::Cancelled => {
                eprintln!("{action}: cancelled, nothing sent");
                Ok(())
            }
            ActionOutcome::Completed { status, .. } if status.is_success() => Ok(()),
            ActionOutcome::Completed { status, .. } => bail!("{action}: HTTP {status}"),
            ActionOutcome::Unauthorized => bail!("{action}: rejected (HTTP 401)"),
            ActionOutcome::RateLimited => bail!("{action}: rate limited (HTTP 429)"),
            ActionOutcome::Failed(e) => Err(e.into()),
        };
    }

    let mut app = App::new(client, target.refresh_secs.map(Duration::from_secs));
    app.run().await
}

/// Turn args + saved profiles into a connection target, prompting on stdio
/// where needed. `None` means there is nothing to connect to.
fn resolve_target<I: Interaction>(parsed: &ParsedArgs, ui: &mut I) -> Option<ProfileEntry> {
    let profiles_file = load_profiles();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        url: parsed.url.clone(),
        tls_ca: parsed.tls_ca.clone(),
        refresh_secs: parsed.refresh,
    };
    let mut profiles_mut = profiles_file.clone();

    match req.resolve(&profiles_file) {
        ResolveProfile::Direct(entry) => {
            if let Some(name) = parsed.profile.as_ref() {
                let write = match profiles_mut.profiles.get(name) {
                    // New profile: auto-save immediately
                    None => true,
                    Some(existing) if *existing == entry => false,
                    Some(_) => {
                        parsed.save
                            || ui.confirm(&format!("Overwrite existing profile '{name}'?"))
                    }
                };
                if write && upsert(&mut profiles_mut, name, entry.clone()) {
                    persist(&profiles_mut);
                }
            }
            Some(entry)
        }
        ResolveProfile::Loaded(entry) => Some(entry),
        ResolveProfile::PromptSelect(names) => {
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = ui.prompt("Enter number (or blank to abort)")?;
            let idx = line.trim().parse::<usize>().ok()?;
            let name = names.get(idx.checked_sub(1)?)?;
            profiles_mut.profiles.get(name).cloned()
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = ui.prompt("Enter URL (http://HOST:PORT)")?;
            if url.trim().is_empty() {
                return None;
            }
            let ca = ui.prompt("Enter TLS CA path (or leave blank)").unwrap_or_default();
            let entry = ProfileEntry {
                url: url.trim().to_string(),
                tls_ca: Some(ca.trim().to_string()).filter(|c| !c.is_empty()),
                refresh_secs: parsed.refresh,
            };
            upsert(&mut profiles_mut, &name, entry.clone());
            persist(&profiles_mut);
            Some(entry)
        }
        ResolveProfile::None => {
            eprintln!("No URL provided and no profiles to select.");
            None
        }
    }
}

fn persist(pf: &pidash::profiles::ProfilesFile) {
    if let Err(e) = save_profiles(pf) {
        warn!("could not save profiles: {e}");
    }
}
