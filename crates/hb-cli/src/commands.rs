//! Subcommand handlers
//!
//! Every handler writes its report to `out` and returns an error for
//! anything the user should see as a failure (exit code 1).

use crate::file_store::{FileStore, StoreError};
use anyhow::{bail, Context as _};
use clap::ArgMatches;
use hb_password::{format_breach_count, validate_password, HibpConfig, PwnedChecker};
use hb_region::{
    Environment, GatePolicy, GateView, RegionConfig, RegionGate, RegionGateStatus,
};
use hb_waitlist::{
    submit_gate_form, ClientContext, GateSubmission, InMemoryWaitlistRepository, LogMailer,
    WaitlistSignup,
};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Durable scope file name
pub const DURABLE_FILE: &str = "durable.json";

/// Session scope file name
pub const SESSION_FILE: &str = "session.json";

type FileGate<'a> = RegionGate<&'a FileStore, &'a FileStore>;

/// Shared state for region commands
#[derive(Debug)]
pub struct Context {
    config: Arc<RegionConfig>,
    durable: FileStore,
    session: FileStore,
    dev: bool,
    json: bool,
}

impl Context {
    /// Load config and open both storage scopes
    ///
    /// # Errors
    /// Fails if the config file or a store file cannot be read.
    pub fn from_matches(matches: &ArgMatches) -> anyhow::Result<Self> {
        let mut config = match matches.get_one::<PathBuf>("config") {
            Some(path) => RegionConfig::load(path)?,
            None => RegionConfig::default(),
        };

        if let Some(policy) = matches.get_one::<String>("policy") {
            config.gate_policy = policy.parse::<GatePolicy>()?;
        }

        let state_dir = matches
            .get_one::<PathBuf>("state-dir")
            .context("missing --state-dir")?;

        Ok(Self {
            config: Arc::new(config),
            durable: FileStore::open(state_dir.join(DURABLE_FILE))?,
            session: FileStore::open(state_dir.join(SESSION_FILE))?,
            dev: matches.get_flag("dev"),
            json: matches.get_flag("json"),
        })
    }

    fn gate(&self, args: &ArgMatches) -> anyhow::Result<FileGate<'_>> {
        let url = args.get_one::<String>("url").context("missing --url")?;
        let env = Environment::from_url(url)?.with_dev_build(self.dev);

        Ok(RegionGate::load(
            Arc::clone(&self.config),
            env,
            &self.durable,
            &self.session,
        )?)
    }

    fn save(&self) -> Result<(), StoreError> {
        self.durable.save()?;
        self.session.save()
    }

    fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut *out, value)?;
        writeln!(out)?;
        Ok(())
    }

    fn report(&self, out: &mut dyn Write, gate: &FileGate<'_>) -> anyhow::Result<()> {
        let status = gate.status();
        if self.json {
            Self::write_json(out, &status)
        } else {
            write_status(out, &status)
        }
    }
}

/// Dispatch a parsed command line
///
/// # Errors
/// Returns the first failure of the selected subcommand.
pub async fn run(matches: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("password", args)) => password(args, matches.get_flag("json"), out).await,
        Some((name, args)) => {
            let ctx = Context::from_matches(matches)?;
            match name {
                "resolve" => resolve(&ctx, args, out),
                "join" => join(&ctx, args, out).await,
                "dismiss" => dismiss(&ctx, args, out),
                "override" => set_override(&ctx, args, out),
                "reset" => reset(&ctx, args, out),
                "regions" => regions(&ctx, args, out),
                other => bail!("unknown command: {other}"),
            }
        }
        None => bail!("no command given"),
    }
}

fn resolve(ctx: &Context, args: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<()> {
    let gate = ctx.gate(args)?;
    ctx.report(out, &gate)
}

async fn join(ctx: &Context, args: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<()> {
    let mut gate = ctx.gate(args)?;
    if !gate.is_prelaunch() {
        bail!(
            "{} ({}) is not a pre-launch region",
            gate.country_name(),
            gate.country_code()
        );
    }

    let email = args.get_one::<String>("email").context("missing --email")?;
    let mut context = ClientContext::default();
    if let Some(user_agent) = args.get_one::<String>("user-agent") {
        context = context.with_user_agent(user_agent);
    }

    let signup = WaitlistSignup::new(InMemoryWaitlistRepository::new(), LogMailer);
    let submission = submit_gate_form(&mut gate, &signup, email, &context).await;
    ctx.save()?;

    match submission {
        GateSubmission::Joined { already_signed_up } => {
            if ctx.json {
                return ctx.report(out, &gate);
            }
            if already_signed_up {
                writeln!(out, "Already on the waitlist for {}", gate.country_name())?;
            } else {
                writeln!(out, "Joined the waitlist for {}", gate.country_name())?;
            }
            Ok(())
        }
        GateSubmission::Rejected { message } => bail!(message),
    }
}

fn dismiss(ctx: &Context, args: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<()> {
    let mut gate = ctx.gate(args)?;
    gate.dismiss_gate();
    ctx.durable.save()?;

    if ctx.json {
        return ctx.report(out, &gate);
    }
    if gate.has_dismissed_gate() {
        writeln!(out, "Gate dismissed")?;
    } else {
        writeln!(out, "Gate cannot be dismissed under the stealth policy")?;
    }
    Ok(())
}

fn set_override(ctx: &Context, args: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<()> {
    let mut gate = ctx.gate(args)?;
    let code = args.get_one::<String>("code").map(String::as_str);
    gate.dev_tools()?.set_override_country(code)?;
    ctx.session.save()?;

    if ctx.json {
        return ctx.report(out, &gate);
    }
    match gate.override_country() {
        Some(code) => writeln!(out, "Region override: {} ({})", code, gate.country_name())?,
        None => writeln!(
            out,
            "Region override cleared, resolved {}",
            gate.country_code()
        )?,
    }
    Ok(())
}

fn reset(ctx: &Context, args: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<()> {
    let mut gate = ctx.gate(args)?;
    gate.dev_tools()?.reset_override();
    ctx.save()?;

    if ctx.json {
        return ctx.report(out, &gate);
    }
    writeln!(out, "Region state reset, resolved {}", gate.country_code())?;
    Ok(())
}

fn regions(ctx: &Context, args: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<()> {
    let mut gate = ctx.gate(args)?;
    let tools = gate.dev_tools()?;
    let regions = tools.regions();

    if ctx.json {
        return Context::write_json(out, &regions);
    }
    for region in &regions {
        let marker = if &region.code == tools.active() { "*" } else { " " };
        writeln!(
            out,
            "{marker} {:<8} {:<16} {}",
            region.code.as_str(),
            region.name,
            region.region_type
        )?;
    }
    Ok(())
}

async fn password(args: &ArgMatches, json: bool, out: &mut dyn Write) -> anyhow::Result<()> {
    let password = args
        .get_one::<String>("password")
        .context("missing password")?;
    let validation = validate_password(password);

    let breach = if args.get_flag("check-breach") {
        let mut config = HibpConfig::default();
        if let Some(url) = args.get_one::<String>("hibp-url") {
            config = config.with_base_url(url);
        }
        Some(PwnedChecker::hibp(config)?.check(password).await)
    } else {
        None
    };

    if json {
        return Context::write_json(
            out,
            &serde_json::json!({ "validation": validation, "breach": breach }),
        );
    }

    let strength = &validation.strength;
    writeln!(out, "Strength: {} ({}/4)", strength.label, strength.score)?;
    if validation.is_valid {
        writeln!(out, "Meets all requirements")?;
    } else {
        let missing: Vec<_> = validation.errors.iter().map(ToString::to_string).collect();
        writeln!(out, "Missing: {}", missing.join(", "))?;
    }

    if let Some(result) = breach {
        match (result.error, result.is_pwned) {
            (Some(error), _) => writeln!(out, "Breach check: {error}")?,
            (None, true) => writeln!(
                out,
                "Breach check: seen {} times in known breaches",
                format_breach_count(result.count)
            )?,
            (None, false) => writeln!(out, "Breach check: not found")?,
        }
    }
    Ok(())
}

fn view_name(view: GateView) -> &'static str {
    match view {
        GateView::Storefront => "storefront",
        GateView::Gate { joined: false } => "pre-launch gate",
        GateView::Gate { joined: true } => "pre-launch gate (joined)",
        GateView::CountrySelector => "country selector",
    }
}

fn write_status(out: &mut dyn Write, status: &RegionGateStatus) -> anyhow::Result<()> {
    writeln!(out, "Country:   {} ({})", status.country_name, status.country_code)?;
    writeln!(out, "Region:    {}", status.region_type)?;
    writeln!(out, "Source:    {:?}", status.source)?;
    writeln!(out, "View:      {}", view_name(status.view))?;
    writeln!(out, "Policy:    {:?}", status.gate_policy)?;
    writeln!(out, "Joined:    {}", status.has_joined_waitlist)?;
    writeln!(out, "Dismissed: {}", status.has_dismissed_gate)?;
    match &status.override_country {
        Some(code) => writeln!(out, "Override:  {code}")?,
        None => writeln!(out, "Override:  none")?,
    }
    writeln!(out, "Dev mode:  {}", status.is_dev_mode)?;
    Ok(())
}
