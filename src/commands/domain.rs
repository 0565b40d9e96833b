//! Physical domain commands
//!
//! - `query` - show one domain, or every domain in the template
//! - `present` - create or update a domain
//! - `absent` - remove a domain

use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;

use crate::Context;
use crate::backend::NdoTemplate;
use crate::cli::{AbsentArgs, OutputFormat, PresentArgs, QueryArgs, TemplateArgs};
use crate::config::{FileConfig, Settings, config_path};
use crate::ui;
use declarative::{
    DesiredState, DiffSummary, FieldIntent, Observed, PHYSICAL_DOMAINS, ReconcileOutcome,
    ReconcileRequest, Reconciler, RenderedRecord,
};

pub fn query(ctx: &Context, args: QueryArgs) -> Result<()> {
    let mut request = ReconcileRequest::new(DesiredState::Query);
    if let Some(name) = args.name {
        request = request.name(name);
    }
    if let Some(uuid) = args.uuid {
        request = request.uuid(uuid);
    }
    run(ctx, &args.target, &request)
}

pub fn present(ctx: &Context, args: PresentArgs) -> Result<()> {
    let mut request = build_present(args.name, args.description, args.pool, args.check);
    if let Some(uuid) = args.uuid {
        request = request.uuid(uuid);
    }
    run(ctx, &args.target, &request)
}

pub fn absent(ctx: &Context, args: AbsentArgs) -> Result<()> {
    let request = ReconcileRequest::new(DesiredState::Absent)
        .name(args.name)
        .check_mode(args.check);
    run(ctx, &args.target, &request)
}

fn build_present(
    name: String,
    description: Option<String>,
    pool: Option<String>,
    check: bool,
) -> ReconcileRequest {
    ReconcileRequest::new(DesiredState::Present)
        .name(name)
        .description(FieldIntent::from_input(description))
        .reference(FieldIntent::from_input(pool))
        .check_mode(check)
}

// ============================================================================
// Execution
// ============================================================================

fn run(ctx: &Context, target: &TemplateArgs, request: &ReconcileRequest) -> Result<()> {
    // Incomplete requests fail before configuration is read or a login is tried
    request.validate()?;

    let file = FileConfig::load(&config_path(ctx.config.as_deref())?)?;
    let settings = Settings::resolve(&target.connection, file);
    let conn = settings.connection()?;
    let quiet = ctx.quiet || settings.output == OutputFormat::Json;

    log::info!("{} physical domain in template '{}'", request.state, target.template);

    let pb = ui::spinner(&format!("Connecting to {}", conn.host), quiet);
    let client = ndo::Client::connect(&conn);
    pb.finish_and_clear();
    let client = client.with_context(|| format!("Could not log in to {}", conn.host))?;

    let template = NdoTemplate::open(client, &target.template)
        .with_context(|| format!("Could not open template '{}'", target.template))?;
    log::debug!("using template {}", template.summary().template_id);

    let reconciler = Reconciler::new(&template, PHYSICAL_DOMAINS);
    let outcome = reconciler.reconcile(request)?;

    match settings.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => print_outcome(ctx, request, &outcome)?,
    }
    Ok(())
}

// ============================================================================
// Text Output
// ============================================================================

fn print_outcome(ctx: &Context, request: &ReconcileRequest, outcome: &ReconcileOutcome) -> Result<()> {
    if request.state == DesiredState::Query {
        print_observed(&outcome.current);
        return Ok(());
    }

    ui::header(&format!("Physical Domain ({})", request.state));

    let summary = DiffSummary::from_operations(&outcome.sent);
    if !summary.has_changes() {
        ui::success("Already in desired state");
        return Ok(());
    }

    if request.check_mode {
        ui::warn(&format!(
            "Check mode: {} operation(s) would be sent",
            summary.total()
        ));
    } else {
        ui::success(&format!("Sent {} operation(s)", summary.total()));
    }
    ui::dim(&format!(
        "{} add, {} replace, {} remove",
        summary.additions, summary.replacements, summary.removals
    ));

    if ctx.verbose > 0 {
        println!();
        for op in &outcome.sent {
            ui::dim(&op.to_string());
        }
    }

    let before = serde_json::to_string_pretty(&outcome.previous)?;
    let after = serde_json::to_string_pretty(&outcome.current)?;
    if let Some(lines) = ui::line_diff(&before, &after) {
        println!();
        for line in lines {
            println!("  {line}");
        }
    }
    Ok(())
}

fn print_observed(observed: &Observed) {
    match observed {
        Observed::Empty => ui::info("No matching physical domain"),
        Observed::Record(record) => print_record(record),
        Observed::Collection(records) => {
            ui::header(&format!("Physical Domains ({})", records.len()));
            for record in records {
                print_record(record);
            }
        }
    }
}

fn print_record(record: &RenderedRecord) {
    println!();
    println!("  {}", record.name.bold());
    if let Some(uuid) = &record.uuid {
        ui::kv("uuid", uuid);
    }
    if let Some(description) = &record.description {
        ui::kv("description", description);
    }
    match (&record.pool, &record.pool_ref) {
        (Some(pool), _) => ui::kv("pool", pool),
        (None, Some(pool_ref)) => ui::kv("pool", &format!("{pool_ref} (unresolved)")),
        (None, None) => {}
    }
}
