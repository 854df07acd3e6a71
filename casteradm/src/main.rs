use casteradm::handlers::{
    build_config, describe_session, format_endpoint_table, format_response, lookup_endpoint,
    memory_credentials, open_credentials, parse_fields, read_password, verbosity_level,
};
use casteradm_client::{AdminClient, ApiError, ClientConfig, Endpoint, Method};
use casteradm_core::{CredentialStore, Location};
use clap::ArgMatches;
use colored::Colorize;
use commands::command_argument_builder;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

mod commands;

/// Settings shared by every subcommand
struct Context {
    config: ClientConfig,
    session: String,
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();

    let level = verbosity_level(chosen_command.get_count("verbose"));
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let server = chosen_command
        .get_one::<Url>("server")
        .map(|u| u.to_string())
        .unwrap_or_default();
    let timeout = chosen_command.get_one::<u64>("timeout").copied();
    let ctx = Context {
        config: build_config(&server, timeout),
        session: chosen_command
            .get_one::<String>("session")
            .cloned()
            .unwrap_or_default(),
        quiet: chosen_command.get_flag("quiet"),
    };
    debug!("Using server {} and session {}", ctx.config.server, ctx.session);

    let result = match chosen_command.subcommand() {
        Some(("login", args)) => handle_login(&ctx, args).await,
        Some(("logout", _)) => handle_logout(&ctx),
        Some(("status", _)) => handle_status(&ctx),
        Some(("get", args)) => handle_get(&ctx, args).await,
        Some(("post", args)) => handle_post(&ctx, args).await,
        Some(("endpoints", _)) => {
            print!("{}", format_endpoint_table());
            Ok(())
        }
        Some(("ui", args)) => handle_ui(&ctx, args).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "✗".red().bold(), e.red());
        std::process::exit(1);
    }
}

fn client_for(ctx: &Context, credentials: CredentialStore) -> Result<AdminClient, String> {
    AdminClient::with_config(&ctx.config, credentials).map_err(|e| e.to_string())
}

async fn handle_login(ctx: &Context, args: &ArgMatches) -> Result<(), String> {
    let user = args.get_one::<String>("user").cloned().unwrap_or_default();
    let password = match args.get_one::<String>("password") {
        Some(password) => password.clone(),
        None => read_password(std::io::stdin().lock())?,
    };

    let credentials = open_credentials(&ctx.session);
    credentials.set(&user, &password);

    if args.get_flag("check") {
        let client = client_for(ctx, credentials.clone())?;
        let no_fields: &[(&str, &str)] = &[];
        match with_spinner(ctx, "Checking credentials...", client.call(Endpoint::Mem, no_fields)).await {
            Ok(_) => {}
            Err(e) if e.is_unauthorized() => {
                credentials.clear();
                return Err("Credentials rejected by the server".to_string());
            }
            Err(e) => {
                warn!("Could not verify credentials: {}", e);
                return Err(format!("Could not verify credentials: {}", e));
            }
        }
    }

    if !ctx.quiet {
        println!("{} Credentials stored for {}", "✓".green().bold(), user.bright_white());
    }
    Ok(())
}

fn handle_logout(ctx: &Context) -> Result<(), String> {
    open_credentials(&ctx.session).clear();
    if !ctx.quiet {
        println!("{} Credentials cleared", "✓".green().bold());
    }
    Ok(())
}

fn handle_status(ctx: &Context) -> Result<(), String> {
    let credentials = open_credentials(&ctx.session);
    println!("{}", describe_session(&credentials.get()));
    println!("Server:  {}", ctx.config.server);
    Ok(())
}

async fn handle_get(ctx: &Context, args: &ArgMatches) -> Result<(), String> {
    let endpoint = args.get_one::<String>("ENDPOINT").cloned().unwrap_or_default();
    match lookup_endpoint(&endpoint) {
        Some(known) if known.method() == Method::Post => {
            warn!("{} expects POST, the server will likely answer 405", known)
        }
        None => warn!("{} is not a known endpoint", endpoint),
        _ => {}
    }

    let client = client_for(ctx, open_credentials(&ctx.session))?;
    let value = with_spinner(ctx, &format!("GET {}", endpoint), client.get(&endpoint))
        .await
        .map_err(|e| e.to_string())?;

    print_response(&value, args.get_flag("raw"));
    Ok(())
}

async fn handle_post(ctx: &Context, args: &ArgMatches) -> Result<(), String> {
    let endpoint = args.get_one::<String>("ENDPOINT").cloned().unwrap_or_default();
    let raw_fields: Vec<String> = args
        .get_many::<String>("FIELDS")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let fields = parse_fields(&raw_fields)?;

    match lookup_endpoint(&endpoint) {
        Some(known) if known.method() == Method::Get => {
            warn!("{} expects GET, the server will likely answer 405", known)
        }
        None => warn!("{} is not a known endpoint", endpoint),
        _ => {}
    }

    let client = client_for(ctx, open_credentials(&ctx.session))?;
    let value = with_spinner(ctx, &format!("POST {}", endpoint), client.post(&endpoint, fields.as_slice()))
        .await
        .map_err(|e| e.to_string())?;

    print_response(&value, args.get_flag("raw"));
    Ok(())
}

async fn handle_ui(ctx: &Context, args: &ArgMatches) -> Result<(), String> {
    let location = match args.get_one::<String>("page") {
        Some(page) => Location::with_hash(page),
        None => Location::new(),
    };

    // The console is its own session, credentials are entered with `login`
    let client = client_for(ctx, memory_credentials())?;
    casteradm_tui::run(client, location)
        .await
        .map_err(|e| format!("Error running console: {}", e))
}

async fn with_spinner<F>(ctx: &Context, message: &str, request: F) -> Result<Value, ApiError>
where
    F: Future<Output = Result<Value, ApiError>>,
{
    if ctx.quiet {
        return request.await;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message.to_string());

    let result = request.await;
    spinner.finish_and_clear();
    result
}

fn print_response(value: &Value, raw: bool) {
    println!("{}", format_response(value, raw));
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
