//! Argument parsing, dispatch, and the process entry point.

use std::ffi::OsString;
use std::io::{self, Write};

use clap::{Arg, ArgMatches, Args, Command, FromArgMatches};
use pulsarctl_admin::PulsarAdmin;
use pulsarctl_telemetry::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, command_span, init_logging,
};
use reqwest::Url;
use tracing::Instrument;
use uuid::Uuid;

use crate::client::{CliDependencies, CliError, CliResult, EXIT_FAILURE, parse_url};
use crate::commands;
use crate::output::Renderer;
use crate::registry::{CommandRegistry, RegistryError};
use crate::verb::{InvocationResult, NAME_ARGS, Payload, Verb};

/// Name of the installed binary, used in help and documentation.
pub const BINARY_NAME: &str = "pulsarctl";

const DEFAULT_WEB_SERVICE_URL: &str = "http://localhost:8080";
const DEFAULT_BOOKIE_SERVICE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DOCS_COMMAND: &str = "docs";
const DOCS_RESOURCE: &str = "resource";

/// Flags accepted before or after any subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Pulsar web service (admin REST) URL.
    #[arg(
        short = 's',
        long,
        global = true,
        env = "PULSARCTL_WEB_SERVICE_URL",
        value_parser = parse_url,
        default_value = DEFAULT_WEB_SERVICE_URL
    )]
    pub web_service_url: Url,
    /// Bookie HTTP service URL used by ledger commands.
    #[arg(
        long,
        global = true,
        env = "PULSARCTL_BOOKIE_SERVICE_URL",
        value_parser = parse_url,
        default_value = DEFAULT_BOOKIE_SERVICE_URL
    )]
    pub bookie_service_url: Url,
    /// HTTP request timeout in seconds.
    #[arg(
        long,
        global = true,
        env = "PULSARCTL_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub timeout: u64,
    /// Log filter directive; `RUST_LOG` takes precedence.
    #[arg(
        long,
        global = true,
        env = "PULSARCTL_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL
    )]
    pub log_level: String,
    /// Log output format (`json` or `pretty`).
    #[arg(
        long,
        global = true,
        env = "PULSARCTL_LOG_FORMAT",
        value_parser = parse_log_format
    )]
    pub log_format: Option<LogFormat>,
}

impl GlobalArgs {
    fn logging(&self) -> LoggingConfig<'_> {
        LoggingConfig {
            level: &self.log_level,
            format: self.log_format.unwrap_or_else(LogFormat::infer),
            build_sha: build_sha(),
        }
    }
}

fn parse_log_format(input: &str) -> Result<LogFormat, String> {
    input.parse().map_err(|err| format!("{err}"))
}

/// What a parsed command line asks for.
#[derive(Debug)]
pub enum Target<'r> {
    /// Run a registered verb.
    Verb {
        /// Resource noun as registered.
        noun: String,
        /// Resolved verb.
        verb: &'r Verb,
        /// Raw positional names, unvalidated.
        names: Vec<String>,
        /// Parsed flags of the verb subcommand.
        matches: ArgMatches,
    },
    /// Print the documentation export.
    Docs {
        /// Optional noun restricting the export.
        noun: Option<String>,
    },
}

/// A parsed command line.
#[derive(Debug)]
pub struct Invocation<'r> {
    /// Global configuration flags.
    pub globals: GlobalArgs,
    /// Requested action.
    pub target: Target<'r>,
}

impl Invocation<'_> {
    /// Label used for spans, logs, and telemetry, e.g. `ledger_delete`.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.target {
            Target::Verb { noun, verb, .. } => format!("{noun}_{}", verb.name()),
            Target::Docs { .. } => DOCS_COMMAND.to_string(),
        }
    }

    /// Whether the target talks to the administrative API.
    #[must_use]
    pub const fn needs_admin(&self) -> bool {
        matches!(self.target, Target::Verb { .. })
    }

    /// Execute the target against `admin`.
    pub async fn execute(
        &self,
        registry: &CommandRegistry,
        admin: Option<&dyn PulsarAdmin>,
    ) -> InvocationResult {
        match &self.target {
            Target::Docs { noun } => {
                let text = registry.docs(BINARY_NAME, noun.as_deref())?;
                Ok(Payload::Message(text))
            }
            Target::Verb {
                verb,
                names,
                matches,
                ..
            } => {
                let admin = admin.ok_or_else(|| {
                    CliError::failure(anyhow::anyhow!("administrative client not configured"))
                })?;
                verb.invoke(names, matches, admin).await
            }
        }
    }
}

/// Clap command tree for every registered group plus `docs`.
#[must_use]
pub fn root_command(registry: &CommandRegistry) -> Command {
    let root = Command::new(BINARY_NAME)
        .about("Administrative CLI for Pulsar clusters")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommands(registry.commands())
        .subcommand(
            Command::new(DOCS_COMMAND)
                .about("Print plain-text documentation for every command")
                .arg(
                    Arg::new(DOCS_RESOURCE)
                        .required(false)
                        .help("Limit the output to one resource"),
                ),
        );
    GlobalArgs::augment_args(root)
}

/// Parse `argv` (including the binary name) against `registry`.
///
/// # Errors
///
/// Returns [`CliError::Usage`] for malformed command lines, including help and
/// version requests, and [`CliError::Registry`] for unknown commands.
pub fn parse<'r, I, T>(registry: &'r CommandRegistry, argv: I) -> CliResult<Invocation<'r>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = root_command(registry).try_get_matches_from(argv)?;
    let globals = GlobalArgs::from_arg_matches(&matches)?;

    let (noun, noun_matches) =
        matches
            .subcommand()
            .ok_or_else(|| RegistryError::UnknownResource {
                noun: String::new(),
            })?;

    if noun == DOCS_COMMAND {
        let noun = noun_matches.get_one::<String>(DOCS_RESOURCE).cloned();
        return Ok(Invocation {
            globals,
            target: Target::Docs { noun },
        });
    }

    let (verb_name, verb_matches) =
        noun_matches
            .subcommand()
            .ok_or_else(|| RegistryError::UnknownVerb {
                noun: noun.to_string(),
                verb: String::new(),
            })?;
    let verb = registry.resolve(noun, verb_name)?;
    let names = verb_matches
        .get_many::<String>(NAME_ARGS)
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    Ok(Invocation {
        globals,
        target: Target::Verb {
            noun: noun.to_string(),
            verb,
            names,
            matches: verb_matches.clone(),
        },
    })
}

/// Parses CLI arguments, executes the requested command, and handles
/// user-facing telemetry emission. Returns the process exit code.
pub async fn run() -> i32 {
    let registry = commands::registry();
    run_with(
        &registry,
        std::env::args_os(),
        CliDependencies::from_env,
        io::stdout(),
        io::stderr(),
    )
    .await
}

/// Run one invocation with injectable dependencies and output streams.
///
/// `connect` builds the administrative client once the command line has been
/// parsed; it is not called for commands that never reach the API.
pub async fn run_with<I, T, F, O, E>(
    registry: &CommandRegistry,
    argv: I,
    connect: F,
    out: O,
    err: E,
) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: FnOnce(&GlobalArgs, &str) -> CliResult<CliDependencies>,
    O: Write,
    E: Write,
{
    let mut renderer = Renderer::new(out, err);

    let invocation = match parse(registry, argv) {
        Ok(invocation) => invocation,
        Err(error) => return renderer.render_error(&error).unwrap_or(EXIT_FAILURE),
    };

    if let Err(error) = init_logging(&invocation.globals.logging()) {
        tracing::debug!(error = %error, "logging already initialised");
    }

    let trace_id = Uuid::new_v4().to_string();
    let label = invocation.label();

    let deps = if invocation.needs_admin() {
        match connect(&invocation.globals, &trace_id) {
            Ok(deps) => Some(deps),
            Err(error) => return renderer.render_error(&error).unwrap_or(EXIT_FAILURE),
        }
    } else {
        None
    };
    let admin = deps.as_ref().map(|deps| deps.admin.as_ref());

    let span = command_span(&trace_id, &label);
    let result = invocation.execute(registry, admin).instrument(span).await;

    let exit_code = match renderer.render(&result) {
        Ok(code) => code,
        Err(error) => {
            tracing::error!(error = %error, "failed to write command output");
            EXIT_FAILURE
        }
    };

    let (outcome, message) = match &result {
        Ok(_) => ("success", None),
        Err(error) => (error.outcome(), Some(error.display_message())),
    };
    tracing::debug!(command = %label, outcome, exit_code, "command finished");

    if let Some(emitter) = deps.as_ref().and_then(|deps| deps.telemetry.as_ref()) {
        emitter
            .emit(&trace_id, &label, outcome, exit_code, message.as_deref())
            .await;
    }

    exit_code
}
