//! Verb commands: one administrative operation bound to its validator,
//! documentation, flags, and handler.

use std::fmt::Write as _;

use async_trait::async_trait;
use clap::{Arg, ArgAction, ArgMatches, Command};
use pulsarctl_admin::PulsarAdmin;
use serde_json::Value;

use crate::args::{ArgumentPolicy, ValidatedArgs};
use crate::client::{CliError, CliResult};

/// Id of the clap argument collecting positional names.
pub const NAME_ARGS: &str = "name-args";

/// Successful result of a verb.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Structured response rendered as indented JSON.
    Json(Value),
    /// Confirmation line for calls without a response body.
    Message(String),
}

/// Outcome of one invocation: exactly one of payload or error.
pub type InvocationResult = CliResult<Payload>;

/// Example invocation shown in help output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    /// What the example does.
    pub desc: &'static str,
    /// Literal command line.
    pub command: &'static str,
}

/// Sample output shown in help output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSample {
    /// When this output appears.
    pub desc: &'static str,
    /// Literal output text.
    pub out: &'static str,
}

/// Help metadata attached to a verb. Never consulted during dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Description {
    used_for: &'static str,
    permission: &'static str,
    examples: Vec<Example>,
    outputs: Vec<OutputSample>,
}

impl Description {
    /// Start a description from its purpose and permission note.
    #[must_use]
    pub const fn new(used_for: &'static str, permission: &'static str) -> Self {
        Self {
            used_for,
            permission,
            examples: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Append an example invocation.
    #[must_use]
    pub fn example(mut self, desc: &'static str, command: &'static str) -> Self {
        self.examples.push(Example { desc, command });
        self
    }

    /// Append a sample output.
    #[must_use]
    pub fn output(mut self, desc: &'static str, out: &'static str) -> Self {
        self.outputs.push(OutputSample { desc, out });
        self
    }

    /// Long help text: purpose, permission, and sample outputs.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "USED FOR:\n    {}\n", self.used_for);
        let _ = writeln!(text, "REQUIRED PERMISSION:\n    {}\n", self.permission);
        if !self.outputs.is_empty() {
            text.push_str("OUTPUT:\n");
            for sample in &self.outputs {
                let _ = writeln!(text, "    #{}", sample.desc);
                for line in sample.out.lines() {
                    let _ = writeln!(text, "    {line}");
                }
                text.push('\n');
            }
        }
        text.trim_end().to_string()
    }

    /// Example section: `#desc` followed by the literal command.
    #[must_use]
    pub fn examples_text(&self) -> String {
        let mut text = String::new();
        for example in &self.examples {
            let _ = writeln!(text, "    #{}\n    {}\n", example.desc, example.command);
        }
        let body = text.trim_end();
        if body.is_empty() {
            String::new()
        } else {
            format!("EXAMPLES:\n{body}")
        }
    }
}

/// Validated inputs handed to a verb handler.
pub struct VerbContext<'a> {
    args: ValidatedArgs,
    matches: &'a ArgMatches,
    admin: &'a dyn PulsarAdmin,
}

impl<'a> VerbContext<'a> {
    /// Bundle validated names, parsed flags, and the administrative client.
    #[must_use]
    pub fn new(args: ValidatedArgs, matches: &'a ArgMatches, admin: &'a dyn PulsarAdmin) -> Self {
        Self {
            args,
            matches,
            admin,
        }
    }

    /// Positional name at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Failure`] if the verb's policy let fewer names
    /// through than the handler expects.
    pub fn name(&self, index: usize) -> CliResult<&str> {
        self.args.get(index).ok_or_else(|| {
            CliError::failure(anyhow::anyhow!(
                "name argument {index} missing after validation"
            ))
        })
    }

    /// Single-valued string flag.
    #[must_use]
    pub fn flag(&self, id: &str) -> Option<&str> {
        self.matches
            .try_get_one::<String>(id)
            .ok()
            .flatten()
            .map(String::as_str)
    }

    /// All values of a repeatable or delimited flag.
    #[must_use]
    pub fn flag_values(&self, id: &str) -> Vec<String> {
        self.matches
            .try_get_many::<String>(id)
            .ok()
            .flatten()
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    }

    /// Boolean switch.
    #[must_use]
    pub fn switch(&self, id: &str) -> bool {
        self.matches
            .try_get_one::<bool>(id)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    }

    /// Administrative client.
    #[must_use]
    pub fn admin(&self) -> &'a dyn PulsarAdmin {
        self.admin
    }
}

/// Body of a verb: domain parsing followed by one administrative call.
#[async_trait]
pub trait VerbHandler: Send + Sync {
    /// Execute the verb with validated inputs.
    async fn run(&self, ctx: &VerbContext<'_>) -> InvocationResult;
}

/// One addressable administrative operation.
pub struct Verb {
    name: &'static str,
    about: &'static str,
    description: Description,
    policy: ArgumentPolicy,
    flags: Vec<Arg>,
    handler: Box<dyn VerbHandler>,
}

impl Verb {
    /// Define a verb.
    pub fn new(
        name: &'static str,
        about: &'static str,
        description: Description,
        policy: ArgumentPolicy,
        handler: impl VerbHandler + 'static,
    ) -> Self {
        Self {
            name,
            about,
            description,
            policy,
            flags: Vec::new(),
            handler: Box::new(handler),
        }
    }

    /// Attach a flag exposed to the handler through [`VerbContext`].
    #[must_use]
    pub fn flag(mut self, arg: Arg) -> Self {
        self.flags.push(arg);
        self
    }

    /// Verb name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// One-line summary.
    #[must_use]
    pub const fn about(&self) -> &'static str {
        self.about
    }

    /// Help metadata.
    #[must_use]
    pub const fn description(&self) -> &Description {
        &self.description
    }

    /// Clap definition of the verb.
    ///
    /// Verbs that take no names keep the positional hidden so extra names
    /// still reach the validator and fail with its message.
    #[must_use]
    pub fn command(&self) -> Command {
        let names = Arg::new(NAME_ARGS)
            .action(ArgAction::Append)
            .num_args(1..)
            .required(false)
            .help("Resource names the command acts on");
        let value_names = self.policy.value_names();
        let names = if value_names.is_empty() {
            names.hide(true)
        } else {
            names.value_names(value_names)
        };
        let mut command = Command::new(self.name)
            .about(self.about)
            .long_about(self.description.to_text())
            .arg(names)
            .args(self.flags.iter().cloned());
        let examples = self.description.examples_text();
        if !examples.is_empty() {
            command = command.after_help(examples);
        }
        command
    }

    /// Validate `raw` names and run the handler.
    ///
    /// Argument errors are returned before the handler, and therefore before
    /// any administrative call.
    pub async fn invoke(
        &self,
        raw: &[String],
        matches: &ArgMatches,
        admin: &dyn PulsarAdmin,
    ) -> InvocationResult {
        let args = self.policy.validate(raw)?;
        let ctx = VerbContext::new(args, matches, admin);
        self.handler.run(&ctx).await
    }
}

impl std::fmt::Debug for Verb {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Verb")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
