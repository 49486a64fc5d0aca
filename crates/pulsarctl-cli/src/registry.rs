//! Resource groups and verb lookup.
//!
//! # Design
//! - The registry is an ordinary value built once by the entry point and passed
//!   by reference; nothing registers itself globally.
//! - Lookup is an explicit (noun, verb) match over the registered groups, which
//!   also drives the clap command tree and the documentation export.

use std::fmt::Write as _;

use clap::Command;
use thiserror::Error;

use crate::verb::Verb;

/// Lookup failure for a resource noun or verb.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No group is registered under the noun.
    #[error("unknown resource {noun}")]
    UnknownResource {
        /// Requested noun.
        noun: String,
    },
    /// The group exists but has no such verb.
    #[error("unknown verb {verb} for resource {noun}")]
    UnknownVerb {
        /// Requested noun.
        noun: String,
        /// Requested verb.
        verb: String,
    },
}

/// Verbs operating on one kind of resource.
#[derive(Debug)]
pub struct ResourceGroup {
    noun: &'static str,
    about: &'static str,
    aliases: Vec<&'static str>,
    verbs: Vec<Verb>,
}

impl ResourceGroup {
    /// Start an empty group.
    #[must_use]
    pub const fn new(noun: &'static str, about: &'static str) -> Self {
        Self {
            noun,
            about,
            aliases: Vec::new(),
            verbs: Vec::new(),
        }
    }

    /// Accept an alternative noun on the command line.
    #[must_use]
    pub fn alias(mut self, alias: &'static str) -> Self {
        self.aliases.push(alias);
        self
    }

    /// Register a verb.
    #[must_use]
    pub fn verb(mut self, verb: Verb) -> Self {
        self.verbs.push(verb);
        self
    }

    /// Resource noun.
    #[must_use]
    pub const fn noun(&self) -> &'static str {
        self.noun
    }

    /// Registered verbs in registration order.
    #[must_use]
    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    fn matches(&self, noun: &str) -> bool {
        self.noun == noun || self.aliases.iter().any(|alias| *alias == noun)
    }

    fn command(&self) -> Command {
        Command::new(self.noun)
            .about(self.about)
            .visible_aliases(self.aliases.iter().copied())
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommands(self.verbs.iter().map(Verb::command))
    }
}

/// Summary of one registered verb for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbSummary {
    /// Resource noun.
    pub noun: &'static str,
    /// Verb name.
    pub verb: &'static str,
    /// One-line summary.
    pub about: &'static str,
}

/// Every resource group known to the CLI.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    groups: Vec<ResourceGroup>,
}

impl CommandRegistry {
    /// Start an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Register a resource group.
    #[must_use]
    pub fn group(mut self, group: ResourceGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Registered groups in registration order.
    #[must_use]
    pub fn groups(&self) -> &[ResourceGroup] {
        &self.groups
    }

    /// Find the verb registered under `noun` and `verb`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when either name is unknown.
    pub fn resolve(&self, noun: &str, verb: &str) -> Result<&Verb, RegistryError> {
        let group = self.find_group(noun)?;
        group
            .verbs()
            .iter()
            .find(|candidate| candidate.name() == verb)
            .ok_or_else(|| RegistryError::UnknownVerb {
                noun: group.noun().to_string(),
                verb: verb.to_string(),
            })
    }

    /// List every registered verb.
    #[must_use]
    pub fn list(&self) -> Vec<VerbSummary> {
        self.groups()
            .iter()
            .flat_map(|group| {
                group.verbs().iter().map(|verb| VerbSummary {
                    noun: group.noun(),
                    verb: verb.name(),
                    about: verb.about(),
                })
            })
            .collect()
    }

    /// Clap subcommands for every group.
    #[must_use]
    pub fn commands(&self) -> Vec<Command> {
        self.groups.iter().map(ResourceGroup::command).collect()
    }

    /// Plain-text documentation for every verb, optionally limited to one noun.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownResource`] when `noun` is not registered.
    pub fn docs(&self, binary: &str, noun: Option<&str>) -> Result<String, RegistryError> {
        let groups: Vec<&ResourceGroup> = match noun {
            Some(noun) => vec![self.find_group(noun)?],
            None => self.groups().iter().collect(),
        };

        let mut text = String::new();
        for group in groups {
            for verb in group.verbs() {
                let _ = writeln!(text, "## {binary} {} {}\n", group.noun(), verb.name());
                let _ = writeln!(text, "{}\n", verb.about());
                let _ = writeln!(text, "{}\n", verb.description().to_text());
                let examples = verb.description().examples_text();
                if !examples.is_empty() {
                    let _ = writeln!(text, "{examples}\n");
                }
            }
        }
        Ok(text.trim_end().to_string())
    }

    fn find_group(&self, noun: &str) -> Result<&ResourceGroup, RegistryError> {
        self.groups()
            .iter()
            .find(|group| group.matches(noun))
            .ok_or_else(|| RegistryError::UnknownResource {
                noun: noun.to_string(),
            })
    }
}
