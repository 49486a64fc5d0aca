//! Arity validation for positional name arguments.
//!
//! Validation only looks at how many names were given. Interpreting their
//! content (ids, ranges) is left to the verb's handler.

use thiserror::Error;

/// Positional arguments did not match the verb's expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ArgumentError {
    message: String,
}

impl ArgumentError {
    /// Build an argument error with an operator-facing message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// How many positional names a verb accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentPolicy {
    /// Exactly `count` names.
    Exactly {
        /// Required number of names.
        count: usize,
        /// Message reported on mismatch.
        message: &'static str,
    },
    /// At most `count` names.
    AtMost {
        /// Upper bound on the number of names.
        count: usize,
        /// Message reported on mismatch.
        message: &'static str,
    },
    /// At least `count` names.
    AtLeast {
        /// Lower bound on the number of names.
        count: usize,
        /// Message reported on mismatch.
        message: &'static str,
    },
    /// One positional per listed name, in order.
    Names {
        /// Human-readable names, e.g. `cluster name`.
        names: &'static [&'static str],
        /// Replacement for the generated message.
        message: Option<&'static str>,
    },
}

impl ArgumentPolicy {
    /// Require exactly `count` names.
    #[must_use]
    pub const fn exactly(count: usize, message: &'static str) -> Self {
        Self::Exactly { count, message }
    }

    /// Require one positional per listed name.
    #[must_use]
    pub const fn names(names: &'static [&'static str]) -> Self {
        Self::Names {
            names,
            message: None,
        }
    }

    /// Accept no positional names at all.
    #[must_use]
    pub const fn none() -> Self {
        Self::AtMost {
            count: 0,
            message: "this command does not accept any name arguments",
        }
    }

    /// Check `raw` against the policy.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError`] when the number of names does not fit.
    pub fn validate(&self, raw: &[String]) -> Result<ValidatedArgs, ArgumentError> {
        let len = raw.len();
        let accepted = match *self {
            Self::Exactly { count, .. } => len == count,
            Self::AtMost { count, .. } => len <= count,
            Self::AtLeast { count, .. } => len >= count,
            Self::Names { names, .. } => len == names.len(),
        };
        if accepted {
            Ok(ValidatedArgs(raw.to_vec()))
        } else {
            Err(ArgumentError::new(self.failure_message()))
        }
    }

    /// Placeholder shown for the positional arguments in usage text.
    ///
    /// Empty when the policy accepts no names, so usage text advertises none.
    #[must_use]
    pub fn value_names(&self) -> Vec<String> {
        match *self {
            Self::Names { names, .. } => names.iter().map(|name| name.replace(' ', "-")).collect(),
            Self::Exactly { count, .. } | Self::AtLeast { count, .. } => {
                vec!["NAME".to_string(); count.max(1)]
            }
            Self::AtMost { count: 0, .. } => Vec::new(),
            Self::AtMost { .. } => vec!["NAME".to_string()],
        }
    }

    fn failure_message(&self) -> String {
        match *self {
            Self::Exactly { message, .. }
            | Self::AtMost { message, .. }
            | Self::AtLeast { message, .. }
            | Self::Names {
                message: Some(message),
                ..
            } => message.to_string(),
            Self::Names {
                names,
                message: None,
            } => format!("need to specified {}", list_names(names)),
        }
    }
}

fn list_names(names: &[&str]) -> String {
    let labelled: Vec<String> = names.iter().map(|name| format!("the {name}")).collect();
    match labelled.split_last() {
        None => "the name arguments".to_string(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {last}", rest.join(", ")),
    }
}

/// Positional names that passed validation, in command-line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedArgs(Vec<String>);

impl ValidatedArgs {
    /// Name at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEDGER_MSG: &str =
        "the ledger id is not specified or the ledger id is specified more than one";

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn exactly_one_rejects_zero_and_many() {
        let policy = ArgumentPolicy::exactly(1, LEDGER_MSG);
        for raw in [args(&[]), args(&["1", "2"]), args(&["1", "2", "3"])] {
            let err = policy.validate(&raw).expect_err("arity mismatch");
            assert_eq!(err.to_string(), LEDGER_MSG);
        }
    }

    #[test]
    fn exactly_one_ignores_content() {
        let policy = ArgumentPolicy::exactly(1, LEDGER_MSG);
        for value in ["a", "-1", "", "42"] {
            let validated = policy.validate(&args(&[value])).expect("one name");
            assert_eq!(validated.get(0), Some(value));
        }
    }

    #[test]
    fn range_policies_check_bounds() {
        let at_most = ArgumentPolicy::AtMost {
            count: 1,
            message: "too many",
        };
        assert!(at_most.validate(&args(&[])).is_ok());
        assert!(at_most.validate(&args(&["a"])).is_ok());
        assert_eq!(
            at_most.validate(&args(&["a", "b"])).expect_err("bound").to_string(),
            "too many"
        );

        let at_least = ArgumentPolicy::AtLeast {
            count: 2,
            message: "too few",
        };
        assert!(at_least.validate(&args(&["a", "b", "c"])).is_ok());
        assert_eq!(
            at_least.validate(&args(&["a"])).expect_err("bound").to_string(),
            "too few"
        );
    }

    #[test]
    fn names_policy_lists_missing_names() {
        let policy = ArgumentPolicy::names(&["cluster name", "policy name"]);
        let err = policy.validate(&args(&["standalone"])).expect_err("missing");
        assert_eq!(
            err.to_string(),
            "need to specified the cluster name and the policy name"
        );
        let validated = policy
            .validate(&args(&["standalone", "policy-1"]))
            .expect("two names");
        assert_eq!(validated, ValidatedArgs(args(&["standalone", "policy-1"])));
        assert_eq!(validated.get(1), Some("policy-1"));
    }

    #[test]
    fn names_message_handles_one_and_three_names() {
        assert_eq!(list_names(&["cluster name"]), "the cluster name");
        assert_eq!(
            list_names(&["tenant", "namespace", "topic"]),
            "the tenant, the namespace and the topic"
        );
    }

    #[test]
    fn names_policy_accepts_custom_message() {
        let policy = ArgumentPolicy::Names {
            names: &["cluster name", "broker"],
            message: Some("cluster and broker are required"),
        };
        assert_eq!(
            policy.validate(&args(&[])).expect_err("missing").to_string(),
            "cluster and broker are required"
        );
    }

    #[test]
    fn none_policy_rejects_any_name() {
        let policy = ArgumentPolicy::none();
        assert_eq!(policy.validate(&args(&[])).expect("empty").get(0), None);
        assert!(policy.validate(&args(&["x"])).is_err());
    }

    #[test]
    fn value_names_follow_policy() {
        assert_eq!(
            ArgumentPolicy::names(&["cluster name", "policy name"]).value_names(),
            ["cluster-name", "policy-name"]
        );
        assert_eq!(ArgumentPolicy::exactly(1, "x").value_names(), ["NAME"]);
        let at_most = ArgumentPolicy::AtMost {
            count: 1,
            message: "x",
        };
        assert_eq!(at_most.value_names(), ["NAME"]);
    }

    #[test]
    fn none_policy_has_no_value_names() {
        assert!(ArgumentPolicy::none().value_names().is_empty());
    }
}
