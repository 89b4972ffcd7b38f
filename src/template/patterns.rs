//! Regular expression checks for parameter patterns.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Accepted invalidator target ARNs: empty, or a Lambda function, SQS queue,
/// Step Functions state machine, or SNS topic with a 12-digit account id.
pub const ARN_PATTERN: &str = r"^$|^arn:aws:(lambda|sqs|states|sns):[a-z0-9-]+:[0-9]{12}:(function|queue|stateMachine|topic)/[a-zA-Z0-9_-]+$";

/// Whether `arn` is accepted by [`ARN_PATTERN`].
pub fn matches_arn(arn: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(ARN_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(arn))
}

/// Outcome of testing strings against a pattern.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatternCheck {
    pub pattern: String,
    pub valid_pattern: bool,
    /// Compile error when the pattern is invalid.
    pub error: Option<String>,
    /// Per-input result, in input order.
    pub matches: Vec<(String, bool)>,
    pub match_count: usize,
    pub matching_strings: Vec<String>,
    pub non_matching_strings: Vec<String>,
}

/// Test each input for a match starting at its first character.
pub fn validate_regex_pattern(pattern: &str, inputs: &[&str]) -> PatternCheck {
    let mut check = PatternCheck {
        pattern: pattern.to_string(),
        ..Default::default()
    };

    let regex = match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(e) => {
            check.error = Some(e.to_string());
            return check;
        }
    };
    check.valid_pattern = true;

    for input in inputs {
        let matched = regex.find(input).is_some_and(|m| m.start() == 0);
        check.matches.push((input.to_string(), matched));
        if matched {
            check.match_count += 1;
            check.matching_strings.push(input.to_string());
        } else {
            check.non_matching_strings.push(input.to_string());
        }
    }

    check
}
