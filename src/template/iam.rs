//! IAM policy document analysis.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_yaml::Value;

use super::intrinsic::render;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementAnalysis {
    pub index: usize,
    pub sid: Option<String>,
    pub effect: Option<String>,
    pub actions: Vec<String>,
    pub resources: Vec<String>,
    pub conditions: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyAnalysis {
    pub version: Option<String>,
    pub statement_count: usize,
    pub statements: Vec<StatementAnalysis>,
    pub actions: BTreeSet<String>,
    pub resources: BTreeSet<String>,
    pub effects: BTreeSet<String>,
}

impl PolicyAnalysis {
    /// The statement with the given `Sid`.
    pub fn statement(&self, sid: &str) -> Option<&StatementAnalysis> {
        self.statements.iter().find(|s| s.sid.as_deref() == Some(sid))
    }

    /// Whether any statement allows `action`, either exactly or via a `*` wildcard.
    pub fn allows(&self, action: &str) -> bool {
        self.statements
            .iter()
            .filter(|s| s.effect.as_deref() == Some("Allow"))
            .flat_map(|s| &s.actions)
            .any(|a| action_matches(a, action))
    }
}

/// Break down an IAM policy document.
///
/// A single statement object is treated as a one-element list, and scalar
/// `Action`/`Resource` values as one-element lists.
pub fn analyze_iam_policy(document: &Value) -> PolicyAnalysis {
    let statements: Vec<&Value> = match document.get("Statement") {
        Some(Value::Sequence(items)) => items.iter().collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(single) => vec![single],
    };

    let mut analysis = PolicyAnalysis {
        version: document.get("Version").map(render),
        statement_count: statements.len(),
        statements: Vec::new(),
        actions: BTreeSet::new(),
        resources: BTreeSet::new(),
        effects: BTreeSet::new(),
    };

    for (index, statement) in statements.into_iter().enumerate() {
        let stmt = StatementAnalysis {
            index,
            sid: statement.get("Sid").map(render),
            effect: statement.get("Effect").map(render),
            actions: as_list(statement.get("Action")),
            resources: as_list(statement.get("Resource")),
            conditions: statement.get("Condition").cloned(),
        };

        analysis.actions.extend(stmt.actions.iter().cloned());
        analysis.resources.extend(stmt.resources.iter().cloned());
        if let Some(effect) = &stmt.effect {
            analysis.effects.insert(effect.clone());
        }
        analysis.statements.push(stmt);
    }

    analysis
}

fn as_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Sequence(items)) => items.iter().map(render).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![render(other)],
    }
}

fn action_matches(pattern: &str, action: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => action.starts_with(prefix),
        None => pattern == action,
    }
}
