//! CloudFormation intrinsic functions in parsed YAML.
//!
//! The short form `!GetAtt Bucket.Arn` parses as a tagged value while the
//! long form `{"Fn::GetAtt": ...}` parses as a single-entry mapping. Both are
//! normalised to the long-form name here.

use serde_yaml::Value;

/// Short-form tags recognised in templates.
pub const CFN_TAGS: &[&str] = &[
    "!Ref",
    "!GetAtt",
    "!Sub",
    "!Join",
    "!If",
    "!Not",
    "!Equals",
    "!And",
    "!Or",
    "!Select",
    "!Split",
    "!Base64",
    "!Cidr",
    "!FindInMap",
    "!GetAZs",
    "!ImportValue",
    "!Condition",
];

/// An intrinsic function call found in a template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intrinsic<'a> {
    /// Long-form name: `Ref`, `Condition`, or `Fn::<Name>`.
    pub name: &'a str,
    pub argument: &'a Value,
}

impl<'a> Intrinsic<'a> {
    /// Recognise either form of an intrinsic call.
    pub fn parse(value: &'a Value) -> Option<Self> {
        match value {
            Value::Tagged(tagged) => {
                let tag = tagged.tag.to_string();
                let short = tag.trim_start_matches('!');
                long_name(short).map(|name| Self {
                    name,
                    argument: &tagged.value,
                })
            }
            Value::Mapping(map) if map.len() == 1 => {
                let (key, argument) = map.iter().next()?;
                let key = key.as_str()?;
                let name = if key == "Ref" || key == "Condition" {
                    key
                } else {
                    key.strip_prefix("Fn::").and_then(long_name)?
                };
                Some(Self { name, argument })
            }
            _ => None,
        }
    }

    /// Whether this call is the function with the given short name (`Ref`, `If`, ...).
    pub fn is(&self, short: &str) -> bool {
        self.name.strip_prefix("Fn::").unwrap_or(self.name) == short
    }

    /// The argument as a string, for `Ref` and `Condition`.
    pub fn str_argument(&self) -> Option<&'a str> {
        self.argument.as_str()
    }

    /// The argument as a list, for `If`, `Equals`, `And`, ...
    pub fn list_argument(&self) -> &'a [Value] {
        self.argument
            .as_sequence()
            .map(|s| s.as_slice())
            .unwrap_or_default()
    }
}

fn long_name(short: &str) -> Option<&'static str> {
    let name = match short {
        "Ref" => "Ref",
        "Condition" => "Condition",
        "GetAtt" => "Fn::GetAtt",
        "Sub" => "Fn::Sub",
        "Join" => "Fn::Join",
        "If" => "Fn::If",
        "Not" => "Fn::Not",
        "Equals" => "Fn::Equals",
        "And" => "Fn::And",
        "Or" => "Fn::Or",
        "Select" => "Fn::Select",
        "Split" => "Fn::Split",
        "Base64" => "Fn::Base64",
        "Cidr" => "Fn::Cidr",
        "FindInMap" => "Fn::FindInMap",
        "GetAZs" => "Fn::GetAZs",
        "ImportValue" => "Fn::ImportValue",
        _ => return None,
    };
    Some(name)
}

/// Name referenced by a `Ref`, in either form.
pub fn ref_target(value: &Value) -> Option<&str> {
    Intrinsic::parse(value)
        .filter(|i| i.is("Ref"))
        .and_then(|i| i.str_argument())
}

/// Whether a plain string looks like it embeds an intrinsic.
pub fn mentions_intrinsic(text: &str) -> bool {
    CFN_TAGS.iter().any(|tag| text.contains(tag))
}

/// Every string scalar (including mapping keys) in a value tree.
pub fn collect_strings(value: &Value) -> Vec<&str> {
    let mut out = Vec::new();
    walk_strings(value, &mut out);
    out
}

fn walk_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => out.push(s),
        Value::Sequence(items) => items.iter().for_each(|v| walk_strings(v, out)),
        Value::Mapping(map) => {
            for (k, v) in map {
                walk_strings(k, out);
                walk_strings(v, out);
            }
        }
        Value::Tagged(tagged) => walk_strings(&tagged.value, out),
        _ => {}
    }
}

/// Compact single-line rendering of a value for reports.
///
/// Strings render as-is; anything else as JSON, where a short-form tag shows
/// up as a `{"!Tag": ...}` object.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| format!("{:?}", other)),
    }
}
