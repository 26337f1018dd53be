// Rules and the per-field executor

use crate::format::format_message;
use crate::value::describe;
use crate::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

type CheckFn = Arc<dyn Fn(Option<&Value>) -> bool + Send + Sync>;

/// Scoping options accepted by the rule builders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOptions {
    /// Group the rule is limited to; `None` applies it to every group.
    pub group: Option<String>,
    /// Array-shape rules: accept a lone non-array value of the expected kind.
    pub allowed_one_element: bool,
}

impl RuleOptions {
    pub fn group(group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            ..Self::default()
        }
    }

    pub fn allow_one_element(mut self) -> Self {
        self.allowed_one_element = true;
        self
    }
}

/// An atomic, immutable check over one field value.
///
/// A rule holds a message template rendered with `[field, params...]` when
/// it fails (see [`format_message`]).
#[derive(Clone)]
pub struct Rule {
    constraint: String,
    group: Option<String>,
    message: String,
    params: Vec<String>,
    skip_absent: bool,
    check: CheckFn,
}

impl Rule {
    /// Rule that passes when `check` returns true.
    pub fn new<F>(constraint: impl Into<String>, message: impl Into<String>, check: F) -> Self
    where
        F: Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    {
        Self {
            constraint: constraint.into(),
            group: None,
            message: message.into(),
            params: Vec::new(),
            skip_absent: false,
            check: Arc::new(check),
        }
    }

    pub fn with_params<I, P>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: ToString,
    {
        self.params = params.into_iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_options(mut self, options: &RuleOptions) -> Self {
        if let Some(group) = &options.group {
            self.group = Some(group.clone());
        }
        self
    }

    /// Pass absent and `null` values without running the check.
    pub fn optional(mut self) -> Self {
        self.skip_absent = true;
        self
    }

    pub fn constraint(&self) -> &str {
        &self.constraint
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Whether the rule is active for `group`.
    pub fn applies_to(&self, group: Option<&str>) -> bool {
        match &self.group {
            None => true,
            Some(own) => group == Some(own.as_str()),
        }
    }

    /// Run the check. Returns the unformatted message template on failure.
    pub fn evaluate(&self, value: Option<&Value>) -> Option<&str> {
        if self.skip_absent && value.is_none_or(Value::is_null) {
            return None;
        }

        if (self.check)(value) {
            None
        } else {
            Some(&self.message)
        }
    }

    /// Run the check for `field`, producing a rendered error on failure.
    pub fn check(&self, field: &str, value: Option<&Value>) -> Option<ValidationError> {
        let template = self.evaluate(value)?;

        let mut args = Vec::with_capacity(self.params.len() + 1);
        args.push(field);
        args.extend(self.params.iter().map(String::as_str));

        Some(
            ValidationError::new(field, format_message(template, &args))
                .with_constraint(self.constraint.clone())
                .with_value(describe(value)),
        )
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("constraint", &self.constraint)
            .field("group", &self.group)
            .field("message", &self.message)
            .field("params", &self.params)
            .field("optional", &self.skip_absent)
            .finish()
    }
}

/// How many failures a field reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Every failing rule, in declaration order.
    #[default]
    CollectAll,
    /// Stop at the first failing rule.
    FirstFailure,
}

impl ExecutionMode {
    pub const NAMES: [&'static str; 2] = ["collect_all", "first_failure"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::CollectAll => "collect_all",
            ExecutionMode::FirstFailure => "first_failure",
        }
    }
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "collect_all" => Ok(ExecutionMode::CollectAll),
            "first_failure" => Ok(ExecutionMode::FirstFailure),
            other => Err(format!("unknown execution mode '{}'", other)),
        }
    }
}

/// Ordered rules of one field.
#[derive(Debug, Clone)]
pub struct FieldRules {
    field: String,
    rules: Vec<Rule>,
}

impl FieldRules {
    pub fn for_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rules: Vec::new(),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules active for `group`, in declaration order.
    pub fn active<'a>(&'a self, group: Option<&'a str>) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |rule| rule.applies_to(group))
    }

    /// Execute the active rules against `value`.
    pub fn execute(
        &self,
        value: Option<&Value>,
        group: Option<&str>,
        mode: ExecutionMode,
    ) -> ValidationResult {
        let mut errors = Vec::new();

        for rule in self.active(group) {
            if let Some(error) = rule.check(&self.field, value) {
                errors.push(error);
                if mode == ExecutionMode::FirstFailure {
                    break;
                }
            }
        }

        ValidationResult::from_errors(&self.field, errors)
    }
}

/// Field name to ordered rules, in field declaration order. This is also
/// the declared shape of a DTO.
#[derive(Debug, Clone, Default)]
pub struct FieldRuleSet {
    fields: Vec<FieldRules>,
}

impl FieldRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `field` with `rules`. Declaring a field again appends.
    pub fn field<I>(mut self, field: impl Into<String>, rules: I) -> Self
    where
        I: IntoIterator<Item = Rule>,
    {
        let field = field.into();
        let position = match self.fields.iter().position(|f| f.field == field) {
            Some(position) => position,
            None => {
                self.fields.push(FieldRules::for_field(field));
                self.fields.len() - 1
            }
        };

        self.fields[position].rules.extend(rules);
        self
    }

    pub fn with_field_rules(self, rules: FieldRules) -> Self {
        let FieldRules { field, rules } = rules;
        self.field(field, rules)
    }

    pub fn get(&self, field: &str) -> Option<&FieldRules> {
        self.fields.iter().find(|f| f.field == field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.field.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldRules> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate one field. Undeclared fields have no rules and pass.
    pub fn execute(
        &self,
        field: &str,
        value: Option<&Value>,
        group: Option<&str>,
        mode: ExecutionMode,
    ) -> ValidationResult {
        match self.get(field) {
            Some(rules) => rules.execute(value, group, mode),
            None => ValidationResult::Valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn non_empty() -> Rule {
        Rule::new("required", "{1} is required", |v| {
            v.and_then(Value::as_str).is_some_and(|s| !s.is_empty())
        })
    }

    #[test]
    fn test_group_scoping() {
        let ungrouped = non_empty();
        let grouped = non_empty().in_group("create");

        assert!(ungrouped.applies_to(None));
        assert!(ungrouped.applies_to(Some("update")));
        assert!(grouped.applies_to(Some("create")));
        assert!(!grouped.applies_to(Some("update")));
        assert!(!grouped.applies_to(None));
    }

    #[test]
    fn test_evaluate_returns_raw_template() {
        let rule = non_empty();
        assert_eq!(rule.evaluate(Some(&json!(""))), Some("{1} is required"));
        assert_eq!(rule.evaluate(Some(&json!("x"))), None);
    }

    #[test]
    fn test_check_renders_field_and_params() {
        let rule = Rule::new("fixedLength", "{1} needs {2} chars", |_| false).with_params([13]);
        let error = rule.check("isbn", Some(&json!("12"))).unwrap();

        assert_eq!(error.message, "isbn needs 13 chars");
        assert_eq!(error.constraint, "fixedLength");
        assert_eq!(error.value.as_deref(), Some("\"12\""));
    }

    #[test]
    fn test_optional_skips_absent_and_null() {
        let rule = non_empty().optional();
        assert!(rule.evaluate(None).is_none());
        assert!(rule.evaluate(Some(&Value::Null)).is_none());
        assert!(rule.evaluate(Some(&json!(""))).is_some());
    }

    #[test]
    fn test_execute_collects_all_in_order() {
        let rules = FieldRules::for_field("title")
            .add(Rule::new("first", "first", |_| false))
            .add(Rule::new("second", "second", |_| true))
            .add(Rule::new("third", "third", |_| false));

        let result = rules.execute(Some(&json!("x")), None, ExecutionMode::CollectAll);
        assert_eq!(result.messages(), vec!["first", "third"]);

        let result = rules.execute(Some(&json!("x")), None, ExecutionMode::FirstFailure);
        assert_eq!(result.messages(), vec!["first"]);
    }

    #[test]
    fn test_execute_filters_by_group() {
        let rules = FieldRules::for_field("categoryName").add(non_empty().in_group("create"));

        let created = rules.execute(Some(&json!("")), Some("create"), ExecutionMode::CollectAll);
        let updated = rules.execute(Some(&json!("")), Some("update"), ExecutionMode::CollectAll);

        assert_eq!(created.messages(), vec!["categoryName is required"]);
        assert!(updated.is_valid());
    }

    #[test]
    fn test_rule_set_preserves_declaration_order() {
        let set = FieldRuleSet::new()
            .field("title", [non_empty()])
            .field("isbn", Vec::<Rule>::new())
            .field("title", [non_empty().in_group("create")]);

        assert_eq!(set.field_names().collect::<Vec<_>>(), vec!["title", "isbn"]);
        assert_eq!(set.get("title").map(|f| f.rules().len()), Some(2));
        assert!(set
            .execute("unknown", None, None, ExecutionMode::CollectAll)
            .is_valid());
    }

    #[test]
    fn test_execution_mode_parse() {
        assert_eq!("first-failure".parse::<ExecutionMode>(), Ok(ExecutionMode::FirstFailure));
        assert_eq!("COLLECT_ALL".parse::<ExecutionMode>(), Ok(ExecutionMode::CollectAll));
        assert!("random".parse::<ExecutionMode>().is_err());
    }
}
