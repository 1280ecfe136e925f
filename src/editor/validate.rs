use crate::error::{ValidationIssue, ValidationReport};
use crate::graph::{GraphQuery, NodeKind, ParamKv};
use crate::metadata::{
    MetadataProvider, ParameterDefinition, ParameterType, SCHEDULED_TIME, visible_keys,
};
use ahash::AHashSet;
use itertools::Itertools;

fn lookup<'p>(params: &'p [ParamKv], key: &str) -> Option<&'p str> {
    params
        .iter()
        .find(|p| !p.is_blank() && p.key == key)
        .map(|p| p.value.trim())
}

/// Checks `params` against their schema, appending every problem to `report`.
///
/// When `visible` is given, schema entries outside it are not checked.
pub fn validate_parameters(
    owner: &str,
    params: &[ParamKv],
    definitions: &[ParameterDefinition],
    visible: Option<&AHashSet<String>>,
    report: &mut ValidationReport,
) {
    for definition in definitions {
        if visible.is_some_and(|keys| !keys.contains(&definition.name)) {
            continue;
        }

        let value = lookup(params, &definition.name).unwrap_or_default();
        if value.is_empty() {
            if definition.required {
                report.push(ValidationIssue::MissingRequired {
                    owner: owner.to_string(),
                    key: definition.name.clone(),
                });
            }
            continue;
        }

        if definition.param_type == ParameterType::Number
            && !value.parse::<f64>().is_ok_and(f64::is_finite)
        {
            report.push(ValidationIssue::NotANumber {
                owner: owner.to_string(),
                key: definition.name.clone(),
                value: value.to_string(),
            });
        }

        if let Some(options) = definition.options.as_ref().filter(|o| !o.is_empty()) {
            if !options.iter().any(|o| o == value) {
                report.push(ValidationIssue::NotAnOption {
                    owner: owner.to_string(),
                    key: definition.name.clone(),
                    value: value.to_string(),
                    allowed: options.iter().join(", "),
                });
            }
        }
    }
}

/// Validates the trigger and action parameters of every child of `rule_id`.
pub fn validate_rule<G, M>(graph: &G, rule_id: &str, metadata: &M) -> ValidationReport
where
    G: GraphQuery + ?Sized,
    M: MetadataProvider + ?Sized,
{
    let mut report = ValidationReport::default();

    for trigger in graph
        .neighbors(rule_id, NodeKind::Trigger)
        .into_iter()
        .filter_map(|n| n.as_trigger())
    {
        if let Some(definitions) = metadata.trigger_parameters(&trigger.trigger_type) {
            // Only the frequency cascade hides schema fields.
            let visible = (trigger.trigger_type == SCHEDULED_TIME)
                .then(|| visible_keys(&trigger.trigger_type, &trigger.parameters));
            validate_parameters(
                &format!("Trigger '{}'", trigger.trigger_type),
                &trigger.parameters,
                definitions,
                visible.as_ref(),
                &mut report,
            );
        }
    }

    for actions in graph
        .neighbors(rule_id, NodeKind::Actions)
        .into_iter()
        .filter_map(|n| n.as_actions())
    {
        for (index, action) in actions.actions.iter().enumerate() {
            if let Some(definitions) = metadata.action_parameters(&action.action_type) {
                validate_parameters(
                    &format!("Action #{} '{}'", index + 1, action.action_type),
                    &action.parameters,
                    definitions,
                    None,
                    &mut report,
                );
            }
        }
    }

    report
}
