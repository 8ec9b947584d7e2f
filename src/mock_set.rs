use crate::error::{DispatchError, VariablesMismatch};
use crate::identity::MockId;
use crate::mounted_mock::MountedMock;
use crate::variables::{diff, Variables};
use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;

/// The mocks mounted on a [`QueryMock`], grouped by operation name.
///
/// Within an operation, mocks are kept in the order they were mounted.
///
/// [`QueryMock`]: crate::QueryMock
#[derive(Debug, Default)]
pub(crate) struct MockSet {
    queues: BTreeMap<String, Vec<MountedMock>>,
}

impl MockSet {
    pub(crate) fn new() -> MockSet {
        MockSet::default()
    }

    pub(crate) fn register(&mut self, mock: MountedMock) {
        let queue = self
            .queues
            .entry(mock.specification.name.clone())
            .or_default();
        if queue.iter().any(|mounted| mounted.id == mock.id) {
            debug!(
                "A mock with id {} is already mounted, the newest one will only be used once the oldest is gone.",
                mock.id
            );
        }
        queue.push(mock);
    }

    pub(crate) fn reset(&mut self) {
        self.queues.clear();
    }

    pub(crate) fn ids(&self, operation_name: &str) -> Vec<MockId> {
        self.queues
            .get(operation_name)
            .map(|queue| queue.iter().map(|mock| mock.id.clone()).collect())
            .unwrap_or_default()
    }

    /// Pick the mock that should answer an operation called `operation_name` executed
    /// with `variables`.
    ///
    /// Candidates are tried in this order:
    /// 1. mocks with a custom predicate, in mounting order, if the predicate accepts
    ///    the variables;
    /// 2. mocks matching on variables, in mounting order, if the variables are equal;
    /// 3. mocks that do not match on variables, **latest mounted first**.
    ///
    /// A non-persistent mock is removed from the set before being returned.
    pub(crate) fn select(
        &mut self,
        operation_name: &str,
        variables: &Variables,
    ) -> Result<MountedMock, DispatchError> {
        let Some(queue) = self
            .queues
            .get_mut(operation_name)
            .filter(|queue| !queue.is_empty())
        else {
            return Err(self.no_mock_registered(operation_name, variables));
        };

        let position = queue
            .iter()
            .position(|mock| mock.specification.predicate_accepts(variables))
            .or_else(|| {
                queue
                    .iter()
                    .position(|mock| mock.is_structural() && mock.variables_match(variables))
            })
            .or_else(|| queue.iter().rposition(MountedMock::is_catch_all));

        let Some(position) = position else {
            return Err(variables_mismatch(operation_name, queue, variables).into());
        };

        if queue[position].specification.persist {
            debug!("Matched mock {} for operation {}.", queue[position].id, operation_name);
            return Ok(queue[position].clone());
        }

        let mock = queue.remove(position);
        debug!(
            "Matched mock {} for operation {}, it is not persistent: removing it.",
            mock.id, operation_name
        );
        if queue.is_empty() {
            self.queues.remove(operation_name);
        }
        Ok(mock)
    }

    fn no_mock_registered(&self, operation_name: &str, variables: &Variables) -> DispatchError {
        let request_variables = Value::Object(variables.clone());
        let mut message = format!(
            "Could not find matching mock for operation \"{}\" with variables: {}\n\
             Make sure you have mocked the query you are making.\n\n",
            operation_name, request_variables
        );

        let mocked: Vec<_> = self
            .queues
            .iter()
            .filter(|(name, queue)| name.as_str() != operation_name && !queue.is_empty())
            .collect();
        if mocked.is_empty() {
            message.push_str("=== No query was mocked ===\n\n");
        } else {
            message.push_str("=== All mocked queries ===\n");
            for (name, queue) in mocked {
                message.push_str(&format!("- \"{}\"\n", name));
                for mock in queue {
                    let mocked_variables = Value::Object(mock.specification.variables.clone());
                    message.push_str(&format!(
                        "  Query \"variables\": {}\n  Diff of \"variables\":\n{}\n",
                        mocked_variables,
                        indent(&diff(&mocked_variables, &request_variables), "    ")
                    ));
                }
            }
            message.push('\n');
        }

        DispatchError::NoMockRegistered {
            operation_name: operation_name.to_owned(),
            message,
        }
    }
}

fn variables_mismatch(
    operation_name: &str,
    candidates: &[MountedMock],
    variables: &Variables,
) -> VariablesMismatch {
    let diffs: Vec<String> = candidates
        .iter()
        .filter(|mock| mock.is_structural())
        .map(|mock| {
            diff(
                &Value::Object(mock.filtered(variables)),
                &Value::Object(mock.expected_variables()),
            )
        })
        .collect();

    if diffs.is_empty() {
        // Only custom predicates were given a chance, and they all said no.
        VariablesMismatch::CustomPredicateRejected {
            operation_name: operation_name.to_owned(),
        }
    } else {
        VariablesMismatch::StructuralMismatch {
            operation_name: operation_name.to_owned(),
            diff: diffs.join("\n\n"),
        }
    }
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}
