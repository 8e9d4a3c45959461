use serde_json::{Map, Value};

use super::store::VariableStore;
use crate::domain::{ParamValue, StepError, ToolCall};

/// Resolve a call's declared parameters into fully-literal arguments.
///
/// Pure: reads the store, never writes it. An unresolved reference here
/// means the coordinator violated ordering (the validator already rejected
/// dangling references), so the error names the variable for diagnosis.
pub(crate) fn resolve_parameters(
    call: &ToolCall,
    store: &VariableStore,
) -> Result<Map<String, Value>, StepError> {
    let mut arguments = Map::new();
    for (name, value) in &call.parameters {
        let literal = match value {
            ParamValue::Literal(inner) => inner.clone(),
            ParamValue::Reference(variable) => store
                .get(variable)
                .ok_or_else(|| StepError::UnresolvedVariable(variable.clone()))?,
        };
        arguments.insert(name.clone(), literal);
    }
    Ok(arguments)
}
