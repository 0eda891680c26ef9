use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One user/assistant turn in the shape the prompt flow chat endpoint expects as history.
///
/// Example (field names are configurable):
/// {
///   "inputs":  { "query": "What is covered?" },
///   "outputs": { "reply": "The plan covers ..." }
/// }
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowPair {
    pub inputs: Map<String, Value>,
    pub outputs: Map<String, Value>,
}

impl FlowPair {
    /// Open a pair for a user turn; the output field starts as an empty string.
    pub fn open(request_field: &str, response_field: &str, question: Value) -> Self {
        let mut inputs = Map::new();
        inputs.insert(request_field.to_string(), question);
        let mut outputs = Map::new();
        outputs.insert(response_field.to_string(), Value::String(String::new()));
        Self { inputs, outputs }
    }
}
