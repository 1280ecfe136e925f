use crate::graph::ParamKv;
use std::collections::BTreeMap;

/// Normalized parameter object of the wire format.
pub type ParameterMap = BTreeMap<String, String>;

/// Converts an ordered KV list into a parameter object.
///
/// Rows with an empty or whitespace-only key are dropped. When a key repeats,
/// the last row wins.
pub fn object_from_kv_list(params: &[ParamKv]) -> ParameterMap {
    params
        .iter()
        .filter(|p| !p.is_blank())
        .map(|p| (p.key.clone(), p.value.clone()))
        .collect()
}

/// Expands a parameter object back into a KV list (key order).
pub fn kv_list_from_object(params: &ParameterMap) -> Vec<ParamKv> {
    params
        .iter()
        .map(|(key, value)| ParamKv::new(key.as_str(), value.as_str()))
        .collect()
}
