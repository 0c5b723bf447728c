//! Contract schema model
//!
//! Read-only view over a standard JSON ABI. Only `function` entries are kept;
//! events, errors, constructors and fallbacks are skipped.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::kind::ParamType;
use crate::SchemaError;

/// A function input or tuple field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Component {
    /// Declared name. An empty name in the JSON is treated as absent.
    #[serde(
        default,
        deserialize_with = "non_empty_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: String,
    /// Present only for `tuple` and tuple array types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<Component>>,
}

impl Component {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            name: (!name.is_empty()).then_some(name),
            ty: ty.into(),
            components: None,
        }
    }

    /// A tuple (or tuple array) component with its fields.
    pub fn tuple(
        name: impl Into<String>,
        ty: impl Into<String>,
        components: Vec<Component>,
    ) -> Self {
        Self {
            components: Some(components),
            ..Self::new(name, ty)
        }
    }

    pub fn components(&self) -> &[Component] {
        self.components.as_deref().unwrap_or(&[])
    }

    pub fn param_type(&self) -> ParamType {
        ParamType::resolve(&self.ty, self.components())
    }
}

/// Key for each component, unique within the list.
///
/// Unnamed components get `<prefix><i>`. A placeholder never shadows a
/// declared name, and a repeated name gets a `_<n>` suffix, so every
/// position keeps its own key.
pub fn unique_names(components: &[Component], prefix: &str) -> Vec<String> {
    let declared: HashSet<&str> = components
        .iter()
        .filter_map(|c| c.name.as_deref())
        .collect();
    let mut taken: HashSet<String> = HashSet::new();

    components
        .iter()
        .enumerate()
        .map(|(index, component)| {
            let base = component
                .name
                .clone()
                .unwrap_or_else(|| format!("{prefix}{index}"));
            let placeholder = component.name.is_none();
            let mut name = base.clone();
            let mut suffix = 1;
            while taken.contains(&name) || (placeholder && declared.contains(name.as_str())) {
                name = format!("{base}_{suffix}");
                suffix += 1;
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}

fn non_empty_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.filter(|n| !n.trim().is_empty()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    #[default]
    NonPayable,
    Payable,
}

impl StateMutability {
    /// Whether calling the function changes state.
    pub fn is_write(self) -> bool {
        matches!(self, StateMutability::NonPayable | StateMutability::Payable)
    }
}

/// A callable function of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionAbi {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Component>,
    #[serde(default)]
    pub outputs: Vec<Component>,
    #[serde(default)]
    pub state_mutability: StateMutability,
}

impl FunctionAbi {
    pub fn new(name: impl Into<String>, inputs: Vec<Component>) -> Self {
        Self {
            name: name.into(),
            inputs,
            outputs: Vec::new(),
            state_mutability: StateMutability::default(),
        }
    }

    /// Name of the input at `index`: `arg<i>` when unnamed.
    pub fn input_name(&self, index: usize) -> String {
        self.input_names()
            .into_iter()
            .nth(index)
            .unwrap_or_else(|| format!("arg{index}"))
    }

    /// Display names of all inputs, in declared order and pairwise distinct.
    pub fn input_names(&self) -> Vec<String> {
        unique_names(&self.inputs, "arg")
    }

    /// Resolved types of all inputs, in declared order.
    pub fn param_types(&self) -> Vec<ParamType> {
        self.inputs.iter().map(Component::param_type).collect()
    }

    /// `name(type arg, ...)`, the label used to pick a function.
    pub fn display_signature(&self) -> String {
        let params: Vec<String> = self
            .inputs
            .iter()
            .zip(self.input_names())
            .map(|(input, name)| format!("{} {}", input.ty, name))
            .collect();
        format!("{}({})", self.name, params.join(", "))
    }

    /// `name(uint256,(address,bool)[])`, the string hashed into the selector.
    pub fn canonical_signature(&self) -> String {
        let params: Vec<String> = self.param_types().iter().map(ParamType::canonical).collect();
        format!("{}({})", self.name, params.join(","))
    }

    pub fn is_write(&self) -> bool {
        self.state_mutability.is_write()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AbiEntry {
    #[serde(rename = "type", default = "function_entry")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<Component>,
    #[serde(default)]
    outputs: Vec<Component>,
    #[serde(default)]
    state_mutability: Option<StateMutability>,
}

fn function_entry() -> String {
    "function".to_string()
}

/// The functions of one contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAbi {
    pub functions: Vec<FunctionAbi>,
}

impl ContractAbi {
    pub fn new(functions: Vec<FunctionAbi>) -> Self {
        Self { functions }
    }

    /// Load a JSON ABI.
    ///
    /// Accepts either the bare entry array or a build artifact object that
    /// carries it under an `abi` key.
    pub fn from_json(src: &str) -> Result<Self, SchemaError> {
        let doc: serde_json::Value = serde_json::from_str(src)?;
        let entries = match doc {
            serde_json::Value::Array(items) => serde_json::Value::Array(items),
            serde_json::Value::Object(mut obj) => obj.remove("abi").ok_or(SchemaError::MissingAbi)?,
            _ => return Err(SchemaError::MissingAbi),
        };
        let entries: Vec<AbiEntry> = serde_json::from_value(entries)?;

        let functions = entries
            .into_iter()
            .filter(|entry| entry.kind == "function")
            .map(|entry| FunctionAbi {
                name: entry.name,
                inputs: entry.inputs,
                outputs: entry.outputs,
                state_mutability: entry.state_mutability.unwrap_or_default(),
            })
            .collect();

        Ok(Self { functions })
    }

    pub fn functions(&self) -> &[FunctionAbi] {
        &self.functions
    }

    /// Functions that change state.
    pub fn write_functions(&self) -> impl Iterator<Item = &FunctionAbi> {
        self.functions.iter().filter(|f| f.is_write())
    }

    /// Look up a function by display signature, canonical signature or,
    /// when unambiguous, bare name.
    pub fn find(&self, key: &str) -> Result<&FunctionAbi, SchemaError> {
        let key = key.trim();
        if let Some(func) = self.find_by_signature(key) {
            return Ok(func);
        }

        let mut matches = self.functions.iter().filter(|f| f.name == key);
        let first = matches
            .next()
            .ok_or_else(|| SchemaError::UnknownFunction(key.to_string()))?;
        let extra = matches.count();
        if extra > 0 {
            return Err(SchemaError::AmbiguousFunction {
                name: key.to_string(),
                count: extra + 1,
            });
        }
        Ok(first)
    }

    pub fn find_by_signature(&self, signature: &str) -> Option<&FunctionAbi> {
        self.functions
            .iter()
            .find(|f| f.display_signature() == signature || f.canonical_signature() == signature)
    }

    /// All functions sharing a name (overloads).
    pub fn overloads<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FunctionAbi> + 'a {
        self.functions.iter().filter(move |f| f.name == name)
    }
}
