//! A call-building session over one contract ABI.
//!
//! [`CallBuilder`] owns the schema, the selected function and one
//! [`ValueTree`] per input. Edits are addressed by paths whose first step
//! names the input (`order.items[0].amount`, or `arg1` for unnamed inputs).
//! Everything shown to a user is derived on demand through
//! [`CallBuilder::snapshot`].

use callform_abi::{ContractAbi, Dimension, FunctionAbi, ParamType, SchemaError};
use serde_json::{Map, Value as Json};
use tracing::debug;

use crate::assemble::{assemble, ArgValue, Assembly, NotReady};
use crate::encode::CallEncoder;
use crate::validate::Verdict;
use crate::value::{Issue, ItemId, Limits, NodePath, Raw, Step, TreeError, ValueNode, ValueTree};

#[derive(Debug, Clone)]
struct Selection {
    function: FunctionAbi,
    args: Vec<ValueTree>,
}

/// Everything derived from the current state of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Every argument is valid.
    pub ready: bool,
    /// Inputs that are not valid yet.
    pub pending: Vec<String>,
    pub issues: Vec<Issue>,
    /// Current values as a pretty-printed object keyed by input name.
    pub json: String,
    /// `0x`-prefixed calldata, or the encoder's message. `None` until ready.
    pub calldata: Option<Result<String, String>>,
}

#[derive(Debug, Clone)]
pub struct CallBuilder {
    abi: ContractAbi,
    limits: Limits,
    selected: Option<Selection>,
}

impl CallBuilder {
    pub fn new(abi: ContractAbi) -> Self {
        Self::with_limits(abi, Limits::default())
    }

    pub fn with_limits(abi: ContractAbi, limits: Limits) -> Self {
        Self {
            abi,
            limits,
            selected: None,
        }
    }

    pub fn abi(&self) -> &ContractAbi {
        &self.abi
    }

    pub fn function(&self) -> Option<&FunctionAbi> {
        self.selected.as_ref().map(|s| &s.function)
    }

    /// Argument trees in declared input order.
    pub fn args(&self) -> &[ValueTree] {
        self.selected
            .as_ref()
            .map(|s| s.args.as_slice())
            .unwrap_or_default()
    }

    pub fn arg(&self, name: &str) -> Option<&ValueTree> {
        let selection = self.selected.as_ref()?;
        let index = arg_index(&selection.function, &Step::Field(name.to_string()))?;
        selection.args.get(index)
    }

    /// Select a function and build fresh, default-valued argument trees.
    pub fn select(&mut self, key: &str) -> Result<&FunctionAbi, SchemaError> {
        self.select_seeded(key, None)
    }

    /// Select a function and seed its arguments from a JSON object keyed by
    /// input name or a positional array.
    pub fn select_with_seed(&mut self, key: &str, seed: &Json) -> Result<&FunctionAbi, SchemaError> {
        self.select_seeded(key, Some(seed))
    }

    fn select_seeded(&mut self, key: &str, seed: Option<&Json>) -> Result<&FunctionAbi, SchemaError> {
        let function = self.abi.find(key)?.clone();
        debug!(signature = %function.canonical_signature(), seeded = seed.is_some(), "select function");

        let names = function.input_names();
        let args = function
            .param_types()
            .iter()
            .zip(&names)
            .enumerate()
            .map(|(i, (ty, name))| {
                let arg_seed = seed.and_then(|seed| match seed {
                    Json::Object(map) => map.get(name),
                    Json::Array(items) => items.get(i),
                    _ => None,
                });
                let mut tree = ValueTree::build(ty, arg_seed, self.limits);
                tree.validate_all();
                tree
            })
            .collect();

        let selection = self.selected.insert(Selection { function, args });
        Ok(&selection.function)
    }

    /// Drop the selection and every argument tree.
    pub fn clear(&mut self) {
        if let Some(selection) = self.selected.take() {
            debug!(function = %selection.function.name, "clear selection");
        }
    }

    fn route(&mut self, path: &NodePath) -> Result<(&mut ValueTree, NodePath), TreeError> {
        let selection = self.selected.as_mut().ok_or(TreeError::NoFunctionSelected)?;
        let (first, rest) = path
            .split_first()
            .ok_or_else(|| TreeError::InvalidPath(path.to_string()))?;
        let tree = arg_index(&selection.function, first)
            .and_then(|i| selection.args.get_mut(i))
            .ok_or_else(|| TreeError::UnknownArgument(first.to_string()))?;
        Ok((tree, rest))
    }

    pub fn get(&self, path: &NodePath) -> Option<&ValueNode> {
        let selection = self.selected.as_ref()?;
        let (first, rest) = path.split_first()?;
        let tree = selection.args.get(arg_index(&selection.function, first)?)?;
        tree.get(&rest)
    }

    pub fn set_leaf(&mut self, path: &NodePath, raw: impl Into<Raw>) -> Result<Verdict, TreeError> {
        let (tree, rest) = self.route(path)?;
        tree.set_leaf(&rest, raw)
    }

    pub fn report_validity(&mut self, path: &NodePath, valid: bool) -> Result<(), TreeError> {
        let (tree, rest) = self.route(path)?;
        tree.report_validity(&rest, valid)
    }

    /// Append a default item; the new item is evaluated immediately.
    pub fn add_item(&mut self, path: &NodePath) -> Result<Option<ItemId>, TreeError> {
        let (tree, rest) = self.route(path)?;
        let id = tree.add_item(&rest)?;
        if let Some(id) = id {
            tree.validate_at(&rest.clone().item(id))?;
        }
        Ok(id)
    }

    pub fn remove_item(&mut self, path: &NodePath, id: ItemId) -> Result<bool, TreeError> {
        let (tree, rest) = self.route(path)?;
        tree.remove_item(&rest, id)
    }

    pub fn resize(&mut self, path: &NodePath, dimension: Dimension) -> Result<(), TreeError> {
        let (tree, rest) = self.route(path)?;
        tree.resize(&rest, dimension)?;
        tree.validate_at(&rest)
    }

    pub fn retype(&mut self, path: &NodePath, ty: &ParamType) -> Result<(), TreeError> {
        let (tree, rest) = self.route(path)?;
        tree.retype(&rest, ty)?;
        tree.validate_at(&rest)
    }

    /// Input hint for the leaf at `path`.
    pub fn placeholder(&self, path: &NodePath) -> Option<String> {
        self.get(path)?.as_scalar().map(|leaf| leaf.placeholder())
    }

    pub fn is_ready(&self) -> bool {
        self.selected
            .as_ref()
            .is_some_and(|s| s.args.iter().all(ValueTree::is_ready))
    }

    /// Issues of every argument, with paths starting at the input name.
    pub fn issues(&self) -> Vec<Issue> {
        let Some(selection) = &self.selected else {
            return Vec::new();
        };
        selection
            .function
            .input_names()
            .into_iter()
            .zip(&selection.args)
            .flat_map(|(name, tree)| {
                tree.issues().into_iter().map(move |issue| Issue {
                    path: prefixed(&name, &issue.path),
                    message: issue.message,
                })
            })
            .collect()
    }

    /// Assemble the arguments. `None` when no function is selected.
    pub fn assemble(&self) -> Option<Result<Assembly, NotReady>> {
        let selection = self.selected.as_ref()?;
        Some(assemble(&selection.function, &selection.args))
    }

    /// Current values keyed by input name, ready or not.
    pub fn values_json(&self) -> Map<String, Json> {
        let Some(selection) = &self.selected else {
            return Map::new();
        };
        selection
            .function
            .input_names()
            .into_iter()
            .zip(&selection.args)
            .map(|(name, tree)| (name, ArgValue::from_node(tree.root()).to_json()))
            .collect()
    }

    /// Derive the user-facing state. The encoder is consulted only when every
    /// argument is ready.
    pub fn snapshot<E: CallEncoder + ?Sized>(&self, encoder: &E) -> Snapshot {
        let json = serde_json::to_string_pretty(&self.values_json()).unwrap_or_default();
        let issues = self.issues();

        let Some(selection) = &self.selected else {
            return Snapshot {
                ready: false,
                pending: Vec::new(),
                issues,
                json,
                calldata: None,
            };
        };

        match assemble(&selection.function, &selection.args) {
            Ok(assembly) => {
                let calldata = encoder
                    .encode(
                        &self.abi,
                        &selection.function.canonical_signature(),
                        &assembly.ordered,
                    )
                    .map(|bytes| format!("0x{}", hex::encode(bytes)))
                    .map_err(|err| err.to_string());
                Snapshot {
                    ready: true,
                    pending: Vec::new(),
                    issues,
                    json: assembly.json_pretty(),
                    calldata: Some(calldata),
                }
            }
            Err(NotReady { pending }) => Snapshot {
                ready: false,
                pending,
                issues,
                json,
                calldata: None,
            },
        }
    }
}

/// Position of the input named by a path's first step: its display name,
/// or a bare index.
fn arg_index(function: &FunctionAbi, step: &Step) -> Option<usize> {
    match step {
        Step::Field(name) => function.input_names().iter().position(|n| n == name),
        Step::Index(i) => (*i < function.inputs.len()).then_some(*i),
        Step::Item(_) => None,
    }
}

fn prefixed(name: &str, path: &NodePath) -> NodePath {
    let mut steps = vec![Step::Field(name.to_string())];
    steps.extend(path.steps().iter().cloned());
    NodePath::from(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::AlloyEncoder;
    use serde_json::json;

    const ABI: &str = r#"[
        {"type":"function","name":"transfer","stateMutability":"nonpayable",
         "inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],
         "outputs":[{"name":"","type":"bool"}]}
    ]"#;

    fn builder() -> CallBuilder {
        CallBuilder::new(ContractAbi::from_json(ABI).expect("abi"))
    }

    fn path(s: &str) -> NodePath {
        s.parse().expect("path")
    }

    #[test]
    fn edits_need_a_selection() {
        let mut builder = builder();
        let err = builder.set_leaf(&path("to"), "0x").expect_err("nothing selected");
        assert_eq!(err, TreeError::NoFunctionSelected);
        assert!(builder.snapshot(&AlloyEncoder).calldata.is_none());
    }

    #[test]
    fn unknown_argument_is_reported() {
        let mut builder = builder();
        builder.select("transfer").expect("select");
        let err = builder.set_leaf(&path("from"), "0x").expect_err("no such input");
        assert_eq!(err, TreeError::UnknownArgument("from".to_string()));
    }

    #[test]
    fn snapshot_encodes_once_ready() {
        let mut builder = builder();
        builder.select("transfer").expect("select");
        let snap = builder.snapshot(&AlloyEncoder);
        assert!(!snap.ready);
        assert_eq!(snap.pending, vec!["to", "amount"]);

        builder
            .set_leaf(&path("to"), format!("0x{}", "11".repeat(20)))
            .expect("set to");
        builder.set_leaf(&path("amount"), "1").expect("set amount");
        let snap = builder.snapshot(&AlloyEncoder);
        assert!(snap.ready);
        let calldata = snap.calldata.clone().expect("ready").expect("encodes");
        assert!(calldata.starts_with("0xa9059cbb"));
        assert_eq!(calldata.len(), 2 + 2 * (4 + 64));
        assert_eq!(snap, builder.snapshot(&AlloyEncoder), "derivation is pure");
    }

    #[test]
    fn seed_fills_arguments_by_name() {
        let mut builder = builder();
        builder
            .select_with_seed("transfer", &json!({"amount": "5"}))
            .expect("select");
        assert!(builder.arg("amount").expect("amount").is_ready());
        assert!(!builder.arg("to").expect("to").is_ready());
        assert_eq!(builder.placeholder(&path("to")).as_deref(), Some("0x..."));

        builder.clear();
        assert!(builder.function().is_none());
        assert!(builder.args().is_empty());
    }
}
