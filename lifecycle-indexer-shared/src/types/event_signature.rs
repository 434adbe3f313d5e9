use alloy::primitives::B256;
use serde::{Deserialize, Serialize};

/// Hash of a canonical event signature, found in topic slot 0 of every log
/// the event emits.
pub type EventSignatureHash = B256;

/// One parameter of an event declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventParam {
    /// Canonical ABI type, e.g. `address` or `uint256`.
    pub ty: String,
    pub indexed: bool,
    pub name: Option<String>,
}

/// A parsed event declaration such as
/// `TaskAssigned(bytes32 indexed taskId, address indexed worker, uint256 reward)`.
///
/// The `source` keeps the text exactly as it was authored; it is what the
/// indexing service expects in a query's signature list. The canonical form
/// used for hashing drops `indexed` qualifiers and parameter names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventSignature {
    pub name: String,
    pub params: Vec<EventParam>,
    pub source: String,
}

impl EventSignature {
    /// Reassembles the signature as `Name(type1,type2,...)`.
    pub fn canonical(&self) -> String {
        let types: Vec<&str> = self.params.iter().map(|param| param.ty.as_str()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// Parameters carried in topic slots 1.., in declaration order.
    pub fn indexed_params(&self) -> impl Iterator<Item = &EventParam> {
        self.params.iter().filter(|param| param.indexed)
    }

    /// Parameters packed into the data blob, in declaration order.
    pub fn data_params(&self) -> impl Iterator<Item = &EventParam> {
        self.params.iter().filter(|param| !param.indexed)
    }

    pub fn indexed_count(&self) -> usize {
        self.indexed_params().count()
    }

    pub fn has_data(&self) -> bool {
        self.params.iter().any(|param| !param.indexed)
    }
}
