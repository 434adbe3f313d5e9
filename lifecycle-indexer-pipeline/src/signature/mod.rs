//! Event signature parsing, canonicalization and hashing.
//!
//! A signature is authored as `Name(type1 indexed p1, type2 p2, ...)`. The
//! canonical form keeps only the name and the comma-separated types, which
//! is what gets hashed into topic slot 0.
use std::collections::HashMap;

use alloy::primitives::keccak256;
use lazy_static::lazy_static;
use lifecycle_indexer_shared::types::{EventParam, EventSignature, EventSignatureHash};
use regex::Regex;

use crate::errors::FormatError;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();
    static ref PARAM_TYPE: Regex =
        Regex::new(r"^([a-z]+)([0-9]*)((?:\[[0-9]*\])*)$").unwrap();
}

const INDEXED: &str = "indexed";

/// Parses a human-authored event declaration.
///
/// A leading `event` keyword is accepted. The bare aliases `uint` and `int`
/// are expanded to `uint256` and `int256`.
pub fn parse_signature(source: &str) -> Result<EventSignature, FormatError> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return Err(FormatError::Empty);
    }
    let declaration = trimmed
        .strip_prefix("event ")
        .map(str::trim_start)
        .unwrap_or(trimmed);

    let open = declaration
        .find('(')
        .ok_or_else(|| FormatError::MissingOpenParen(source.to_string()))?;
    let body = declaration[open + 1..]
        .strip_suffix(')')
        .ok_or_else(|| FormatError::MissingCloseParen(source.to_string()))?;

    let name = declaration[..open].trim();
    if !IDENTIFIER.is_match(name) {
        return Err(FormatError::InvalidName(name.to_string()));
    }
    if body.contains('(') || body.contains(')') {
        return Err(FormatError::InvalidType(body.trim().to_string()));
    }

    let params = if body.trim().is_empty() {
        Vec::new()
    } else {
        body.split(',')
            .enumerate()
            .map(|(index, declaration)| parse_param(index, declaration))
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(EventSignature {
        name: name.to_string(),
        params,
        source: source.to_string(),
    })
}

fn parse_param(index: usize, declaration: &str) -> Result<EventParam, FormatError> {
    let tokens: Vec<&str> = declaration.split_whitespace().collect();
    let (ty, indexed, name) = match tokens.as_slice() {
        [] => return Err(FormatError::EmptyParameter { index }),
        [ty] => (*ty, false, None),
        [ty, qualifier] if *qualifier == INDEXED => (*ty, true, None),
        [ty, name] => (*ty, false, Some(*name)),
        [ty, qualifier, name] if *qualifier == INDEXED => (*ty, true, Some(*name)),
        _ => {
            return Err(FormatError::InvalidParameter(
                declaration.trim().to_string(),
            ))
        }
    };

    if let Some(name) = name {
        if !IDENTIFIER.is_match(name) {
            return Err(FormatError::InvalidParameter(
                declaration.trim().to_string(),
            ));
        }
    }

    Ok(EventParam {
        ty: canonical_type(ty)?,
        indexed,
        name: name.map(str::to_string),
    })
}

/// Validates an elementary ABI type (optionally an array of one) and
/// returns its canonical spelling.
pub fn canonical_type(ty: &str) -> Result<String, FormatError> {
    let invalid = || FormatError::InvalidType(ty.to_string());
    let captures = PARAM_TYPE.captures(ty).ok_or_else(invalid)?;
    let base = &captures[1];
    let size = &captures[2];
    let dimensions = &captures[3];

    let canonical_base = match (base, size) {
        ("address" | "bool" | "string" | "function", "") => base.to_string(),
        ("bytes", "") => base.to_string(),
        ("bytes", size) => match size.parse::<usize>() {
            Ok(n) if (1..=32).contains(&n) && !size.starts_with('0') => format!("bytes{n}"),
            _ => return Err(invalid()),
        },
        ("uint" | "int", "") => format!("{base}256"),
        ("uint" | "int", size) => match size.parse::<usize>() {
            Ok(n) if n % 8 == 0 && (8..=256).contains(&n) && !size.starts_with('0') => {
                format!("{base}{n}")
            }
            _ => return Err(invalid()),
        },
        _ => return Err(invalid()),
    };

    Ok(format!("{canonical_base}{dimensions}"))
}

/// Returns `Name(type1,type2,...)` for a human-authored declaration.
pub fn canonicalize(source: &str) -> Result<String, FormatError> {
    parse_signature(source).map(|signature| signature.canonical())
}

/// Keccak-256 of the canonical form of a parsed signature.
pub fn hash_signature(signature: &EventSignature) -> EventSignatureHash {
    keccak256(signature.canonical().as_bytes())
}

/// Parses and hashes a human-authored declaration.
///
/// Parameter names and `indexed` qualifiers do not affect the result.
pub fn signature_hash(source: &str) -> Result<EventSignatureHash, FormatError> {
    parse_signature(source).map(|signature| hash_signature(&signature))
}

/// Parsed signatures keyed by their hash.
///
/// Lets decoders go from the word in topic slot 0 back to the parameter
/// layout needed to read the rest of the log.
#[derive(Debug, Clone, Default)]
pub struct SignatureRegistry {
    signatures: HashMap<EventSignatureHash, EventSignature>,
}

impl SignatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and stores a signature, returning its hash. Registering a
    /// signature twice replaces the stored declaration.
    pub fn register(&mut self, source: &str) -> Result<EventSignatureHash, FormatError> {
        let signature = parse_signature(source)?;
        let hash = hash_signature(&signature);
        self.signatures.insert(hash, signature);
        Ok(hash)
    }

    pub fn get(&self, hash: &EventSignatureHash) -> Option<&EventSignature> {
        self.signatures.get(hash)
    }

    pub fn contains(&self, hash: &EventSignatureHash) -> bool {
        self.signatures.contains_key(hash)
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::b256;

    #[test]
    fn test_transfer_hash_matches_known_value() {
        let hash = signature_hash("Transfer(address indexed from, address indexed to, uint256 value)")
            .unwrap();
        assert_eq!(
            hash,
            b256!("0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef")
        );
    }

    #[test]
    fn test_hash_ignores_names_and_indexed_qualifiers() {
        let annotated = signature_hash("Transfer(address indexed from, address indexed to, uint256 value)");
        let bare = signature_hash("Transfer(address,address,uint256)");
        let partially_named = signature_hash("Transfer(address from, address, uint256 indexed)");

        assert_eq!(annotated, bare);
        assert_eq!(bare, partially_named);
    }

    #[test]
    fn test_canonicalize_strips_whitespace_names_and_qualifiers() {
        assert_eq!(
            canonicalize("  TaskAssigned( bytes32 indexed taskId ,address indexed worker, address requester, uint256 reward ) ").unwrap(),
            "TaskAssigned(bytes32,address,address,uint256)"
        );
    }

    #[test]
    fn test_uint_and_int_aliases_are_expanded() {
        assert_eq!(canonicalize("Set(uint a, int b, uint[] c)").unwrap(), "Set(uint256,int256,uint256[])");
        assert_eq!(signature_hash("Set(uint a)"), signature_hash("Set(uint256 a)"));
    }

    #[test]
    fn test_event_keyword_is_accepted() {
        assert_eq!(
            canonicalize("event Ping(address indexed sender)").unwrap(),
            "Ping(address)"
        );
    }

    #[test]
    fn test_parse_tracks_indexed_layout() {
        let signature =
            parse_signature("TaskResponded(bytes32 indexed taskId, address indexed worker, bool approved)")
                .unwrap();

        assert_eq!(signature.name, "TaskResponded");
        assert_eq!(signature.indexed_count(), 2);
        assert!(signature.has_data());
        assert_eq!(signature.params[2].name.as_deref(), Some("approved"));
        assert!(!signature.params[2].indexed);
    }

    #[test]
    fn test_parameterless_event() {
        let signature = parse_signature("Paused()").unwrap();
        assert!(signature.params.is_empty());
        assert_eq!(signature.canonical(), "Paused()");
    }

    #[test]
    fn test_malformed_signatures_are_rejected() {
        assert_eq!(parse_signature("   "), Err(FormatError::Empty));
        assert!(matches!(
            parse_signature("Transfer address from"),
            Err(FormatError::MissingOpenParen(_))
        ));
        assert!(matches!(
            parse_signature("Transfer(address from"),
            Err(FormatError::MissingCloseParen(_))
        ));
        assert!(matches!(
            parse_signature("1Transfer(address)"),
            Err(FormatError::InvalidName(_))
        ));
        assert_eq!(
            parse_signature("Transfer(address,,uint256)"),
            Err(FormatError::EmptyParameter { index: 1 })
        );
        assert!(matches!(
            parse_signature("Transfer(address indexed from extra)"),
            Err(FormatError::InvalidParameter(_))
        ));
        assert!(matches!(
            parse_signature("Transfer(uint7 value)"),
            Err(FormatError::InvalidType(_))
        ));
        assert!(matches!(
            parse_signature("Transfer(bytes33 value)"),
            Err(FormatError::InvalidType(_))
        ));
        assert!(matches!(
            parse_signature("Transfer((address,uint256) pair)"),
            Err(FormatError::InvalidType(_))
        ));
    }

    #[test]
    fn test_registry_resolves_hash_to_declaration() {
        let mut registry = SignatureRegistry::new();
        let hash = registry
            .register("TaskResponded(bytes32 indexed taskId, address indexed worker, bool approved)")
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&hash));
        assert_eq!(registry.get(&hash).map(|s| s.name.as_str()), Some("TaskResponded"));
        assert!(registry.register("Broken(").is_err());
        assert_eq!(registry.len(), 1);
    }
}
