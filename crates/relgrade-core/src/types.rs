use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseDependencyError;

/// Compact dependency notation: `A, B -> C` (the arrow may also be `→`).
static RE_DEPENDENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<lhs>[^>→]*?)\s*(?:->|→)\s*(?P<rhs>.*)$").unwrap());

static RE_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+$").unwrap());

// ---------------------------------------------------------------------------
// Attribute
// ---------------------------------------------------------------------------

/// An opaque attribute name.
///
/// Equality is exact. Ordering follows a simple collation: names are compared
/// case-insensitively first and the exact spelling only breaks ties, so
/// `a < B < b < c`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attribute(String);

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for Attribute {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(other.0.chars().flat_map(char::to_lowercase))
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Attribute {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Attribute {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Attribute {
    fn from(name: String) -> Self {
        Self(name)
    }
}

pub type AttributeSet = BTreeSet<Attribute>;

/// Build an attribute set from names.
pub fn attribute_set<I, S>(names: I) -> AttributeSet
where
    I: IntoIterator<Item = S>,
    S: Into<Attribute>,
{
    names.into_iter().map(Into::into).collect()
}

fn join_attributes(attributes: &AttributeSet) -> String {
    attributes
        .iter()
        .map(Attribute::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Functional dependency
// ---------------------------------------------------------------------------

/// `lhs -> rhs`. Immutable once built; reductions rebuild instead of mutating.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "DependencyRepr")]
pub struct FunctionalDependency {
    lhs: AttributeSet,
    rhs: AttributeSet,
}

pub type DependencySet = BTreeSet<FunctionalDependency>;

impl FunctionalDependency {
    pub fn new(lhs: AttributeSet, rhs: AttributeSet) -> Self {
        Self { lhs, rhs }
    }

    pub fn lhs(&self) -> &AttributeSet {
        &self.lhs
    }

    pub fn rhs(&self) -> &AttributeSet {
        &self.rhs
    }

    /// All attributes mentioned on either side.
    pub fn attributes(&self) -> AttributeSet {
        self.lhs.union(&self.rhs).cloned().collect()
    }

    /// `rhs ⊆ lhs`.
    pub fn is_trivial(&self) -> bool {
        self.rhs.is_subset(&self.lhs)
    }

    /// Exactly one attribute on the right-hand side.
    pub fn is_canonical(&self) -> bool {
        self.rhs.len() == 1
    }

    /// A copy of this dependency with `attribute` dropped from the left-hand side.
    pub fn without_lhs(&self, attribute: &Attribute) -> Self {
        let mut lhs = self.lhs.clone();
        lhs.remove(attribute);
        Self {
            lhs,
            rhs: self.rhs.clone(),
        }
    }

    /// Split into one dependency per right-hand attribute.
    pub fn unfold(&self) -> Vec<FunctionalDependency> {
        self.rhs
            .iter()
            .map(|a| Self {
                lhs: self.lhs.clone(),
                rhs: BTreeSet::from([a.clone()]),
            })
            .collect()
    }
}

impl fmt::Display for FunctionalDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            join_attributes(&self.lhs),
            join_attributes(&self.rhs)
        )
    }
}

impl FromStr for FunctionalDependency {
    type Err = ParseDependencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = RE_DEPENDENCY
            .captures(s.trim())
            .ok_or_else(|| ParseDependencyError::MissingArrow(s.to_string()))?;

        let side = |text: &str| -> Result<AttributeSet, ParseDependencyError> {
            text.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(|name| {
                    if RE_ATTRIBUTE.is_match(name) {
                        Ok(Attribute::from(name))
                    } else {
                        Err(ParseDependencyError::InvalidAttribute(name.to_string()))
                    }
                })
                .collect()
        };

        let lhs = side(&caps["lhs"])?;
        let rhs = side(&caps["rhs"])?;
        if rhs.is_empty() {
            return Err(ParseDependencyError::EmptyRightHandSide(s.to_string()));
        }

        Ok(Self { lhs, rhs })
    }
}

/// Accepted input shapes: `"A, B -> C"` or `{ "lhs": [...], "rhs": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum DependencyRepr {
    Compact(String),
    Sides { lhs: AttributeSet, rhs: AttributeSet },
}

impl TryFrom<DependencyRepr> for FunctionalDependency {
    type Error = ParseDependencyError;

    fn try_from(repr: DependencyRepr) -> Result<Self, Self::Error> {
        match repr {
            DependencyRepr::Compact(text) => text.parse(),
            DependencyRepr::Sides { lhs, rhs } => {
                let dependency = Self { lhs, rhs };
                if dependency.rhs.is_empty() {
                    return Err(ParseDependencyError::EmptyRightHandSide(
                        dependency.to_string().trim_end().to_string(),
                    ));
                }
                Ok(dependency)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// A candidate key. Ordered by attribute count, then attribute-wise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(AttributeSet);

impl Key {
    pub fn new(attributes: AttributeSet) -> Self {
        Self(attributes)
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.0
    }

    pub fn into_attributes(self) -> AttributeSet {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.iter().cmp(other.0.iter()))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", join_attributes(&self.0))
    }
}

impl From<AttributeSet> for Key {
    fn from(attributes: AttributeSet) -> Self {
        Self(attributes)
    }
}

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub attributes: AttributeSet,
    #[serde(default)]
    pub functional_dependencies: DependencySet,
    #[serde(default)]
    pub minimal_keys: BTreeSet<Key>,
}

impl Relation {
    pub fn new(attributes: AttributeSet, functional_dependencies: DependencySet) -> Self {
        Self {
            attributes,
            functional_dependencies,
            minimal_keys: BTreeSet::new(),
        }
    }

    /// Every attribute mentioned by the relation's dependencies and keys.
    pub fn referenced_attributes(&self) -> AttributeSet {
        self.functional_dependencies
            .iter()
            .flat_map(FunctionalDependency::attributes)
            .chain(self.minimal_keys.iter().flat_map(|k| k.0.iter().cloned()))
            .collect()
    }
}

/// A relation fragment with the name a submission gave it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiedRelation {
    pub id: String,
    #[serde(flatten)]
    pub relation: Relation,
}

impl IdentifiedRelation {
    pub fn new(id: impl Into<String>, relation: Relation) -> Self {
        Self {
            id: id.into(),
            relation,
        }
    }
}

// ---------------------------------------------------------------------------
// Normal form levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NormalformLevel {
    First,
    Second,
    Third,
    BoyceCodd,
}

impl fmt::Display for NormalformLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NormalformLevel::First => "1NF",
            NormalformLevel::Second => "2NF",
            NormalformLevel::Third => "3NF",
            NormalformLevel::BoyceCodd => "BCNF",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_order_is_case_insensitive_first() {
        let set = attribute_set(["c", "B", "a", "b"]);
        let names: Vec<_> = set.iter().map(Attribute::as_str).collect();
        assert_eq!(names, vec!["a", "B", "b", "c"]);
    }

    #[test]
    fn parses_compact_notation() {
        let fd: FunctionalDependency = " A ,B->C, D ".parse().unwrap();
        assert_eq!(fd.lhs(), &attribute_set(["A", "B"]));
        assert_eq!(fd.rhs(), &attribute_set(["C", "D"]));
        assert_eq!(fd.to_string(), "A, B -> C, D");
    }

    #[test]
    fn rejects_malformed_notation() {
        assert!(matches!(
            "A B C".parse::<FunctionalDependency>(),
            Err(ParseDependencyError::MissingArrow(_))
        ));
        assert!(matches!(
            "A ->".parse::<FunctionalDependency>(),
            Err(ParseDependencyError::EmptyRightHandSide(_))
        ));
        assert!(matches!(
            "A$ -> B".parse::<FunctionalDependency>(),
            Err(ParseDependencyError::InvalidAttribute(_))
        ));
    }

    #[test]
    fn rejects_empty_right_hand_side_in_object_form() {
        let err = serde_json::from_str::<FunctionalDependency>(r#"{"lhs":["A"],"rhs":[]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("empty right-hand side"));

        let fd: FunctionalDependency =
            serde_json::from_str(r#"{"lhs":[],"rhs":["A"]}"#).unwrap();
        assert!(fd.lhs().is_empty());
    }

    #[test]
    fn dependency_equality_ignores_input_order() {
        let a: FunctionalDependency = "B, A -> C".parse().unwrap();
        let b: FunctionalDependency = "A, B -> C".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unfold_splits_right_hand_side() {
        let fd: FunctionalDependency = "A -> B, C".parse().unwrap();
        let parts = fd.unfold();
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(FunctionalDependency::is_canonical));
    }

    #[test]
    fn trivial_dependency() {
        let fd: FunctionalDependency = "A, B -> A".parse().unwrap();
        assert!(fd.is_trivial());
        assert!(!fd.without_lhs(&"A".into()).is_trivial());
    }

    #[test]
    fn key_order_by_size_then_attributes() {
        let mut keys = BTreeSet::new();
        keys.insert(Key::new(attribute_set(["B", "C"])));
        keys.insert(Key::new(attribute_set(["D"])));
        keys.insert(Key::new(attribute_set(["A", "Z"])));
        let rendered: Vec<_> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["{D}", "{A, Z}", "{B, C}"]);
    }

    #[test]
    fn level_order() {
        assert!(NormalformLevel::First < NormalformLevel::Second);
        assert!(NormalformLevel::Third < NormalformLevel::BoyceCodd);
    }
}
