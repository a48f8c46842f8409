use std::fmt;

use plc_core::Line;
use serde::Serialize;

/// Bucket count used when no other is configured. Prime, so the
/// `hash % buckets` reduction spreads djb2 values evenly.
pub const DEFAULT_BUCKETS: usize = 101;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolType {
    Boolean,
    Identifier,
    Function,
    Predicate,
    Unknown,
}

impl SymbolType {
    pub fn keyword(self) -> &'static str {
        match self {
            SymbolType::Boolean => "BOOLEAN",
            SymbolType::Identifier => "IDENTIFIER",
            SymbolType::Function => "FUNCTION",
            SymbolType::Predicate => "PREDICATE",
            SymbolType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.keyword())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SymbolEntry {
    pub name: String,
    pub symbol_type: SymbolType,
    pub defined: bool,
    pub used: bool,
    pub declared_line: Line,
    pub used_line: Option<Line>,
    /// Value of the last literal assignment, only tracked for booleans.
    pub value: Option<bool>,
}

impl SymbolEntry {
    fn new(name: &str, symbol_type: SymbolType, line: Line) -> Self {
        Self {
            name: name.to_string(),
            symbol_type,
            defined: false,
            used: false,
            declared_line: line,
            used_line: None,
            value: None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        self.used && !self.defined
    }

    pub fn is_unused(&self) -> bool {
        self.defined && !self.used
    }
}

/// djb2: `hash = hash * 33 + byte`, reduced modulo the bucket count.
pub fn hash_name(name: &str, buckets: usize) -> usize {
    let hash = name
        .bytes()
        .fold(5381u32, |hash, byte| hash.wrapping_mul(33).wrapping_add(u32::from(byte)));

    hash as usize % buckets
}

/// Name to symbol mapping, chained per hash bucket.
///
/// Iteration visits buckets in index order and each chain in insertion
/// order, so two tables built from the same sequence of calls always list
/// their entries identically.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    buckets: Vec<Vec<SymbolEntry>>,
    count: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    pub fn with_buckets(buckets: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); buckets.max(1)],
            count: 0,
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        self.buckets[self.bucket_of(name)]
            .iter()
            .find(|entry| entry.name == name)
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut SymbolEntry> {
        let bucket = self.bucket_of(name);
        self.buckets[bucket]
            .iter_mut()
            .find(|entry| entry.name == name)
    }

    /// Inserts `name` unless it is already present. An existing entry is
    /// returned untouched, whatever `symbol_type` and `line` say.
    pub fn insert(&mut self, name: &str, symbol_type: SymbolType, line: Line) -> &SymbolEntry {
        let bucket = self.bucket_of(name);
        let chain = &mut self.buckets[bucket];

        let index = match chain.iter().position(|entry| entry.name == name) {
            Some(index) => index,
            None => {
                tracing::trace!(name, %symbol_type, %line, bucket, "inserting symbol");
                chain.push(SymbolEntry::new(name, symbol_type, line));
                self.count += 1;
                chain.len() - 1
            }
        };

        &chain[index]
    }

    /// Marks `name` as used. Only the first use records its line.
    /// Returns `false` when the symbol is unknown.
    pub fn mark_used(&mut self, name: &str, line: Line) -> bool {
        let Some(entry) = self.lookup_mut(name) else {
            return false;
        };

        if !entry.used {
            entry.used = true;
            entry.used_line = Some(line);
        }
        true
    }

    /// Marks `name` as defined at `line`, storing `value` when the symbol is
    /// a boolean. Returns `false` when the symbol is unknown.
    pub fn set_value(&mut self, name: &str, value: Option<bool>, line: Line) -> bool {
        let Some(entry) = self.lookup_mut(name) else {
            return false;
        };

        entry.defined = true;
        entry.declared_line = line;
        if entry.symbol_type == SymbolType::Boolean {
            entry.value = value;
        }
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.buckets.iter().flatten()
    }

    /// Symbols that are used but never defined.
    pub fn undefined_count(&self) -> usize {
        self.iter().filter(|entry| entry.is_undefined()).count()
    }

    /// Symbols that are defined but never used.
    pub fn unused_count(&self) -> usize {
        self.iter().filter(|entry| entry.is_unused()).count()
    }

    fn bucket_of(&self, name: &str) -> usize {
        hash_name(name, self.buckets.len())
    }
}
