use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::ast::{Block, Variable};
use crate::source::SourceLine;

/// Identity of a function: name plus parameter count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionSignature {
    name: Arc<str>,
    arity: usize,
}

impl FunctionSignature {
    pub fn new(name: impl Into<Arc<str>>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.arity)
    }
}

/// A function declared in Javamm source.
#[derive(Debug, Clone, PartialEq)]
pub struct DeveloperFunction {
    pub name: Arc<str>,
    pub parameters: Vec<Variable>,
    pub body: Block,
    /// Line holding the `function` keyword.
    pub source_line: SourceLine,
}

impl DeveloperFunction {
    pub fn signature(&self) -> FunctionSignature {
        FunctionSignature::new(self.name.clone(), self.parameters.len())
    }
}

/// Immutable result of a successful compilation.
///
/// A `Program` is `Send + Sync` and can be executed any number of times,
/// including from several threads at once.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    functions: FxHashMap<FunctionSignature, Arc<DeveloperFunction>>,
    entry: Arc<DeveloperFunction>,
}

impl Program {
    /// `entry` must be one of `functions`.
    pub(crate) fn new(
        functions: FxHashMap<FunctionSignature, Arc<DeveloperFunction>>,
        entry: Arc<DeveloperFunction>,
    ) -> Self {
        Self { functions, entry }
    }

    pub fn function(&self, signature: &FunctionSignature) -> Option<&Arc<DeveloperFunction>> {
        self.functions.get(signature)
    }

    /// Looks a function up without building a [`FunctionSignature`].
    pub(crate) fn resolve(&self, name: &Arc<str>, arity: usize) -> Option<&Arc<DeveloperFunction>> {
        self.functions.get(&FunctionSignature {
            name: name.clone(),
            arity,
        })
    }

    pub fn entry(&self) -> FunctionSignature {
        self.entry.signature()
    }

    /// `main(args)` if declared, `main()` otherwise.
    pub fn entry_function(&self) -> &Arc<DeveloperFunction> {
        &self.entry
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Signatures in a stable, sorted order.
    pub fn signatures(&self) -> Vec<&FunctionSignature> {
        let mut signatures = self.functions.keys().collect::<Vec<_>>();
        signatures.sort();
        signatures
    }
}
