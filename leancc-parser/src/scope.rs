//! Lexical scope table.

use leancc_source::Position;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    Function,
}

/// Represents a symbol (created using a variable, parameter or function declaration).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Where the symbol was declared.
    pub position: Position,
}

/// Returned by [`ScopeTable::declare`] when the innermost scope already binds the name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{}` is already declared in this scope", .existing.name)]
pub struct DuplicateName {
    /// The earlier declaration.
    pub existing: Symbol,
}

#[derive(Debug, Default)]
struct Scope {
    symbols: HashMap<String, Symbol>,
}

/// A stack of lexical scopes.
///
/// The parent of scope `i` is scope `i - 1`; index `0` is the global scope, which is never popped.
/// Only the chain from the current scope to the global scope is ever alive.
#[derive(Debug)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTable {
    /// Creates a table holding only the (empty) global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    /// Enters an empty child of the current scope.
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
        log::trace!("enter scope {}", self.depth());
    }

    /// Leaves the current scope, releasing its symbols. The parent becomes current.
    pub fn pop_scope(&mut self) {
        debug_assert!(self.scopes.len() > 1, "cannot pop the global scope");
        if self.scopes.len() > 1 {
            log::trace!("exit scope {}", self.depth());
            self.scopes.pop();
        }
    }

    /// The current scope depth. `0` is global scope.
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Declares `name` in the current scope.
    ///
    /// # Errors
    /// If `name` is already declared in the current scope. Shadowing a name from an enclosing scope is allowed.
    pub fn declare(
        &mut self,
        name: &str,
        kind: SymbolKind,
        position: Position,
    ) -> Result<(), DuplicateName> {
        let depth = self.depth();
        let scope = self.current_mut();
        if let Some(existing) = scope.symbols.get(name) {
            return Err(DuplicateName {
                existing: existing.clone(),
            });
        }
        scope.symbols.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                kind,
                position,
            },
        );
        log::trace!("declare {:?} `{}` in scope {}", kind, name, depth);
        Ok(())
    }

    /// Looks `name` up from the current scope outwards. The innermost declaration wins.
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.symbols.get(name))
    }

    fn current_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }
}
