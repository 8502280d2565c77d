//! Dispatch resolver (SPEC_FULL.md §4.H): resolves an interface-method
//! call to its set of implementations. Grounded on the distilled
//! original's `GetMethodImplementations` (`ssaUtils/Packages.go`), which
//! memoises per receiver interface in a `typesCache` map — we do the same,
//! keyed on `(InterfaceId, method name)`.
//!
//! The front-end contract (`Program::implementations`) already promises
//! synthetic implementations dropped and the result sorted ascending by
//! declaration position, so this resolver is purely a caching layer atop
//! it.

use std::collections::HashMap;

use crate::racex_debug;
use crate::ssa::{FunctionId, InterfaceId, Program};

#[derive(Debug, Clone, Default)]
pub struct DispatchResolver {
    cache: HashMap<(InterfaceId, String), Vec<FunctionId>>,
}

impl DispatchResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(
        &mut self,
        program: &dyn Program,
        interface: InterfaceId,
        method: &str,
    ) -> Vec<FunctionId> {
        let key = (interface, method.to_string());
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }
        let implementations = program.implementations(interface, method);
        racex_debug!(
            "resolved {} implementations for {:?}::{}",
            implementations.len(),
            interface,
            method
        );
        self.cache.insert(key, implementations.clone());
        implementations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssa::{FunctionData, InMemoryProgram, Pos};
    use std::collections::HashMap as StdHashMap;

    fn program_with_two_impls() -> InMemoryProgram {
        let mut program = InMemoryProgram::new();
        let stub = FunctionData {
            name: "stub".to_string(),
            entry: crate::ssa::BlockId(0),
            blocks: StdHashMap::new(),
        };
        program.add_function(FunctionId(1), stub.clone());
        program.add_function(FunctionId(2), stub);
        program.add_implementation(InterfaceId(0), "m", Pos(20), FunctionId(2));
        program.add_implementation(InterfaceId(0), "m", Pos(10), FunctionId(1));
        program
    }

    #[test]
    fn resolve_sorts_by_declaration_position() {
        let program = program_with_two_impls();
        let mut resolver = DispatchResolver::new();
        let impls = resolver.resolve(&program, InterfaceId(0), "m");
        assert_eq!(impls, vec![FunctionId(1), FunctionId(2)]);
    }

    #[test]
    fn resolve_is_cached() {
        let program = program_with_two_impls();
        let mut resolver = DispatchResolver::new();
        let first = resolver.resolve(&program, InterfaceId(0), "m");
        let second = resolver.resolve(&program, InterfaceId(0), "m");
        assert_eq!(first, second);
    }
}
