//! The SSA front-end interface.
//!
//! Per SPEC_FULL.md §4.K this is the out-of-scope collaborator: package
//! loading and SSA construction are someone else's problem (a real
//! implementation would sit on top of a compiler's IR, the way the
//! teacher's deadlock analysis sits on `rustc_middle::mir`). What's here is
//! the *contract* that collaborator must satisfy, plus a small in-memory
//! implementation so the core analyser can be built and driven end to end
//! without a real compiler attached.

use std::collections::HashMap;

/// Identifies a function in the program being analysed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FunctionId(pub u32);

/// Identifies a basic block within one function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub u32);

/// Identifies an SSA value. Two accesses touch the same memory location
/// iff their `Value`s are equal — alias analysis beyond this identity is a
/// declared Non-goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Value(pub u32);

/// An abstract source position. Resolved to `SourcePosition` lazily via
/// `Program::position`, the way `token.Pos` is resolved via `Fset` in the
/// distilled original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos(pub u32);

/// Identifies an interface (trait) type for dynamic-dispatch resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InterfaceId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePosition {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// One SSA instruction, tagged by kind. Per the §9 redesign note on "deep
/// inheritance in SSA representation", everything that isn't relevant to
/// the race analysis collapses into `Opaque`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionKind {
    Load { value: Value },
    Store { value: Value },
    Lock { lock: Value },
    Unlock { lock: Value },
    Defer { callee: FunctionId, args: Vec<Value> },
    Spawn { callee: FunctionId, args: Vec<Value> },
    Call { callee: FunctionId, args: Vec<Value> },
    InterfaceCall {
        interface: InterfaceId,
        method: String,
        args: Vec<Value>,
    },
    Return,
    /// Bumps the current task's clock and nothing else.
    Opaque,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub pos: Pos,
    pub kind: InstructionKind,
}

impl Instruction {
    pub fn new(pos: Pos, kind: InstructionKind) -> Self {
        Self { pos, kind }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BasicBlockData {
    pub instructions: Vec<Instruction>,
    pub successors: Vec<BlockId>,
}

#[derive(Debug, Clone)]
pub struct FunctionData {
    pub name: String,
    pub entry: BlockId,
    pub blocks: HashMap<BlockId, BasicBlockData>,
}

impl FunctionData {
    /// Successor order as given by the SSA representation — the traversal
    /// (§4.F) must walk successors in this order for determinism.
    pub fn successors_of(&self, block: BlockId) -> &[BlockId] {
        self.blocks
            .get(&block)
            .map(|bb| bb.successors.as_slice())
            .unwrap_or(&[])
    }
}

/// The contract the core analyser needs from whatever loaded the program.
pub trait Program {
    fn entry_function(&self) -> Option<FunctionId>;
    fn function(&self, id: FunctionId) -> Option<&FunctionData>;
    fn function_name(&self, id: FunctionId) -> String;
    fn position(&self, pos: Pos) -> SourcePosition;

    /// Enumerate implementations of `method` on runtime types implementing
    /// `interface`, sorted ascending by declaration position, with
    /// synthetic/compiler-generated implementations already excluded
    /// (§4.H).
    fn implementations(&self, interface: InterfaceId, method: &str) -> Vec<FunctionId>;
}

/// A small builder-style, in-memory `Program`. Exercises the core end to
/// end in tests and in `racex`'s self-check mode; not a substitute for a
/// real compiler front-end.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgram {
    entry: Option<FunctionId>,
    functions: HashMap<FunctionId, FunctionData>,
    positions: HashMap<Pos, SourcePosition>,
    /// interface -> method -> [(decl pos, impl function)], kept sorted by
    /// decl pos at insertion time as the original loader does.
    implementations: HashMap<(InterfaceId, String), Vec<(Pos, FunctionId)>>,
}

impl InMemoryProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_entry(&mut self, id: FunctionId) {
        self.entry = Some(id);
    }

    pub fn add_function(&mut self, id: FunctionId, data: FunctionData) {
        self.functions.insert(id, data);
    }

    pub fn set_position(&mut self, pos: Pos, source: SourcePosition) {
        self.positions.insert(pos, source);
    }

    pub fn add_implementation(
        &mut self,
        interface: InterfaceId,
        method: &str,
        decl_pos: Pos,
        implementor: FunctionId,
    ) {
        let entries = self
            .implementations
            .entry((interface, method.to_string()))
            .or_default();
        entries.push((decl_pos, implementor));
        entries.sort_by_key(|(pos, _)| pos.0);
    }
}

impl Program for InMemoryProgram {
    fn entry_function(&self) -> Option<FunctionId> {
        self.entry
    }

    fn function(&self, id: FunctionId) -> Option<&FunctionData> {
        self.functions.get(&id)
    }

    fn function_name(&self, id: FunctionId) -> String {
        self.functions
            .get(&id)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| format!("<unknown fn #{}>", id.0))
    }

    fn position(&self, pos: Pos) -> SourcePosition {
        self.positions.get(&pos).cloned().unwrap_or(SourcePosition {
            file: "<unknown>".to_string(),
            line: 0,
            column: 0,
        })
    }

    fn implementations(&self, interface: InterfaceId, method: &str) -> Vec<FunctionId> {
        self.implementations
            .get(&(interface, method.to_string()))
            .map(|entries| entries.iter().map(|(_, f)| *f).collect())
            .unwrap_or_default()
    }
}
