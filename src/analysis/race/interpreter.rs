//! Per-instruction transfer functions (SPEC_FULL.md §4.G): the effect each
//! `InstructionKind` has on the working `FunctionState` and `Context`.

use crate::analysis::race::context::Context;
use crate::analysis::race::function_state::{DeferredCall, FunctionState};
use crate::analysis::race::guarded_access::{GuardedAccess, OpKind};
use crate::analysis::race::lockset::Lock;
use crate::racex_debug;
use crate::ssa::{BlockId, Instruction, InstructionKind, Pos, Value};

use super::driver::Driver;

impl<'p> Driver<'p> {
    pub(crate) fn execute_instruction(
        &mut self,
        instr: &Instruction,
        block: BlockId,
        state: &mut FunctionState,
        ctx: &mut Context,
    ) {
        match &instr.kind {
            InstructionKind::Load { value } => {
                self.record_access(instr.pos, *value, OpKind::Read, state, ctx);
            }
            InstructionKind::Store { value } => {
                self.record_access(instr.pos, *value, OpKind::Write, state, ctx);
            }
            InstructionKind::Lock { lock } => {
                ctx.bump_own_tick();
                state.lockset.add_lock(Lock::new(*lock));
            }
            InstructionKind::Unlock { lock } => {
                ctx.bump_own_tick();
                state.lockset.remove_lock(Lock::new(*lock));
            }
            InstructionKind::Defer { callee, args } => {
                ctx.bump_own_tick();
                state.push_deferred(DeferredCall {
                    function: *callee,
                    captured_arguments: args.clone(),
                    origin_block_index: block.0 as usize,
                });
            }
            InstructionKind::Spawn { callee, .. } => {
                let mut child_ctx = ctx.fork_for_spawn();
                let result = self.analyse_callee(*callee, &state.lockset, &mut child_ctx);
                state.merge_after_spawn(&result);
            }
            InstructionKind::Call { callee, .. } => {
                ctx.push_call(instr.pos.0 as usize);
                let result = self.analyse_callee(*callee, &state.lockset, ctx);
                ctx.pop_call();
                state.merge_sequential(&result);
            }
            InstructionKind::InterfaceCall { interface, method, .. } => {
                let program = self.program;
                let implementors = self.dispatch.resolve(program, *interface, method);
                if implementors.is_empty() {
                    racex_debug!("interface call to {} has no resolvable implementor", method);
                    ctx.bump_own_tick();
                    return;
                }

                ctx.push_call(instr.pos.0 as usize);
                let mut joined: Option<FunctionState> = None;
                for implementor in &implementors {
                    let result = self.analyse_callee(*implementor, &state.lockset, ctx);
                    match &mut joined {
                        None => joined = Some(result),
                        Some(acc) => acc.merge_branch(&result),
                    }
                }
                ctx.pop_call();
                if let Some(joined) = joined {
                    state.merge_sequential(&joined);
                }
            }
            InstructionKind::Return => {
                // Deferred calls are unwound by the traversal once it
                // reaches a block with no successors (§4.F step 3).
            }
            InstructionKind::Opaque => ctx.bump_own_tick(),
        }
    }

    fn record_access(
        &mut self,
        pos: Pos,
        value: Value,
        op_kind: OpKind,
        state: &mut FunctionState,
        ctx: &mut Context,
    ) {
        let access = GuardedAccess {
            id: ctx.next_access_id(),
            position: pos,
            value,
            op_kind,
            lockset: state.lockset.clone(),
            goroutine_id: ctx.goroutine_id(),
            clock: ctx.clock().clone(),
            stack_trace: ctx.stack_trace().clone(),
        };
        ctx.bump_own_tick();
        state.guarded_accesses.push(access);
    }

    /// Runs a function's deferred calls LIFO at exit (§4.G "Return"),
    /// treating each as a synchronous call at that point.
    pub(crate) fn run_deferred(&mut self, state: &mut FunctionState, ctx: &mut Context) {
        while let Some(deferred) = state.pop_deferred() {
            let result = self.analyse_callee(deferred.function, &state.lockset, ctx);
            state.merge_sequential(&result);
        }
    }
}
