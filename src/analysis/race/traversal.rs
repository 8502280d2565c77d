//! CFG traversal (SPEC_FULL.md §4.F): a depth-first walk of one function's
//! basic blocks, fused against infinite cycles by `Context`'s `BlockStack`
//! rather than unrolling loops. The working `FunctionState` — lockset and
//! pending defers included — is threaded into each successor rather than
//! rebuilt from scratch, so an access recorded three blocks past a `Lock`
//! still sees that lock held, and a `defer` pushed in one block still
//! unwinds at whichever exit the path actually reaches.

use crate::analysis::race::context::Context;
use crate::analysis::race::function_state::FunctionState;
use crate::ssa::{BlockId, FunctionData};

use super::driver::Driver;

impl<'p> Driver<'p> {
    pub(crate) fn traverse_from(
        &mut self,
        fdata: &FunctionData,
        block: BlockId,
        mut state: FunctionState,
        ctx: &mut Context,
    ) -> FunctionState {
        let threshold = self.config.max_block_visits;
        if ctx.visited_blocks().at_least(block.0 as usize, threshold) {
            // BlockCycle (§7): the fuse trips, this path contributes
            // nothing further.
            return state;
        }
        ctx.visited_blocks().push(block.0 as usize);

        let instructions = fdata
            .blocks
            .get(&block)
            .map(|bb| bb.instructions.as_slice())
            .unwrap_or(&[]);
        for instr in instructions {
            self.execute_instruction(instr, block, &mut state, ctx);
        }

        let successors = fdata.successors_of(block).to_vec();
        let result = match successors.as_slice() {
            [] => {
                self.run_deferred(&mut state, ctx);
                state
            }
            [only] => self.traverse_from(fdata, *only, state, ctx),
            many => {
                let mut joined: Option<FunctionState> = None;
                for &succ in many {
                    let branch = self.traverse_from(fdata, succ, state.clone(), ctx);
                    match &mut joined {
                        None => joined = Some(branch),
                        Some(acc) => acc.merge_branch(&branch),
                    }
                }
                joined.unwrap_or(state)
            }
        };

        ctx.visited_blocks().pop(block.0 as usize);
        result
    }
}
