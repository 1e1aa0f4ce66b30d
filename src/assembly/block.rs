//! Basic block construction from instruction streams.

use std::collections::{BTreeSet, HashMap};

use crate::{
    assembly::instruction::{FlowType, Instruction},
    error::malformed_error,
    Result,
};

/// A maximal straight-line sequence of instructions.
///
/// Control enters a basic block only at its first instruction and leaves only after its
/// last. Successors are indices into the block list produced by [`split_blocks`].
#[derive(Debug, Clone)]
pub struct BasicBlock {
    /// Index of this block within the method's block list.
    pub id: usize,
    /// The instructions of this block, in program order.
    pub instructions: Vec<Instruction>,
    /// Indices of successor blocks. For a conditional branch the taken target comes
    /// first, the fall-through second.
    pub successors: Vec<usize>,
}

/// Splits an instruction stream into basic blocks.
///
/// Block leaders are the first instruction, every branch target, and every instruction
/// following a branch, return, or throw. Successor lists are wired from the terminating
/// instruction of each block: conditional branches get `[target, fall-through]`,
/// unconditional branches `[target]`, returns and throws nothing, and blocks cut by a
/// leader fall through to the next block.
///
/// # Arguments
///
/// * `instructions` - The method's instructions in program order
///
/// # Errors
///
/// Returns [`Error::Malformed`](crate::Error::Malformed) if the stream is empty, a branch
/// target is not an instruction address, a conditional branch falls off the end of the
/// stream, or the last instruction falls through past the end.
pub fn split_blocks(instructions: &[Instruction]) -> Result<Vec<BasicBlock>> {
    if instructions.is_empty() {
        return Err(malformed_error!("Cannot split an empty instruction stream"));
    }

    let addr_to_index: HashMap<u32, usize> = instructions
        .iter()
        .enumerate()
        .map(|(i, insn)| (insn.addr(), i))
        .collect();

    let resolve = |target: u32| -> Result<usize> {
        addr_to_index.get(&target).copied().ok_or_else(|| {
            malformed_error!("Branch target {} is not an instruction address", target)
        })
    };

    // First pass: collect leader indices.
    let mut leaders = BTreeSet::new();
    leaders.insert(0);
    for (i, insn) in instructions.iter().enumerate() {
        match insn.flow_type() {
            FlowType::ConditionalBranch | FlowType::UnconditionalBranch => {
                let target = insn
                    .target()
                    .ok_or_else(|| malformed_error!("Branch at {} has no target", insn.addr()))?;
                leaders.insert(resolve(target)?);
                if i + 1 < instructions.len() {
                    leaders.insert(i + 1);
                }
            }
            FlowType::Return | FlowType::Throw => {
                if i + 1 < instructions.len() {
                    leaders.insert(i + 1);
                }
            }
            FlowType::Sequential => {}
        }
    }

    // Second pass: materialize blocks between consecutive leaders.
    let leader_list: Vec<usize> = leaders.iter().copied().collect();
    let block_of_index: HashMap<usize, usize> = leader_list
        .iter()
        .enumerate()
        .map(|(block_id, &start)| (start, block_id))
        .collect();

    let mut blocks = Vec::with_capacity(leader_list.len());
    for (block_id, &start) in leader_list.iter().enumerate() {
        let end = leader_list
            .get(block_id + 1)
            .copied()
            .unwrap_or(instructions.len());
        let body: Vec<Instruction> = instructions[start..end].to_vec();

        let last = &instructions[end - 1];
        let successors = match last.flow_type() {
            FlowType::ConditionalBranch => {
                let target = block_of_index[&resolve(last.target().ok_or_else(|| {
                    malformed_error!("Branch at {} has no target", last.addr())
                })?)?];
                if end >= instructions.len() {
                    return Err(malformed_error!(
                        "Conditional branch at {} falls off the end of the method",
                        last.addr()
                    ));
                }
                vec![target, block_of_index[&end]]
            }
            FlowType::UnconditionalBranch => {
                let target = block_of_index[&resolve(last.target().ok_or_else(|| {
                    malformed_error!("Branch at {} has no target", last.addr())
                })?)?];
                vec![target]
            }
            FlowType::Return | FlowType::Throw => Vec::new(),
            FlowType::Sequential => {
                if end >= instructions.len() {
                    return Err(malformed_error!(
                        "Method falls through past its last instruction at {}",
                        last.addr()
                    ));
                }
                vec![block_of_index[&end]]
            }
        };

        blocks.push(BasicBlock {
            id: block_id,
            instructions: body,
            successors,
        });
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::instruction::{Opcode, Operand};

    fn insn(addr: u32, opcode: Opcode, operand: Operand) -> Instruction {
        Instruction::new(addr, opcode, None, vec![], operand)
    }

    #[test]
    fn test_single_block() {
        let instructions = vec![
            insn(0, Opcode::Nop, Operand::None),
            insn(1, Opcode::ReturnVoid, Operand::None),
        ];
        let blocks = split_blocks(&instructions).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].instructions.len(), 2);
        assert!(blocks[0].successors.is_empty());
    }

    #[test]
    fn test_diamond() {
        // 0: if-eqz v0 -> @3
        // 1: nop
        // 2: goto @4
        // 3: nop
        // 4: return-void
        let instructions = vec![
            Instruction::new(0, Opcode::IfEqz, None, vec![0], Operand::Target(3)),
            insn(1, Opcode::Nop, Operand::None),
            insn(2, Opcode::Goto, Operand::Target(4)),
            insn(3, Opcode::Nop, Operand::None),
            insn(4, Opcode::ReturnVoid, Operand::None),
        ];
        let blocks = split_blocks(&instructions).unwrap();
        assert_eq!(blocks.len(), 4);
        // Conditional: taken target first, fall-through second.
        assert_eq!(blocks[0].successors, vec![2, 1]);
        assert_eq!(blocks[1].successors, vec![3]);
        assert_eq!(blocks[2].successors, vec![3]);
        assert!(blocks[3].successors.is_empty());
    }

    #[test]
    fn test_fallthrough_block_cut_by_target() {
        // 0: nop
        // 1: goto @0   (loop back; cuts a leader at 0)
        let instructions = vec![
            insn(0, Opcode::Nop, Operand::None),
            insn(1, Opcode::Goto, Operand::Target(0)),
        ];
        let blocks = split_blocks(&instructions).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].successors, vec![0]);
    }

    #[test]
    fn test_bad_target_rejected() {
        let instructions = vec![insn(0, Opcode::Goto, Operand::Target(99))];
        assert!(split_blocks(&instructions).is_err());
    }

    #[test]
    fn test_empty_rejected() {
        assert!(split_blocks(&[]).is_err());
    }

    #[test]
    fn test_fallthrough_off_end_rejected() {
        let instructions = vec![insn(0, Opcode::Nop, Operand::None)];
        assert!(split_blocks(&instructions).is_err());
    }
}
