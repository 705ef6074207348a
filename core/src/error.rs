use thiserror::Error;

/// Conditions that stop a ROM from loading or a running program from advancing.
///
/// Unknown opcodes are deliberately absent: they execute as no-ops.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), at most {max} bytes fit in memory")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("stack overflow: call at {pc:#06X} with all 16 stack slots in use")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: return at {pc:#06X} with an empty call stack")]
    StackUnderflow { pc: u16 },

    #[error("program counter {pc:#06X} is past the last fetchable address")]
    OutOfBoundsFetch { pc: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_include_addresses() {
        let err = Chip8Error::StackUnderflow { pc: 0x2A4 };
        assert_eq!(
            err.to_string(),
            "stack underflow: return at 0x02A4 with an empty call stack"
        );
    }
}
