/// # Opcodes
///
/// Chip-8 opcodes are 16 bits each. Their behavior is cased on some combination of:
/// - `(n, _, _, _)` the family; applies to all opcodes
/// - `(_, _, _, n)` specific behavior within the `0x8` family
/// - `(_, _, n, n)` specific behavior within the `0x0`, `0xE` and `0xF` families
///
/// Nibbles not used to determine the operation carry the operands.
/// - `(_, n, n, n)` a 12-bit address
/// - `(_, _, n, n)` an immediate byte assigned to and/or compared with Vx
/// - `(_, n, _, _)` the register Vx or the range of registers V0..=Vx
/// - `(_, _, n, _)` the register Vy
/// - `(_, _, _, n)` a small count such as a sprite's height
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub word: u16,
    /// `[f___]`
    pub family: u8,
    /// `[_x__]`
    pub x: u8,
    /// `[__y_]`
    pub y: u8,
    /// `[___n]`
    pub n: u8,
    /// `[__kk]`
    pub kk: u8,
    /// `[_nnn]`
    pub nnn: u16,
}

impl Opcode {
    /// The component nibbles from most to least significant.
    pub fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.family, self.x, self.y, self.n)
    }

    /// Vx as an index into the register file
    pub fn vx(&self) -> usize {
        usize::from(self.x)
    }

    /// Vy as an index into the register file
    pub fn vy(&self) -> usize {
        usize::from(self.y)
    }
}

impl From<u16> for Opcode {
    fn from(word: u16) -> Self {
        Opcode {
            word,
            family: ((word & 0xF000) >> 12) as u8,
            x: ((word & 0x0F00) >> 8) as u8,
            y: ((word & 0x00F0) >> 4) as u8,
            n: (word & 0x000F) as u8,
            kk: (word & 0x00FF) as u8,
            nnn: word & 0x0FFF,
        }
    }
}

#[cfg(test)]
mod test_opcode {
    use super::*;

    #[test]
    fn test_fields() {
        let op = Opcode::from(0xABCD);
        assert_eq!(op.family, 0xA);
        assert_eq!(op.x, 0xB);
        assert_eq!(op.y, 0xC);
        assert_eq!(op.n, 0xD);
        assert_eq!(op.kk, 0xCD);
        assert_eq!(op.nnn, 0xBCD);
    }

    #[test]
    fn test_nibbles() {
        assert_eq!(Opcode::from(0xABCD).nibbles(), (0xA, 0xB, 0xC, 0xD));
    }

    #[test]
    fn test_register_indices() {
        let op = Opcode::from(0x8F30);
        assert_eq!(op.vx(), 15);
        assert_eq!(op.vy(), 3);
    }
}
