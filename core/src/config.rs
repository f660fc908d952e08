/// # Quirks
/// Behaviors that differ between Chip-8 interpreters.
///
/// The defaults keep this machine's historical semantics; the alternatives exist for ROMs written
/// against other interpreters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Quirks {
    pub jump: JumpQuirk,
    pub register_transfer: TransferQuirk,
}

/// How BNNN computes its target
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JumpQuirk {
    /// PC = V0 + NNN
    AddressPlusV0,
    /// PC = (V0 + opcode) & 0x0FFF
    MaskedSum,
}

impl Default for JumpQuirk {
    fn default() -> Self {
        JumpQuirk::AddressPlusV0
    }
}

/// Which registers FX55 and FX65 copy
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransferQuirk {
    /// V0..Vx, leaving Vx itself alone
    Exclusive,
    /// V0..=Vx
    Inclusive,
}

impl Default for TransferQuirk {
    fn default() -> Self {
        TransferQuirk::Exclusive
    }
}

impl TransferQuirk {
    /// Number of registers moved by a transfer naming register `x`
    pub fn count(self, x: usize) -> usize {
        match self {
            TransferQuirk::Exclusive => x,
            TransferQuirk::Inclusive => x + 1,
        }
    }
}
