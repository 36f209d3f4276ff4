use serde::{Deserialize, Serialize};

macro_rules! ops {
    ($($v:ident => $m:literal),+ $(,)?) => {
        /// Instruction identifiers shared by both encodings.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Op {
            $($v),+
        }

        impl Op {
            pub const ALL: &'static [Op] = &[$(Op::$v),+];

            pub fn mnemonic(self) -> &'static str {
                match self {
                    $(Op::$v => $m),+
                }
            }
        }
    };
}

ops! {
    // arithmetic and logic
    Add => "add", Adc => "adc", Sub => "sub", Sbc => "sbc", Rsub => "rsub",
    And => "and", Or => "or", Bic => "bic", Xor => "xor",
    Max => "max", Min => "min", Mov => "mov",
    Tst => "tst", Cmp => "cmp", Rcmp => "rcmp",
    Bset => "bset", Bclr => "bclr", Btst => "btst", Bxor => "bxor", Bmsk => "bmsk",
    Add1 => "add1", Add2 => "add2", Add3 => "add3",
    Sub1 => "sub1", Sub2 => "sub2", Sub3 => "sub3",
    Mpy => "mpy", Mpyh => "mpyh", Mpyhu => "mpyhu", Mpyu => "mpyu",
    Mul64 => "mul64", Mulu64 => "mulu64",
    // shifts and single-operand ops
    Asl => "asl", Lsl => "lsl", Asr => "asr", Lsr => "lsr", Ror => "ror",
    Rrc => "rrc", Rlc => "rlc",
    Sexb => "sexb", Sexw => "sexw", Extb => "extb", Extw => "extw",
    Abs => "abs", Not => "not", Neg => "neg", Ex => "ex",
    Swap => "swap", Norm => "norm", Normw => "normw",
    Sat16 => "sat16", Rnd16 => "rnd16",
    Abssw => "abssw", Abss => "abss", Negsw => "negsw", Negs => "negs",
    // extension arithmetic
    Adds => "adds", Subs => "subs", Divaw => "divaw", Asls => "asls", Asrs => "asrs",
    Addsdw => "addsdw", Subsdw => "subsdw",
    Muldw => "muldw", Muludw => "muludw", Mulrdw => "mulrdw",
    Macdw => "macdw", Macudw => "macudw", Macrdw => "macrdw", Msubdw => "msubdw",
    Mululw => "mululw", Mullw => "mullw", Mulflw => "mulflw",
    Maclw => "maclw", Macflw => "macflw", Machulw => "machulw",
    Machlw => "machlw", Machflw => "machflw", Mulhlw => "mulhlw", Mulhflw => "mulhflw",
    // memory and auxiliary registers
    Ld => "ld", St => "st", Lr => "lr", Sr => "sr", Push => "push", Pop => "pop",
    // control flow
    B => "b", Bl => "bl", Br => "br", Bbit0 => "bbit0", Bbit1 => "bbit1",
    J => "j", Jl => "jl", Lp => "lp",
    // system
    Flag => "flag", Sleep => "sleep", Swi => "swi", Trap => "trap", Sync => "sync",
    Rtie => "rtie", Brk => "brk", Nop => "nop", Unimp => "unimp_s",
}

impl Op {
    /// The first operand is a destination that the instruction writes.
    ///
    /// A long-immediate reference in that slot is never fetched: it
    /// decodes as a zero immediate.
    pub fn writes_first(self) -> bool {
        use Op::*;
        !matches!(
            self,
            Tst | Cmp
                | Rcmp
                | Btst
                | Mul64
                | Mulu64
                | St
                | Sr
                | Push
                | B
                | Bl
                | Br
                | Bbit0
                | Bbit1
                | J
                | Jl
                | Lp
                | Flag
                | Sleep
                | Swi
                | Trap
                | Sync
                | Rtie
                | Brk
                | Nop
                | Unimp
        )
    }

    /// Register-indirect jumps: an immediate target is a code address.
    pub fn is_jump(self) -> bool {
        matches!(self, Op::J | Op::Jl)
    }

    pub fn is_load_store(self) -> bool {
        matches!(self, Op::Ld | Op::St)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn mnemonics_are_unique() {
        let names: HashSet<_> = Op::ALL.iter().map(|op| op.mnemonic()).collect();
        assert_eq!(names.len(), Op::ALL.len());
    }

    #[test]
    fn destination_classification() {
        assert!(Op::Add.writes_first());
        assert!(Op::Ld.writes_first());
        assert!(!Op::St.writes_first());
        assert!(!Op::Cmp.writes_first());
        assert!(!Op::J.writes_first());
    }
}
