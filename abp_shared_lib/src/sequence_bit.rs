use std::fmt::{Display, Formatter};
use crate::field_types::SequenceRaw;

/// The alternating bit carried by data frames and acknowledgments
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
pub enum SequenceBit {
    Zero = 0,
    One = 1,
}

impl SequenceBit {

    /// None if `value` is neither 0 nor 1
    pub fn from_raw(value: SequenceRaw) -> Option<SequenceBit> {
        num::FromPrimitive::from_u32(value)
    }

    pub fn to_raw(self) -> SequenceRaw {
        self as SequenceRaw
    }

    pub fn toggled(self) -> SequenceBit {
        match self {
            SequenceBit::Zero => SequenceBit::One,
            SequenceBit::One => SequenceBit::Zero,
        }
    }
}

impl Default for SequenceBit {
    fn default() -> Self {
        SequenceBit::Zero
    }
}

impl Display for SequenceBit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::SequenceBit;

    #[test]
    fn raw_values() {
        assert_eq!(SequenceBit::from_raw(0), Some(SequenceBit::Zero));
        assert_eq!(SequenceBit::from_raw(1), Some(SequenceBit::One));
        assert_eq!(SequenceBit::from_raw(2), None);
        assert_eq!(SequenceBit::from_raw(u32::MAX), None);
        assert_eq!(SequenceBit::One.to_raw(), 1);
    }

    #[test]
    fn toggles_back_and_forth() {
        assert_eq!(SequenceBit::Zero.toggled(), SequenceBit::One);
        assert_eq!(SequenceBit::Zero.toggled().toggled(), SequenceBit::Zero);
    }
}
