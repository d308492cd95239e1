/// One rung of the prize ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrizeLadderEntry {
    pub level: u8,
    pub amount: &'static str,
    pub is_milestone: bool,
}

impl PrizeLadderEntry {
    pub const fn new(level: u8, amount: &'static str, is_milestone: bool) -> Self {
        Self {
            level,
            amount,
            is_milestone,
        }
    }
}
