#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Ring the terminal bell when a wild creature appears.
    Bell,
}
