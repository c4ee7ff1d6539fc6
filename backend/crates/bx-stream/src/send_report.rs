/// Per-send delivery summary returned by `BroadcastGroup::send`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendReport {
    /// Subscribers present when the send started
    pub subscribers: usize,
    /// Queues the message was placed in
    pub delivered: usize,
    /// Messages lost to full queues (incoming or evicted)
    pub dropped: usize,
}
