use crate::BroadcastGroup;

use bx_config::StreamConfig;
use bx_core::Channel;

/// The four process-wide groups, one per channel.
#[derive(Clone)]
pub struct StreamGroups {
    pub height: BroadcastGroup,
    pub block_notify: BroadcastGroup,
    pub pending_tx: BroadcastGroup,
    pub price: BroadcastGroup,
}

impl StreamGroups {
    pub fn new(config: &StreamConfig) -> Self {
        Self {
            height: BroadcastGroup::from_config(Channel::Height.as_str(), config),
            block_notify: BroadcastGroup::from_config(Channel::BlockNotify.as_str(), config),
            pending_tx: BroadcastGroup::from_config(Channel::PendingTx.as_str(), config),
            price: BroadcastGroup::from_config(Channel::Price.as_str(), config),
        }
    }

    pub fn for_channel(&self, channel: Channel) -> &BroadcastGroup {
        match channel {
            Channel::Height => &self.height,
            Channel::BlockNotify => &self.block_notify,
            Channel::PendingTx => &self.pending_tx,
            Channel::Price => &self.price,
        }
    }

    /// `(group name, subscriber count)` for every group
    pub fn subscriber_counts(&self) -> Vec<(&str, usize)> {
        [&self.height, &self.block_notify, &self.pending_tx, &self.price]
            .into_iter()
            .map(|group| (group.name(), group.subscriber_count()))
            .collect()
    }

    pub fn close_all(&self) {
        self.height.close();
        self.block_notify.close();
        self.pending_tx.close();
        self.price.close();
    }
}
