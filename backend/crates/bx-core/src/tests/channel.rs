use crate::Channel;

use std::str::FromStr;

#[test]
fn test_channel_bus_names() {
    assert_eq!(Channel::Height.bus_name(), Some("btcplex:height"));
    assert_eq!(Channel::BlockNotify.bus_name(), Some("btcplex:blocknotify"));
    assert_eq!(Channel::PendingTx.bus_name(), Some("btcplex:utxs"));
    assert_eq!(Channel::Price.bus_name(), None);
}

#[test]
fn test_channel_from_str_round_trips_as_str() {
    for channel in [
        Channel::Height,
        Channel::BlockNotify,
        Channel::PendingTx,
        Channel::Price,
    ] {
        assert_eq!(Channel::from_str(channel.as_str()).unwrap(), channel);
    }
    assert!(Channel::from_str("mempool").is_err());
}

#[test]
fn test_bus_channels_exclude_price() {
    assert!(!Channel::BUS_CHANNELS.contains(&Channel::Price));
    assert!(Channel::BUS_CHANNELS.iter().all(|c| c.bus_name().is_some()));
}
