use crate::tests::height;
use crate::{BroadcastGroup, OverflowPolicy, SubscriberHandle};

use futures::executor::block_on;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Join,
    Leave(usize),
    Send,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Join),
        1 => any::<usize>().prop_map(Op::Leave),
        3 => Just(Op::Send),
    ]
}

struct Member {
    handle: SubscriberHandle,
    expected: Vec<String>,
}

// =========================================================================
// Property-Based Tests - Group membership
// =========================================================================

proptest! {
    #[test]
    fn given_any_join_leave_send_sequence_when_drained_then_members_see_exactly_their_window(
        ops in prop::collection::vec(op(), 1..64)
    ) {
        // Capacity above the op count so nothing is dropped
        let group = BroadcastGroup::new("height", 128, OverflowPolicy::DropNewest);
        let mut members: Vec<Member> = Vec::new();
        let mut sent = 0usize;

        for op in ops {
            match op {
                Op::Join => members.push(Member {
                    handle: group.join(),
                    expected: Vec::new(),
                }),
                Op::Leave(index) => {
                    if !members.is_empty() {
                        let member = members.swap_remove(index % members.len());
                        group.leave(member.handle);
                    }
                }
                Op::Send => {
                    let payload = sent.to_string();
                    sent += 1;
                    let report = block_on(group.send(height(&payload)));
                    prop_assert_eq!(report.subscribers, members.len());
                    prop_assert_eq!(report.dropped, 0);
                    for member in &mut members {
                        member.expected.push(payload.clone());
                    }
                }
            }
            prop_assert_eq!(group.subscriber_count(), members.len());
        }

        for member in &members {
            let mut received = Vec::new();
            while let Some(message) = member.handle.try_recv() {
                received.push(message.payload().to_string());
            }
            prop_assert_eq!(&received, &member.expected);
        }
    }

    #[test]
    fn given_full_queue_when_drop_newest_then_oldest_messages_kept(
        capacity in 1usize..16,
        extra in 1usize..16
    ) {
        let group = BroadcastGroup::new("height", capacity, OverflowPolicy::DropNewest);
        let handle = group.join();

        for i in 0..capacity + extra {
            block_on(group.send(height(&i.to_string())));
        }

        let received: Vec<String> = std::iter::from_fn(|| handle.try_recv())
            .map(|message| message.payload().to_string())
            .collect();
        let expected: Vec<String> = (0..capacity).map(|i| i.to_string()).collect();
        prop_assert_eq!(received, expected);
    }

    #[test]
    fn given_full_queue_when_drop_oldest_then_newest_messages_kept(
        capacity in 1usize..16,
        extra in 1usize..16
    ) {
        let group = BroadcastGroup::new("height", capacity, OverflowPolicy::DropOldest);
        let handle = group.join();
        let total = capacity + extra;

        for i in 0..total {
            block_on(group.send(height(&i.to_string())));
        }

        let received: Vec<String> = std::iter::from_fn(|| handle.try_recv())
            .map(|message| message.payload().to_string())
            .collect();
        let expected: Vec<String> = (extra..total).map(|i| i.to_string()).collect();
        prop_assert_eq!(received, expected);
    }
}
