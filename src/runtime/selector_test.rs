use super::*;
use crate::{Channel, ChannelId, ChannelRegistry};

fn registry(ids: &[u8]) -> ChannelRegistry {
    ChannelRegistry::new(
        ids.iter()
            .map(|id| Channel {
                id: ChannelId(*id),
                name: format!("CH{id}"),
                base_page: *id as u32,
                slots: 4,
            })
            .collect(),
    )
}

#[test]
fn test_select_next_cycles_in_registry_order() {
    let selector = ChannelSelector::new(&registry(&[0x10, 0x11, 0x12])).unwrap();
    assert_eq!(selector.current(), ChannelId(0x10));
    assert_eq!(selector.select_next(), ChannelId(0x11));
    assert_eq!(selector.select_next(), ChannelId(0x12));
    assert_eq!(selector.select_next(), ChannelId(0x10));
    assert_eq!(selector.current(), ChannelId(0x10));
}

#[test]
fn test_select_specific_channel() {
    let selector = ChannelSelector::new(&registry(&[1, 2, 3])).unwrap();
    selector.select(ChannelId(3)).unwrap();
    assert_eq!(selector.current(), ChannelId(3));
    assert!(selector.select(ChannelId(9)).is_err());
    assert_eq!(selector.current(), ChannelId(3));
}

#[test]
fn test_empty_registry_is_rejected() {
    assert!(ChannelSelector::new(&ChannelRegistry::default()).is_err());
}
