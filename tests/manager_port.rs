// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use tlparams::*;

fn set(base: i64, mask: i64) -> AddressSet {
    AddressSet::new(base, mask).unwrap()
}

fn sizes(min: u32, max: u32) -> TransferSizes {
    TransferSizes::new(min, max).unwrap()
}

fn addr(address: i64) -> BigInt {
    BigInt::from(address)
}

fn manager(name: &str, address: Vec<AddressSet>, sinks: (i64, i64)) -> ManagerConfig {
    ManagerConfig {
        name: name.to_string(),
        address,
        sink_id: IdRange::new(sinks.0, sinks.1).unwrap(),
        ..Default::default()
    }
}

fn port() -> ManagerPortParameters {
    let rom = ManagerConfig {
        fifo_id: Some(0),
        supports_get: sizes(1, 64),
        ..manager("rom", vec![set(0x0, 0xfff)], (0, 1))
    };
    let ram = ManagerConfig {
        region_type: RegionType::Cached,
        executable: true,
        fifo_id: Some(1),
        supports_get: sizes(1, 64),
        supports_put_full: sizes(1, 64),
        supports_put_partial: sizes(1, 64),
        ..manager("ram", vec![set(0x10000, 0xffff)], (1, 3))
    };
    let mmio = ManagerConfig {
        supports_get: sizes(4, 4),
        supports_put_full: sizes(4, 4),
        ..manager("mmio", vec![set(0x2000, 0xff), set(0x3000, 0xff)], (3, 4))
    };
    let managers = [rom, ram, mmio]
        .into_iter()
        .map(|config| ManagerParameters::new(config).unwrap())
        .collect();
    ManagerPortParameters::new(managers, 8, 1).unwrap()
}

fn hits(port: &ManagerPortParameters, address: i64) -> Vec<usize> {
    port.find_safe(&addr(address)).ones().collect()
}

#[test]
fn test_port_summary() {
    let _ = env_logger::builder().is_test(true).try_init();
    let port = port();
    assert_eq!(port.len(), 3);
    assert_eq!(port.beat_bytes(), 8);
    assert_eq!(port.min_latency(), 1);
    assert_eq!(port.end_sink_id(), 4);
    assert_eq!(port.max_address(), addr(0x1ffff));
    assert_eq!(port.max_transfer(), 64);
    assert_eq!(port.all_support_get(), sizes(4, 4));
    assert!(port.any_support_put_partial());
    assert!(!port.any_support_acquire());
    assert!(port.all_support_put_full().none());
    assert_eq!(
        port.managers().map(ManagerParameters::name).collect::<Vec<_>>(),
        ["rom", "ram", "mmio"]
    );
    assert_eq!(port.get("ram").unwrap().region_type(), RegionType::Cached);
}

#[rstest]
#[case(0x0, vec![0])]
#[case(0xfff, vec![0])]
#[case(0x10000, vec![1])]
#[case(0x1abcd, vec![1])]
#[case(0x2040, vec![2])]
#[case(0x30ff, vec![2])]
#[case(0x1000, vec![])]
#[case(0x2100, vec![])]
#[case(0x20000, vec![])]
fn find_safe_is_one_hot_or_empty(#[case] address: i64, #[case] expected: Vec<usize>) {
    let port = port();
    assert_eq!(hits(&port, address), expected);
    assert_eq!(port.contains_safe(&addr(address)), !expected.is_empty());
    assert_eq!(
        port.find(&addr(address)).map(ManagerParameters::name),
        expected.first().map(|&i| ["rom", "ram", "mmio"][i])
    );
}

#[rstest]
#[case(0x0)]
#[case(0x800)]
#[case(0x10000)]
#[case(0x1fffc)]
#[case(0x2000)]
#[case(0x3080)]
fn find_fast_agrees_inside_regions(#[case] address: i64) {
    let port = port();
    assert_eq!(port.find_fast(&addr(address)), port.find_safe(&addr(address)));
    assert_eq!(
        port.find_id_start_fast(&addr(address)),
        port.find_id_start_safe(&addr(address))
    );
    assert_eq!(
        port.find_fifo_id_fast(&addr(address)),
        port.find_fifo_id_safe(&addr(address))
    );
}

#[test]
fn test_routing_mask_widening_is_disjoint() {
    let port = port();
    let ignore = !port.routing_mask();
    let widened = port
        .managers()
        .map(|m| m.address().iter().map(|s| s.widen(&ignore)).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    for (i, a) in widened.iter().enumerate() {
        for b in &widened[i + 1..] {
            assert!(a.iter().all(|x| b.iter().all(|y| !x.overlaps(y))));
        }
    }
}

#[test]
fn test_lookups() {
    let port = port();

    assert_eq!(port.find_fifo_id_safe(&addr(0x10)), Some(0));
    assert_eq!(port.find_fifo_id_safe(&addr(0x10010)), Some(1));
    assert_eq!(port.find_fifo_id_safe(&addr(0x2010)), None);
    assert_eq!(port.find_fifo_id_safe(&addr(0x8000)), None);

    assert_eq!(port.find_id_start_safe(&addr(0x10004)), Some(1));
    assert_eq!(port.find_id_end_safe(&addr(0x10004)), Some(3));
    assert_eq!(port.find_id_end_safe(&addr(0x3004)), Some(4));
    assert_eq!(port.find_id_start_safe(&addr(0x8000)), None);

    assert_eq!(port.find_by_id(2).map(ManagerParameters::name), Some("ram"));
    assert!(port.contains_by_id(3));
    assert!(!port.contains_by_id(4));
}

#[rstest]
#[case(0x2004, 2, true)]
#[case(0x2004, 3, false)]
#[case(0x10000, 6, true)]
#[case(0x10000, 7, false)]
#[case(0x0, 0, true)]
#[case(0x8000, 2, false)]
fn supports_get(#[case] address: i64, #[case] lg_size: u32, #[case] expected: bool) {
    let port = port();
    assert_eq!(port.supports_get_safe(&addr(address), lg_size), expected);
    if port.contains_safe(&addr(address)) {
        assert_eq!(port.supports_get_fast(&addr(address), lg_size), expected);
    }
}

#[test]
fn test_supports_put_partial() {
    let port = port();
    assert!(port.supports_put_partial_safe(&addr(0x10000), 3));
    assert!(!port.supports_put_partial_safe(&addr(0x2000), 2));
    assert!(!port.supports_put_partial_safe(&addr(0x0), 0));
}

#[test]
fn test_with_routing_mask() {
    let port = port().with_routing_mask(addr(0xffff_ffff));
    assert_eq!(port.routing_mask(), &addr(0xffff_ffff));
    // a full mask makes the fast lookup exact everywhere
    for address in [0x0, 0x1000, 0x2000, 0x2100, 0x10000, 0x20000] {
        assert_eq!(port.find_fast(&addr(address)), port.find_safe(&addr(address)));
    }
}

#[test]
fn test_rejects_overlapping_addresses() {
    let a = ManagerParameters::new(manager("a", vec![set(0x0, 0xfff)], (0, 1))).unwrap();
    let b = ManagerParameters::new(manager("b", vec![set(0x800, 0x7ff)], (1, 2))).unwrap();
    assert!(matches!(
        ManagerPortParameters::new(vec![a, b], 4, 0),
        Err(ParamError::OverlappingAddress { .. })
    ));
}

#[test]
fn test_rejects_overlapping_sinks() {
    let a = ManagerParameters::new(manager("a", vec![set(0x0, 0xfff)], (0, 2))).unwrap();
    let b = ManagerParameters::new(manager("b", vec![set(0x1000, 0xfff)], (1, 3))).unwrap();
    assert!(matches!(
        ManagerPortParameters::new(vec![a, b], 4, 0),
        Err(ParamError::OverlappingId { .. })
    ));
}

#[test]
fn test_rejects_bad_ports() {
    assert_eq!(
        ManagerPortParameters::new(vec![], 4, 0).unwrap_err(),
        ParamError::EmptyPort { kind: "manager" }
    );

    let a = ManagerParameters::new(manager("a", vec![set(0x0, 0xfff)], (0, 1))).unwrap();
    assert_eq!(
        ManagerPortParameters::new(vec![a.clone()], 3, 0).unwrap_err(),
        ParamError::InvalidBeatBytes { beat_bytes: 3 }
    );

    let twin = ManagerParameters::new(manager("a", vec![set(0x1000, 0xfff)], (1, 2))).unwrap();
    assert!(matches!(
        ManagerPortParameters::new(vec![a, twin], 4, 0),
        Err(ParamError::DuplicateName { .. })
    ));
}
