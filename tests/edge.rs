// SPDX-License-Identifier: Apache-2.0

use tlparams::*;

fn sizes(min: u32, max: u32) -> TransferSizes {
    TransferSizes::new(min, max).unwrap()
}

fn managers(get: TransferSizes, beat_bytes: u32) -> ManagerPortParameters {
    let ram = ManagerParameters::new(ManagerConfig {
        name: "ram".to_string(),
        address: vec![AddressSet::new(0x10000, 0xffff).unwrap()],
        sink_id: IdRange::new(0, 4).unwrap(),
        supports_get: get,
        ..Default::default()
    })
    .unwrap();
    ManagerPortParameters::new(vec![ram], beat_bytes, 0).unwrap()
}

fn clients() -> ClientPortParameters {
    let dma = ClientParameters::new(ClientConfig {
        name: "dma".to_string(),
        source_id: IdRange::new(0, 4).unwrap(),
        ..Default::default()
    })
    .unwrap();
    ClientPortParameters::new(vec![dma], 0).unwrap()
}

#[test]
fn test_bundle_widths() {
    let _ = env_logger::builder().is_test(true).try_init();
    let edge = EdgeParameters::new(clients(), managers(sizes(1, 64), 8)).unwrap();
    assert_eq!(edge.max_transfer(), 64);
    assert_eq!(edge.max_lg_size(), 6);
    assert_eq!(
        *edge.bundle(),
        BundleParameters::new(14, 64, 2, 2, 3).unwrap()
    );
    assert_eq!(edge.bundle().addr_lo_bits(), 3);
    assert_eq!(edge.bundle().full_address_bits(), 17);
    assert_eq!(edge.client().len(), 1);
    assert_eq!(edge.manager().len(), 1);
}

#[test]
fn test_transfer_smaller_than_beat() {
    let result = EdgeParameters::new(clients(), managers(sizes(1, 4), 8));
    assert_eq!(
        result.unwrap_err(),
        ParamError::TransferTooSmall {
            max_transfer: 4,
            beat_bytes: 8,
            managers: vec!["ram".to_string()],
        }
    );
}

#[test]
fn test_transfer_equal_to_beat() {
    let edge = EdgeParameters::new(clients(), managers(sizes(1, 8), 8)).unwrap();
    assert_eq!(edge.max_lg_size(), 3);
    assert_eq!(edge.bundle().size_bits(), 2);
}

fn single_manager(address: AddressSet, get: TransferSizes, beat_bytes: u32) -> ManagerPortParameters {
    let dev = ManagerParameters::new(ManagerConfig {
        name: "dev".to_string(),
        address: vec![address],
        supports_get: get,
        ..Default::default()
    })
    .unwrap();
    ManagerPortParameters::new(vec![dev], beat_bytes, 0).unwrap()
}

#[test]
fn test_byte_wide_link() {
    let manager = single_manager(AddressSet::new(0x0, 0xfff).unwrap(), sizes(1, 1), 1);
    let edge = EdgeParameters::new(clients(), manager).unwrap();
    assert_eq!(edge.max_lg_size(), 1);
    assert_eq!(edge.bundle().address_bits(), 12);
    assert_eq!(edge.bundle().data_bits(), 8);
    assert_eq!(edge.bundle().addr_lo_bits(), 0);
}

#[test]
fn test_data_width_overflow() {
    let beat_bytes = 1u32 << 30;
    let manager = single_manager(
        AddressSet::new(0x0, 0x3fff_ffff).unwrap(),
        sizes(1, beat_bytes),
        beat_bytes,
    );
    assert_eq!(
        EdgeParameters::new(clients(), manager).unwrap_err(),
        ParamError::InvalidBundle {
            field: "data_bits",
            value: beat_bytes,
        }
    );
}
