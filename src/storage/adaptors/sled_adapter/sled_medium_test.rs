use super::*;
use crate::Medium;

#[test]
fn test_unwritten_addresses_read_erased() {
    let dir = tempfile::tempdir().unwrap();
    let medium = SledMedium::open(dir.path(), 4096).expect("open");
    assert_eq!(medium.read(100, 4).unwrap(), vec![0xFF; 4]);
}

#[test]
fn test_write_then_read_partial_block() {
    let dir = tempfile::tempdir().unwrap();
    let mut medium = SledMedium::open(dir.path(), 4096).expect("open");
    medium.write(2688, 0x01).unwrap();
    medium.write(2690, 0x03).unwrap();
    assert_eq!(medium.read(2688, 4).unwrap(), vec![0x01, 0xFF, 0x03, 0xFF]);
}

#[test]
fn test_last_write_wins_and_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut medium = SledMedium::open(dir.path(), 4096).expect("open");
        medium.write(7, 0x10).unwrap();
        medium.write(7, 0x20).unwrap();
        medium.flush().unwrap();
    }

    let medium = SledMedium::open(dir.path(), 4096).expect("reopen");
    assert_eq!(medium.read(7, 1).unwrap(), vec![0x20]);
}

#[test]
fn test_out_of_range_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut medium = SledMedium::open(dir.path(), 64).expect("open");
    assert!(medium.write(64, 0).is_err());
    assert!(medium.read(62, 4).is_err());
}
