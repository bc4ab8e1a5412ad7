use crate::engine::*;

use std::convert::TryFrom;
use std::io::Read;
use std::os::unix::net::UnixStream;

#[test]
fn test_wire_bytes() {
    assert_eq!(0, u8::from(Command::Quit));
    assert_eq!(1, u8::from(Command::Start));
    assert_eq!(2, u8::from(Command::Stop));

    assert_eq!(Command::Start, Command::try_from(1).unwrap());
}

#[test]
fn test_unknown() {
    match Command::try_from(b'1') {
        Err(CommandError::Unknown(b)) => assert_eq!(b'1', b),
        r => panic!("expected unknown command, got {:?}", r),
    }
}

#[test]
fn test_send() {
    let (sender, mut receiver) = UnixStream::pair().unwrap();

    Command::Stop.send(&sender).unwrap();
    Command::Quit.send(&sender).unwrap();

    let mut bytes = [0u8; 2];
    receiver.read_exact(&mut bytes).unwrap();

    assert_eq!([2, 0], bytes);
}

#[test]
fn test_send_closed() {
    let (sender, receiver) = UnixStream::pair().unwrap();
    drop(receiver);

    match Command::Start.send(&sender) {
        Err(CommandError::Io(Command::Start, _)) => (),
        r => panic!("expected I/O error, got {:?}", r),
    }
}
