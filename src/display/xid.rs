use super::error::Error;

use std::sync::Mutex;

static XID: Mutex<Xid> = Mutex::new(Xid::new());

macro_rules! lock {
    ($mutex:expr) => {
        $mutex.lock().map_err(|_| Error::FailedToLock)
    };
}

/// hands out resource ids from the range the server assigned us during setup
pub struct Xid {
    base: u32,
    mask: u32,
    next: u32,
}

impl Xid {
    const fn new() -> Xid {
        Xid {
            base: 0,
            mask: 0,
            next: 0,
        }
    }

    fn next(&mut self) -> Result<u32, Error> {
        let shift = self.mask.trailing_zeros();
        let id = self.next.checked_shl(shift).ok_or(Error::RanOutOfXid)?;

        if self.mask == 0 || id & !self.mask != 0 {
            return Err(Error::RanOutOfXid);
        }

        self.next += 1;

        Ok(id | self.base)
    }
}

pub fn setup(base: u32, mask: u32) -> Result<(), Error> {
    let mut lock = lock!(XID)?;

    lock.base = base;
    lock.mask = mask;
    lock.next = 1;

    Ok(())
}

pub fn next() -> Result<u32, Error> {
    lock!(XID)?.next()
}
