use std::io;

/// Byte channel a [`ModbusClient`](super::ModbusClient) talks through.
///
/// One transport is one half-duplex bus: callers must not run two exchanges on it at once.
/// Read timeouts and cancellation belong here, not in the codec.
pub trait Transport {
    /// Blocking read into `buf`, returning how many bytes arrived.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Blocking write of `buf`, returning how many bytes were accepted.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Discards stale input left over from an abandoned exchange.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}
