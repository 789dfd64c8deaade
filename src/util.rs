/// A simplified and const generic version of arrayref
#[inline]
fn take<const N: usize>(data: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(&data[..N]);
    buf
}

#[inline]
pub(crate) fn get_split<const N: usize>(data: &[u8]) -> Option<([u8; N], &[u8])> {
    data.get(N..).map(|d| (take::<N>(data), d))
}

#[inline]
pub(crate) fn le_i16(data: &[u8]) -> i16 {
    i16::from_le_bytes(take::<2>(data))
}

#[inline]
pub(crate) fn le_u16(data: &[u8]) -> u16 {
    u16::from_le_bytes(take::<2>(data))
}

#[inline]
pub(crate) fn le_i32(data: &[u8]) -> i32 {
    i32::from_le_bytes(take::<4>(data))
}

/// A fixed size record whose length was checked before it was handed out,
/// so field reads index directly.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Record<'a> {
    data: &'a [u8],
}

impl<'a> Record<'a> {
    #[inline]
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Record { data }
    }

    #[inline]
    pub(crate) fn u8(&self, at: usize) -> u8 {
        self.data[at]
    }

    #[inline]
    pub(crate) fn i16(&self, at: usize) -> i16 {
        le_i16(&self.data[at..])
    }

    #[inline]
    pub(crate) fn i32(&self, at: usize) -> i32 {
        le_i32(&self.data[at..])
    }
}

/// Appends little endian fields to an output buffer
#[derive(Debug)]
pub(crate) struct Writer<'a> {
    out: &'a mut Vec<u8>,
}

impl<'a> Writer<'a> {
    #[inline]
    pub(crate) fn new(out: &'a mut Vec<u8>) -> Self {
        Writer { out }
    }

    #[inline]
    pub(crate) fn u8(&mut self, value: u8) -> &mut Self {
        self.out.push(value);
        self
    }

    #[inline]
    pub(crate) fn i16(&mut self, value: i16) -> &mut Self {
        self.out.extend_from_slice(&value.to_le_bytes());
        self
    }

    #[inline]
    pub(crate) fn i32(&mut self, value: i32) -> &mut Self {
        self.out.extend_from_slice(&value.to_le_bytes());
        self
    }

    #[inline]
    pub(crate) fn skip(&mut self, len: usize) -> &mut Self {
        self.out.resize(self.out.len() + len, 0);
        self
    }
}
