use once_cell::sync::Lazy;

mod hash32;
mod hash64;

/// Native byte order, probed once per process by writing a known 16-bit
/// pattern and inspecting its layout. Read-only after initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ByteOrder {
    Little,
    Big,
}

pub(crate) static NATIVE_ORDER: Lazy<ByteOrder> = Lazy::new(|| {
    let mut probe = [0u8; 2];
    unsafe { probe.as_mut_ptr().cast::<u16>().write_unaligned(0xABCD) };
    match probe {
        [0xCD, 0xAB] => ByteOrder::Little,
        [0xAB, 0xCD] => ByteOrder::Big,
        _ => unreachable!("could not determine native byte order"),
    }
});

/// Reads a 32-bit word at `p` in native order. `p` may be unaligned.
#[inline]
unsafe fn r4(p: *const u8) -> u32 {
    let bytes = unsafe { p.cast::<[u8; 4]>().read_unaligned() };
    match *NATIVE_ORDER {
        ByteOrder::Little => u32::from_le_bytes(bytes),
        ByteOrder::Big => u32::from_be_bytes(bytes),
    }
}

/// Reads a 64-bit word at `p` in native order. `p` may be unaligned.
#[inline]
unsafe fn r8(p: *const u8) -> u64 {
    let bytes = unsafe { p.cast::<[u8; 8]>().read_unaligned() };
    match *NATIVE_ORDER {
        ByteOrder::Little => u64::from_le_bytes(bytes),
        ByteOrder::Big => u64::from_be_bytes(bytes),
    }
}

/// Folds `len` bytes at `p` into `seed`. The register-width variant is
/// selected by the target's pointer width; both variants are compiled on
/// every target so each stays testable everywhere.
///
/// # Safety
/// `p` must be valid for reading `len` bytes.
#[inline]
pub(crate) unsafe fn fold(p: *const u8, seed: usize, len: usize) -> usize {
    if cfg!(target_pointer_width = "64") {
        unsafe { hash64::fold(p, seed as u64, len as u64) as usize }
    } else {
        unsafe { hash32::fold(p, seed as u32, len as u32) as usize }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_matches_the_target_byte_order() {
        #[cfg(target_endian = "little")]
        assert_eq!(*NATIVE_ORDER, ByteOrder::Little);
        #[cfg(target_endian = "big")]
        assert_eq!(*NATIVE_ORDER, ByteOrder::Big);
    }

    #[test]
    fn word_reads_round_trip_native_values() {
        let word = 0xA1B2_C3D4u32.to_ne_bytes();
        assert_eq!(unsafe { r4(word.as_ptr()) }, 0xA1B2_C3D4);
        let word = 0x0102_0304_0506_0708u64.to_ne_bytes();
        assert_eq!(unsafe { r8(word.as_ptr()) }, 0x0102_0304_0506_0708);
    }

    #[test]
    fn word_reads_tolerate_unaligned_addresses() {
        let buf = [0u8, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99];
        let a = unsafe { r8(buf.as_ptr().add(1)) };
        let b = unsafe { r8(buf.as_ptr().add(1)) };
        assert_eq!(a, b);
    }

    #[test]
    fn fold_dispatch_is_deterministic() {
        let data = *b"dispatch";
        let first = unsafe { fold(data.as_ptr(), 7, data.len()) };
        let second = unsafe { fold(data.as_ptr(), 7, data.len()) };
        assert_eq!(first, second);
    }
}
