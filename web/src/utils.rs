/// Local storage key for a persisted value. Bump the suffix when the shape changes.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

/// Seed drawn from JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes(std::array::from_fn(|_| (256. * random()) as u8))
}
