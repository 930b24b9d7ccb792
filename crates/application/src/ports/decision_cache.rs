/// Keyed memoization of parsed PAC decisions.
///
/// Keys are opaque 20-byte digests; values are the cached decision strings
/// (`DIRECT` or `host:port`). Inserts overwrite; a stored value is visible to
/// the next lookup on the same key from any caller, and concurrent writers of
/// one key resolve last-writer-wins.
pub trait DecisionCache: Send + Sync {
    fn get(&self, key: &[u8; 20]) -> Option<String>;

    fn put(&self, key: [u8; 20], value: String);
}
