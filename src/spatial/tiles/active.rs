use super::*;

impl TileStore {
    // === Active set ===

    /// Put a tile on the simulated list. Tiles enter whenever a field goes non-zero.
    #[inline]
    pub fn mark_active(&mut self, key: TileKey) {
        self.active.insert(key);
    }

    #[inline]
    pub fn deactivate(&mut self, key: TileKey) {
        self.active.remove(&key);
    }

    #[inline]
    pub fn is_active(&self, key: TileKey) -> bool {
        self.active.contains(&key)
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Active keys in ascending order.
    pub fn active_keys(&self) -> impl Iterator<Item = TileKey> + '_ {
        self.active.iter().copied()
    }

    /// Drop every active tile that finished a tick with no residual activity.
    /// Returns how many tiles left the set.
    pub fn retire_idle(&mut self) -> usize {
        let tiles = &self.tiles;
        let before = self.active.len();
        self.active
            .retain(|key| tiles.get(key).map_or(false, |t| t.has_activity()));
        before - self.active.len()
    }
}
