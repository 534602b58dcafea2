//! # Server Handle
//!
//! What the plugin needs from the hosting server.

use itemrenamer_core::Player;

/// Host services used by the plugin context.
pub trait ServerHandle: Send + Sync {
    /// Names of every loaded world.
    fn world_names(&self) -> Vec<String>;

    /// Returns true if a world with this name is loaded.
    fn has_world(&self, world: &str) -> bool {
        self.world_names().iter().any(|name| name == world)
    }

    /// Players currently connected.
    fn online_players(&self) -> Vec<Player>;

    /// Sends a player's full inventory again, through the packet pipeline.
    fn resend_inventory(&self, player: &Player);
}
