//! # Public API
//!
//! A cloneable handle other plugins use to query and drive the renamer.

use std::borrow::Cow;
use std::sync::{Arc, Weak};

use itemrenamer_core::{Damage, ItemId, ItemStack, Player, SlotContext};
use itemrenamer_rules::{apply_override, DisplayOverride};

use crate::error::{PluginError, PluginResult};
use crate::plugin::RenamerContext;

/// Handle to an enabled renamer.
///
/// Every call fails with `PluginError::Disabled` once the renamer that issued
/// the handle has been disabled.
#[derive(Clone, Debug)]
pub struct RenamerApi {
    context: Weak<RenamerContext>,
}

impl RenamerApi {
    pub(crate) fn new(context: Weak<RenamerContext>) -> Self {
        Self { context }
    }

    fn context(&self) -> PluginResult<Arc<RenamerContext>> {
        self.context.upgrade().ok_or(PluginError::Disabled)
    }

    /// Returns true while the issuing renamer is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.context.strong_count() > 0
    }

    /// The display a stack of `(item_id, damage)` gets in `pack`, in raw `&`
    /// form.
    ///
    /// # Errors
    ///
    /// Returns `PluginError::Disabled` after teardown.
    pub fn resolved_display(
        &self,
        pack: &str,
        item_id: ItemId,
        damage: Damage,
    ) -> PluginResult<Option<DisplayOverride>> {
        let context = self.context()?;
        Ok(context.config.snapshot().rules.resolve(pack, item_id, damage))
    }

    /// Renders a stack as `player` would see it.
    ///
    /// # Errors
    ///
    /// Returns `PluginError::Disabled` after teardown.
    pub fn process<'a>(
        &self,
        player: &Player,
        stack: &'a ItemStack,
        slot: SlotContext,
    ) -> PluginResult<Cow<'a, ItemStack>> {
        let context = self.context()?;
        Ok(context.processor.process(player, stack, slot))
    }

    /// Renders a stack with the rules of an explicit pack, ignoring world
    /// bindings.
    ///
    /// # Errors
    ///
    /// Returns `PluginError::Disabled` after teardown.
    pub fn process_with_pack<'a>(
        &self,
        pack: &str,
        stack: &'a ItemStack,
    ) -> PluginResult<Cow<'a, ItemStack>> {
        if stack.is_empty() {
            return Ok(Cow::Borrowed(stack));
        }
        Ok(
            match self.resolved_display(pack, stack.type_id, stack.damage)? {
                Some(display) => Cow::Owned(apply_override(stack, &display)),
                None => Cow::Borrowed(stack),
            },
        )
    }

    /// Re-reads the configuration file and pushes the result to clients.
    ///
    /// # Errors
    ///
    /// Returns `PluginError::Disabled` after teardown and
    /// `PluginError::Config` if the file cannot be loaded.
    pub fn reload(&self) -> PluginResult<()> {
        self.context()?.reload()
    }
}
