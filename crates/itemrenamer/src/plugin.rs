//! # Plugin Context
//!
//! [`ItemRenamer`] owns everything the renamer registers with the host for
//! one enable/disable cycle.
//!
//! ## Lifecycle
//!
//! ```text
//! enable()
//!   ├── register SelectionTracker       (event bus)
//!   ├── register StackIdentityGuard     (event bus, if stack_restrictor)
//!   ├── register PacketRewriter         (packet pipeline)
//!   ├── start RefreshInventoryTask
//!   └── check_worlds()
//!
//! disable()
//!   ├── unregister everything above
//!   ├── stop the refresh thread
//!   └── save the configuration if it was edited in-process
//! ```
//!
//! [`RenamerApi`] handles hold a weak reference; once the context is gone
//! they report `PluginError::Disabled`. A handle that upgraded just before
//! `disable()` may still be mid-call; the `disabled` mark on the
//! registrations keeps it from registering anything again.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use itemrenamer_core::{Listener, SelectionTracker};
use itemrenamer_guard::StackIdentityGuard;
use itemrenamer_protocol::{InterceptorId, PacketInterceptor, PacketPipeline, PacketRewriter};
use itemrenamer_rules::{RenameProcessor, RenamerConfig, RenamerSettings};
use parking_lot::Mutex;

use crate::api::RenamerApi;
use crate::bus::{EventBus, ListenerId};
use crate::error::{PluginError, PluginResult};
use crate::refresh::{RefreshHandle, RefreshInventoryTask, DEFAULT_REFRESH_PERIOD};
use crate::server::ServerHandle;

/// Knobs that are not part of the configuration file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenamerOptions {
    /// Interval of the background refresh thread. `None` leaves calling
    /// [`RefreshInventoryTask::run`] to the host's scheduler.
    pub refresh_period: Option<Duration>,
}

impl Default for RenamerOptions {
    fn default() -> Self {
        Self {
            refresh_period: Some(DEFAULT_REFRESH_PERIOD),
        }
    }
}

/// Result of checking one world at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldStatus {
    /// Items in the world are renamed with this pack.
    Enabled {
        /// World name.
        world: String,
        /// Pack in effect.
        pack: String,
    },
    /// The configuration binds a world the server does not have.
    UnknownWorld(String),
    /// The world is bound to a pack that does not exist.
    UnknownPack {
        /// World name.
        world: String,
        /// Missing pack.
        pack: String,
    },
}

#[derive(Debug, Default)]
struct Registrations {
    disabled: bool,
    tracker: Option<ListenerId>,
    guard: Option<ListenerId>,
    rewriter: Option<InterceptorId>,
    refresh: Option<RefreshHandle>,
}

/// State shared between the context and its API handles.
pub(crate) struct RenamerContext {
    pub(crate) config: Arc<RenamerConfig>,
    pub(crate) processor: RenameProcessor,
    tracker: Arc<SelectionTracker>,
    server: Arc<dyn ServerHandle>,
    pipeline: Arc<PacketPipeline>,
    bus: Arc<EventBus>,
    refresh: Arc<RefreshInventoryTask>,
    registrations: Mutex<Registrations>,
    last_save_count: AtomicU64,
}

impl std::fmt::Debug for RenamerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenamerContext")
            .field("config", &self.config)
            .field("pipeline", &self.pipeline)
            .field("bus", &self.bus)
            .field("refresh", &self.refresh)
            .finish_non_exhaustive()
    }
}

impl RenamerContext {
    /// Marks the current configuration as matching the file, and schedules a
    /// client refresh.
    fn synchronized(&self) {
        self.last_save_count
            .store(self.config.modification_count(), Ordering::Release);
        self.refresh.force_refresh();
    }

    pub(crate) fn reload(&self) -> PluginResult<()> {
        if self.registrations.lock().disabled {
            return Err(PluginError::Disabled);
        }
        self.config.reload()?;
        self.synchronized();
        self.refresh_stack_restrictor();
        Ok(())
    }

    fn refresh_stack_restrictor(&self) {
        let mut registrations = self.registrations.lock();
        if registrations.disabled {
            return;
        }
        let wanted = self.config.has_stack_restrictor();

        match (wanted, registrations.guard) {
            (true, None) => {
                let guard =
                    StackIdentityGuard::new(self.processor.clone(), Arc::clone(&self.tracker));
                registrations.guard = Some(self.bus.register(Arc::new(guard) as Arc<dyn Listener>));
            }
            (false, Some(id)) => {
                self.bus.unregister(id);
                registrations.guard = None;
            }
            _ => {}
        }
    }
}

/// The renamer, enabled.
#[derive(Debug)]
pub struct ItemRenamer {
    context: Arc<RenamerContext>,
}

impl ItemRenamer {
    /// Enables the renamer: registers its listeners and interceptor with the
    /// host and starts the refresh task.
    #[must_use]
    pub fn enable(
        config: Arc<RenamerConfig>,
        server: Arc<dyn ServerHandle>,
        pipeline: Arc<PacketPipeline>,
        bus: Arc<EventBus>,
        options: RenamerOptions,
    ) -> Self {
        let processor = RenameProcessor::new(Arc::clone(&config));
        let tracker = Arc::new(SelectionTracker::new());
        let refresh = Arc::new(RefreshInventoryTask::new(Arc::clone(&server)));

        let context = Arc::new(RenamerContext {
            last_save_count: AtomicU64::new(config.modification_count()),
            config,
            processor,
            tracker,
            server,
            pipeline,
            bus,
            refresh,
            registrations: Mutex::new(Registrations::default()),
        });

        {
            let mut registrations = context.registrations.lock();
            registrations.tracker = Some(
                context
                    .bus
                    .register(Arc::clone(&context.tracker) as Arc<dyn Listener>),
            );

            let rewriter =
                PacketRewriter::new(context.processor.clone(), Arc::clone(&context.tracker));
            registrations.rewriter = Some(
                context
                    .pipeline
                    .register(Arc::new(rewriter) as Arc<dyn PacketInterceptor>),
            );

            registrations.refresh = options
                .refresh_period
                .map(|period| context.refresh.start(period));
        }

        if context.config.has_stack_restrictor() {
            tracing::info!("Starting stack restrictor");
        } else {
            tracing::warn!("Stack restrictor has been disabled");
        }
        context.refresh_stack_restrictor();

        let renamer = Self { context };
        renamer.check_worlds();
        tracing::info!("ItemRenamer enabled");
        renamer
    }

    /// Loads the configuration file, then enables.
    ///
    /// # Errors
    ///
    /// Returns `PluginError::Config` if the file cannot be read or parsed.
    pub fn enable_from_file(
        path: impl AsRef<Path>,
        server: Arc<dyn ServerHandle>,
        pipeline: Arc<PacketPipeline>,
        bus: Arc<EventBus>,
        options: RenamerOptions,
    ) -> PluginResult<Self> {
        let config = Arc::new(RenamerConfig::load(path)?);
        Ok(Self::enable(config, server, pipeline, bus, options))
    }

    /// Hands out an API handle. It stops working after [`ItemRenamer::disable`].
    #[must_use]
    pub fn api(&self) -> RenamerApi {
        RenamerApi::new(Arc::downgrade(&self.context))
    }

    /// The configuration store.
    #[must_use]
    pub fn config(&self) -> &Arc<RenamerConfig> {
        &self.context.config
    }

    /// The held slot tracker.
    #[must_use]
    pub fn tracker(&self) -> &Arc<SelectionTracker> {
        &self.context.tracker
    }

    /// The inventory refresh task.
    #[must_use]
    pub fn refresh_task(&self) -> &Arc<RefreshInventoryTask> {
        &self.context.refresh
    }

    /// Returns true if the stack guard is currently registered.
    #[must_use]
    pub fn is_stack_restrictor_active(&self) -> bool {
        self.context
            .registrations
            .lock()
            .guard
            .is_some_and(|id| self.context.bus.is_registered(id))
    }

    /// Re-reads the configuration file and pushes the result to clients.
    ///
    /// # Errors
    ///
    /// Returns `PluginError::Config` if the file cannot be read or parsed.
    /// The active rules are unchanged in that case.
    pub fn reload(&self) -> PluginResult<()> {
        self.context.reload()
    }

    /// Applies an in-process edit and pushes the result to clients.
    pub fn edit<F>(&self, change: F)
    where
        F: FnOnce(&mut RenamerSettings),
    {
        self.context.config.edit(change);
        self.context.refresh.force_refresh();
        self.refresh_stack_restrictor();
    }

    /// Registers or unregisters the stack guard to match the configuration.
    pub fn refresh_stack_restrictor(&self) {
        self.context.refresh_stack_restrictor();
    }

    /// Reports, and logs, how every world will be renamed.
    pub fn check_worlds(&self) -> Vec<WorldStatus> {
        let settings = self.context.config.snapshot();
        let server = &self.context.server;
        let mut report = Vec::new();

        for world in settings.world_keys() {
            if !server.has_world(world) {
                tracing::warn!("Unable to find world {}. Config may be invalid.", world);
                report.push(WorldStatus::UnknownWorld(world.to_owned()));
                continue;
            }

            let pack = settings.effective_pack(world).unwrap_or_default().to_owned();
            if settings.rules.has_pack(&pack) {
                tracing::info!("Item renaming enabled for world {}", world);
                report.push(WorldStatus::Enabled {
                    world: world.to_owned(),
                    pack,
                });
            } else {
                tracing::warn!("Cannot find pack {} for world {}", pack, world);
                report.push(WorldStatus::UnknownPack {
                    world: world.to_owned(),
                    pack,
                });
            }
        }

        if let Some(default_pack) = &settings.default_pack {
            for world in server.world_names() {
                if !settings.worlds.contains_key(&world) {
                    tracing::info!("Item renaming enabled for world {}", world);
                    report.push(WorldStatus::Enabled {
                        world,
                        pack: default_pack.clone(),
                    });
                }
            }
        }
        report
    }

    /// Tears the renamer down.
    ///
    /// Everything registered at enable is removed before this returns, and
    /// API calls still in flight cannot register anything again. The
    /// configuration is saved if it was edited since it was last loaded or
    /// saved.
    ///
    /// # Errors
    ///
    /// Returns `PluginError::Config` if saving failed. Teardown has completed
    /// regardless.
    pub fn disable(self) -> PluginResult<()> {
        let context = self.context;

        let registrations = std::mem::replace(
            &mut *context.registrations.lock(),
            Registrations {
                disabled: true,
                ..Registrations::default()
            },
        );
        if let Some(id) = registrations.rewriter {
            context.pipeline.unregister(id);
        }
        for id in [registrations.guard, registrations.tracker].into_iter().flatten() {
            context.bus.unregister(id);
        }
        if let Some(refresh) = registrations.refresh {
            refresh.stop();
        }

        let result = if context.config.modification_count()
            == context.last_save_count.load(Ordering::Acquire)
        {
            Ok(())
        } else if context.config.path().is_none() {
            tracing::debug!("Configuration edited in memory only, nothing to save");
            Ok(())
        } else {
            tracing::info!("Saving configuration");
            context.config.save().map_err(Into::into)
        };

        tracing::info!("ItemRenamer disabled");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itemrenamer_core::Player;

    struct OneWorld;

    impl ServerHandle for OneWorld {
        fn world_names(&self) -> Vec<String> {
            vec!["world".into()]
        }

        fn online_players(&self) -> Vec<Player> {
            Vec::new()
        }

        fn resend_inventory(&self, _player: &Player) {}
    }

    fn enabled() -> (ItemRenamer, Arc<EventBus>) {
        let settings = RenamerSettings {
            default_pack: Some("default".into()),
            ..RenamerSettings::default()
        };
        let (pipeline, _network) = PacketPipeline::unbounded();
        let bus = Arc::new(EventBus::default());
        let renamer = ItemRenamer::enable(
            Arc::new(RenamerConfig::from_settings(settings)),
            Arc::new(OneWorld),
            Arc::new(pipeline),
            Arc::clone(&bus),
            RenamerOptions {
                refresh_period: None,
            },
        );
        (renamer, bus)
    }

    #[test]
    fn test_context_outliving_disable_registers_nothing() {
        let (renamer, bus) = enabled();
        let context = Arc::clone(&renamer.context);
        assert_eq!(bus.listener_count(), 2);

        renamer.disable().unwrap();
        assert_eq!(bus.listener_count(), 0);

        assert!(matches!(context.reload(), Err(PluginError::Disabled)));
        context.refresh_stack_restrictor();
        assert_eq!(bus.listener_count(), 0);
        assert!(context.registrations.lock().disabled);
    }
}
