//! Tray application loop for `runcat`.
//!
//! Owns the single-threaded event loop and wires together:
//! - System monitor task (CPU, RAM, disk) at the configured refresh rate
//! - Animation timer, restarted whenever the speed changes
//! - Settings file watcher (live reload on change)
//! - Ctrl-C (save settings and exit)

pub mod host;
pub mod report;

pub use host::{HeadlessTray, TrayHost};

use runcat_config::{
    default_path, load as load_settings, save as save_settings, Settings, SettingsWatcher,
};
use runcat_core::{
    event::Message, Engine, FetchOutcome, Result, SystemSnapshot, Theme, ThemeSource,
};
use runcat_system::{open_monitor, spawn_monitor, startup, Monitor, OsTheme};
use runcat_theme::{default_icon_dir, DirIconStore, IconSet, IconStore};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{error, info, warn};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Start the tray app on a current-thread runtime.  Returns after Ctrl-C.
///
/// Fails if the runtime cannot be built or the CPU counter cannot be opened.
pub fn run() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let path = default_path();
        let settings = load_settings(&path).unwrap_or_else(|e| {
            warn!("Settings load failed ({e}); using defaults");
            Settings::default()
        });

        let monitor = open_monitor()?;

        if let Err(e) = startup::sync(settings.launch_at_login) {
            warn!("Cannot update launch-at-login: {e}");
        }

        let icon_dir = settings.icon_dir.clone().unwrap_or_else(default_icon_dir);
        info!("Loading icons from '{}'", icon_dir.display());

        let mut app = App::new(
            settings,
            path.clone(),
            Box::new(OsTheme),
            Box::new(DirIconStore::new(icon_dir)),
            HeadlessTray::new(),
        );

        let (_watcher, reload_rx) = SettingsWatcher::spawn(&path);
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Cannot listen for Ctrl-C: {e}");
                std::future::pending::<()>().await;
            }
        };

        event_loop(&mut app, monitor, open_monitor, Some(reload_rx), shutdown).await
    })
}

// ── Actions ───────────────────────────────────────────────────────────────────

/// Timer changes requested by [`App::update`]; applied by the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    /// Stop the animation timer and start it again with this period.
    RestartAnimation(Duration),
    /// Restart the system monitor with this sampling period.
    RestartMonitor(Duration),
    Exit,
}

// ── State ─────────────────────────────────────────────────────────────────────

/// Application state: settings, engine, icons and the tray host.
pub struct App<H: TrayHost> {
    settings:      Settings,
    settings_path: PathBuf,
    engine:        Engine,
    themes:        Box<dyn ThemeSource>,
    store:         Box<dyn IconStore>,
    icons:         Option<IconSet>,
    host:          H,
}

impl<H: TrayHost> App<H> {
    pub fn new(
        settings:      Settings,
        settings_path: PathBuf,
        themes:        Box<dyn ThemeSource>,
        store:         Box<dyn IconStore>,
        host:          H,
    ) -> Self {
        let theme = settings.theme.resolve(themes.system_theme());
        let engine = Engine::new(
            settings.speed_config(),
            settings.runner,
            theme,
            settings.reconfigure,
        );

        let mut app = Self {
            settings,
            settings_path,
            engine,
            themes,
            store,
            icons: None,
            host,
        };
        app.reload_icons();
        app
    }

    // ── Update ────────────────────────────────────────────────────────────────

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::Fetched(snapshot) => self.on_fetched(snapshot),
            Message::AnimationTick => {
                self.on_animation_tick();
                Action::None
            }
            Message::SettingsReloaded => match load_settings(&self.settings_path) {
                Ok(settings) => {
                    info!("Settings reloaded");
                    self.apply_settings(settings)
                }
                Err(e) => {
                    warn!("Settings reload failed: {e}");
                    Action::None
                }
            },
            Message::Shutdown => {
                if let Err(e) = save_settings(&self.settings_path, &self.settings) {
                    error!("Cannot save settings: {e}");
                }
                if let Err(e) = self.host.hide() {
                    warn!("Cannot hide tray icon: {e}");
                }
                Action::Exit
            }
        }
    }

    fn on_fetched(&mut self, snapshot: SystemSnapshot) -> Action {
        self.refresh_system_theme();

        match self.engine.on_fetch_tick(snapshot.cpu) {
            FetchOutcome::Accumulating => Action::None,
            FetchOutcome::Reconfigure { interval_ms } => {
                let info = report::system_info(
                    self.engine.average(),
                    self.engine.breakdown(),
                    &snapshot.memory,
                    &snapshot.storage,
                );
                if let Err(e) = self.host.set_system_info(&info) {
                    warn!("Cannot update system info: {e}");
                }
                Action::RestartAnimation(Duration::from_millis(u64::from(interval_ms)))
            }
        }
    }

    fn on_animation_tick(&mut self) {
        let frame = self.engine.on_animation_tick();

        if let Some(icon) = self.icons.as_ref().and_then(|set| set.get(frame.key)) {
            if let Err(e) = self.host.set_icon(icon) {
                warn!("Cannot set tray icon: {e}");
            }
        }
        if let Err(e) = self.host.set_tooltip(&frame.tooltip) {
            warn!("Cannot set tooltip: {e}");
        }
    }

    /// Swap in freshly loaded settings as a whole.
    pub fn apply_settings(&mut self, settings: Settings) -> Action {
        let old = std::mem::replace(&mut self.settings, settings);

        self.engine.configure(self.settings.speed_config());
        self.engine.set_policy(self.settings.reconfigure);
        self.engine.set_runner(self.settings.runner);
        self.engine
            .set_theme(self.settings.theme.resolve(self.themes.system_theme()));
        self.reload_icons();

        if old.launch_at_login != self.settings.launch_at_login {
            if let Err(e) = startup::sync(self.settings.launch_at_login) {
                warn!("Cannot update launch-at-login: {e}");
            }
        }

        if old.refresh_rate != self.settings.refresh_rate {
            Action::RestartMonitor(self.settings.refresh_rate.period())
        } else {
            Action::None
        }
    }

    /// Follow OS light/dark changes while the theme is `System`.
    fn refresh_system_theme(&mut self) {
        if self.settings.theme != Theme::System {
            return;
        }
        let theme = self.themes.system_theme();
        if theme != self.engine.theme() {
            info!(?theme, "System theme changed");
            self.engine.set_theme(theme);
            self.reload_icons();
        }
    }

    fn reload_icons(&mut self) {
        let (theme, runner) = (self.engine.theme(), self.engine.runner());
        if self.icons.as_ref().is_some_and(|set| set.matches(theme, runner)) {
            return;
        }
        self.icons = match IconSet::load(self.store.as_ref(), theme, runner) {
            Ok(set) => Some(set),
            Err(e) => {
                error!("Cannot load icons for {runner} ({theme:?}): {e}");
                None
            }
        };
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

// ── Event loop ────────────────────────────────────────────────────────────────

fn animation_timer(period: Duration) -> Interval {
    let mut timer = time::interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

async fn next_reload(rx: &mut Option<mpsc::Receiver<()>>) -> Option<()> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Drive `app` until `shutdown` resolves.
///
/// `reopen` builds a fresh monitor when the refresh rate changes.
pub async fn event_loop<H, F>(
    app: &mut App<H>,
    monitor: Monitor,
    mut reopen: F,
    mut reload_rx: Option<mpsc::Receiver<()>>,
    shutdown: impl Future<Output = ()>,
) -> Result<()>
where
    H: TrayHost,
    F: FnMut() -> Result<Monitor>,
{
    let mut fetch_rx = spawn_monitor(monitor, app.settings().refresh_rate.period());
    let mut animate = animation_timer(app.engine().animation().interval());
    let mut fetching = true;
    tokio::pin!(shutdown);

    info!("runcat started ({})", app.engine().runner());

    loop {
        let message = tokio::select! {
            snapshot = fetch_rx.recv(), if fetching => match snapshot {
                Some(snapshot) => Message::Fetched(snapshot),
                None => {
                    error!("CPU monitor stopped; the runner keeps its last speed");
                    fetching = false;
                    continue;
                }
            },
            _ = animate.tick() => Message::AnimationTick,
            Some(()) = next_reload(&mut reload_rx) => Message::SettingsReloaded,
            () = &mut shutdown => Message::Shutdown,
        };

        match app.update(message) {
            Action::None => {}
            Action::RestartAnimation(period) => animate = animation_timer(period),
            Action::RestartMonitor(period) => match reopen() {
                Ok(monitor) => {
                    info!("Sampling every {}s", period.as_secs());
                    fetch_rx = spawn_monitor(monitor, period);
                    fetching = true;
                }
                Err(e) => error!("Cannot restart CPU monitor: {e}"),
            },
            Action::Exit => break,
        }
    }

    info!("runcat stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use runcat_core::{
        engine::DEFAULT_INTERVAL_MS, source::FixedTheme, AssetKey, CpuSource, FpsMaxLimit,
        RefreshRate, ResolvedTheme, RunCatError, Runner, UtilizationSample,
    };
    use runcat_theme::{Icon, StaticIconStore};

    struct Constant(f32);

    impl CpuSource for Constant {
        fn read(&mut self) -> Result<UtilizationSample> {
            Ok(UtilizationSample { total: self.0, breakdown: None })
        }
    }

    /// A counter that takes longer to read than an animation period.
    struct Slow(f32);

    impl CpuSource for Slow {
        fn read(&mut self) -> Result<UtilizationSample> {
            std::thread::sleep(Duration::from_millis(600));
            Ok(UtilizationSample::total(self.0))
        }
    }

    fn no_reopen() -> Result<Monitor> {
        Err(RunCatError::CounterUnavailable("unused".into()))
    }

    fn full_store() -> StaticIconStore {
        let mut store = StaticIconStore::new();
        for theme in [ResolvedTheme::Light, ResolvedTheme::Dark] {
            for runner in [Runner::Cat, Runner::Parrot, Runner::Horse] {
                for key in AssetKey::frames(theme, runner) {
                    store.insert(Icon::from_bytes(key, vec![0, 0, 1, 0]).unwrap());
                }
            }
        }
        store
    }

    fn app(dir: &tempfile::TempDir, settings: Settings) -> App<HeadlessTray> {
        App::new(
            settings,
            dir.path().join("settings.toml"),
            Box::new(FixedTheme(ResolvedTheme::Dark)),
            Box::new(full_store()),
            HeadlessTray::new(),
        )
    }

    fn snapshot(cpu: f32) -> SystemSnapshot {
        SystemSnapshot {
            cpu: UtilizationSample::total(cpu),
            ..SystemSnapshot::default()
        }
    }

    #[test]
    fn first_fetch_restarts_animation_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir, Settings::default());

        let action = app.update(Message::Fetched(snapshot(100.0)));
        assert_eq!(action, Action::RestartAnimation(Duration::from_millis(25)));
        assert!(app.host().system_info().starts_with("CPU: 100.0%"));

        assert_eq!(app.update(Message::Fetched(snapshot(100.0))), Action::None);
    }

    #[test]
    fn animation_tick_draws_frame_and_tooltip() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir, Settings::default());
        app.update(Message::Fetched(snapshot(40.0)));

        app.update(Message::AnimationTick);
        app.update(Message::AnimationTick);

        let key = app.host().icon().unwrap();
        assert_eq!(key.file_stem(), "dark_cat_1");
        assert_eq!(app.host().tooltip(), "CPU: 40.0%");
    }

    #[test]
    fn missing_icons_still_update_tooltip() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(
            Settings::default(),
            dir.path().join("settings.toml"),
            Box::new(FixedTheme(ResolvedTheme::Light)),
            Box::new(StaticIconStore::new()),
            HeadlessTray::new(),
        );
        app.update(Message::AnimationTick);
        assert!(app.host().icon().is_none());
        assert_eq!(app.host().tooltip(), "CPU: 0.0%");
    }

    #[test]
    fn new_refresh_rate_restarts_monitor() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir, Settings::default());

        let action = app.apply_settings(Settings {
            refresh_rate: RefreshRate::Sec3,
            runner: Runner::Horse,
            fps_max_limit: FpsMaxLimit::Fps10,
            ..Settings::default()
        });

        assert_eq!(action, Action::RestartMonitor(Duration::from_secs(3)));
        assert_eq!(app.engine().runner(), Runner::Horse);
        assert_eq!(app.engine().animation().frame_count, 14);
        assert_eq!(app.engine().speed_config().fps_max_limit, FpsMaxLimit::Fps10);
    }

    #[test]
    fn reload_from_disk_applies_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir, Settings::default());
        std::fs::write(dir.path().join("settings.toml"), "runner = \"Parrot\"\n").unwrap();

        assert_eq!(app.update(Message::SettingsReloaded), Action::None);
        assert_eq!(app.engine().runner(), Runner::Parrot);
    }

    #[test]
    fn shutdown_persists_settings() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings { runner: Runner::Horse, ..Settings::default() };
        let mut app = app(&dir, settings.clone());

        assert_eq!(app.update(Message::Shutdown), Action::Exit);
        assert!(app.host().icon().is_none());
        assert_eq!(load_settings(dir.path().join("settings.toml")).unwrap(), settings);
    }

    #[tokio::test(start_paused = true)]
    async fn loop_speeds_up_runner_under_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir, Settings::default());
        let monitor = Monitor::new(Box::new(Constant(100.0)));

        event_loop(&mut app, monitor, no_reopen, None, time::sleep(Duration::from_millis(1_500)))
            .await
            .unwrap();

        assert_eq!(app.engine().animation().interval_ms, 25);
        assert_eq!(app.host().tooltip(), "CPU: 100.0%");
        assert!(app.host().system_info().contains("Memory:"));
        assert!(dir.path().join("settings.toml").exists());
    }

    #[tokio::test]
    async fn slow_counter_does_not_stall_animation() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir, Settings { runner: Runner::Horse, ..Settings::default() });
        let monitor = Monitor::new(Box::new(Slow(100.0)));

        // First read starts at 1 s and finishes after shutdown.
        event_loop(&mut app, monitor, no_reopen, None, time::sleep(Duration::from_millis(1_500)))
            .await
            .unwrap();

        let animation = app.engine().animation();
        assert_eq!(animation.interval_ms, DEFAULT_INTERVAL_MS);
        // Ticks at 200..=1400 ms; allow one late tick on a busy machine.
        assert!(animation.current_frame >= 6, "frame {}", animation.current_frame);
        assert_eq!(app.host().tooltip(), "CPU: 0.0%");
    }

    #[tokio::test(start_paused = true)]
    async fn reconfigure_restarts_animation_phase() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir, Settings { runner: Runner::Horse, ..Settings::default() });
        let monitor = Monitor::new(Box::new(Constant(100.0)));

        // 5 ticks at 200 ms, fetch at 1000 ms, then 3 ticks at 25 ms.
        event_loop(&mut app, monitor, no_reopen, None, time::sleep(Duration::from_millis(1_076)))
            .await
            .unwrap();

        let animation = app.engine().animation();
        assert_eq!(animation.interval_ms, 25);
        assert_eq!(animation.current_frame, 8);
        assert_eq!(app.host().icon().unwrap().file_stem(), "dark_horse_7");
    }

    #[tokio::test(start_paused = true)]
    async fn restarted_timer_waits_a_full_period() {
        let start = Instant::now();
        let mut timer = animation_timer(Duration::from_millis(25));

        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(25));
        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(50));
    }
}
