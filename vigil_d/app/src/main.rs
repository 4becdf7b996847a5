use anyhow::Result;
use api::{FaceFrame, LandmarkModule, LogLevel, ModuleLogger};
use common::{Assessment, FrameAnalyzer, MonitorConfig};
use libloading::{Library, Symbol};
use log::{debug, error, info, trace, warn};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::sync_channel;
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Duration;

use vigil_d::dispatcher::Dispatcher;
use vigil_d::http::host::ControlHost;
use vigil_d::http::routes;
use vigil_d::sinks::create_backend;
use vigil_d::status::{ControlRequest, StatusSnapshot, SystemState};

extern "C" fn module_log_callback(level: LogLevel, target: *const i8, message: *const i8) {
    unsafe {
        let target_str = std::ffi::CStr::from_ptr(target)
            .to_str()
            .unwrap_or("unknown");
        let message_str = std::ffi::CStr::from_ptr(message).to_str().unwrap_or("");

        match level {
            LogLevel::Error => error!(target: target_str, "{}", message_str),
            LogLevel::Warn => warn!(target: target_str, "{}", message_str),
            LogLevel::Info => info!(target: target_str, "{}", message_str),
            LogLevel::Debug => debug!(target: target_str, "{}", message_str),
            LogLevel::Trace => trace!(target: target_str, "{}", message_str),
        }
    }
}

struct LoadedModule {
    name: String,
    module: Box<dyn LandmarkModule>,
}

fn load_native_modules(dir: &Path) -> Result<Vec<LoadedModule>> {
    let mut modules = Vec::new();

    if !dir.exists() {
        warn!("'{}' directory not found. Creating it.", dir.display());
        fs::create_dir_all(dir)?;
        return Ok(modules);
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path
            .extension()
            .is_some_and(|ext| ext == "dll" || ext == "so" || ext == "dylib")
        {
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();

            info!("Loading module: {:?}", path);

            match (|| -> Result<Box<dyn LandmarkModule>> {
                unsafe {
                    let lib = Library::new(&path)?;
                    let func: Symbol<unsafe extern "C" fn() -> Box<dyn LandmarkModule>> =
                        lib.get(b"create_module")?;
                    let module = func();
                    std::mem::forget(lib);
                    Ok(module)
                }
            })() {
                Ok(module) => {
                    info!("✓ Successfully loaded module: {}", filename);
                    modules.push(LoadedModule {
                        name: filename,
                        module,
                    });
                }
                Err(e) => {
                    error!("✗ Failed to load module {:?}: {}", path, e);
                }
            }
        }
    }

    Ok(modules)
}

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    info!("Starting...");
    debug!("Debug logging is active");
    trace!("Trace logging is active");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        info!("Received Ctrl-C, shutting down...");
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");

    let config_path = Path::new("config.json");
    let config = MonitorConfig::load_or_create(config_path).unwrap_or_else(|e| {
        error!("Failed to load config: {}. Using defaults.", e);
        MonitorConfig::default()
    });
    info!("Loaded Config: {:?}", config);

    let mut native_plugins_dir = Path::new("plugins/native").to_path_buf();
    if !native_plugins_dir.exists() {
        let parent_native = Path::new("../plugins/native");
        if parent_native.exists() {
            native_plugins_dir = parent_native.to_path_buf();
        }
    }

    let mut modules = load_native_modules(&native_plugins_dir)?;

    if modules.is_empty() {
        warn!("No modules loaded!");
    } else {
        info!("Loaded {} module(s) successfully", modules.len());
    }

    info!("Initializing Modules...");
    for module_wrapper in &mut modules {
        let logger_name = format!("vigil_d::plugins::{}", module_wrapper.name);
        let logger = ModuleLogger::new(module_log_callback, logger_name);

        match module_wrapper.module.initialize(logger) {
            Ok(_) => {
                info!("✓ Initialized module: {}", module_wrapper.name);
            }
            Err(e) => {
                error!(
                    "✗ Failed to initialize module {}: {}",
                    module_wrapper.name, e
                );
            }
        }
    }

    // State shared between the producer loop, the consumer thread and the
    // HTTP control surface.
    let snapshot = Arc::new(RwLock::new(StatusSnapshot::offline(config.camera.index)));
    let snapshot_for_host = snapshot.clone();
    let snapshot_for_consumer = snapshot.clone();

    let control_request = Arc::new(RwLock::new(None::<ControlRequest>));
    let control_request_for_host = control_request.clone();

    let tuning = Arc::new(RwLock::new(HashMap::<String, f32>::new()));
    let tuning_for_host = tuning.clone();
    let tuning_for_consumer = tuning.clone();

    let monitoring = Arc::new(AtomicBool::new(false));
    let monitoring_for_consumer = monitoring.clone();

    // Bumped on start and camera change so the consumer drops smoothing
    // and motion state from the previous session.
    let session_epoch = Arc::new(AtomicU64::new(0));
    let session_epoch_for_consumer = session_epoch.clone();

    let http_port = config.http.port;
    thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
        rt.block_on(async {
            let router = routes::get_router(
                snapshot_for_host,
                control_request_for_host,
                tuning_for_host,
            );
            if let Err(e) = ControlHost::start(http_port, router).await {
                error!("Control host failed: {}", e);
            }
        });
    });

    let mut dispatcher = Dispatcher::new(
        create_backend(&config.alert),
        config.alert.cooldown_secs,
    );
    if let Err(e) = dispatcher.initialize() {
        error!("Failed to initialize alert sink: {}", e);
        return Err(e);
    }
    info!("Alert sink initialized ({:?}).", config.alert.output_mode);

    let (tx, rx) = sync_channel::<FaceFrame>(1);

    let running_consumer = running.clone();
    let analysis_config = config.analysis.clone();

    thread::spawn(move || {
        info!("Consumer Thread Started");

        let mut analyzer = FrameAnalyzer::new(analysis_config);
        let mut dispatcher = dispatcher;
        let mut last_frame_time = std::time::Instant::now();
        let mut last_epoch = session_epoch_for_consumer.load(Ordering::SeqCst);

        while running_consumer.load(Ordering::SeqCst) {
            let received = rx.recv_timeout(Duration::from_millis(100)).ok();

            let now = std::time::Instant::now();
            let dt = now.duration_since(last_frame_time).as_secs_f32();
            last_frame_time = now;

            let epoch = session_epoch_for_consumer.load(Ordering::SeqCst);
            if epoch != last_epoch {
                debug!("New monitoring session, resetting analysis state");
                analyzer.reset();
                dispatcher.reset();
                last_epoch = epoch;
            }

            if let Ok(overrides) = tuning_for_consumer.read() {
                if !overrides.is_empty() {
                    let unknown = analyzer.apply_overrides(&overrides);
                    if !unknown.is_empty() {
                        use std::cell::Cell;
                        thread_local! {
                            static LAST_TUNING_WARN: Cell<Option<std::time::Instant>> = const { Cell::new(None) };
                        }
                        let should_log = LAST_TUNING_WARN.with(|cell| match cell.get() {
                            Some(last) if now.duration_since(last).as_secs() < 5 => false,
                            _ => {
                                cell.set(Some(now));
                                true
                            }
                        });
                        if should_log {
                            warn!("Ignoring unknown tuning overrides: {:?}", unknown);
                        }
                    }
                }
            }

            let assessment = if monitoring_for_consumer.load(Ordering::SeqCst) {
                analyzer.assess(received.as_ref(), dt)
            } else {
                Assessment::idle()
            };

            #[cfg(feature = "xtralog")]
            trace!("Assessment: {:?}", assessment);

            if let Some(event) = match dispatcher.dispatch(&assessment) {
                Ok(event) => event,
                Err(e) => {
                    error!("Failed to emit alert: {}", e);
                    None
                }
            } {
                info!(
                    "Alert emitted: {:?} ({:?})",
                    event.level, event.status
                );
            }

            if let Ok(mut write_guard) = snapshot_for_consumer.write() {
                write_guard.assessment = assessment;
            }
        }
    });

    info!("Entering Main Loop (Producer)...");

    let mut camera_index = config.camera.index;
    let probe_limit = config.camera.probe_limit.max(1);
    let active_module = config.module.active.clone();

    let mut frame = FaceFrame::default();
    let mut frame_count: u64 = 0;
    let mut log_interval: u64 = 1000;
    let mut last_log = std::time::Instant::now();
    let mut last_frame_time = std::time::Instant::now();
    let mut fps_window_start = std::time::Instant::now();
    let mut fps_window_count: u32 = 0;
    let target_frame_duration = config.max_fps.map(|fps| Duration::from_secs_f32(1.0 / fps));

    while running.load(Ordering::SeqCst) {
        let request = control_request
            .write()
            .ok()
            .and_then(|mut slot| slot.take());

        if let Some(request) = request {
            let module = modules.iter_mut().find(|m| m.name == active_module);
            match request {
                ControlRequest::Start => {
                    if !monitoring.load(Ordering::SeqCst) {
                        match module {
                            Some(m) => match m.module.open_input(camera_index) {
                                Ok(()) => {
                                    info!("Monitoring started on input {}", camera_index);
                                    session_epoch.fetch_add(1, Ordering::SeqCst);
                                    monitoring.store(true, Ordering::SeqCst);
                                    set_system_state(&snapshot, SystemState::Active);
                                }
                                Err(e) => {
                                    error!("Failed to open input {}: {}", camera_index, e);
                                    set_system_state(&snapshot, SystemState::CameraError);
                                }
                            },
                            None => {
                                error!("Active module '{}' is not loaded", active_module);
                                set_system_state(&snapshot, SystemState::CameraError);
                            }
                        }
                    }
                }
                ControlRequest::Stop => {
                    if monitoring.swap(false, Ordering::SeqCst) {
                        info!("Monitoring stopped");
                    }
                    set_system_state(&snapshot, SystemState::Offline);
                }
                ControlRequest::CycleCamera | ControlRequest::SelectCamera(_) => {
                    let was_monitoring = monitoring.swap(false, Ordering::SeqCst);

                    let candidates: Vec<u32> = match request {
                        ControlRequest::SelectCamera(index) => vec![index],
                        // Probe forward from the next index; the final
                        // candidate wraps back to the current one.
                        _ => (0..probe_limit)
                            .map(|off| (camera_index + 1 + off) % probe_limit)
                            .collect(),
                    };

                    let mut switched = false;
                    if let Some(m) = module {
                        for candidate in candidates {
                            match m.module.open_input(candidate) {
                                Ok(()) => {
                                    info!("Switched to input {}", candidate);
                                    camera_index = candidate;
                                    switched = true;
                                    break;
                                }
                                Err(e) => {
                                    debug!("Input {} unavailable: {}", candidate, e);
                                }
                            }
                        }
                    }

                    if let Ok(mut guard) = snapshot.write() {
                        guard.camera_index = camera_index;
                    }

                    if switched && was_monitoring {
                        session_epoch.fetch_add(1, Ordering::SeqCst);
                        monitoring.store(true, Ordering::SeqCst);
                        set_system_state(&snapshot, SystemState::Active);
                    } else if was_monitoring {
                        error!("No usable input found; monitoring stopped");
                        set_system_state(&snapshot, SystemState::CameraError);
                    }
                }
            }
        }

        if !monitoring.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(50));
            continue;
        }

        let mut any_updated = false;
        let mut active_module_found = false;

        for module_wrapper in &mut modules {
            if module_wrapper.name == active_module {
                active_module_found = true;
                match module_wrapper.module.poll(&mut frame) {
                    Ok(true) => any_updated = true,
                    Ok(false) => {}
                    Err(e) => {
                        debug!("Module poll failed: {}", e);
                    }
                }
            }
        }

        if !active_module_found && !modules.is_empty() {
            use std::cell::Cell;
            thread_local! {
                static LAST_PLUGIN_WARN: Cell<Option<std::time::Instant>> = const { Cell::new(None) };
            }
            let now = std::time::Instant::now();
            let should_log = LAST_PLUGIN_WARN.with(|cell| match cell.get() {
                Some(last) if now.duration_since(last).as_secs() < 5 => false,
                _ => {
                    cell.set(Some(now));
                    true
                }
            });
            if should_log {
                warn!(
                    "Active module '{}' not found among loaded modules!",
                    active_module
                );
            }
        }

        if any_updated {
            let _ = tx.try_send(frame.clone());

            frame_count += 1;
            fps_window_count += 1;

            if fps_window_start.elapsed().as_secs_f32() >= 1.0 {
                let fps = fps_window_count as f32 / fps_window_start.elapsed().as_secs_f32();
                if let Ok(mut guard) = snapshot.write() {
                    guard.fps = fps;
                    guard.frames = frame_count;
                }
                fps_window_start = std::time::Instant::now();
                fps_window_count = 0;
            }

            if frame_count.is_multiple_of(log_interval) {
                let elapsed = last_log.elapsed().as_secs_f32();
                let fps = log_interval as f32 / elapsed;
                info!(
                    "Monitoring Active: Processed {} frames (approx {:.1} FPS)",
                    frame_count, fps
                );
                last_log = std::time::Instant::now();

                if frame_count >= 1_000_000 {
                    log_interval = 1_000_000;
                } else if frame_count >= 100_000 {
                    log_interval = 100_000;
                } else if frame_count >= 10_000 {
                    log_interval = 10_000;
                }
            }

            if let Some(target_duration) = target_frame_duration {
                let elapsed = last_frame_time.elapsed();
                if elapsed < target_duration {
                    thread::sleep(target_duration - elapsed);
                }
            }
            last_frame_time = std::time::Instant::now();
        } else {
            thread::sleep(Duration::from_millis(5));
        }
    }

    info!("Shutting down...");
    for module_wrapper in &mut modules {
        module_wrapper.module.unload();
    }
    Ok(())
}

fn set_system_state(snapshot: &Arc<RwLock<StatusSnapshot>>, state: SystemState) {
    if let Ok(mut guard) = snapshot.write() {
        guard.system = state;
    }
}
