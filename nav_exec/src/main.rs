//! Main navigation executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and parameters
//!     - Build the map and the navigation core
//!     - Start the control panel listener (stdin) and the vision loop threads
//!     - Main loop:
//!         - Sensor acquisition
//!         - Navigation cycle (localisation, planning, decision)
//!         - Command execution
//!         - Archiving
//!         - Cycle management
//!
//! The robot's hardware is stood in for by the simulator. With `--sim-time` the executable runs
//! as fast as it can on simulated time, and exits once the robot has stopped at its target.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, error, info, warn};
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use nav_lib::{
    clock::{Clock, ManualTime},
    control_panel::{self, ControlPanel},
    data_store::DataStore,
    decision::{DecisionEngine, NavState},
    eqpt::{Actuator, SensorSource},
    loc::{Pose, PoseEstimator, VisionUpdate},
    map::{Graph, MapParams, NodeId},
    navigator::Navigator,
    params::NavParams,
    sim::SimRobot,
};
use util::{
    archive::Archiver,
    logger::{logger_init, parse_level},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Cycle limit applied to simulated time runs when none is given.
const DEFAULT_SIM_TIME_CYCLE_LIMIT: u64 = 10_000;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "nav_exec", about = "Line following robot navigation executable")]
struct Opt {
    /// Node to navigate to, overriding the parameter file.
    #[structopt(short, long)]
    target: Option<u32>,

    /// Stop after this many cycles.
    #[structopt(short, long)]
    cycles: Option<u64>,

    /// Run on simulated time instead of wall-clock time.
    #[structopt(long)]
    sim_time: bool,

    /// Console log level (info, debug, trace).
    #[structopt(long, default_value = "info")]
    log_level: String,

    /// Executable parameter file, relative to the params directory.
    #[structopt(long, default_value = "nav.toml")]
    params: String,

    /// Map file. Relative paths are taken from the params directory.
    #[structopt(long, default_value = "map.toml", parse(from_os_str))]
    map: PathBuf,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("nav_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    let log_level = parse_level(&opt.log_level).wrap_err("Invalid log level")?;
    logger_init(log_level, &session).wrap_err("Failed to initialise logging")?;

    info!("Line Following Robot Navigation Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", opt);

    // ---- LOAD PARAMETERS ----

    let params: NavParams =
        util::params::load(&opt.params).wrap_err("Could not load navigation params")?;

    let map_params: MapParams = if opt.map.is_absolute() {
        util::params::load_from_path::<MapParams, _>(&opt.map)
    } else {
        util::params::load::<MapParams>(&opt.map.to_string_lossy())
    }
    .wrap_err("Could not load the map")?;

    info!("Parameters loaded");

    // ---- INITIALISE MODULES ----

    let graph = Arc::new(Graph::from_params(&map_params).wrap_err("Invalid map")?);
    info!("Map loaded with {} nodes", graph.num_nodes());

    let target = NodeId(opt.target.unwrap_or(params.exec.target_node));

    let sim_time = if opt.sim_time {
        Some(Arc::new(ManualTime::new(0.0)))
    } else {
        None
    };
    let clock = Arc::new(match sim_time {
        Some(ref t) => Clock::new(t.clone()),
        None => Clock::monotonic(),
    });

    let [x_cm, y_cm, heading_rad] = params.exec.initial_pose;
    let initial = Pose::new(x_cm, y_cm, heading_rad);

    let mut sim = SimRobot::new(params.sim.clone(), params.loc.wheel_dist_cm, initial);
    let sim_clock_id = clock.register();

    let estimator = PoseEstimator::new(params.loc.clone(), graph.clone(), clock.clone(), initial)
        .wrap_err("Failed to initialise the pose estimator")?;
    let mut vision = estimator.vision_handle(sim.camera());

    let panel = Arc::new(ControlPanel::new(params.exec.run_on_start));

    let mut navigator = Navigator::new(
        graph.clone(),
        estimator,
        DecisionEngine::new(params.decision.clone()),
        panel.clone(),
        target,
    );

    let mut arch = Archiver::from_path(&session, "nav.csv")
        .wrap_err("Failed to create the navigation archive")?;

    let mut ds = DataStore::default();

    info!("Module initialisation complete, navigating to {}\n", target);

    // ---- START THREADS ----

    control_panel::spawn_listener(panel.clone(), BufReader::new(std::io::stdin()))
        .wrap_err("Failed to start the control panel listener")?;
    info!("Control panel listening on stdin");

    let shutdown = Arc::new(AtomicBool::new(false));
    let vision_period = Duration::from_secs_f64(params.exec.vision_period_s);
    let vision_thread = {
        let shutdown = shutdown.clone();
        thread::Builder::new()
            .name("vision".into())
            .spawn(move || {
                while !shutdown.load(Ordering::Relaxed) {
                    match vision.update_from_vision() {
                        VisionUpdate::Updated { .. } => (),
                        VisionUpdate::NoLine => debug!("No line in view"),
                        VisionUpdate::Invalid(_) => (),
                    }
                    thread::sleep(vision_period);
                }
            })
            .wrap_err("Failed to start the vision thread")?
    };

    // ---- MAIN LOOP ----

    let cycle_period = Duration::from_secs_f64(params.exec.cycle_period_s);
    let cycle_frequency_hz = 1.0 / params.exec.cycle_period_s;
    let cycle_limit = match (opt.cycles, opt.sim_time) {
        (Some(c), _) => Some(c),
        (None, true) => Some(DEFAULT_SIM_TIME_CYCLE_LIMIT),
        (None, false) => None,
    };

    info!("Begining main loop\n");

    loop {
        if let Some(limit) = cycle_limit {
            if ds.num_cycles >= limit {
                info!("Cycle limit ({}) reached", limit);
                break;
            }
        }

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        if let Some(ref t) = sim_time {
            t.advance(params.exec.cycle_period_s);
        }

        ds.cycle_start(cycle_frequency_hz, clock.now_s());

        // ---- DATA INPUT ----

        sim.step(clock.elapsed_since_last_call(sim_clock_id));
        let sample = sim.collect();

        // ---- NAVIGATION ----

        let report = navigator.cycle(&sample);
        sim.execute(&report.cmd);
        ds.set_report(report);

        if ds.is_1_hz_cycle {
            info!(
                "Pose ({:.1}, {:.1}, {:.1} deg) at {}, {}",
                report.pose.x_cm,
                report.pose.y_cm,
                report.pose.heading_rad.to_degrees(),
                report.current_node,
                report.state
            );
        }

        // ---- WRITE ARCHIVES ----

        if let Some(rec) = ds.arch_record() {
            if let Err(e) = arch.serialise(rec) {
                warn!("Could not write the navigation archive: {}", e);
            }
        }

        // ---- CYCLE MANAGEMENT ----

        ds.cycle_end();

        if opt.sim_time {
            if report.state == NavState::Stopped && navigator.estimator().position_is(target) {
                info!("Target {} reached after {} cycles", target, ds.num_cycles);
                break;
            }
            continue;
        }

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => {
                ds.record_overrun(false, params.exec.max_consec_cycle_overruns);
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
                );
                if ds.record_overrun(true, params.exec.max_consec_cycle_overruns) {
                    error!("Cycle timing cannot be met, the pose estimate will degrade");
                }
            }
        }
    }

    // ---- SHUTDOWN ----

    shutdown.store(true, Ordering::Relaxed);
    if vision_thread.join().is_err() {
        error!("Vision thread panicked");
    }

    if let Some((pose, node)) = ds.last_pose() {
        info!(
            "Final pose ({:.1}, {:.1}, {:.1} deg) at {}",
            pose.x_cm,
            pose.y_cm,
            pose.heading_rad.to_degrees(),
            node
        );
    }
    info!(
        "{} cycles, {} overruns, {} frozen motion updates",
        ds.num_cycles, ds.num_cycle_overruns, ds.num_frozen_updates
    );
    info!("End of execution");

    Ok(())
}
