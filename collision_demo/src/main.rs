//! Collision demo application
//!
//! Scatters rocks, walls and coins around a field and flies a probe sphere
//! through it, logging every contact the collision world reports.
//!
//! Usage: `collision_demo [config.toml|config.ron] [ticks]`

use collision_engine::config::{CollisionConfig, Config, ConfigError};
use collision_engine::foundation::collections::{ColliderHandle, TransformKey};
use collision_engine::foundation::logging;
use collision_engine::foundation::math::{constants::PI, Vec3};
use collision_engine::physics::{
    Collider, ColliderDesc, CollisionContext, CollisionListener, CollisionWorld, HitDirection,
    TickStats, TransformStore, WorldTransform,
};
use rand::Rng;

const FIELD_SIZE: f32 = 40.0;
const ROCK_COUNT: usize = 24;
const WALL_COUNT: usize = 6;
const COIN_COUNT: usize = 12;
const DEFAULT_TICKS: usize = 400;
const PROBE_SPEED: f32 = 0.25;

const PROBE: u32 = 1;
const ROCK: u32 = 2;
const WALL: u32 = 3;
const COIN: u32 = 4;

/// Demo failures
#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("failed to load config: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid tick count '{0}'")]
    Ticks(String),
}

/// Logs contacts of the probe
struct ProbeListener;

impl CollisionListener for ProbeListener {
    fn on_enter_direction(
        &mut self,
        ctx: &mut CollisionContext<'_>,
        other: ColliderHandle,
        direction: HitDirection,
    ) {
        log::info!(
            "Probe hit {} {:?} on its {:?} side",
            type_name(ctx.type_id_of(other)),
            other,
            direction
        );
    }

    fn on_exit(&mut self, ctx: &mut CollisionContext<'_>, other: ColliderHandle) {
        log::info!("Probe left {} {:?}", type_name(ctx.type_id_of(other)), other);
    }
}

/// Removes its own collider once the probe touches it
struct CoinListener;

impl CollisionListener for CoinListener {
    fn on_enter(&mut self, ctx: &mut CollisionContext<'_>, other: ColliderHandle) {
        if ctx.type_id_of(other) == Some(PROBE) {
            let this = ctx.this();
            if ctx.deregister(this) {
                log::info!("Coin {:?} collected", this);
            }
        }
    }
}

/// Rock that goes dormant after being struck
struct RockListener;

impl CollisionListener for RockListener {
    fn on_exit(&mut self, ctx: &mut CollisionContext<'_>, other: ColliderHandle) {
        if ctx.type_id_of(other) == Some(PROBE) {
            let this = ctx.this();
            ctx.set_active(this, false);
            log::debug!("Rock {:?} deactivated", this);
        }
    }
}

fn type_name(type_id: Option<u32>) -> &'static str {
    match type_id {
        Some(ROCK) => "rock",
        Some(WALL) => "wall",
        Some(COIN) => "coin",
        Some(PROBE) => "probe",
        _ => "collider",
    }
}

struct CollisionDemo {
    world: CollisionWorld,
    transforms: TransformStore,
    probe: ColliderHandle,
    probe_key: TransformKey,
    probe_position: Vec3,
    totals: TickStats,
}

impl CollisionDemo {
    fn new(config: CollisionConfig) -> Result<Self, DemoError> {
        let mut world = CollisionWorld::with_config(config)?;
        let mut transforms = TransformStore::new();
        let mut rng = rand::thread_rng();
        let bounds = FIELD_SIZE / 2.0 - 2.0;

        let random_position = |rng: &mut rand::rngs::ThreadRng| {
            Vec3::new(
                rng.gen_range(-bounds..bounds),
                rng.gen_range(-bounds..bounds),
                rng.gen_range(-2.0..2.0),
            )
        };

        for _ in 0..ROCK_COUNT {
            let key = transforms.insert(
                WorldTransform::from_position(random_position(&mut rng))
                    .with_uniform_scale(rng.gen_range(0.5..2.0)),
            );
            let desc = ColliderDesc::sphere(rng.gen_range(0.5..1.5));
            world.register_with_listener(Collider::new(desc, ROCK).with_transform(key), RockListener);
        }

        for _ in 0..WALL_COUNT {
            let spin = rng.gen_range(-PI..PI);
            let key = transforms.insert(
                WorldTransform::from_position(random_position(&mut rng))
                    .with_euler(Vec3::new(0.0, 0.0, spin)),
            );
            let desc = ColliderDesc::obb(Vec3::new(4.0, 0.5, 2.0));
            world.register(Collider::new(desc, WALL).with_transform(key));
        }

        for _ in 0..COIN_COUNT {
            let key = transforms.insert(WorldTransform::from_position(random_position(&mut rng)));
            world.register_with_listener(
                Collider::new(ColliderDesc::cube(0.5), COIN).with_transform(key),
                CoinListener,
            );
        }

        let probe_position = Vec3::new(-FIELD_SIZE / 2.0, 0.0, 0.0);
        let probe_key = transforms.insert(WorldTransform::from_position(probe_position));
        let probe = world.register_with_listener(
            Collider::new(ColliderDesc::sphere(1.0), PROBE).with_transform(probe_key),
            ProbeListener,
        );

        log::info!(
            "Scattered {} colliders over a {}x{} field",
            world.len(),
            FIELD_SIZE,
            FIELD_SIZE
        );

        Ok(Self {
            world,
            transforms,
            probe,
            probe_key,
            probe_position,
            totals: TickStats::default(),
        })
    }

    /// Sweep the probe across the field in a slow sine wave
    fn step(&mut self, tick: usize) {
        #[allow(clippy::cast_precision_loss)]
        let phase = tick as f32 * 0.05;
        self.probe_position.x += PROBE_SPEED;
        if self.probe_position.x > FIELD_SIZE / 2.0 {
            self.probe_position.x = -FIELD_SIZE / 2.0;
        }
        self.probe_position.y = phase.sin() * FIELD_SIZE / 3.0;
        self.transforms.set_position(self.probe_key, self.probe_position);

        let stats = self.world.tick(&self.transforms);
        self.totals.pairs_tested += stats.pairs_tested;
        self.totals.contacts += stats.contacts;
        self.totals.entered += stats.entered;
        self.totals.exited += stats.exited;
    }

    fn run(&mut self, ticks: usize) {
        for tick in 0..ticks {
            self.step(tick);
        }

        self.totals.colliders = self.world.len();
        log::info!("Finished {} ticks: {:?}", ticks, self.totals);
        log::info!(
            "Probe is touching {} colliders at the end",
            self.world.contacts_of(self.probe).len()
        );
    }
}

fn load_config(path: Option<&String>) -> Result<CollisionConfig, DemoError> {
    match path {
        Some(path) => {
            log::info!("Loading collision config from {}", path);
            Ok(CollisionConfig::load_from_file(path)?)
        }
        None => Ok(CollisionConfig::default().with_ignored_pair(WALL, WALL)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(args.first())?;
    let ticks = match args.get(1) {
        Some(text) => text.parse().map_err(|_| DemoError::Ticks(text.clone()))?,
        None => DEFAULT_TICKS,
    };

    println!("=== Collision Demo ===");
    println!("Set RUST_LOG=debug for registration and attach details.");
    println!();

    let mut demo = CollisionDemo::new(config)?;
    demo.run(ticks);
    Ok(())
}
