// lints
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]

use std::error::Error;
use std::time::{Duration, Instant};

use itertools::Itertools;
use life::{Algorithm, Engine, Population, RlePattern};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, info_span, warn};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

// divisible by 3 so every algorithm can run
const WIDTH: usize = 255;
const HEIGHT: usize = 256;
const GENERATIONS: u64 = 5000;
const SOUP_SEED: u64 = 0x5eed;

const ACORN: &str = "\
#N Acorn
#O Charles Corderman
#C A methuselah that stabilizes after 5206 generations.
x = 7, y = 3, rule = B3/S23
bo5b$3bo3b$2o2b3o!
";

enum Start {
    Pattern(Vec<Vec<bool>>),
    /// random fill from a seeded generator
    Soup(u64),
}
impl Start {
    fn apply(&self, engine: &mut dyn Engine) {
        match self {
            Start::Pattern(cells) => engine.seed(cells),
            Start::Soup(seed) => engine.populate(&mut ChaCha8Rng::seed_from_u64(*seed)),
        }
    }
}

struct Sample {
    algorithm: Algorithm,
    elapsed: Duration,
    engine: Box<dyn Engine>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_env_filter(EnvFilter::from_default_env())
        .with_span_events(FmtSpan::CLOSE)
        .init();

    let acorn = RlePattern::read_from_string(ACORN)?;
    info!(
        name = acorn.name.as_deref(),
        width = acorn.width,
        height = acorn.height,
        "loaded pattern"
    );
    let starts = [
        ("acorn", Start::Pattern(acorn.cells)),
        ("soup", Start::Soup(SOUP_SEED)),
    ];

    for (name, start) in &starts {
        let samples: Vec<Sample> = Algorithm::ALL
            .into_iter()
            .filter(|algorithm| algorithm.supports(WIDTH, HEIGHT))
            .map(|algorithm| run(algorithm, name, start))
            .collect();
        let Some((reference, rest)) = samples.split_first() else {
            continue;
        };

        let expected = reference.engine.cells();
        for sample in rest {
            if sample.engine.cells() != expected {
                warn!(
                    start = name,
                    algorithm = %sample.algorithm,
                    reference = %reference.algorithm,
                    "diverged"
                );
            }
        }

        println!("{name} on {WIDTH}x{HEIGHT}, {GENERATIONS} generations");
        for sample in samples.iter().sorted_by_key(|sample| sample.elapsed) {
            let elapsed = format!("{:.3?}", sample.elapsed);
            let rate = GENERATIONS as f64 / sample.elapsed.as_secs_f64();
            println!(
                "  {:<12}{elapsed:>12}{rate:>12.1} gen/s  population {}",
                sample.algorithm,
                sample.engine.population()
            );
        }
    }
    Ok(())
}

fn run(algorithm: Algorithm, name: &str, start: &Start) -> Sample {
    let _span = info_span!("run", %algorithm, start = name).entered();
    let mut engine = algorithm.build(WIDTH, HEIGHT);
    start.apply(engine.as_mut());

    let timer = Instant::now();
    for _ in 0..GENERATIONS {
        engine.step();
    }
    let elapsed = timer.elapsed();
    info!(?elapsed, population = engine.population(), "stepped");
    Sample {
        algorithm,
        elapsed,
        engine,
    }
}
