use abalone_nn::{RandomSource, TrainConfig, Trainer};
use rand::{rngs::StdRng, SeedableRng};

fn main() {
    let mut rng = StdRng::seed_from_u64(1);
    let trainer = Trainer::initialize(
        &RandomSource::new(3, 2, 2),
        4,
        (5, 5),
        TrainConfig::new(100, 1.0).with_sample_every(10),
        &mut rng,
    );
    let trainer = match trainer {
        Ok(t) => t,
        Err(e) => {
            eprintln!("setup failed: {e}");
            return;
        }
    };

    let outcome = trainer.train();
    for sample in outcome.history.samples() {
        println!("Epoch {}: error = {:.6}", sample.epoch, sample.mean_abs_error);
    }
}
