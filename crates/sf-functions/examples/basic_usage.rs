use sf_functions::{SmoothFunction, SmoothHuber};
use sf_types::EvalMode;
use sf_vector::{DistVector, PartitionConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("smoothfn basic usage example");

    let config = PartitionConfig::default().with_partitions(8);
    let target: Vec<f64> = (0..1_000).map(|i| (i as f64 * 0.01).sin()).collect();
    let huber = SmoothHuber::new(DistVector::from_vec_with(target, &config)?, 0.5)?;

    // Plain gradient descent from the origin: gradient-only steps, value-only checks.
    let mut x = DistVector::filled_like(huber.reference(), 0.0);
    let step = 0.4;
    for iteration in 0..25 {
        let grad = huber.evaluate(&x, EvalMode::GRADIENT)?.into_gradient()?;
        let next = x.zip_with(&grad, move |xi, gi| xi - step * gi)?;
        next.pin();
        x = next;

        if iteration % 5 == 0 {
            println!("iteration {iteration:>2}: f(x) = {:.6}", huber.evaluate_value(&x)?);
        }
    }

    let final_eval = huber.evaluate(&x, EvalMode::BOTH)?;
    let grad_norm = final_eval.gradient()?.aggregate(0.0, |acc, g| acc + g * g, |a, b| a + b).sqrt();
    println!("final value {:.6}, gradient norm {:.6}", final_eval.value()?, grad_norm);

    Ok(())
}
