use anyhow::{Context, Result};
use std::path::Path;

use mframe::io::read_data;
use mframe::stats::mean_absolute_error;
use mframe::LinearRegression;

fn main() -> Result<()> {
    env_logger::init();

    let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("examples/data");
    let train_data = read_data(data_dir.join("train_data.txt"), ",", true)
        .context("failed to read training data")?;
    let test_data = read_data(data_dir.join("test_data.txt"), ",", true)
        .context("failed to read test data")?;
    println!("{}", train_data);

    let target = "length";
    let feature = "width";

    let (x_train, y_train) = (train_data.get(feature)?, train_data.get(target)?);
    let (x_test, y_test) = (test_data.get(feature)?, test_data.get(target)?);

    let mut model = LinearRegression::new(0.001, 200);
    model.fit(&x_train, &y_train)?;
    let predictions = model.predict(&x_test)?;

    let mae = mean_absolute_error(&y_test, &predictions)?;
    println!("Mean absolute error: {:.2}", mae);
    if let Some(loss) = model.losses().last() {
        println!("Final training loss: {:.4}", loss);
    }
    Ok(())
}
